//! Event sources.
//!
//! The gravity timer, the random-tick timer and the stdin reader all feed one bounded queue.
//! Every source stops as soon as the queue's receiving end is gone.

use blockfall_core::Event;
use futures::prelude::*;
use futures::sync::mpsc;
use std::io::{self, BufRead};
use std::thread;
use std::time::{Duration, Instant};
use tokio::timer::Interval;

const EVENT_QUEUE_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Event(Event),
    /// No more input lines will arrive.
    InputClosed,
}

pub fn channel() -> (mpsc::Sender<Message>, mpsc::Receiver<Message>) {
    mpsc::channel(EVENT_QUEUE_SIZE)
}

/// Sends `event` once per `every`.
pub fn ticks(
    every: Duration,
    event: Event,
    tx: mpsc::Sender<Message>,
) -> impl Future<Item = (), Error = ()> {
    Interval::new(Instant::now() + every, every)
        .map_err(|err| error!("timer error: {}", err))
        .fold(tx, move |tx, _| {
            tx.send(Message::Event(event))
                .map_err(move |_| trace!("event queue closed, stopping {:?} timer", event))
        })
        .map(|_| ())
}

/// Turns input lines into messages. Blank lines are skipped, unknown ones logged.
///
/// Returns the sender, or `None` once the queue is gone.
fn forward_lines<I>(lines: I, tx: mpsc::Sender<Message>) -> Option<mpsc::Sender<Message>>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut tx = tx;
    for line in lines {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!("failed to read input: {}", err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Event>() {
            Ok(event) => tx = tx.send(Message::Event(event)).wait().ok()?,
            Err(err) => warn!("{}", err),
        }
    }
    tx.send(Message::InputClosed).wait().ok()
}

/// Reads commands from stdin on a separate thread.
pub fn spawn_stdin(tx: mpsc::Sender<Message>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            let lines = stdin.lock().lines();
            if forward_lines(lines, tx).is_some() {
                debug!("end of input");
            }
        })
}

#[test]
fn lines_become_events() {
    let (tx, rx) = channel();
    let lines = vec!["a", "", "rotate", "jump", "s"]
        .into_iter()
        .map(|line| Ok(line.to_string()));
    assert!(forward_lines(lines, tx).is_some());

    let received: Vec<_> = rx.wait().map(Result::unwrap).collect();
    assert_eq!(
        received,
        vec![
            Message::Event(Event::Move {
                direction: blockfall_core::Direction::Left
            }),
            Message::Event(Event::Rotate),
            Message::Event(Event::SoftDrop),
            Message::InputClosed,
        ]
    );
}

#[test]
fn closed_queue_stops_forwarding() {
    let (tx, rx) = channel();
    drop(rx);
    let lines = vec![Ok("tick".to_string())];
    assert!(forward_lines(lines, tx).is_none());
}
