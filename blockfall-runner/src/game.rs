use crate::input::Message;
use crate::render::{self, Renderer};
use blockfall_core::{Event, State};
use futures::prelude::*;
use futures::sync::mpsc;

/// Drains the event queue into the reducer, one event at a time.
///
/// Resolves to the last state once input has closed.
pub struct GameLoop<R> {
    state: State,
    events: mpsc::Receiver<Message>,
    renderer: R,
    started: bool,
}

impl<R: Renderer> GameLoop<R> {
    pub fn new(state: State, events: mpsc::Receiver<Message>, renderer: R) -> GameLoop<R> {
        GameLoop {
            state,
            events,
            renderer,
            started: false,
        }
    }

    fn show(&mut self) {
        if let Err(err) = render::render(&mut self.renderer, &self.state) {
            error!("failed to render: {}", err);
        }
    }

    fn apply(&mut self, event: Event) {
        let next = self.state.reduce(event);
        if next.is_game_over() && !self.state.is_game_over() {
            info!(
                "game over with score {} (high score {})",
                next.score(),
                next.high_score().max(next.score())
            );
        }
        // random ticks never change what is on screen
        let changed = event != Event::RandomTick && next != self.state;
        self.state = next;
        if changed {
            self.show();
        }
    }
}

impl<R: Renderer> Future for GameLoop<R> {
    type Item = State;
    type Error = ();

    fn poll(&mut self) -> Poll<State, ()> {
        if !self.started {
            self.started = true;
            self.show();
        }
        loop {
            match self.events.poll()? {
                Async::Ready(Some(Message::Event(event))) => self.apply(event),
                Async::Ready(Some(Message::InputClosed)) | Async::Ready(None) => {
                    return Ok(Async::Ready(self.state.clone()));
                }
                Async::NotReady => return Ok(Async::NotReady),
            }
        }
    }
}

#[cfg(test)]
use blockfall_core::{Block, Rules};
#[cfg(test)]
use std::io;

/// Counts frames.
#[cfg(test)]
#[derive(Default)]
struct Frames {
    count: usize,
    game_over: bool,
}

#[cfg(test)]
impl Renderer for Frames {
    fn draw(&mut self, _: &[Block], _: &[Block]) -> io::Result<()> {
        Ok(())
    }

    fn update_stats(&mut self, _: u32, _: u32, _: u32) -> io::Result<()> {
        Ok(())
    }

    fn set_game_over(&mut self, game_over: bool) -> io::Result<()> {
        self.game_over = game_over;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.count += 1;
        Ok(())
    }
}

#[test]
fn drains_until_input_closes() {
    let (tx, rx) = crate::input::channel();
    let game = GameLoop::new(State::new(Rules::default(), 0), rx, Frames::default());
    let tx = tx
        .send(Message::Event(Event::GravityTick))
        .and_then(|tx| tx.send(Message::Event(Event::RandomTick)))
        .and_then(|tx| tx.send(Message::Event(Event::GravityTick)))
        .and_then(|tx| tx.send(Message::InputClosed))
        .and_then(|tx| tx.send(Message::Event(Event::GravityTick)))
        .wait()
        .unwrap();

    let state = game.wait().unwrap();
    // spawn, then one step; the event after closing is never applied
    assert_eq!(state.piece_count(), 1);
    assert_eq!(state.active_blocks()[0].y(), 20);
    drop(tx);
}

#[test]
fn renders_initial_and_changed_frames() {
    let (tx, rx) = crate::input::channel();
    let mut game = GameLoop::new(State::new(Rules::default(), 0), rx, Frames::default());
    tx.send(Message::Event(Event::GravityTick))
        .and_then(|tx| tx.send(Message::Event(Event::RandomTick)))
        .wait()
        .unwrap();
    // every sender is gone, so the loop finishes after the queued events
    let state = futures::future::poll_fn(|| game.poll()).wait().unwrap();
    assert_eq!(state.piece_count(), 1);
    assert_eq!(game.renderer.count, 2);
    assert!(!game.renderer.game_over);
}
