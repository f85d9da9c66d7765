//! Abstract input events.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Horizontal movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Signed column offset.
    pub fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Everything the reducer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    /// Shift the active piece one cell (and take a gravity step).
    Move { direction: Direction },
    /// An extra gravity step.
    SoftDrop,
    Rotate,
    Restart,
    /// The periodic gravity step.
    GravityTick,
    /// Advances the random sequence.
    RandomTick,
}

/// A string that does not name an event.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown event {input:?}")]
pub struct ParseEventError {
    input: String,
}

impl FromStr for Event {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, ParseEventError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "left" => Ok(Event::Move {
                direction: Direction::Left,
            }),
            "d" | "right" => Ok(Event::Move {
                direction: Direction::Right,
            }),
            "s" | "down" => Ok(Event::SoftDrop),
            "w" | "rotate" => Ok(Event::Rotate),
            "r" | "restart" => Ok(Event::Restart),
            "tick" => Ok(Event::GravityTick),
            "random" => Ok(Event::RandomTick),
            _ => Err(ParseEventError {
                input: s.to_string(),
            }),
        }
    }
}

#[test]
fn parse_events() {
    assert_eq!(
        "a".parse::<Event>(),
        Ok(Event::Move {
            direction: Direction::Left
        })
    );
    assert_eq!(
        " Right\n".parse::<Event>(),
        Ok(Event::Move {
            direction: Direction::Right
        })
    );
    assert_eq!("s".parse::<Event>(), Ok(Event::SoftDrop));
    assert_eq!("rotate".parse::<Event>(), Ok(Event::Rotate));
    assert_eq!("R".parse::<Event>(), Ok(Event::Restart));
    assert_eq!("tick".parse::<Event>(), Ok(Event::GravityTick));
}

#[test]
fn parse_error_names_input() {
    let err = "jump".parse::<Event>().unwrap_err();
    assert_eq!(err.to_string(), "unknown event \"jump\"");
}

#[test]
fn events_serialize_tagged() {
    let json = serde_json::to_string(&Event::Move {
        direction: Direction::Left,
    })
    .unwrap();
    assert_eq!(json, r#"{"type":"move","direction":"left"}"#);
    let back: Event = serde_json::from_str(r#"{"type":"gravity-tick"}"#).unwrap();
    assert_eq!(back, Event::GravityTick);
}
