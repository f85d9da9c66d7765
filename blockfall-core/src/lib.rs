//! Simulation core of a falling-block puzzle game.
//!
//! Everything here is pure: a [`State`] is reduced by [`Event`]s into a new [`State`], and
//! rendering, timing and input capture are left to the caller.

#[macro_use]
extern crate log;

pub mod block;
pub mod catalog;
pub mod collision;
pub mod event;
pub mod geom;
pub mod hazard;
pub mod level;
pub mod rotation;
pub mod rows;
pub mod rules;
pub mod sequence;
pub mod state;

pub use block::{Block, BlockKind};
pub use event::{Direction, Event};
pub use geom::{Playfield, Point2};
pub use rules::Rules;
pub use state::State;
