//! Bedrock hazards.
//!
//! Every few spawns a single bedrock block appears at a random column of the top row. It falls
//! with gravity like any piece but never moves sideways, never joins a group and never clears.

use crate::block::{Block, BlockId, BlockKind};
use crate::collision;
use crate::geom::{Playfield, Point2};
use crate::sequence;

/// Id of the n-th bedrock block (0-based). Bedrock ids are negative so they never collide
/// with piece ids.
pub fn bedrock_id(n: u32) -> BlockId {
    -(n as BlockId) - 1
}

/// Result of counting down one spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Injection {
    pub countdown: u32,
    pub bedrock: Option<Block>,
}

/// Counts down once and, when the countdown runs out, creates a bedrock block.
///
/// `hash` picks the column. If the chosen cell is taken the injection is retried on the next
/// spawn.
pub fn count_down(
    countdown: u32,
    cadence: u32,
    bedrock_count: u32,
    hash: u32,
    blocks: &[Block],
    field: &Playfield,
) -> Injection {
    let remaining = countdown.saturating_sub(1);
    if remaining > 0 {
        return Injection {
            countdown: remaining,
            bedrock: None,
        };
    }

    let column = sequence::scale_to(hash, field.columns);
    let bedrock = Block::bedrock(
        bedrock_id(bedrock_count),
        Point2::new(field.x_of(column), 0),
        field,
    );
    if !collision::vertical_ok(&bedrock, 0, blocks, field) {
        trace!("bedrock cell in column {} taken, postponing", column);
        return Injection {
            countdown: 1,
            bedrock: None,
        };
    }

    debug!("dropping bedrock in column {}", column);
    Injection {
        countdown: cadence,
        bedrock: Some(bedrock),
    }
}

fn is_falling_bedrock(block: &Block) -> bool {
    block.kind() == BlockKind::Bedrock && !block.is_placed()
}

/// Moves every falling bedrock block down one cell, locking those that cannot move.
///
/// Returns the new blocks and whether anything locked.
pub fn fall(blocks: Vec<Block>, field: &Playfield) -> (Vec<Block>, bool) {
    let mut blocks = blocks;
    let mut locked = false;
    for i in 0..blocks.len() {
        if !is_falling_bedrock(&blocks[i]) {
            continue;
        }
        let dropped = blocks[i].translated(0, field.cell_height());
        blocks[i] = if collision::vertical_ok(&dropped, dropped.y(), &blocks, field) {
            dropped
        } else {
            locked = true;
            blocks[i].locked()
        };
    }
    (blocks, locked)
}

#[test]
fn counts_down_then_drops() {
    let field = Playfield::default();
    let injection = count_down(3, 8, 0, 0, &[], &field);
    assert_eq!(injection.countdown, 2);
    assert!(injection.bedrock.is_none());

    let injection = count_down(1, 8, 4, 0, &[], &field);
    assert_eq!(injection.countdown, 8);
    let bedrock = injection.bedrock.unwrap();
    assert_eq!(bedrock.id(), -5);
    assert_eq!(bedrock.group(), None);
    assert_eq!(bedrock.pos(), Point2::new(0, 0));
    assert!(!bedrock.is_placed());
}

#[test]
fn column_follows_hash() {
    let field = Playfield::default();
    let injection = count_down(1, 8, 0, u32::max_value() >> 1, &[], &field);
    assert_eq!(injection.bedrock.unwrap().x(), 180);
}

#[test]
fn taken_cell_postpones() {
    let field = Playfield::default();
    let blocker = Block::piece(0, 0, Point2::new(0, 0), BlockKind::T, &field);
    let injection = count_down(1, 8, 0, 0, &[blocker], &field);
    assert_eq!(injection.countdown, 1);
    assert!(injection.bedrock.is_none());
}

#[test]
fn bedrock_falls_and_locks() {
    let field = Playfield::default();
    let bedrock = Block::bedrock(-1, Point2::new(40, 340), &field);
    let (blocks, locked) = fall(vec![bedrock], &field);
    assert!(!locked);
    assert_eq!(blocks[0].pos(), Point2::new(40, 360));
    let (blocks, _) = fall(blocks, &field);
    assert_eq!(blocks[0].y(), 380);
    let (blocks, locked) = fall(blocks, &field);
    assert!(locked);
    assert!(blocks[0].is_placed());
    assert_eq!(blocks[0].pos(), Point2::new(40, 380));
}
