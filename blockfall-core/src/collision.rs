//! Movement validation.
//!
//! Every check works on candidate blocks (copies of existing blocks at proposed positions) and
//! compares them against every block of the current state that belongs to another body. A
//! group moves atomically: one invalid block invalidates the whole move.

use crate::block::Block;
use crate::geom::{Playfield, Point2};

/// Returns true if some block of another body sits exactly on `pos`.
fn is_occupied(candidate: &Block, pos: Point2<i32>, blocks: &[Block]) -> bool {
    blocks
        .iter()
        .filter(|other| !other.same_body(candidate))
        .any(|other| other.occupies(pos, candidate.width()))
}

/// Checks a single block moving to `x` (at its own y).
pub fn horizontal_ok(candidate: &Block, x: i32, blocks: &[Block], field: &Playfield) -> bool {
    if x < 0 || x > field.max_x() {
        return false;
    }
    !is_occupied(candidate, Point2::new(x, candidate.y()), blocks)
}

/// Checks a single block moving to `y` (at its own x).
pub fn vertical_ok(candidate: &Block, y: i32, blocks: &[Block], field: &Playfield) -> bool {
    if y > field.max_y() {
        return false;
    }
    !is_occupied(candidate, Point2::new(candidate.x(), y), blocks)
}

/// Checks a group whose candidates have been displaced horizontally.
pub fn horizontal_move_ok(candidates: &[Block], blocks: &[Block], field: &Playfield) -> bool {
    candidates
        .iter()
        .all(|block| horizontal_ok(block, block.x(), blocks, field))
}

/// Checks a group whose candidates have been displaced vertically.
pub fn vertical_move_ok(candidates: &[Block], blocks: &[Block], field: &Playfield) -> bool {
    candidates
        .iter()
        .all(|block| vertical_ok(block, block.y(), blocks, field))
}

/// Checks a group at arbitrary new positions (used for rotations): both checks must pass and
/// no block may leave the top of the field.
pub fn fits(candidates: &[Block], blocks: &[Block], field: &Playfield) -> bool {
    candidates.iter().all(|block| block.y() >= 0)
        && horizontal_move_ok(candidates, blocks, field)
        && vertical_move_ok(candidates, blocks, field)
}

#[cfg(test)]
fn field() -> Playfield {
    Playfield::default()
}

#[cfg(test)]
fn piece_at(id: i64, group: u32, x: i32, y: i32) -> Block {
    let kind = crate::block::BlockKind::T;
    Block::piece(id, group, Point2::new(x, y), kind, &field())
}

#[test]
fn walls() {
    let block = piece_at(0, 0, 0, 0);
    let blocks = vec![block.clone()];
    assert!(!horizontal_ok(&block, -20, &blocks, &field()));
    assert!(horizontal_ok(&block, 0, &blocks, &field()));
    assert!(horizontal_ok(&block, 180, &blocks, &field()));
    assert!(!horizontal_ok(&block, 200, &blocks, &field()));
}

#[test]
fn floor() {
    let block = piece_at(0, 0, 0, 360);
    let blocks = vec![block.clone()];
    assert!(vertical_ok(&block, 380, &blocks, &field()));
    assert!(!vertical_ok(&block, 400, &blocks, &field()));
}

#[test]
fn own_group_does_not_block() {
    let a = piece_at(0, 1, 20, 0);
    let b = piece_at(1, 1, 40, 0);
    let blocks = vec![a.clone(), b.clone()];
    // moving the pair right: a's target is b's current cell
    let moved = vec![a.translated(20, 0), b.translated(20, 0)];
    assert!(horizontal_move_ok(&moved, &blocks, &field()));
}

#[test]
fn other_blocks_block_whole_group() {
    let a = piece_at(0, 1, 20, 0);
    let b = piece_at(1, 1, 20, 20);
    let wall = piece_at(2, 2, 40, 20).locked();
    let blocks = vec![a.clone(), b.clone(), wall];
    let moved = vec![a.translated(20, 0), b.translated(20, 0)];
    // a alone could move, b cannot, so neither does
    assert!(horizontal_ok(&moved[0], moved[0].x(), &blocks, &field()));
    assert!(!horizontal_move_ok(&moved, &blocks, &field()));

    let dropped = vec![a.translated(0, 20), b.translated(0, 20)];
    let floor = piece_at(3, 3, 20, 40).locked();
    let blocks = vec![a, b, floor];
    assert!(!vertical_move_ok(&dropped, &blocks, &field()));
}

#[test]
fn bedrock_blocks_are_separate_bodies() {
    let r1 = Block::bedrock(-1, Point2::new(0, 0), &field());
    let r2 = Block::bedrock(-2, Point2::new(0, 20), &field());
    let blocks = vec![r1.clone(), r2];
    assert!(!vertical_ok(&r1, 20, &blocks, &field()));
}

#[test]
fn fits_rejects_above_top() {
    let a = piece_at(0, 1, 20, 0);
    let blocks = vec![a.clone()];
    assert!(fits(&[a.translated(0, 20)], &blocks, &field()));
    assert!(!fits(&[a.translated(0, -20)], &blocks, &field()));
}
