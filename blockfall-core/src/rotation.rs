//! Pivot-relative rotation.
//!
//! A quarter turn clockwise (on screen, where y grows downward) around the first block of a
//! group. Each non-pivot block is classified by where it sits relative to the pivot and moved
//! by whole cells; diagonal blocks take two axis-aligned steps.

use crate::block::{Block, BlockKind};
use crate::geom::Playfield;

/// Where a block sits relative to the pivot, with distances in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Pivot,
    Right(i32),
    Below(i32),
    Left(i32),
    Above(i32),
    AboveRight(i32, i32),
    BelowRight(i32, i32),
    BelowLeft(i32, i32),
    AboveLeft(i32, i32),
}

fn classify(block: &Block, pivot: &Block, field: &Playfield) -> Placement {
    let dx = (block.x() - pivot.x()) / field.cell_width();
    let dy = (block.y() - pivot.y()) / field.cell_height();
    let d = dx.abs().max(dy.abs());
    match (dx.signum(), dy.signum()) {
        (0, 0) => Placement::Pivot,
        (1, 0) => Placement::Right(d),
        (0, 1) => Placement::Below(d),
        (-1, 0) => Placement::Left(d),
        (0, -1) => Placement::Above(d),
        (1, -1) => Placement::AboveRight(dx.abs(), dy.abs()),
        (1, 1) => Placement::BelowRight(dx.abs(), dy.abs()),
        (-1, 1) => Placement::BelowLeft(dx.abs(), dy.abs()),
        _ => Placement::AboveLeft(dx.abs(), dy.abs()),
    }
}

/// Cell offset of an axis-aligned step.
fn step(placement: Placement) -> (i32, i32) {
    match placement {
        Placement::Right(d) => (-d, d),
        Placement::Below(d) => (-d, -d),
        Placement::Left(d) => (d, -d),
        Placement::Above(d) => (d, d),
        _ => (0, 0),
    }
}

fn offset(placement: Placement) -> (i32, i32) {
    let twice = |a: Placement, b: Placement| {
        let (ax, ay) = step(a);
        let (bx, by) = step(b);
        (ax + bx, ay + by)
    };
    match placement {
        Placement::Pivot => (0, 0),
        Placement::Right(_) | Placement::Below(_) | Placement::Left(_) | Placement::Above(_) => {
            step(placement)
        }
        Placement::AboveRight(x, y) => twice(Placement::Right(x), Placement::Above(y)),
        Placement::BelowRight(x, y) => twice(Placement::Right(x), Placement::Below(y)),
        Placement::BelowLeft(x, y) => twice(Placement::Left(x), Placement::Below(y)),
        Placement::AboveLeft(x, y) => twice(Placement::Left(x), Placement::Above(y)),
    }
}

/// Rotates a group around its first block.
///
/// The result is only a proposal: it has to be validated before it replaces the group.
/// Squares come back unchanged.
pub fn rotate(group: &[Block], field: &Playfield) -> Vec<Block> {
    let pivot = match group.first() {
        Some(pivot) if pivot.kind() != BlockKind::Square => pivot,
        _ => return group.to_vec(),
    };
    group
        .iter()
        .map(|block| {
            let (cx, cy) = offset(classify(block, pivot, field));
            block.translated(cx * field.cell_width(), cy * field.cell_height())
        })
        .collect()
}

#[cfg(test)]
fn group_at(kind: BlockKind, cells: &[(i32, i32)]) -> Vec<Block> {
    use crate::geom::Point2;
    let field = Playfield::default();
    cells
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| Block::piece(i as i64, 0, Point2::new(x * 20, y * 20), kind, &field))
        .collect()
}

#[cfg(test)]
fn cells(blocks: &[Block]) -> Vec<(i32, i32)> {
    blocks.iter().map(|b| (b.x() / 20, b.y() / 20)).collect()
}

#[test]
fn square_is_fixed() {
    let field = Playfield::default();
    let square = group_at(BlockKind::Square, &[(4, 5), (5, 5), (4, 6), (5, 6)]);
    let once = rotate(&square, &field);
    assert_eq!(once, square);
    assert_eq!(rotate(&once, &field), once);
}

#[test]
fn t_quarter_turn() {
    let field = Playfield::default();
    // pivot, left, right, below
    let t = group_at(BlockKind::T, &[(5, 5), (4, 5), (6, 5), (5, 6)]);
    let r = rotate(&t, &field);
    // left -> above, right -> below, below -> left
    assert_eq!(cells(&r), vec![(5, 5), (5, 4), (5, 6), (4, 5)]);
    assert_eq!(r[1].id(), t[1].id());
}

#[test]
fn long_arm_uses_full_distance() {
    let field = Playfield::default();
    let i = group_at(BlockKind::Straight, &[(5, 5), (4, 5), (6, 5), (7, 5)]);
    let r = rotate(&i, &field);
    assert_eq!(cells(&r), vec![(5, 5), (5, 4), (5, 6), (5, 7)]);
}

#[test]
fn diagonal_takes_two_steps() {
    let field = Playfield::default();
    // J with the pivot in the middle of the bottom row: corner sits above-left
    let j = group_at(BlockKind::J, &[(5, 6), (4, 5), (4, 6), (6, 6)]);
    let r = rotate(&j, &field);
    assert_eq!(cells(&r), vec![(5, 6), (6, 5), (5, 5), (5, 7)]);
}

#[test]
fn four_turns_are_identity() {
    let field = Playfield::default();
    let shapes: &[(BlockKind, [(i32, i32); 4])] = &[
        (BlockKind::T, [(5, 5), (4, 5), (6, 5), (5, 6)]),
        (BlockKind::Straight, [(5, 5), (4, 5), (6, 5), (7, 5)]),
        (BlockKind::S, [(5, 5), (6, 5), (4, 6), (5, 6)]),
        (BlockKind::Z, [(5, 5), (4, 5), (5, 6), (6, 6)]),
        (BlockKind::J, [(5, 6), (4, 5), (4, 6), (6, 6)]),
        (BlockKind::L, [(5, 6), (6, 5), (4, 6), (6, 6)]),
    ];
    for (kind, layout) in shapes {
        let piece = group_at(*kind, layout);
        let mut r = piece.clone();
        for _ in 0..4 {
            r = rotate(&r, &field);
        }
        assert_eq!(r, piece, "{:?} did not return after four turns", kind);
        assert_ne!(rotate(&piece, &field), piece);
    }
}
