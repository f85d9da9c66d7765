//! Levels and the rising grey floor.
//!
//! Every level above the first is paid for with one full-width row of grey blocks at the
//! bottom of the field. The rows are added one block at a time; before a new row starts,
//! everything else is lifted by one cell to make room.

use crate::block::{Block, BlockId, BlockKind};
use crate::geom::{Playfield, Point2};

/// Number of grey blocks the floor should have at a level.
pub fn grey_target(level: u32, field: &Playfield) -> u32 {
    level.saturating_sub(1).saturating_mul(field.columns as u32)
}

/// Blocks and counters after raising the floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    pub blocks: Vec<Block>,
    pub grey_count: u32,
    /// Running block counter, used for ids.
    pub block_count: u32,
    /// Set if a placed block was pushed out of the top of the field.
    pub topped_out: bool,
}

fn lift(blocks: Vec<Block>, field: &Playfield) -> Vec<Block> {
    blocks
        .into_iter()
        .map(|block| {
            if block.kind() == BlockKind::Grey {
                block
            } else {
                block.translated(0, -field.cell_height())
            }
        })
        .collect()
}

fn add_grey_block(floor: Floor, field: &Playfield) -> Floor {
    let columns = field.columns as u32;
    let column = (floor.grey_count % columns) as usize;
    let row = field.rows - 1 - (floor.grey_count / columns) as usize;

    let mut blocks = if column == 0 {
        lift(floor.blocks, field)
    } else {
        floor.blocks
    };
    let topped_out = floor.topped_out || blocks.iter().any(|b| b.is_placed() && b.y() < 0);
    blocks.push(Block::grey(
        floor.block_count as BlockId,
        Point2::new(field.x_of(column), field.y_of(row)),
        field,
    ));

    Floor {
        blocks,
        grey_count: floor.grey_count + 1,
        block_count: floor.block_count + 1,
        topped_out,
    }
}

/// Adds grey blocks until the floor matches the level.
///
/// Stops early once the whole field is grey.
pub fn raise_floor(
    blocks: Vec<Block>,
    grey_count: u32,
    block_count: u32,
    level: u32,
    field: &Playfield,
) -> Floor {
    let target = grey_target(level, field).min(field.cells() as u32);
    let mut floor = Floor {
        blocks,
        grey_count,
        block_count,
        topped_out: false,
    };
    while floor.grey_count < target {
        floor = add_grey_block(floor, field);
    }
    if floor.grey_count > grey_count {
        debug!(
            "floor raised to {} grey blocks (level {})",
            floor.grey_count, level
        );
    }
    floor
}

#[cfg(test)]
fn small_field() -> Playfield {
    Playfield {
        width: 100,
        height: 100,
        columns: 5,
        rows: 5,
    }
}

#[test]
fn level_one_has_no_floor() {
    let field = small_field();
    let floor = raise_floor(Vec::new(), 0, 0, 1, &field);
    assert!(floor.blocks.is_empty());
    assert_eq!(floor.grey_count, 0);
}

#[test]
fn one_row_per_level() {
    let field = small_field();
    let floor = raise_floor(Vec::new(), 0, 7, 3, &field);
    assert_eq!(floor.grey_count, 10);
    assert_eq!(floor.block_count, 17);
    assert!(floor.blocks.iter().all(|b| b.is_placed() && b.kind() == BlockKind::Grey));
    let mut rows: Vec<_> = floor.blocks.iter().map(|b| b.y()).collect();
    rows.sort();
    rows.dedup();
    assert_eq!(rows, vec![60, 80]);
    let ids: Vec<_> = floor.blocks.iter().map(Block::id).collect();
    assert_eq!(ids, (7..17).collect::<Vec<_>>());
}

#[test]
fn existing_blocks_are_lifted() {
    let field = small_field();
    let block = Block::piece(0, 0, Point2::new(0, 80), BlockKind::T, &field).locked();
    let floor = raise_floor(vec![block], 0, 1, 2, &field);
    assert_eq!(floor.blocks[0].y(), 60);
    assert!(!floor.topped_out);
    // the grey row sits where the block was
    assert!(floor.blocks[1..].iter().all(|b| b.y() == 80));
}

#[test]
fn lifting_past_the_top_tops_out() {
    let field = small_field();
    let block = Block::piece(0, 0, Point2::new(0, 0), BlockKind::T, &field).locked();
    let floor = raise_floor(vec![block], 0, 1, 2, &field);
    assert!(floor.topped_out);
}

#[test]
fn floor_never_exceeds_field() {
    let field = small_field();
    let floor = raise_floor(Vec::new(), 0, 0, 100, &field);
    assert_eq!(floor.grey_count, 25);
}

#[test]
fn huge_level_target_saturates() {
    let field = small_field();
    assert_eq!(grey_target(u32::max_value(), &field), u32::max_value());
    let floor = raise_floor(Vec::new(), 0, 0, u32::max_value(), &field);
    assert_eq!(floor.grey_count, 25);
}
