//! The seven tetrominoes.
//!
//! Each generator lays its four blocks out around the horizontal center of the playfield,
//! starting at row 0. The first block of every piece is its rotation pivot.

use crate::block::{Block, BlockId, BlockKind, GroupId};
use crate::geom::{Playfield, Point2};
use crate::state::State;

/// Cell offsets (in cells, relative to the spawn center at row 0) of each piece. Pivot first.
fn offsets(kind: BlockKind) -> [(i32, i32); 4] {
    match kind {
        BlockKind::Square => [(-1, 0), (0, 0), (-1, 1), (0, 1)],
        BlockKind::T => [(0, 0), (-1, 0), (1, 0), (0, 1)],
        BlockKind::Straight => [(0, 0), (-1, 0), (1, 0), (2, 0)],
        BlockKind::S => [(0, 0), (1, 0), (-1, 1), (0, 1)],
        BlockKind::Z => [(0, 0), (-1, 0), (0, 1), (1, 1)],
        BlockKind::J => [(0, 1), (-1, 0), (-1, 1), (1, 1)],
        BlockKind::L => [(0, 1), (1, 0), (-1, 1), (1, 1)],
        // single blocks; never spawned through the catalog
        BlockKind::Bedrock | BlockKind::Grey => [(0, 0); 4],
    }
}

fn build(
    kind: BlockKind,
    first_id: BlockId,
    group: GroupId,
    origin: Point2<i32>,
    field: &Playfield,
) -> [Block; 4] {
    let w = field.cell_width();
    let h = field.cell_height();
    let cells = offsets(kind);
    let block = |i: usize| {
        let (cx, cy) = cells[i];
        Block::piece(
            first_id + i as BlockId,
            group,
            origin + Point2::new(cx * w, cy * h),
            kind,
            field,
        )
    };
    [block(0), block(1), block(2), block(3)]
}

fn spawn_kind(kind: BlockKind, state: &State) -> [Block; 4] {
    let field = &state.rules().playfield;
    build(
        kind,
        state.block_count() as BlockId,
        state.piece_count(),
        Point2::new(field.center_x(), 0),
        field,
    )
}

/// The 2x2 square.
pub fn square(state: &State) -> [Block; 4] {
    spawn_kind(BlockKind::Square, state)
}

/// The T piece.
pub fn t_piece(state: &State) -> [Block; 4] {
    spawn_kind(BlockKind::T, state)
}

/// The 4x1 straight piece.
pub fn straight(state: &State) -> [Block; 4] {
    spawn_kind(BlockKind::Straight, state)
}

pub fn s_skew(state: &State) -> [Block; 4] {
    spawn_kind(BlockKind::S, state)
}

pub fn z_skew(state: &State) -> [Block; 4] {
    spawn_kind(BlockKind::Z, state)
}

pub fn j_piece(state: &State) -> [Block; 4] {
    spawn_kind(BlockKind::J, state)
}

pub fn l_piece(state: &State) -> [Block; 4] {
    spawn_kind(BlockKind::L, state)
}

/// Spawns a piece of the given kind. Returns `None` for kinds that are not tetrominoes.
pub fn spawn(kind: BlockKind, state: &State) -> Option<[Block; 4]> {
    let generator: fn(&State) -> [Block; 4] = match kind {
        BlockKind::Square => square,
        BlockKind::T => t_piece,
        BlockKind::Straight => straight,
        BlockKind::S => s_skew,
        BlockKind::Z => z_skew,
        BlockKind::J => j_piece,
        BlockKind::L => l_piece,
        BlockKind::Bedrock | BlockKind::Grey => return None,
    };
    Some(generator(state))
}

/// Blocks of a piece laid out for a preview pane, with the top left of the piece at the origin.
pub fn preview(kind: BlockKind, field: &Playfield) -> Vec<Block> {
    if !kind.is_shape() {
        return Vec::new();
    }
    let min_x = offsets(kind).iter().map(|&(x, _)| x).min().unwrap_or(0);
    let origin = Point2::new(-min_x * field.cell_width(), 0);
    build(kind, 0, 0, origin, field).to_vec()
}

#[cfg(test)]
fn cells_of(blocks: &[Block], field: &Playfield) -> Vec<(usize, usize)> {
    let mut cells: Vec<_> = blocks
        .iter()
        .filter_map(|b| field.cell_of(b.pos()))
        .collect();
    cells.sort();
    cells
}

#[test]
fn every_piece_has_four_blocks_in_one_group() {
    let state = State::new(Default::default(), 1);
    for kind in BlockKind::SHAPES.iter() {
        let blocks = spawn(*kind, &state).unwrap();
        let group = blocks[0].group();
        assert!(group.is_some());
        for block in blocks.iter() {
            assert_eq!(block.group(), group);
            assert_eq!(block.kind(), *kind);
            assert!(!block.is_placed());
        }
        let ids: Vec<_> = blocks.iter().map(Block::id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        // four distinct cells, all on the field
        let cells = cells_of(&blocks, &state.rules().playfield);
        assert_eq!(cells.len(), 4);
        assert!(cells.windows(2).all(|w| w[0] != w[1]));
    }
}

#[test]
fn pieces_spawn_at_center_top() {
    let state = State::new(Default::default(), 1);
    let field = state.rules().playfield;
    assert_eq!(
        cells_of(&square(&state), &field),
        vec![(4, 0), (4, 1), (5, 0), (5, 1)]
    );
    assert_eq!(
        cells_of(&straight(&state), &field),
        vec![(4, 0), (5, 0), (6, 0), (7, 0)]
    );
    assert_eq!(
        cells_of(&t_piece(&state), &field),
        vec![(4, 0), (5, 0), (5, 1), (6, 0)]
    );
    assert_eq!(
        cells_of(&l_piece(&state), &field),
        vec![(4, 1), (5, 1), (6, 0), (6, 1)]
    );
}

#[test]
fn non_shapes_do_not_spawn() {
    let state = State::new(Default::default(), 1);
    assert!(spawn(BlockKind::Bedrock, &state).is_none());
    assert!(preview(BlockKind::Grey, &state.rules().playfield).is_empty());
}

#[test]
fn preview_starts_at_origin() {
    let field = Playfield::default();
    let blocks = preview(BlockKind::J, &field);
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks.iter().map(Block::x).min(), Some(0));
    assert_eq!(blocks.iter().map(Block::y).min(), Some(0));
}
