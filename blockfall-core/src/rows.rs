//! Row occupancy and line clearing.

use crate::block::Block;
use crate::geom::Playfield;
use serde::Serialize;

/// One flag per grid cell: true iff a placed, clearable block sits on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    columns: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl Occupancy {
    /// An all-empty matrix for the given field.
    pub fn empty(field: &Playfield) -> Occupancy {
        Occupancy {
            columns: field.columns,
            rows: field.rows,
            cells: vec![false; field.cells()],
        }
    }

    /// Builds the matrix from scratch.
    pub fn build(blocks: &[Block], field: &Playfield) -> Occupancy {
        let mut occupancy = Self::empty(field);
        for block in blocks {
            if !block.is_placed() || !block.kind().is_clearable() {
                continue;
            }
            if let Some((x, y)) = field.cell_of(block.pos()) {
                occupancy.cells[y * occupancy.columns + x] = true;
            }
        }
        occupancy
    }

    /// Returns the flag at a cell. Cells off the grid are empty.
    pub fn get(&self, column: usize, row: usize) -> bool {
        column < self.columns && row < self.rows && self.cells[row * self.columns + column]
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns true if every column of the row is occupied.
    pub fn is_full(&self, row: usize) -> bool {
        row < self.rows && (0..self.columns).all(|x| self.get(x, row))
    }

    /// All full rows, top to bottom.
    pub fn full_rows(&self) -> Vec<usize> {
        (0..self.rows).filter(|&y| self.is_full(y)).collect()
    }
}

/// Removes one row and drops everything above it by one cell.
fn clear_row(blocks: Vec<Block>, row: usize, field: &Playfield) -> Vec<Block> {
    let row_y = field.y_of(row);
    blocks
        .into_iter()
        .filter(|block| block.y() != row_y)
        .map(|block| {
            if block.y() < row_y {
                block.translated(0, field.cell_height())
            } else {
                block
            }
        })
        .collect()
}

/// Clears every full row.
///
/// Rows are handled top to bottom: shifting the blocks above a cleared row never moves a row
/// further down that is still waiting to be cleared. Returns the remaining blocks and the
/// number of rows cleared.
pub fn clear_full_rows(
    blocks: Vec<Block>,
    occupancy: &Occupancy,
    field: &Playfield,
) -> (Vec<Block>, usize) {
    let full = occupancy.full_rows();
    let cleared = full.len();
    let blocks = full
        .into_iter()
        .fold(blocks, |blocks, row| clear_row(blocks, row, field));
    (blocks, cleared)
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

#[cfg(test)]
fn placed(id: i64, column: usize, row: usize, field: &Playfield) -> Block {
    use crate::block::BlockKind;
    use crate::geom::Point2;
    let pos = Point2::new(field.x_of(column), field.y_of(row));
    Block::piece(id, id as u32, pos, BlockKind::T, field).locked()
}

#[test]
fn occupancy_tracks_placed_clearable_blocks() {
    use crate::geom::Point2;
    let field = small_field();
    let blocks = vec![
        placed(0, 0, 4, &field),
        Block::grey(1, Point2::new(20, 80), &field),
        Block::bedrock(-1, Point2::new(40, 80), &field).locked(),
        placed(2, 3, 4, &field).translated(0, -20),
    ];
    let falling = Block::piece(9, 9, Point2::new(80, 80), crate::block::BlockKind::S, &field);
    let mut all = blocks;
    all.push(falling);
    let occupancy = Occupancy::build(&all, &field);
    assert!(occupancy.get(0, 4));
    assert!(!occupancy.get(1, 4), "grey is not clearable");
    assert!(!occupancy.get(2, 4), "bedrock is not clearable");
    assert!(occupancy.get(3, 3));
    assert!(!occupancy.get(4, 4), "falling blocks do not count");
    assert!(occupancy.full_rows().is_empty());
}

#[test]
fn clearing_a_row_shifts_above() {
    let field = small_field();
    let mut blocks: Vec<_> = (0..5).map(|x| placed(x as i64, x, 4, &field)).collect();
    blocks.push(placed(10, 2, 3, &field));
    blocks.push(placed(11, 2, 2, &field));
    let occupancy = Occupancy::build(&blocks, &field);
    assert_eq!(occupancy.full_rows(), vec![4]);

    let (blocks, cleared) = clear_full_rows(blocks, &occupancy, &field);
    assert_eq!(cleared, 1);
    assert_eq!(blocks.len(), 2);
    assert!(blocks.iter().all(|b| b.y() != 80 || b.id() == 10));
    let rows: Vec<_> = blocks.iter().map(|b| (b.id(), b.y())).collect();
    assert_eq!(rows, vec![(10, 80), (11, 60)]);
}

#[test]
fn clearing_two_rows_with_gap() {
    let field = small_field();
    let mut blocks = Vec::new();
    let mut id = 0;
    for &row in &[2usize, 4] {
        for x in 0..5 {
            blocks.push(placed(id, x, row, &field));
            id += 1;
        }
    }
    blocks.push(placed(100, 0, 3, &field));
    blocks.push(placed(101, 1, 1, &field));
    let occupancy = Occupancy::build(&blocks, &field);
    assert_eq!(occupancy.full_rows(), vec![2, 4]);

    let (blocks, cleared) = clear_full_rows(blocks, &occupancy, &field);
    assert_eq!(cleared, 2);
    let rows: Vec<_> = blocks.iter().map(|b| (b.id(), b.y())).collect();
    // the block between the rows drops once, the block above both drops twice
    assert_eq!(rows, vec![(100, 80), (101, 60)]);
}

#[test]
fn no_full_rows_is_a_no_op() {
    let field = small_field();
    let blocks = vec![placed(0, 0, 4, &field)];
    let occupancy = Occupancy::build(&blocks, &field);
    let (after, cleared) = clear_full_rows(blocks.clone(), &occupancy, &field);
    assert_eq!(cleared, 0);
    assert_eq!(after, blocks);
}
