//! Blocks: the unit cells that make up pieces, hazards and the grey floor.

use crate::geom::{Playfield, Point2};
use core::str::FromStr;
use serde::Serialize;
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Unique block identity. Bedrock blocks use negative ids.
pub type BlockId = i64;

/// Identity shared by the four blocks of one spawned piece.
pub type GroupId = u32;

/// Number of tetromino kinds.
pub const NUM_SHAPES: usize = 7;

/// What a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum BlockKind {
    Square = 0,
    T = 1,
    Straight = 2,
    S = 3,
    Z = 4,
    J = 5,
    L = 6,
    /// A falling hazard block.
    Bedrock = 7,
    /// A permanent floor block added on level up.
    Grey = 8,
}

impl BlockKind {
    /// All tetromino kinds, in index order.
    pub const SHAPES: [BlockKind; NUM_SHAPES] = [
        BlockKind::Square,
        BlockKind::T,
        BlockKind::Straight,
        BlockKind::S,
        BlockKind::Z,
        BlockKind::J,
        BlockKind::L,
    ];

    /// Maps a piece-type index to a tetromino kind. Out of range indices have no kind.
    pub fn from_index(index: usize) -> Option<BlockKind> {
        Self::SHAPES.get(index).copied()
    }

    /// Returns true for the seven tetromino kinds.
    pub fn is_shape(self) -> bool {
        !matches!(self, BlockKind::Bedrock | BlockKind::Grey)
    }

    /// Returns true if a row made of this kind can be cleared.
    pub fn is_clearable(self) -> bool {
        self.is_shape()
    }

    /// Display style handed through to the renderer.
    pub fn style(self) -> &'static str {
        match self {
            BlockKind::Square => "fill: yellow",
            BlockKind::T => "fill: purple",
            BlockKind::Straight => "fill: cyan",
            BlockKind::S => "fill: green",
            BlockKind::Z => "fill: red",
            BlockKind::J => "fill: blue",
            BlockKind::L => "fill: orange",
            BlockKind::Bedrock => "fill: black",
            BlockKind::Grey => "fill: grey",
        }
    }

    /// Single-letter name.
    pub fn letter(self) -> char {
        match self {
            BlockKind::Square => 'O',
            BlockKind::T => 'T',
            BlockKind::Straight => 'I',
            BlockKind::S => 'S',
            BlockKind::Z => 'Z',
            BlockKind::J => 'J',
            BlockKind::L => 'L',
            BlockKind::Bedrock => 'B',
            BlockKind::Grey => 'G',
        }
    }
}

impl FromStr for BlockKind {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "O" => Ok(Self::Square),
            "T" => Ok(Self::T),
            "I" => Ok(Self::Straight),
            "S" => Ok(Self::S),
            "Z" => Ok(Self::Z),
            "J" => Ok(Self::J),
            "L" => Ok(Self::L),
            "B" => Ok(Self::Bedrock),
            "G" => Ok(Self::Grey),
            _ => Err(()),
        }
    }
}

/// A single cell-sized block.
///
/// Blocks are never changed in place; every update produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    id: BlockId,
    group: Option<GroupId>,
    pos: Point2<i32>,
    width: i32,
    height: i32,
    placed: bool,
    kind: BlockKind,
    style: &'static str,
}

impl Block {
    /// Creates a block of a spawned piece. It starts out falling.
    pub fn piece(
        id: BlockId,
        group: GroupId,
        pos: Point2<i32>,
        kind: BlockKind,
        field: &Playfield,
    ) -> Block {
        Block {
            id,
            group: Some(group),
            pos,
            width: field.cell_width(),
            height: field.cell_height(),
            placed: false,
            kind,
            style: kind.style(),
        }
    }

    /// Creates a falling bedrock block.
    pub fn bedrock(id: BlockId, pos: Point2<i32>, field: &Playfield) -> Block {
        Block {
            id,
            group: None,
            pos,
            width: field.cell_width(),
            height: field.cell_height(),
            placed: false,
            kind: BlockKind::Bedrock,
            style: BlockKind::Bedrock.style(),
        }
    }

    /// Creates a grey floor block. Grey blocks are placed from the start.
    pub fn grey(id: BlockId, pos: Point2<i32>, field: &Playfield) -> Block {
        Block {
            id,
            group: None,
            pos,
            width: field.cell_width(),
            height: field.cell_height(),
            placed: true,
            kind: BlockKind::Grey,
            style: BlockKind::Grey.style(),
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn pos(&self) -> Point2<i32> {
        self.pos
    }

    pub fn x(&self) -> i32 {
        self.pos.x
    }

    pub fn y(&self) -> i32 {
        self.pos.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn style(&self) -> &'static str {
        self.style
    }

    /// Pixel x of the right edge.
    pub fn right_edge(&self) -> i32 {
        self.pos.x + self.width
    }

    /// Returns a copy of this block at another position.
    pub fn moved_to(&self, pos: Point2<i32>) -> Block {
        Block {
            pos,
            ..self.clone()
        }
    }

    /// Returns a copy of this block moved by the given pixel offset.
    pub fn translated(&self, dx: i32, dy: i32) -> Block {
        self.moved_to(self.pos + Point2::new(dx, dy))
    }

    /// Returns a copy of this block locked in place.
    pub fn locked(&self) -> Block {
        Block {
            placed: true,
            ..self.clone()
        }
    }

    /// Returns true if both blocks move as one body: the same block, or two blocks of the same
    /// piece.
    pub fn same_body(&self, other: &Block) -> bool {
        self.id == other.id || (self.group.is_some() && self.group == other.group)
    }

    /// Returns true if this block sits exactly on the given cell position.
    ///
    /// Overlap is decided by equal x and equal right edge (i.e. equal width) and equal y; there
    /// is no partial overlap on the grid.
    pub fn occupies(&self, pos: Point2<i32>, width: i32) -> bool {
        self.pos.x == pos.x && self.right_edge() == pos.x + width && self.pos.y == pos.y
    }
}

#[test]
fn shape_indices() {
    assert_eq!(BlockKind::from_index(0), Some(BlockKind::Square));
    assert_eq!(BlockKind::from_index(6), Some(BlockKind::L));
    assert_eq!(BlockKind::from_index(NUM_SHAPES), None);
    assert!(!BlockKind::Bedrock.is_clearable());
    assert!(!BlockKind::Grey.is_shape());
}

#[test]
fn kind_letters_parse_back() {
    for kind in BlockKind::SHAPES
        .iter()
        .chain(&[BlockKind::Bedrock, BlockKind::Grey])
    {
        assert_eq!(kind.letter().to_string().parse::<BlockKind>(), Ok(*kind));
    }
    assert!("X".parse::<BlockKind>().is_err());
}

#[test]
fn updates_produce_new_values() {
    let field = Playfield::default();
    let block = Block::piece(3, 1, Point2::new(100, 0), BlockKind::T, &field);
    let moved = block.translated(20, 20);
    assert_eq!(block.pos(), Point2::new(100, 0));
    assert_eq!(moved.pos(), Point2::new(120, 20));
    assert_eq!(moved.id(), 3);
    assert!(!moved.is_placed());
    assert!(moved.locked().is_placed());
}

#[test]
fn bodies() {
    let field = Playfield::default();
    let a = Block::piece(0, 1, Point2::new(0, 0), BlockKind::T, &field);
    let b = Block::piece(1, 1, Point2::new(20, 0), BlockKind::T, &field);
    let c = Block::piece(4, 2, Point2::new(20, 0), BlockKind::S, &field);
    let r1 = Block::bedrock(-1, Point2::new(40, 0), &field);
    let r2 = Block::bedrock(-2, Point2::new(60, 0), &field);
    assert!(a.same_body(&b));
    assert!(!a.same_body(&c));
    assert!(!r1.same_body(&r2));
    assert!(r1.same_body(&r1));
    assert!(c.occupies(Point2::new(20, 0), 20));
}
