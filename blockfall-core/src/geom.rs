//! Geometric primitives and the playfield coordinate model.
//!
//! Positions are measured in pixels with the origin at the top left corner of the playfield;
//! y grows downward. Every block is exactly one cell large, and a cell is the playfield size
//! divided by the grid size.

use core::ops::{Add, Sub};
use serde::{Deserialize, Serialize};

macro_rules! impl_ty {
    ($t:tt, ($($dim:ident: $dty:ty, $dti:tt),+)) => {
        impl<T> $t<T> {
            pub fn new($($dim: $dty,)+) -> Self {
                Self { $($dim,)+ }
            }
        }

        impl<T> Add<Self> for $t<T> where T: Add<T, Output = T> {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self {
                    $($dim: self.$dim + rhs.$dim,)+
                }
            }
        }

        impl<T> Sub<Self> for $t<T> where T: Sub<T, Output = T> {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self {
                    $($dim: self.$dim - rhs.$dim,)+
                }
            }
        }

        impl<T> From<($($dty,)+)> for $t<T> {
            fn from(this: ($($dty,)+)) -> Self {
                Self::new($(this.$dti,)+)
            }
        }
    }
}

/// A pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point2<T> {
    pub x: T,
    pub y: T,
}

impl_ty!(Point2, (x: T, 0, y: T, 1));

/// Playfield dimensions: the pixel size of the field and the grid it is divided into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playfield {
    /// Field width in pixels.
    pub width: i32,
    /// Field height in pixels.
    pub height: i32,
    /// Number of columns.
    pub columns: usize,
    /// Number of rows.
    pub rows: usize,
}

impl Default for Playfield {
    fn default() -> Self {
        Playfield {
            width: 200,
            height: 400,
            columns: 10,
            rows: 20,
        }
    }
}

impl Playfield {
    /// Width of one cell in pixels.
    pub fn cell_width(&self) -> i32 {
        self.width / self.columns as i32
    }

    /// Height of one cell in pixels.
    pub fn cell_height(&self) -> i32 {
        self.height / self.rows as i32
    }

    /// The largest x a block may take.
    pub fn max_x(&self) -> i32 {
        self.width - self.cell_width()
    }

    /// The largest y a block may take (the floor).
    pub fn max_y(&self) -> i32 {
        self.height - self.cell_height()
    }

    /// Horizontal center of the field, snapped to a cell edge.
    pub fn center_x(&self) -> i32 {
        (self.columns as i32 / 2) * self.cell_width()
    }

    /// Pixel x of a column.
    pub fn x_of(&self, column: usize) -> i32 {
        column as i32 * self.cell_width()
    }

    /// Pixel y of a row.
    pub fn y_of(&self, row: usize) -> i32 {
        row as i32 * self.cell_height()
    }

    /// Returns the grid cell (column, row) of a pixel position, if it lies on the field.
    pub fn cell_of(&self, pos: Point2<i32>) -> Option<(usize, usize)> {
        if pos.x < 0 || pos.y < 0 || pos.x > self.max_x() || pos.y > self.max_y() {
            return None;
        }
        Some((
            (pos.x / self.cell_width()) as usize,
            (pos.y / self.cell_height()) as usize,
        ))
    }

    /// Total number of cells.
    pub fn cells(&self) -> usize {
        self.columns * self.rows
    }
}

#[test]
fn default_cell_size() {
    let field = Playfield::default();
    assert_eq!(field.cell_width(), 20);
    assert_eq!(field.cell_height(), 20);
    assert_eq!(field.max_x(), 180);
    assert_eq!(field.max_y(), 380);
    assert_eq!(field.center_x(), 100);
}

#[test]
fn cell_lookup() {
    let field = Playfield::default();
    assert_eq!(field.cell_of(Point2::new(0, 0)), Some((0, 0)));
    assert_eq!(field.cell_of(Point2::new(180, 380)), Some((9, 19)));
    assert_eq!(field.cell_of(Point2::new(-20, 0)), None);
    assert_eq!(field.cell_of(Point2::new(0, 400)), None);
    assert_eq!(field.y_of(19), 380);
}

#[test]
fn point_arithmetic() {
    let a: Point2<i32> = (20, 40).into();
    let b = Point2::new(-20, 20);
    assert_eq!(a + b, Point2::new(0, 60));
    assert_eq!(a - b, Point2::new(40, 20));
}
