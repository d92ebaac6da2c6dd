//! Grid geometry: sides, travel directions, border ports and mirror reflections.
//!
//! Cells are addressed as `(column, row)` with column 0 on the left and row 0
//! at the bottom, so travelling "up" increases the row. The ray model of the
//! puzzle puts every position on a half-integer cell centre; here a position is
//! the integer cell it sits in, and the positions just outside the grid use
//! column/row `-1` or `grid_size`. Nothing in the solver needs floating point.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MirrorError, Result};

/// An in-grid cell as `(column, row)`.
pub type Cell = (usize, usize);

/// A position that may lie one step outside the grid.
pub(crate) type Point = (i32, i32);

/// One of the four borders of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// All sides, in reporting order.
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub const fn name(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Side {
    type Err = MirrorError;

    fn from_str(label: &str) -> Result<Self> {
        Side::ALL
            .into_iter()
            .find(|side| side.name().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| MirrorError::UnknownSide(label.to_string()))
    }
}

/// Direction of travel of a ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step as `(d_column, d_row)`.
    #[inline(always)]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    #[inline(always)]
    const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// The two diagonal mirror orientations.
///
/// `A` runs from bottom-left to top-right ("/"), `B` from top-left to
/// bottom-right ("\").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    A,
    B,
}

/// Outgoing direction indexed by `[orientation][incoming direction]`.
///
/// Incoming order matches `Direction::index`: up, down, left, right.
const REFLECTIONS: [[Direction; 4]; 2] = [
    // A "/": vertical and horizontal travel swap with the same sign
    [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ],
    // B "\": vertical and horizontal travel swap with opposite sign
    [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ],
];

impl Orientation {
    /// Branching order used by the path realizer.
    pub const BOTH: [Orientation; 2] = [Orientation::A, Orientation::B];

    /// Direction a ray leaves in after hitting this mirror.
    #[inline(always)]
    pub const fn reflect(self, incoming: Direction) -> Direction {
        let table = match self {
            Orientation::A => &REFLECTIONS[0],
            Orientation::B => &REFLECTIONS[1],
        };
        table[incoming.index()]
    }

    pub const fn symbol(self) -> char {
        match self {
            Orientation::A => '/',
            Orientation::B => '\\',
        }
    }
}

/// A placed mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Mirror {
    pub col: usize,
    pub row: usize,
    pub orientation: Orientation,
}

impl Mirror {
    pub const fn new(col: usize, row: usize, orientation: Orientation) -> Self {
        Self {
            col,
            row,
            orientation,
        }
    }

    #[inline]
    pub const fn cell(&self) -> Cell {
        (self.col, self.row)
    }
}

impl fmt::Display for Mirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {:?})", self.col, self.row, self.orientation)
    }
}

/// A border position: the side of the grid and the offset along it.
///
/// Top and bottom offsets count columns from the left; left and right offsets
/// count rows from the bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Port {
    pub side: Side,
    pub index: usize,
}

impl Port {
    pub const fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }

    /// Fails when the grid is empty or the index falls off the border.
    pub fn validate(self, grid_size: usize) -> Result<()> {
        if grid_size == 0 {
            return Err(MirrorError::EmptyGrid);
        }
        if self.index >= grid_size {
            return Err(MirrorError::IndexOutOfRange {
                index: self.index,
                grid_size,
            });
        }
        Ok(())
    }

    /// Every port of a grid, side by side in `Side::ALL` order.
    pub fn all(grid_size: usize) -> impl Iterator<Item = Port> {
        Side::ALL
            .into_iter()
            .flat_map(move |side| (0..grid_size).map(move |index| Port::new(side, index)))
    }

    /// The position just outside this port and the inward direction.
    pub(crate) fn entry(self, grid_size: usize) -> (Point, Direction) {
        let n = grid_size as i32;
        let i = self.index as i32;
        match self.side {
            Side::Top => ((i, n), Direction::Down),
            Side::Bottom => ((i, -1), Direction::Up),
            Side::Left => ((-1, i), Direction::Right),
            Side::Right => ((n, i), Direction::Left),
        }
    }

    /// The port a ray leaves through when it stops at `point`, if `point` is
    /// one step outside the grid.
    pub(crate) fn from_exit(point: Point, grid_size: usize) -> Option<Port> {
        let n = grid_size as i32;
        let (col, row) = point;
        let along = |offset: i32| (0..n).contains(&offset).then_some(offset as usize);
        match (col, row) {
            (c, r) if r == n => along(c).map(|index| Port::new(Side::Top, index)),
            (c, -1) => along(c).map(|index| Port::new(Side::Bottom, index)),
            (-1, r) => along(r).map(|index| Port::new(Side::Left, index)),
            (c, r) if c == n => along(r).map(|index| Port::new(Side::Right, index)),
            _ => None,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.side, self.index)
    }
}

/// Moves `length` steps from `point`.
#[inline(always)]
pub(crate) const fn advance(point: Point, direction: Direction, length: i32) -> Point {
    let (dc, dr) = direction.delta();
    (point.0 + dc * length, point.1 + dr * length)
}

/// The in-grid cell at `point`, if any.
#[inline(always)]
pub(crate) fn cell_at(point: Point, grid_size: usize) -> Option<Cell> {
    let n = grid_size as i32;
    ((0..n).contains(&point.0) && (0..n).contains(&point.1))
        .then_some((point.0 as usize, point.1 as usize))
}

/// In-grid orthogonal neighbours of a cell.
pub(crate) fn neighbors(cell: Cell, grid_size: usize) -> impl Iterator<Item = Cell> {
    let (col, row) = (cell.0 as i32, cell.1 as i32);
    [(1, 0), (-1, 0), (0, 1), (0, -1)]
        .into_iter()
        .filter_map(move |(dc, dr)| cell_at((col + dc, row + dr), grid_size))
}

/// Whether two cells share an edge.
#[inline]
pub(crate) fn touching(a: Cell, b: Cell) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}
