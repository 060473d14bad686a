//! Board geometry: positions on the 6×6 grid and position sets.
//!
//! ## Position
//!
//! A `(column, row)` pair, both in `[0, 6)`. Positions order by row first,
//! then column, and print in algebraic notation (`a1` is column 0, row 0;
//! `f6` is the far corner).
//!
//! ## PositionSet
//!
//! A 36-bit mask with one bit per cell (`row * 6 + column`). Pattern
//! footprints, cooldown sets and capture sets are all `PositionSet`s, so
//! overlap checks are a single `&`.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitAnd, BitOr, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Width and height of the board.
pub const BOARD_SIZE: u8 = 6;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 36;

/// Orthogonal step directions as `(d_col, d_row)`.
pub const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A cell on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    col: u8,
    row: u8,
}

impl Position {
    /// Create a position. Panics if either coordinate is off the board.
    #[must_use]
    pub const fn new(col: u8, row: u8) -> Self {
        assert!(col < BOARD_SIZE && row < BOARD_SIZE, "Position off the board");
        Self { col, row }
    }

    /// Create a position from signed coordinates, `None` if off the board.
    #[must_use]
    pub fn try_new(col: i32, row: i32) -> Option<Self> {
        let size = i32::from(BOARD_SIZE);
        if (0..size).contains(&col) && (0..size).contains(&row) {
            Some(Self {
                col: col as u8,
                row: row as u8,
            })
        } else {
            None
        }
    }

    /// Create a position from its cell index (`row * 6 + col`).
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        assert!(index < CELL_COUNT, "Cell index out of range");
        Self {
            col: (index % BOARD_SIZE as usize) as u8,
            row: (index / BOARD_SIZE as usize) as u8,
        }
    }

    #[inline]
    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    #[inline]
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Cell index (`row * 6 + col`).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    /// Whether both coordinates are inside the grid.
    ///
    /// Always true for positions built through the constructors; values
    /// coming from a decoded snapshot or action are checked with this.
    #[must_use]
    pub const fn is_on_board(self) -> bool {
        self.col < BOARD_SIZE && self.row < BOARD_SIZE
    }

    /// The position `(d_col, d_row)` away, if it is on the board.
    #[must_use]
    pub fn offset(self, d_col: i32, d_row: i32) -> Option<Self> {
        Self::try_new(i32::from(self.col) + d_col, i32::from(self.row) + d_row)
    }

    /// The four orthogonal neighbour slots; `None` marks the board edge.
    #[must_use]
    pub fn neighbor_slots(self) -> [Option<Self>; 4] {
        ORTHOGONAL.map(|(dc, dr)| self.offset(i32::from(dc), i32::from(dr)))
    }

    /// On-board orthogonal neighbours.
    #[must_use]
    pub fn neighbors(self) -> SmallVec<[Self; 4]> {
        self.neighbor_slots().into_iter().flatten().collect()
    }

    /// One of the four centre cells (c3, d3, c4, d4).
    #[must_use]
    pub const fn is_center(self) -> bool {
        (self.col == 2 || self.col == 3) && (self.row == 2 || self.row == 3)
    }

    /// Manhattan distance to the nearest centre cell.
    #[must_use]
    pub fn center_distance(self) -> u8 {
        let dc = if self.col < 2 { 2 - self.col } else { self.col.saturating_sub(3) };
        let dr = if self.row < 2 { 2 - self.row } else { self.row.saturating_sub(3) };
        dc + dr
    }

    /// Point reflection through the board centre.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        Self {
            col: BOARD_SIZE - 1 - self.col,
            row: BOARD_SIZE - 1 - self.row,
        }
    }

    /// Iterate over all 36 positions in index order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELL_COUNT).map(Self::from_index)
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row + 1)
    }
}

/// Failure to parse algebraic notation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid position notation: {0:?}")]
pub struct ParsePositionError(pub String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        let err = || ParsePositionError(s.to_string());
        if bytes.len() != 2 {
            return Err(err());
        }
        let col = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let row = bytes[1].wrapping_sub(b'1');
        if col < BOARD_SIZE && row < BOARD_SIZE {
            Ok(Self { col, row })
        } else {
            Err(err())
        }
    }
}

/// Set of board cells stored as a bitmask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionSet(u64);

impl PositionSet {
    pub const EMPTY: PositionSet = PositionSet(0);
    pub const FULL: PositionSet = PositionSet((1 << CELL_COUNT) - 1);

    /// No bits above the 36 cells.
    #[must_use]
    pub const fn is_on_board(self) -> bool {
        self.0 & !Self::FULL.0 == 0
    }

    /// Build from raw bits; bits above the board are dropped.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits & Self::FULL.0)
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn single(pos: Position) -> Self {
        Self(1 << pos.index())
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, pos: Position) -> bool {
        self.0 & (1 << pos.index()) != 0
    }

    pub fn insert(&mut self, pos: Position) {
        self.0 |= 1 << pos.index();
    }

    pub fn remove(&mut self, pos: Position) {
        self.0 &= !(1 << pos.index());
    }

    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_disjoint(self, other: Self) -> bool {
        self.0 & other.0 == 0
    }

    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterate over members in index order.
    pub fn iter(self) -> impl Iterator<Item = Position> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                None
            } else {
                let idx = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(Position::from_index(idx))
            }
        })
    }

    /// Lowest-index member.
    #[must_use]
    pub fn first(self) -> Option<Position> {
        self.iter().next()
    }
}

impl BitOr for PositionSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for PositionSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Sub for PositionSet {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 & !rhs.0)
    }
}

impl FromIterator<Position> for PositionSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for pos in iter {
            set.insert(pos);
        }
        set
    }
}

impl fmt::Display for PositionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, pos) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{pos}")?;
        }
        write!(f, "}}")
    }
}
