//! Packed (row, column) coordinates of a single switch contact

use core::fmt;

use crate::{MAX_COLUMNS, MAX_ROWS};

/// A row/column pair packed as `row << 5 | column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position(u16);

impl Position {
    /// Placeholder for a position that has not been assigned; reads as inactive.
    pub const UNSET: Position = Position(u16::MAX);

    /// Panics (at compile time in const context) if `row` or `column` is 32 or more.
    pub const fn at(row: u8, column: u8) -> Self {
        assert!((row as usize) < MAX_ROWS && (column as usize) < MAX_COLUMNS);
        Position(((row as u16) << 5) | column as u16)
    }

    /// A switch wired straight to a column line, without row scanning
    pub const fn direct(column: u8) -> Self {
        Self::at(0, column)
    }

    pub const fn is_set(self) -> bool {
        self.0 != Self::UNSET.0
    }

    pub const fn row(self) -> u8 {
        (self.0 >> 5) as u8
    }

    pub const fn column(self) -> u8 {
        (self.0 & 0x1f) as u8
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::UNSET
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() {
            write!(f, "({}, {})", self.row(), self.column())
        } else {
            f.write_str("(unset)")
        }
    }
}
