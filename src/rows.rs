//! Last observed state of the whole matrix, one word per row

use core::fmt;

use heapless::Vec;

use crate::position::Position;
use crate::MAX_ROWS;

/// Bit `c` of row `r` is set while the switch at `(r, c)` is closed. Polarity is already applied.
///
/// Only the scanner writes it; elements get a shared reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowState {
    words: Vec<u32, MAX_ROWS>,
    columns: u8,
}

impl RowState {
    pub(crate) fn new(rows: u8, columns: u8) -> Self {
        let mut words = Vec::new();
        // rows is validated to be at most MAX_ROWS
        words.resize(rows as usize, 0).ok();
        RowState { words, columns }
    }

    pub fn rows(&self) -> u8 {
        self.words.len() as u8
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// Panics if `row` is not a configured row.
    pub fn row(&self, row: u8) -> u32 {
        self.words[row as usize]
    }

    pub fn is_on(&self, row: u8, column: u8) -> bool {
        self.words
            .get(row as usize)
            .map_or(false, |word| word & (1 << column) != 0)
    }

    /// Reads a switch position. An unset position reads as open.
    pub fn position(&self, position: Position) -> bool {
        position.is_set() && self.is_on(position.row(), position.column())
    }

    /// Stores a freshly read row and returns the bits that differ from before.
    pub(crate) fn update(&mut self, row: u8, word: u32) -> u32 {
        let stored = &mut self.words[row as usize];
        let changed = *stored ^ word;
        *stored = word;
        changed
    }
}

impl fmt::Display for RowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.words.len() > 1 {
            f.write_str("    ")?;
            for column in 0..self.columns {
                write!(f, " {column:2}")?;
            }
            writeln!(f)?;
            for (row, word) in self.words.iter().enumerate() {
                write!(f, "{row:2}: ")?;
                for column in 0..self.columns {
                    f.write_str(if word & (1 << column) != 0 { "  X" } else { "   " })?;
                }
                writeln!(f)?;
            }
            Ok(())
        } else {
            let word = self.words.first().copied().unwrap_or(0);
            for column in 0..self.columns {
                if column > 0 {
                    f.write_str(", ")?;
                }
                let state = if word & (1 << column) != 0 { "ON" } else { "off" };
                write!(f, "{column}: {state}")?;
            }
            Ok(())
        }
    }
}
