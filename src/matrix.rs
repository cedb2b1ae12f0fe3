//! Selects matrix rows and reads the column lines

use core::marker::PhantomData;

use embedded_hal::digital::v2::{InputPin, OutputPin, PinState};

use crate::config::{address_lines, MatrixConfig, Polarity};

/// How a row index turns into levels on the row lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowAddressing {
    /// Single row of switches wired directly to the column lines
    Unwired,
    /// One line per row; `last` is the line currently driven to the selected level
    Direct { lines: u8, last: Option<u8> },
    /// Row index written in binary across `lines` address lines of a decoder
    Multiplexed { lines: u8 },
}

impl RowAddressing {
    pub fn new(config: &MatrixConfig, available: usize) -> Self {
        if config.multiplexed {
            RowAddressing::Multiplexed {
                lines: address_lines(config.rows),
            }
        } else {
            match available.min(config.rows as usize) {
                0 => RowAddressing::Unwired,
                lines => RowAddressing::Direct {
                    lines: lines as u8,
                    last: None,
                },
            }
        }
    }

    /// Number of row lines this addressing drives
    pub fn lines(&self) -> usize {
        match self {
            RowAddressing::Unwired => 0,
            RowAddressing::Direct { lines, .. } | RowAddressing::Multiplexed { lines } => {
                *lines as usize
            }
        }
    }

    /// Drives every used line to the deselected level.
    pub fn reset<R: OutputPin>(&mut self, rows: &mut [R], polarity: Polarity) -> Result<(), R::Error> {
        let deselected = deselected(polarity);
        for row in rows.iter_mut().take(self.lines()) {
            row.set_state(deselected)?;
        }
        if let RowAddressing::Direct { last, .. } = self {
            *last = None;
        }
        Ok(())
    }

    pub fn select<R: OutputPin>(
        &mut self,
        rows: &mut [R],
        row: u8,
        polarity: Polarity,
    ) -> Result<(), R::Error> {
        match self {
            RowAddressing::Unwired => Ok(()),
            RowAddressing::Direct { lines, last } => {
                if row >= *lines {
                    return Ok(());
                }
                if let Some(previous) = *last {
                    rows[previous as usize].set_state(deselected(polarity))?;
                    *last = None;
                }
                rows[row as usize].set_state(selected(polarity))?;
                *last = Some(row);
                Ok(())
            }
            RowAddressing::Multiplexed { lines } => {
                for (bit, line) in rows.iter_mut().take(*lines as usize).enumerate() {
                    line.set_state((row & (1 << bit) != 0).into())?;
                }
                Ok(())
            }
        }
    }
}

fn selected(polarity: Polarity) -> PinState {
    (!polarity.active_low()).into()
}

fn deselected(polarity: Polarity) -> PinState {
    polarity.active_low().into()
}

/// Reads all column lines into a word, bit set where the switch is closed
pub(crate) fn read_columns<C: InputPin>(columns: &[C], polarity: Polarity) -> Result<u32, C::Error> {
    let mut word = 0;
    for (column, input) in columns.iter().enumerate() {
        if input.is_high()? != polarity.active_low() {
            word |= 1 << column;
        }
    }
    Ok(word)
}

/// Output pin for matrices without row lines
#[derive(Debug, Clone, Copy)]
pub struct NoLine<E>(PhantomData<E>);

impl<E> NoLine<E> {
    pub const fn new() -> Self {
        NoLine(PhantomData)
    }
}

impl<E> Default for NoLine<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> OutputPin for NoLine<E> {
    type Error = E;

    fn set_low(&mut self) -> Result<(), E> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), E> {
        Ok(())
    }
}
