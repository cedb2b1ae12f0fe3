//! Matrix dimensions, polarity and scan cadence

use fugit::MillisDurationU32;

use crate::error::ConfigError;
use crate::{MAX_COLUMNS, MAX_ROWS};

/// Default time between two row reads
pub const DEFAULT_SCAN_INTERVAL: MillisDurationU32 = MillisDurationU32::millis(15);

/// Electrical level that means "selected" on row lines and "closed" on column lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Rows are pulled low to select them, closed switches read low (pull-ups on the columns)
    ActiveLow,
    ActiveHigh,
}

impl Polarity {
    pub(crate) fn active_low(self) -> bool {
        matches!(self, Polarity::ActiveLow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixConfig {
    pub rows: u8,
    pub columns: u8,
    pub polarity: Polarity,
    /// Rows are selected through a binary decoder (74HC138/74HC154 style) rather than one line each
    pub multiplexed: bool,
    pub interval: MillisDurationU32,
}

impl MatrixConfig {
    /// Switches wired straight to `columns` input lines, no row scanning
    pub fn direct(columns: u8) -> Self {
        Self {
            columns,
            ..Default::default()
        }
    }

    pub fn matrix(rows: u8, columns: u8) -> Self {
        Self {
            rows,
            columns,
            ..Default::default()
        }
    }

    pub fn with_polarity(self, polarity: Polarity) -> Self {
        Self { polarity, ..self }
    }

    pub fn with_multiplexed_rows(self) -> Self {
        Self {
            multiplexed: true,
            ..self
        }
    }

    pub fn with_interval(self, interval: MillisDurationU32) -> Self {
        Self { interval, ..self }
    }

    /// Number of output lines the row addressing drives
    pub fn row_lines(&self) -> usize {
        if self.multiplexed {
            address_lines(self.rows) as usize
        } else if self.rows > 1 {
            self.rows as usize
        } else {
            0
        }
    }

    /// Checks dimensions and interval against the available lines.
    pub(crate) fn validate(
        &self,
        row_lines: usize,
        column_lines: usize,
    ) -> Result<(), ConfigError> {
        if self.columns as usize > MAX_COLUMNS {
            return Err(ConfigError::TooManyColumns);
        }
        if self.columns == 0 {
            return Err(ConfigError::NoColumns);
        }
        if self.rows as usize > MAX_ROWS {
            return Err(ConfigError::TooManyRows);
        }
        if self.rows == 0 {
            return Err(ConfigError::NoRows);
        }
        if row_lines < self.row_lines() {
            return Err(ConfigError::MissingRowLines {
                needed: self.row_lines() as u8,
                available: row_lines as u8,
            });
        }
        if column_lines < self.columns as usize {
            return Err(ConfigError::MissingColumnLines {
                needed: self.columns,
                available: column_lines as u8,
            });
        }
        if self.interval.ticks() == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 0,
            polarity: Polarity::ActiveLow,
            multiplexed: false,
            interval: DEFAULT_SCAN_INTERVAL,
        }
    }
}

/// Smallest `k` with `2^k >= rows`
pub fn address_lines(rows: u8) -> u8 {
    (rows as u32).next_power_of_two().trailing_zeros() as u8
}
