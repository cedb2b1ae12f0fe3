//! Scans a matrix of physical switches and turns their positions into flight simulator
//! commands and dataref writes.
//!
//! A [`Scanner`] owns the row and column lines of the matrix and reads one row each time its
//! scan interval elapses. At the end of every sweep it evaluates the bound switch elements,
//! which talk to the simulator through a [`SimBus`].
#![no_std]

#[macro_use]
mod fmt;

pub mod bus;
pub mod config;
pub mod element;
pub mod error;
pub mod matrix;
pub mod position;
pub mod registry;
pub mod rows;
pub mod scanner;

#[cfg(test)]
mod mock;

pub use bus::SimBus;
pub use config::{MatrixConfig, Polarity, DEFAULT_SCAN_INTERVAL};
pub use element::{
    Direction, Element, OnOffCommandSwitch, OnOffDatarefSwitch, Pushbutton, SwitchElement,
    UpDownCommandSwitch, WriteDatarefSwitch,
};
pub use error::{ConfigError, Error, Phase, PreconditionError};
pub use matrix::NoLine;
pub use position::Position;
pub use registry::{ElementId, ElementRegistry};
pub use rows::RowState;
pub use scanner::{Scanner, Step};

/// Most rows a matrix can have
pub const MAX_ROWS: usize = 32;
/// Most columns a matrix can have, one bit each in a row word
pub const MAX_COLUMNS: usize = 32;

/// Bits for [`Scanner::set_debug`]
pub mod debug {
    pub const OFF: u32 = 0;
    /// Row reads and row selection
    pub const SCAN: u32 = 1 << 0;
    pub const ONOFF_COMMAND: u32 = 1 << 1;
    pub const ON_COMMAND: u32 = 1 << 2;
    pub const OFF_COMMAND: u32 = 1 << 3;
    pub const PUSHBUTTON: u32 = 1 << 4;
    pub const UPDOWN_COMMAND: u32 = 1 << 5;
    pub const ONOFF_DATAREF: u32 = 1 << 6;
    pub const WRITE_DATAREF: u32 = 1 << 7;
    /// Matrix configuration
    pub const CONFIG: u32 = 1 << 8;
    /// Every element kind, without scan tracing
    pub const SWITCHES: u32 = 0xFFFF_FFFF & !SCAN;
}
