//! Test doubles: a simulated switch board behind embedded-hal pins, and a recording bus
extern crate std;

use core::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::bus::SimBus;
use crate::config::Polarity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cmd(pub u8);
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Float(pub u8);
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int(pub u8);

pub const ON: Cmd = Cmd(0);
pub const OFF: Cmd = Cmd(1);
pub const UP: Cmd = Cmd(2);
pub const DOWN: Cmd = Cmd(3);
pub const FLAP: Float = Float(0);
pub const TRIM: Float = Float(1);
pub const LIGHT: Int = Int(0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call {
    Once(Cmd),
    Begin(Cmd),
    End(Cmd),
    WriteFloat(Float, f32),
    WriteInt(Int, i32),
}

/// Records every bus call; float datarefs read back what the test sets
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    pub floats: [f32; 4],
    pub enabled: bool,
}

impl Recorder {
    pub fn set_float(&mut self, dataref: Float, value: f32) {
        self.floats[dataref.0 as usize] = value;
    }
}

impl SimBus for Recorder {
    type Command = Cmd;
    type FloatRef = Float;
    type IntRef = Int;

    fn command_once(&mut self, command: Cmd) {
        self.calls.push(Call::Once(command));
    }

    fn command_begin(&mut self, command: Cmd) {
        self.calls.push(Call::Begin(command));
    }

    fn command_end(&mut self, command: Cmd) {
        self.calls.push(Call::End(command));
    }

    fn read_float(&mut self, dataref: Float) -> f32 {
        self.floats[dataref.0 as usize]
    }

    fn write_float(&mut self, dataref: Float, value: f32) {
        self.calls.push(Call::WriteFloat(dataref, value));
        self.floats[dataref.0 as usize] = value;
    }

    fn write_int(&mut self, dataref: Int, value: i32) {
        self.calls.push(Call::WriteInt(dataref, value));
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Error of a line the board was told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Write {
    pub line: u8,
    pub high: bool,
}

#[derive(Debug)]
struct BoardState {
    multiplexed: bool,
    polarity: Polarity,
    row_lines: u8,
    levels: [bool; 32],
    closed: [u32; 32],
    writes: Vec<Write>,
    failing_writes: usize,
    column_reads: usize,
}

/// Switch board: columns read the closed switches of whichever row the row lines select
#[derive(Debug, Clone)]
pub struct Board(Rc<RefCell<BoardState>>);

impl Board {
    pub fn new(multiplexed: bool, polarity: Polarity) -> Self {
        Board(Rc::new(RefCell::new(BoardState {
            multiplexed,
            polarity,
            row_lines: 0,
            levels: [polarity == Polarity::ActiveLow; 32],
            closed: [0; 32],
            writes: Vec::new(),
            failing_writes: 0,
            column_reads: 0,
        })))
    }

    pub fn row_lines(&self, count: u8) -> Vec<RowLine> {
        self.0.borrow_mut().row_lines = count;
        (0..count)
            .map(|line| RowLine {
                board: self.clone(),
                line,
            })
            .collect()
    }

    pub fn column_lines(&self, count: u8) -> Vec<ColumnLine> {
        (0..count)
            .map(|column| ColumnLine {
                board: self.clone(),
                column,
            })
            .collect()
    }

    pub fn close(&self, row: u8, column: u8) {
        self.0.borrow_mut().closed[row as usize] |= 1 << column;
    }

    pub fn open(&self, row: u8, column: u8) {
        self.0.borrow_mut().closed[row as usize] &= !(1 << column);
    }

    /// The next `count` row line writes fail and leave the line as it was
    pub fn fail_writes(&self, count: usize) {
        self.0.borrow_mut().failing_writes = count;
    }

    pub fn take_writes(&self) -> Vec<Write> {
        core::mem::take(&mut self.0.borrow_mut().writes)
    }

    /// Number of column line reads so far
    pub fn column_reads(&self) -> usize {
        self.0.borrow().column_reads
    }

    pub fn selected_row(&self) -> Option<u8> {
        let state = self.0.borrow();
        let lines = &state.levels[..state.row_lines as usize];
        if state.row_lines == 0 {
            Some(0)
        } else if state.multiplexed {
            Some(
                lines
                    .iter()
                    .enumerate()
                    .filter(|(_, high)| **high)
                    .map(|(bit, _)| 1 << bit)
                    .sum(),
            )
        } else {
            let selected = state.polarity == Polarity::ActiveHigh;
            lines
                .iter()
                .position(|high| *high == selected)
                .map(|row| row as u8)
        }
    }
}

pub struct RowLine {
    board: Board,
    line: u8,
}

impl RowLine {
    fn set(&mut self, high: bool) -> Result<(), PinFault> {
        let mut state = self.board.0.borrow_mut();
        if state.failing_writes > 0 {
            state.failing_writes -= 1;
            return Err(PinFault);
        }
        state.levels[self.line as usize] = high;
        state.writes.push(Write {
            line: self.line,
            high,
        });
        Ok(())
    }
}

impl OutputPin for RowLine {
    type Error = PinFault;

    fn set_low(&mut self) -> Result<(), PinFault> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        self.set(true)
    }
}

pub struct ColumnLine {
    board: Board,
    column: u8,
}

impl InputPin for ColumnLine {
    type Error = PinFault;

    fn is_high(&self) -> Result<bool, PinFault> {
        let row = self.board.selected_row();
        let mut state = self.board.0.borrow_mut();
        state.column_reads += 1;
        let closed = row.map_or(false, |row| {
            state.closed[row as usize] & (1 << self.column) != 0
        });
        Ok(closed != (state.polarity == Polarity::ActiveLow))
    }

    fn is_low(&self) -> Result<bool, PinFault> {
        self.is_high().map(|high| !high)
    }
}
