//! Row-by-row polling of the switch matrix
//!
//! Every [`Scanner::tick`] that finds the scan interval elapsed reads one row. After the last
//! row the scanner checks the simulator connection for a resync edge and evaluates all of its
//! elements in registration order.

use embedded_hal::digital::v2::{InputPin, OutputPin};
use fugit::MillisDurationU32;
use heapless::Vec;

use crate::bus::SimBus;
use crate::config::MatrixConfig;
use crate::debug;
use crate::element::{Element, SwitchElement};
use crate::error::{Error, Phase, PreconditionError};
use crate::matrix::{read_columns, RowAddressing};
use crate::registry::{ElementId, ElementRegistry};
use crate::rows::RowState;
use crate::{MAX_COLUMNS, MAX_ROWS};

/// What a call to [`Scanner::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Scan interval not elapsed yet
    Idle,
    /// Read `row`, sweep not finished
    Row { row: u8 },
    /// Read the last row and evaluated the elements
    Sweep { resync: bool },
}

pub struct Scanner<'a, R, C, B: SimBus, const N: usize> {
    row_lines: Vec<R, MAX_ROWS>,
    column_lines: Vec<C, MAX_COLUMNS>,
    config: MatrixConfig,
    addressing: RowAddressing,
    rows: RowState,
    elements: ElementRegistry<'a, B, N>,
    phase: Phase,
    timer: MillisDurationU32,
    current_row: u8,
    /// Row lines may not address `current_row`, drive them again before the next read
    reselect: bool,
    /// Set on any change, cleared by [`Scanner::clear_changed`]
    changed_poll: bool,
    /// Set on any change, cleared at the end of each sweep
    changed_sweep: bool,
    last_enabled: bool,
    debug_scan: bool,
    debug_config: bool,
    on_position_change: Option<&'a mut dyn FnMut(u8, u8, bool)>,
    on_sweep_change: Option<&'a mut dyn FnMut()>,
}

impl<'a, R, C, B, const N: usize> Scanner<'a, R, C, B, N>
where
    R: OutputPin,
    C: InputPin<Error = R::Error>,
    B: SimBus,
{
    /// Takes the row (output) and column (input) lines. Pass no row lines for switches wired
    /// directly to the columns.
    pub fn new(row_lines: Vec<R, MAX_ROWS>, column_lines: Vec<C, MAX_COLUMNS>) -> Self {
        Scanner {
            row_lines,
            column_lines,
            config: MatrixConfig::default(),
            addressing: RowAddressing::Unwired,
            rows: RowState::new(0, 0),
            elements: ElementRegistry::new(),
            phase: Phase::Setup,
            timer: MillisDurationU32::from_ticks(0),
            current_row: 0,
            reselect: false,
            changed_poll: false,
            changed_sweep: false,
            last_enabled: false,
            debug_scan: false,
            debug_config: false,
            on_position_change: None,
            on_sweep_change: None,
        }
    }

    fn require(&self, operation: &'static str, required: Phase) -> Result<(), PreconditionError> {
        if self.phase == required {
            return Ok(());
        }
        let error = PreconditionError {
            operation,
            required,
            actual: self.phase,
        };
        warn!("switch matrix: {}", error);
        Err(error)
    }

    /// Binds an element to this scanner. Only possible before [`Scanner::configure`].
    pub fn add_element(
        &mut self,
        element: impl Into<SwitchElement<'a, B>>,
    ) -> Result<ElementId, Error<R::Error>> {
        self.require("add_element", Phase::Setup)?;
        let element = element.into();
        if !element.is_placed() {
            error!("switch matrix: element with an unset position rejected");
            return Err(Error::UnsetPosition);
        }
        self.elements.push(element).map_err(|_| {
            error!("switch matrix: no room for more elements");
            Error::RegistryFull
        })
    }

    /// Validates `config` against the lines and starts scanning at row 0.
    ///
    /// A rejected configuration disables the scanner for good.
    pub fn configure(&mut self, config: MatrixConfig) -> Result<(), Error<R::Error>> {
        self.require("configure", Phase::Setup)?;
        if let Err(error) = config.validate(self.row_lines.len(), self.column_lines.len()) {
            error!("switch matrix: {}", error);
            self.phase = Phase::Disabled;
            return Err(error.into());
        }

        let mut addressing = RowAddressing::new(&config, self.row_lines.len());
        if self.debug_config {
            debug!(
                "switch matrix: {} rows, {} columns, {} row lines",
                config.rows,
                config.columns,
                addressing.lines()
            );
        }
        addressing
            .reset(&mut self.row_lines, config.polarity)
            .map_err(Error::Pin)?;
        addressing
            .select(&mut self.row_lines, 0, config.polarity)
            .map_err(Error::Pin)?;

        self.config = config;
        self.addressing = addressing;
        self.rows = RowState::new(config.rows, config.columns);
        self.current_row = 0;
        self.reselect = false;
        self.timer = MillisDurationU32::from_ticks(0);
        self.phase = Phase::Running;
        Ok(())
    }

    /// Advances the scan by `elapsed`; reads one row once more than the interval has passed.
    ///
    /// When selecting the next row fails, the read row is kept and the selection is retried
    /// before the next read.
    pub fn tick(
        &mut self,
        elapsed: MillisDurationU32,
        bus: &mut B,
    ) -> Result<Step, Error<R::Error>> {
        self.require("tick", Phase::Running)?;

        match self.timer.ticks().checked_add(elapsed.ticks()) {
            Some(total) => self.timer = MillisDurationU32::from_ticks(total),
            None => {
                // Counter wrapped: keep the remainder, no scan this time
                let wrapped = self.timer.ticks().wrapping_add(elapsed.ticks());
                self.timer = MillisDurationU32::from_ticks(wrapped);
                return Ok(Step::Idle);
            }
        }
        if self.timer.ticks() <= self.config.interval.ticks() {
            return Ok(Step::Idle);
        }
        self.timer = MillisDurationU32::from_ticks(0);
        self.scan_row(bus)
    }

    fn scan_row(&mut self, bus: &mut B) -> Result<Step, Error<R::Error>> {
        let row = self.current_row;
        let polarity = self.config.polarity;
        if self.reselect {
            self.addressing
                .select(&mut self.row_lines, row, polarity)
                .map_err(Error::Pin)?;
            self.reselect = false;
        }
        let columns = &self.column_lines[..self.config.columns as usize];
        let word = read_columns(columns, polarity).map_err(Error::Pin)?;
        if self.debug_scan {
            trace!("switch matrix: row {} reads {=u32:b}", row, word);
        }

        let changed = self.rows.update(row, word);
        if changed != 0 {
            if let Some(callback) = self.on_position_change.as_mut() {
                for column in 0..self.config.columns {
                    if changed & (1 << column) != 0 {
                        callback(row, column, word & (1 << column) != 0);
                    }
                }
            }
            self.changed_poll = true;
            self.changed_sweep = true;
        }

        let step = if row + 1 >= self.config.rows {
            self.current_row = 0;
            Step::Sweep {
                resync: self.end_sweep(bus),
            }
        } else {
            self.current_row = row + 1;
            Step::Row { row }
        };

        if self.debug_scan {
            trace!("switch matrix: selecting row {}", self.current_row);
        }
        if let Err(error) = self
            .addressing
            .select(&mut self.row_lines, self.current_row, polarity)
        {
            error!("switch matrix: selecting row {} failed", self.current_row);
            self.reselect = true;
            return Err(Error::Pin(error));
        }
        Ok(step)
    }

    /// Notifies the sweep observer and evaluates every element. Returns the resync flag.
    fn end_sweep(&mut self, bus: &mut B) -> bool {
        if self.changed_sweep {
            if let Some(callback) = self.on_sweep_change.as_mut() {
                callback();
            }
            self.changed_sweep = false;
        }

        let enabled = bus.is_enabled();
        let resync = enabled && !self.last_enabled;
        self.last_enabled = enabled;
        if resync {
            info!("switch matrix: simulator enabled, resyncing");
        }

        self.elements.evaluate_all(&self.rows, resync, bus);
        resync
    }

    /// Called with `(row, column, closed)` for every switch that changes
    pub fn register_change_callback(&mut self, callback: &'a mut dyn FnMut(u8, u8, bool)) {
        self.on_position_change = Some(callback);
    }

    /// Called at the end of every sweep in which any switch changed
    pub fn register_sweep_callback(&mut self, callback: &'a mut dyn FnMut()) {
        self.on_sweep_change = Some(callback);
    }

    /// Enables tracing per [`debug`] bit, for the scanner and each bound element
    pub fn set_debug(&mut self, mask: u32) {
        self.elements.set_debug(mask);
        self.debug_scan = mask & debug::SCAN != 0;
        self.debug_config = mask & debug::CONFIG != 0;
    }

    /// Whether any switch changed since the last [`Scanner::clear_changed`]
    pub fn has_changed(&self) -> bool {
        self.changed_poll
    }

    pub fn clear_changed(&mut self) {
        self.changed_poll = false;
    }

    /// Panics if `index` is not a configured row.
    pub fn read_row(&self, index: u8) -> u32 {
        self.rows.row(index)
    }

    pub fn is_on(&self, row: u8, column: u8) -> bool {
        self.rows.is_on(row, column)
    }

    pub fn rows(&self) -> &RowState {
        &self.rows
    }

    pub fn element(&self, id: ElementId) -> Option<&SwitchElement<'a, B>> {
        self.elements.get(id)
    }

    /// Current value of an element, as returned by its last evaluation
    pub fn value(&self, id: ElementId) -> Option<f32> {
        self.element(id).map(|element| element.value())
    }

    pub fn elements(&self) -> &ElementRegistry<'a, B, N> {
        &self.elements
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_configured(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Logs the whole matrix state
    pub fn dump(&self) -> Result<(), Error<R::Error>> {
        self.require("dump", Phase::Running)?;
        #[cfg(feature = "defmt")]
        defmt::info!("switch matrix:\n{}", defmt::Display2Format(&self.rows));
        Ok(())
    }
}
