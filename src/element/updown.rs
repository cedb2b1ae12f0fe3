use super::{abs, checked_tolerance, differs, Element, Shared, DEFAULT_TOLERANCE};
use crate::bus::SimBus;
use crate::debug;
use crate::position::Position;
use crate::rows::RowState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
}

/// Multi-position switch for simulator values that can only be stepped up or down.
///
/// Each evaluation compares the value of the active position (the target) with the dataref
/// and sends at most one up or down command towards it. After a command is sent, no further
/// command goes out until the dataref has moved by at least `tolerance`.
///
/// Positions marked with [`UpDownCommandSwitch::with_pushbutton_position`] hold their command
/// down instead of firing it once. A held command is always ended, either when the dataref
/// reaches the target or before a command in any other form is sent.
pub struct UpDownCommandSwitch<'a, B: SimBus> {
    detents: &'a [(Position, f32)],
    /// Bit `i` set when detent `i` holds its command
    pushbuttons: u32,
    dataref: B::FloatRef,
    up: B::Command,
    down: B::Command,
    default: f32,
    tolerance: f32,

    target: f32,
    switch_changed: bool,
    command_in_flight: bool,
    observed_at_issue: f32,
    held: Option<Direction>,
    pub(super) shared: Shared<'a>,
}

impl<'a, B: SimBus> UpDownCommandSwitch<'a, B> {
    pub fn new(
        detents: &'a [(Position, f32)],
        dataref: B::FloatRef,
        up: B::Command,
        down: B::Command,
    ) -> Self {
        UpDownCommandSwitch {
            detents,
            pushbuttons: 0,
            dataref,
            up,
            down,
            default: 0.0,
            tolerance: DEFAULT_TOLERANCE,
            target: 0.0,
            switch_changed: false,
            command_in_flight: false,
            observed_at_issue: 0.0,
            held: None,
            shared: Shared::default(),
        }
    }

    pub fn with_default(self, default: f32) -> Self {
        UpDownCommandSwitch { default, ..self }
    }

    /// Values closer than `tolerance` count as equal. Must be positive, otherwise
    /// [`DEFAULT_TOLERANCE`] is used.
    pub fn with_tolerance(self, tolerance: f32) -> Self {
        UpDownCommandSwitch {
            tolerance: checked_tolerance(tolerance),
            ..self
        }
    }

    /// Makes detent `index` hold its command instead of firing it once. Only the first 32
    /// detents can hold.
    pub fn with_pushbutton_position(self, index: u8) -> Self {
        let bit = 1u32.checked_shl(index as u32).unwrap_or(0);
        UpDownCommandSwitch {
            pushbuttons: self.pushbuttons | bit,
            ..self
        }
    }

    pub fn detents(&self) -> &'a [(Position, f32)] {
        self.detents
    }

    /// Whether the target moved and the dataref has not caught up yet
    pub fn is_pending(&self) -> bool {
        self.switch_changed
    }

    pub fn is_command_in_flight(&self) -> bool {
        self.command_in_flight
    }

    /// Direction of the command currently held down, if any
    pub fn held(&self) -> Option<Direction> {
        self.held
    }

    fn find_target(&self, rows: &RowState) -> (f32, Option<usize>) {
        self.detents
            .iter()
            .position(|(position, _)| rows.position(*position))
            .map_or((self.default, None), |index| {
                (self.detents[index].1, Some(index))
            })
    }

    fn holds(&self, index: Option<usize>) -> bool {
        index.map_or(false, |index| {
            index < 32 && self.pushbuttons & (1 << index) != 0
        })
    }

    fn command(&self, direction: Direction) -> B::Command {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    fn release(&mut self, bus: &mut B) {
        if let Some(direction) = self.held.take() {
            if self.shared.debug {
                debug!("up/down switch: ending held {} command", direction);
            }
            bus.command_end(self.command(direction));
        }
    }

    fn step(&mut self, direction: Direction, hold: bool, bus: &mut B) {
        if self.held == Some(direction) && hold {
            // Same command is still held down and keeps moving the dataref
            return;
        }
        self.release(bus);

        let command = self.command(direction);
        if hold {
            bus.command_begin(command);
            self.held = Some(direction);
        } else {
            bus.command_once(command);
        }
    }
}

impl<'a, B: SimBus> Element<B> for UpDownCommandSwitch<'a, B> {
    fn evaluate(&mut self, rows: &RowState, resync: bool, bus: &mut B) -> f32 {
        let (target, index) = self.find_target(rows);

        if differs(target, self.target, self.tolerance) || resync {
            if self.shared.debug {
                debug!(
                    "up/down switch: target {} (was {}), resync={}",
                    target,
                    self.target,
                    resync
                );
            }
            self.switch_changed = true;
            self.target = target;
            self.shared.notify(target);
        }

        let observed = bus.read_float(self.dataref);
        if abs(target - observed) < self.tolerance {
            if self.switch_changed && self.shared.debug {
                debug!("up/down switch: reached {}", observed);
            }
            self.switch_changed = false;
            self.command_in_flight = false;
            self.release(bus);
            return self.target;
        }

        if self.command_in_flight {
            if abs(observed - self.observed_at_issue) < self.tolerance {
                // Previous command has not shown up in the dataref yet
                return self.target;
            }
            self.command_in_flight = false;
        }

        if self.switch_changed {
            let direction = if target > observed {
                Direction::Up
            } else {
                Direction::Down
            };
            if self.shared.debug {
                debug!(
                    "up/down switch: target {}, dataref {}, sending {}",
                    target,
                    observed,
                    direction
                );
            }
            self.step(direction, self.holds(index), bus);
            self.observed_at_issue = observed;
            self.command_in_flight = true;
        }
        self.target
    }

    fn value(&self) -> f32 {
        self.target
    }

    fn debug_mask(&self) -> u32 {
        debug::UPDOWN_COMMAND
    }
}
