use super::{bool_value, Element, Shared};
use crate::bus::SimBus;
use crate::debug;
use crate::position::Position;
use crate::rows::RowState;

/// Holds a command down for as long as the switch is closed
pub struct Pushbutton<'a, B: SimBus> {
    position: Position,
    command: B::Command,
    /// Hold the command while the switch is open instead
    inverted: bool,
    old: bool,
    pub(super) shared: Shared<'a>,
}

impl<'a, B: SimBus> Pushbutton<'a, B> {
    pub fn new(position: Position, command: B::Command) -> Self {
        Pushbutton {
            position,
            command,
            inverted: false,
            old: false,
            shared: Shared::default(),
        }
    }

    pub fn inverted(self) -> Self {
        Pushbutton {
            inverted: true,
            ..self
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

impl<'a, B: SimBus> Element<B> for Pushbutton<'a, B> {
    fn evaluate(&mut self, rows: &RowState, resync: bool, bus: &mut B) -> f32 {
        let on = rows.position(self.position);
        if on == self.old && !resync {
            return self.value();
        }
        self.old = on;

        if on != self.inverted {
            if self.shared.debug {
                debug!("pushbutton at {}: command BEGIN", self.position);
            }
            bus.command_begin(self.command);
            self.shared.notify(1.0);
        } else {
            if self.shared.debug {
                debug!("pushbutton at {}: command END", self.position);
            }
            bus.command_end(self.command);
            self.shared.notify(0.0);
        }
        self.value()
    }

    fn value(&self) -> f32 {
        bool_value(self.old)
    }

    fn debug_mask(&self) -> u32 {
        debug::PUSHBUTTON
    }
}
