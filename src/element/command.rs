use super::{bool_value, Element, Shared};
use crate::bus::SimBus;
use crate::debug;
use crate::position::Position;
use crate::rows::RowState;

/// Single switch sending one command when it closes and another when it opens.
///
/// Either command may be missing, e.g. for a momentary switch only the "on" command is useful.
pub struct OnOffCommandSwitch<'a, B: SimBus> {
    position: Position,
    on: Option<B::Command>,
    off: Option<B::Command>,
    old: bool,
    pub(super) shared: Shared<'a>,
}

impl<'a, B: SimBus> OnOffCommandSwitch<'a, B> {
    pub fn new(position: Position, on: Option<B::Command>, off: Option<B::Command>) -> Self {
        OnOffCommandSwitch {
            position,
            on,
            off,
            old: false,
            shared: Shared::default(),
        }
    }

    pub fn on_off(position: Position, on: B::Command, off: B::Command) -> Self {
        Self::new(position, Some(on), Some(off))
    }

    pub fn on_only(position: Position, on: B::Command) -> Self {
        Self::new(position, Some(on), None)
    }

    pub fn off_only(position: Position, off: B::Command) -> Self {
        Self::new(position, None, Some(off))
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

impl<'a, B: SimBus> Element<B> for OnOffCommandSwitch<'a, B> {
    fn evaluate(&mut self, rows: &RowState, resync: bool, bus: &mut B) -> f32 {
        let on = rows.position(self.position);
        if on == self.old && !resync {
            return self.value();
        }
        // Cached even when nothing can be sent, so a missing command is reported once per change
        self.old = on;

        match (on, self.on, self.off) {
            (_, None, None) => error!("command switch at {}: commands not set", self.position),
            (true, Some(command), _) => {
                if self.shared.debug {
                    debug!("command switch at {}: sending ON command", self.position);
                }
                bus.command_once(command);
                self.shared.notify(1.0);
            }
            (false, _, Some(command)) => {
                if self.shared.debug {
                    debug!("command switch at {}: sending OFF command", self.position);
                }
                bus.command_once(command);
                self.shared.notify(0.0);
            }
            _ => (),
        }
        self.value()
    }

    fn value(&self) -> f32 {
        bool_value(self.old)
    }

    fn debug_mask(&self) -> u32 {
        match (self.on.is_some(), self.off.is_some()) {
            (true, false) => debug::ON_COMMAND,
            (false, true) => debug::OFF_COMMAND,
            _ => debug::ONOFF_COMMAND,
        }
    }
}
