use super::{bool_value, checked_tolerance, differs, Element, Shared, DEFAULT_TOLERANCE};
use crate::bus::SimBus;
use crate::debug;
use crate::position::Position;
use crate::rows::RowState;

/// Writes 1 or 0 to an integer dataref as the switch closes or opens
pub struct OnOffDatarefSwitch<'a, B: SimBus> {
    position: Position,
    dataref: B::IntRef,
    /// Write 0 for a closed switch and 1 for an open one
    inverted: bool,
    old: bool,
    pub(super) shared: Shared<'a>,
}

impl<'a, B: SimBus> OnOffDatarefSwitch<'a, B> {
    pub fn new(position: Position, dataref: B::IntRef) -> Self {
        OnOffDatarefSwitch {
            position,
            dataref,
            inverted: false,
            old: false,
            shared: Shared::default(),
        }
    }

    pub fn inverted(self) -> Self {
        OnOffDatarefSwitch {
            inverted: true,
            ..self
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

impl<'a, B: SimBus> Element<B> for OnOffDatarefSwitch<'a, B> {
    fn evaluate(&mut self, rows: &RowState, resync: bool, bus: &mut B) -> f32 {
        let on = rows.position(self.position);
        if on == self.old && !resync {
            return self.value();
        }

        let value = i32::from(on != self.inverted);
        if self.shared.debug {
            debug!("dataref switch at {}: writing {}", self.position, value);
        }
        bus.write_int(self.dataref, value);
        self.old = on;
        self.shared.notify(bool_value(on));
        self.value()
    }

    fn value(&self) -> f32 {
        bool_value(self.old)
    }

    fn debug_mask(&self) -> u32 {
        debug::ONOFF_DATAREF
    }
}

/// Multi-position switch writing the value of its active position to a float dataref.
///
/// Positions form a one-hot group: the first closed one in list order wins, with `default`
/// written when none is closed.
pub struct WriteDatarefSwitch<'a, B: SimBus> {
    detents: &'a [(Position, f32)],
    dataref: B::FloatRef,
    default: f32,
    tolerance: f32,
    old: f32,
    pub(super) shared: Shared<'a>,
}

impl<'a, B: SimBus> WriteDatarefSwitch<'a, B> {
    pub fn new(detents: &'a [(Position, f32)], dataref: B::FloatRef) -> Self {
        WriteDatarefSwitch {
            detents,
            dataref,
            default: 0.0,
            tolerance: DEFAULT_TOLERANCE,
            old: 0.0,
            shared: Shared::default(),
        }
    }

    pub fn with_default(self, default: f32) -> Self {
        WriteDatarefSwitch { default, ..self }
    }

    /// Must be positive, otherwise [`DEFAULT_TOLERANCE`] is used
    pub fn with_tolerance(self, tolerance: f32) -> Self {
        WriteDatarefSwitch {
            tolerance: checked_tolerance(tolerance),
            ..self
        }
    }

    pub fn detents(&self) -> &'a [(Position, f32)] {
        self.detents
    }

    fn find_value(&self, rows: &RowState) -> f32 {
        self.detents
            .iter()
            .find(|(position, _)| rows.position(*position))
            .map_or(self.default, |(_, value)| *value)
    }
}

impl<'a, B: SimBus> Element<B> for WriteDatarefSwitch<'a, B> {
    fn evaluate(&mut self, rows: &RowState, resync: bool, bus: &mut B) -> f32 {
        let value = self.find_value(rows);
        if !differs(value, self.old, self.tolerance) && !resync {
            return self.old;
        }

        self.old = value;
        if self.shared.debug {
            debug!("write dataref switch: writing {}", value);
        }
        bus.write_float(self.dataref, value);
        self.shared.notify(value);
        self.old
    }

    fn value(&self) -> f32 {
        self.old
    }

    fn debug_mask(&self) -> u32 {
        debug::WRITE_DATAREF
    }
}
