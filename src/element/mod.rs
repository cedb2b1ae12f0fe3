//! Switch elements: state machines turning matrix positions into simulator actions

use crate::bus::SimBus;
use crate::debug;
use crate::position::Position;
use crate::rows::RowState;

pub mod command;
pub mod dataref;
pub mod pushbutton;
pub mod updown;

pub use command::OnOffCommandSwitch;
pub use dataref::{OnOffDatarefSwitch, WriteDatarefSwitch};
pub use pushbutton::Pushbutton;
pub use updown::{Direction, UpDownCommandSwitch};

/// Default tolerance when comparing multi-position values
pub const DEFAULT_TOLERANCE: f32 = 1e-4;

/// State common to every element
#[derive(Default)]
pub struct Shared<'a> {
    debug: bool,
    callback: Option<&'a mut dyn FnMut(f32)>,
}

impl<'a> Shared<'a> {
    fn notify(&mut self, value: f32) {
        if let Some(callback) = self.callback.as_mut() {
            callback(value);
        }
    }
}

/// Something which reads matrix positions and acts on the simulator
pub trait Element<B: SimBus> {
    /// Compares the switch against its cached state and acts on a change, or always when
    /// `resync` is set. Returns the current value.
    fn evaluate(&mut self, rows: &RowState, resync: bool, bus: &mut B) -> f32;

    /// Last evaluated value
    fn value(&self) -> f32;

    /// Bit of [`debug`] that enables tracing for this kind of element
    fn debug_mask(&self) -> u32;
}

/// Any of the switch elements a scanner can hold
pub enum SwitchElement<'a, B: SimBus> {
    OnOffCommand(OnOffCommandSwitch<'a, B>),
    Pushbutton(Pushbutton<'a, B>),
    OnOffDataref(OnOffDatarefSwitch<'a, B>),
    WriteDataref(WriteDatarefSwitch<'a, B>),
    UpDownCommand(UpDownCommandSwitch<'a, B>),
}

impl<'a, B: SimBus> SwitchElement<'a, B> {
    fn shared_mut(&mut self) -> &mut Shared<'a> {
        match self {
            SwitchElement::OnOffCommand(element) => &mut element.shared,
            SwitchElement::Pushbutton(element) => &mut element.shared,
            SwitchElement::OnOffDataref(element) => &mut element.shared,
            SwitchElement::WriteDataref(element) => &mut element.shared,
            SwitchElement::UpDownCommand(element) => &mut element.shared,
        }
    }

    /// Calls `callback` with the new value whenever the element acts
    pub fn on_change(&mut self, callback: &'a mut dyn FnMut(f32)) {
        self.shared_mut().callback = Some(callback);
    }

    /// Whether every position the element reads has been assigned
    pub fn is_placed(&self) -> bool {
        let placed = |detents: &[(Position, f32)]| {
            detents.iter().all(|(position, _)| position.is_set())
        };
        match self {
            SwitchElement::OnOffCommand(element) => element.position().is_set(),
            SwitchElement::Pushbutton(element) => element.position().is_set(),
            SwitchElement::OnOffDataref(element) => element.position().is_set(),
            SwitchElement::WriteDataref(element) => placed(element.detents()),
            SwitchElement::UpDownCommand(element) => placed(element.detents()),
        }
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.shared_mut().debug = debug;
    }

    pub(crate) fn apply_debug_mask(&mut self, mask: u32) {
        let debug = mask & self.debug_mask() != 0;
        self.set_debug(debug);
    }
}

impl<'a, B: SimBus> Element<B> for SwitchElement<'a, B> {
    fn evaluate(&mut self, rows: &RowState, resync: bool, bus: &mut B) -> f32 {
        match self {
            SwitchElement::OnOffCommand(element) => element.evaluate(rows, resync, bus),
            SwitchElement::Pushbutton(element) => element.evaluate(rows, resync, bus),
            SwitchElement::OnOffDataref(element) => element.evaluate(rows, resync, bus),
            SwitchElement::WriteDataref(element) => element.evaluate(rows, resync, bus),
            SwitchElement::UpDownCommand(element) => element.evaluate(rows, resync, bus),
        }
    }

    fn value(&self) -> f32 {
        match self {
            SwitchElement::OnOffCommand(element) => element.value(),
            SwitchElement::Pushbutton(element) => element.value(),
            SwitchElement::OnOffDataref(element) => element.value(),
            SwitchElement::WriteDataref(element) => element.value(),
            SwitchElement::UpDownCommand(element) => element.value(),
        }
    }

    fn debug_mask(&self) -> u32 {
        match self {
            SwitchElement::OnOffCommand(element) => element.debug_mask(),
            SwitchElement::Pushbutton(_) => debug::PUSHBUTTON,
            SwitchElement::OnOffDataref(_) => debug::ONOFF_DATAREF,
            SwitchElement::WriteDataref(_) => debug::WRITE_DATAREF,
            SwitchElement::UpDownCommand(_) => debug::UPDOWN_COMMAND,
        }
    }
}

impl<'a, B: SimBus> From<OnOffCommandSwitch<'a, B>> for SwitchElement<'a, B> {
    fn from(element: OnOffCommandSwitch<'a, B>) -> Self {
        SwitchElement::OnOffCommand(element)
    }
}

impl<'a, B: SimBus> From<Pushbutton<'a, B>> for SwitchElement<'a, B> {
    fn from(element: Pushbutton<'a, B>) -> Self {
        SwitchElement::Pushbutton(element)
    }
}

impl<'a, B: SimBus> From<OnOffDatarefSwitch<'a, B>> for SwitchElement<'a, B> {
    fn from(element: OnOffDatarefSwitch<'a, B>) -> Self {
        SwitchElement::OnOffDataref(element)
    }
}

impl<'a, B: SimBus> From<WriteDatarefSwitch<'a, B>> for SwitchElement<'a, B> {
    fn from(element: WriteDatarefSwitch<'a, B>) -> Self {
        SwitchElement::WriteDataref(element)
    }
}

impl<'a, B: SimBus> From<UpDownCommandSwitch<'a, B>> for SwitchElement<'a, B> {
    fn from(element: UpDownCommandSwitch<'a, B>) -> Self {
        SwitchElement::UpDownCommand(element)
    }
}

fn abs(value: f32) -> f32 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

/// Only a positive tolerance lets a value ever match; anything else falls back to the default
fn checked_tolerance(tolerance: f32) -> f32 {
    if tolerance > 0.0 {
        tolerance
    } else {
        error!(
            "tolerance {} is not positive, using {}",
            tolerance,
            DEFAULT_TOLERANCE
        );
        DEFAULT_TOLERANCE
    }
}

/// Whether two values are further apart than `tolerance`
fn differs(a: f32, b: f32, tolerance: f32) -> bool {
    abs(a - b) > tolerance
}

fn bool_value(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}
