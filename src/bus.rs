//! Interface to the simulator side: commands and datarefs

/// Commands and datarefs of the flight simulator.
///
/// Every call is expected to return immediately. Nothing here is retried, and calls are only
/// ever made one at a time from the scan path.
pub trait SimBus {
    /// Identifies a simulator command
    type Command: Copy + PartialEq;
    /// Identifies a float dataref
    type FloatRef: Copy;
    /// Identifies an integer dataref
    type IntRef: Copy;

    /// Fires a command once (press and release)
    fn command_once(&mut self, command: Self::Command);
    /// Starts holding a command down until [`SimBus::command_end`]
    fn command_begin(&mut self, command: Self::Command);
    fn command_end(&mut self, command: Self::Command);

    fn read_float(&mut self, dataref: Self::FloatRef) -> f32;
    fn write_float(&mut self, dataref: Self::FloatRef, value: f32);
    fn write_int(&mut self, dataref: Self::IntRef, value: i32);

    /// Whether the simulator is currently connected; a rising edge triggers a resync
    fn is_enabled(&self) -> bool;
}
