/*
 * What the controller needs from the outside world. The firmware implements
 * these on top of the board, the tests on top of plain vectors.
 */

use crate::inputs::InputCode;
use crate::lamps::LampMask;

use super::state::StateId;

pub trait LampSink {
    /// Light exactly the lamps in `lamps` and clear all others, in one go.
    fn apply(&mut self, lamps: LampMask);
}

pub trait InputSource {
    /// A snapshot of the (debounced) sensors, right now.
    fn sample(&mut self) -> InputCode;
}

pub trait StatusSink {
    /// Called on state change only. Must not hold up the control loop.
    fn report(&mut self, state: StateId, label: &'static str);
}

impl StatusSink for () {
    fn report(&mut self, _state: StateId, _label: &'static str) {}
}
