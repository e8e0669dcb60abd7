pub mod ports;
pub mod state;
pub mod table;

use ports::{InputSource, LampSink, StatusSink};
use state::StateId;

use crate::inputs::InputCode;

/*
 * Boot policy: if there is already a car waiting on east, start with east
 * green, otherwise with north green. Nothing in the table depends on this,
 * it is simply the call we make at power up.
 */
pub fn start_state(input: InputCode) -> StateId {
    if input.east() {
        StateId::EastGreen
    } else {
        StateId::NorthGreen
    }
}

/*
 * The intersection controller.
 *
 * A Moore machine: the lamps are a function of the state alone. The controller
 * holds the current state and how long it has been in it, nothing else. It
 * shows the state's lamps, waits out the state's dwell, then samples the
 * sensors exactly once and takes the transition for that sample.
 *
 * Like the rest of the library, the controller does no waiting itself. It is
 * called once per 10 ms tick and counts ticks, so that tests can drive it
 * without a clock.
 */
#[derive(Debug)]
pub struct Controller {
    state: StateId,
    ticks_in_state: u16,
    shown: bool,
    last_reported: Option<StateId>,
}

impl Controller {
    /// Sample the sensors once and start according to the boot policy.
    pub fn boot(inputs: &mut impl InputSource) -> Self {
        let input = inputs.sample();
        let state = start_state(input);
        info!("boot sample {} starts in {}", input, state);
        Controller::starting_in(state)
    }

    pub const fn starting_in(state: StateId) -> Self {
        Controller {
            state,
            ticks_in_state: 0,
            shown: false,
            last_reported: None,
        }
    }

    pub fn state(&self) -> StateId {
        self.state
    }

    /*
     * One tick. The first tick of a visit shows the lamps, every tick counts
     * toward the dwell. The tick after the dwell has run out samples the
     * inputs, transitions and starts the next visit straight away, so the
     * lamps never go dark between states.
     */
    pub fn call_at_100_hz(
        &mut self,
        lamps: &mut impl LampSink,
        inputs: &mut impl InputSource,
        status: &mut impl StatusSink,
    ) {
        if self.shown && self.ticks_in_state >= self.state.dwell().ticks() {
            let input = inputs.sample();
            let next = self.state.next(input);
            trace!("{} on {} -> {}", self.state, input, next);
            self.state = next;
            self.shown = false;
        }

        if !self.shown {
            self.show(lamps, status);
        }

        self.ticks_in_state += 1;
    }

    fn show(&mut self, lamps: &mut impl LampSink, status: &mut impl StatusSink) {
        let record = self.state.record();
        lamps.apply(record.lamps);

        if self.last_reported != Some(self.state) {
            debug!("entering {}", self.state);
            status.report(self.state, record.label);
            self.last_reported = Some(self.state);
        }

        self.ticks_in_state = 0;
        self.shown = true;
    }
}
