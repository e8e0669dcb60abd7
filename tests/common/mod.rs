#![allow(dead_code)]

use std::collections::VecDeque;

use despi_m02_crossing::crossing::Controller;
use despi_m02_crossing::crossing::ports::{InputSource, LampSink, StatusSink};
use despi_m02_crossing::crossing::state::StateId;
use despi_m02_crossing::inputs::InputCode;
use despi_m02_crossing::lamps::LampMask;

#[derive(Default)]
pub struct Street {
    pub shown: Vec<LampMask>,
}

impl LampSink for Street {
    fn apply(&mut self, lamps: LampMask) {
        self.shown.push(lamps);
    }
}

/// Serves queued samples first, then keeps returning `held`.
#[derive(Default)]
pub struct Sensors {
    pub queued: VecDeque<InputCode>,
    pub held: InputCode,
    pub samples: usize,
}

impl InputSource for Sensors {
    fn sample(&mut self) -> InputCode {
        self.samples += 1;
        self.queued.pop_front().unwrap_or(self.held)
    }
}

#[derive(Default)]
pub struct StatusLog {
    pub labels: Vec<&'static str>,
    pub states: Vec<StateId>,
}

impl StatusSink for StatusLog {
    fn report(&mut self, state: StateId, label: &'static str) {
        self.states.push(state);
        self.labels.push(label);
    }
}

/// A controller wired to recording sinks, driven one tick at a time.
pub struct Rig {
    pub controller: Controller,
    pub street: Street,
    pub sensors: Sensors,
    pub status: StatusLog,
}

impl Rig {
    pub fn starting_in(state: StateId) -> Self {
        Rig {
            controller: Controller::starting_in(state),
            street: Street::default(),
            sensors: Sensors::default(),
            status: StatusLog::default(),
        }
    }

    pub fn state(&self) -> StateId {
        self.controller.state()
    }

    pub fn tick(&mut self) {
        self.controller
            .call_at_100_hz(&mut self.street, &mut self.sensors, &mut self.status);
    }

    /// Ticks until the controller takes its next sample, which it answers
    /// with `input`. Returns the state it moved to.
    pub fn transition_on(&mut self, input: InputCode) -> StateId {
        self.sensors.queued.push_back(input);
        let before = self.sensors.samples;
        while self.sensors.samples == before {
            self.tick();
        }
        self.state()
    }

    /// Applies `transition_on` for each input and returns the states visited.
    pub fn transitions_on(&mut self, inputs: &[InputCode]) -> Vec<StateId> {
        inputs.iter().map(|&input| self.transition_on(input)).collect()
    }
}

pub const IDLE: InputCode = InputCode::new(false, false, false);
pub const WALK: InputCode = InputCode::new(true, false, false);
pub const NORTH: InputCode = InputCode::new(false, true, false);
pub const EAST: InputCode = InputCode::new(false, false, true);
