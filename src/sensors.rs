/*
 * The sensor snapshot shared between the sensor tasks and the controller.
 *
 * Each sensor task owns one bit and only ever publishes settled, debounced
 * levels. All three bits live in one byte, so the controller reads all
 * sensors at one instant with a single load.
 */

use core::sync::atomic::{AtomicU8, Ordering};

use crate::crossing::ports::InputSource;
use crate::inputs::{InputCode, Sensor};

pub struct SensorSnapshot {
    bits: AtomicU8,
}

impl SensorSnapshot {
    pub const fn new() -> Self {
        SensorSnapshot {
            bits: AtomicU8::new(0),
        }
    }

    pub fn set(&self, sensor: Sensor, asserted: bool) {
        if asserted {
            self.bits.fetch_or(sensor.bit(), Ordering::Relaxed);
        } else {
            self.bits.fetch_and(!sensor.bit(), Ordering::Relaxed);
        }
    }

    pub fn load(&self) -> InputCode {
        InputCode::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        SensorSnapshot::new()
    }
}

impl InputSource for &SensorSnapshot {
    fn sample(&mut self) -> InputCode {
        self.load()
    }
}
