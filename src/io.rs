/*
 * The I/O module for the intersection.
 *
 * This module implements the board side of the controller: the sensor tasks
 * that debounce the three input lines into the shared snapshot, the shift
 * register that drives the eight lamps and the status line on the USART. The
 * intention is for this module and `main.rs` to be the only parts of the
 * program that are device-specific.
 */

use defmt::warn;
use embassy_futures::select::{Either, select};
use embassy_stm32::{
    exti::ExtiInput,
    gpio::Output,
    mode::{Async, Blocking},
    spi::Spi,
    usart::Uart,
};
use embassy_sync::{
    blocking_mutex::raw::ThreadModeRawMutex,
    channel::{Receiver, Sender},
};
use embassy_time::{Duration, Timer};

use despi_m02_crossing::{
    crossing::{
        ports::{LampSink, StatusSink},
        state::StateId,
    },
    inputs::Sensor,
    lamps::{LampLatch, LampMask},
    sensors::SensorSnapshot,
};

pub const CHANNEL_CAPACITY: usize = 4;

pub const DEBOUNCE: Duration = Duration::from_millis(20);

// The lamp board drives every LED from the 74HC595 output directly, so all
// lamps are active-high.
pub const LAMP_WIRING: LampLatch = LampLatch::active_high();

pub static SENSORS: SensorSnapshot = SensorSnapshot::new();

/*
 * A sensor line bounces for a few milliseconds on every change. Rather than
 * publishing each bounce, we restart a short timer on every edge and only
 * publish the level once the line has been quiet for the debounce time. The
 * controller samples the snapshot long after that, so it only ever sees
 * settled levels.
 */
#[embassy_executor::task(pool_size = 3)]
pub async fn sensor_task(mut line: ExtiInput<'static>, sensor: Sensor, debounce: Duration) -> ! {
    SENSORS.set(sensor, line.is_high());

    loop {
        line.wait_for_any_edge().await;

        'debounce_loop: loop {
            match select(line.wait_for_any_edge(), Timer::after(debounce)).await {
                Either::First(_) => {}
                Either::Second(_) => break 'debounce_loop,
            }
        }

        SENSORS.set(sensor, line.is_high());
    }
}

// 74HC595 on SPI, QA..QH map to the lamp bits. Shifting all eight bits and
// then pulsing RCLK moves them to the outputs in one step.
pub struct ShiftRegisterLamps {
    spi: Spi<'static, Blocking>,
    latch: Output<'static>,
    wiring: LampLatch,
}

impl ShiftRegisterLamps {
    pub fn new(spi: Spi<'static, Blocking>, latch: Output<'static>, wiring: LampLatch) -> Self {
        Self { spi, latch, wiring }
    }
}

impl LampSink for ShiftRegisterLamps {
    fn apply(&mut self, lamps: LampMask) {
        let byte = self.wiring.shift_byte(lamps);
        if let Err(error) = self.spi.blocking_write(&[byte]) {
            warn!("lamp update dropped: {}", defmt::Debug2Format(&error));
            return;
        }

        self.latch.set_high();
        cortex_m::asm::delay(4);
        self.latch.set_low();
    }
}

// Hands state changes over to the status task. The control loop must never
// wait on the USART, so a full channel drops the label.
pub struct StatusChannel {
    sender: Sender<'static, ThreadModeRawMutex, StateId, CHANNEL_CAPACITY>,
}

impl StatusChannel {
    pub fn new(sender: Sender<'static, ThreadModeRawMutex, StateId, CHANNEL_CAPACITY>) -> Self {
        Self { sender }
    }
}

impl StatusSink for StatusChannel {
    fn report(&mut self, state: StateId, _label: &'static str) {
        if self.sender.try_send(state).is_err() {
            warn!("status line busy, {} not reported", state);
        }
    }
}

#[embassy_executor::task]
pub async fn status_task(
    mut usart: Uart<'static, Async>,
    states: Receiver<'static, ThreadModeRawMutex, StateId, CHANNEL_CAPACITY>,
) -> ! {
    loop {
        let state = states.receive().await;
        let written = match usart.write(state.label().as_bytes()).await {
            Ok(()) => usart.write(b"\r\n").await,
            Err(error) => Err(error),
        };
        if let Err(error) = written {
            warn!("status line write failed: {}", defmt::Debug2Format(&error));
        }
    }
}

