#![no_std]
#![no_main]

// https://dev.to/theembeddedrustacean/embedded-rust-embassy-gpio-button-controlled-blinking-3ee6
// https://www.youtube.com/watch?v=dab_vzVDr_M

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32::exti::{Channel as _, ExtiInput};
use embassy_stm32::gpio::{Level, Output, Pin, Pull, Speed};
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{Config, Uart};
use embassy_stm32::{bind_interrupts, peripherals, spi, usart};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel};
use embassy_time::{Duration, Ticker, Timer};
use panic_halt as _;

use despi_m02_crossing::crossing::{
    Controller,
    state::{StateId, TICK_MILLIS},
};
use despi_m02_crossing::inputs::Sensor;

mod io;
use io::{
    CHANNEL_CAPACITY, DEBOUNCE, LAMP_WIRING, SENSORS, ShiftRegisterLamps, StatusChannel,
    sensor_task, status_task,
};

static STATUS: Channel<ThreadModeRawMutex, StateId, CHANNEL_CAPACITY> = Channel::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let peripherals = embassy_stm32::init(Default::default());

    bind_interrupts!(struct Irqs {
        USART1 => usart::InterruptHandler<peripherals::USART1>;
    });
    let mut usart = Uart::new(
        peripherals.USART1,
        peripherals.PA10,
        peripherals.PA9,
        Irqs,
        peripherals.DMA1_CH4,
        peripherals.DMA1_CH5,
        Config::default(), // 115200 baud
    )
    .unwrap();
    usart.write(b"Traffic Ctrl\r\n").await.unwrap();

    // Walk button with internal pull-down (pressed = high), the vehicle
    // sensors have external pull-downs.
    let walk = ExtiInput::new(peripherals.PA0.degrade(), peripherals.EXTI0.degrade(), Pull::Down);
    let north = ExtiInput::new(peripherals.PA1.degrade(), peripherals.EXTI1.degrade(), Pull::None);
    let east = ExtiInput::new(peripherals.PA2.degrade(), peripherals.EXTI2.degrade(), Pull::None);

    let mut spi_config = spi::Config::default();
    spi_config.frequency = Hertz(1_000_000);
    let spi = spi::Spi::new_blocking_txonly(peripherals.SPI1, peripherals.PA5, peripherals.PA7, spi_config);
    let latch = Output::new(peripherals.PB12, Level::Low, Speed::Low);
    let mut lamps = ShiftRegisterLamps::new(spi, latch, LAMP_WIRING);

    spawner.spawn(sensor_task(walk, Sensor::Walk, DEBOUNCE)).unwrap();
    spawner.spawn(sensor_task(north, Sensor::North, DEBOUNCE)).unwrap();
    spawner.spawn(sensor_task(east, Sensor::East, DEBOUNCE)).unwrap();
    spawner.spawn(status_task(usart, STATUS.receiver())).unwrap();

    // let the sensor tasks publish their first levels
    Timer::after_millis(100).await;

    let mut inputs = &SENSORS;
    let mut status = StatusChannel::new(STATUS.sender());
    let mut controller = Controller::boot(&mut inputs);
    info!("starting in {}", controller.state());

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MILLIS));
    loop {
        controller.call_at_100_hz(&mut lamps, &mut inputs, &mut status);
        ticker.next().await;
    }
}
