//! ClickLink - watch app firmware
//!
//! Shows a label, forwards the up/select/down buttons to the phone as
//! AppMessages, and buzzes the vibration motor when the phone asks for it.
//! Runs on an RP2040 with an SH1106 OLED and a serial link to the phone
//! bridge.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use clicklink_core::config::{parse_config, AppConfig};
use clicklink_protocol::ButtonId;

use crate::sh1106::Sh1106;

mod app_log;
mod channels;
mod handles;
mod sh1106;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit watch.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../watch.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// UART buffers must outlive the buffered driver
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ClickLink firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Serial link to the phone bridge (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.link.baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized at {} baud", config.link.baudrate);

    // OLED on I2C0 (GPIO4 SDA, GPIO5 SCL)
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c::Config::default());
    let oled = Sh1106::new(i2c);

    // Buttons are active low
    let up = Input::new(p.PIN_10, Pull::Up);
    let select = Input::new(p.PIN_11, Pull::Up);
    let down = Input::new(p.PIN_12, Pull::Up);

    let motor = Output::new(p.PIN_15, Level::Low);

    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::display_task(oled)).unwrap();
    spawner
        .spawn(tasks::vibe_task(motor, config.vibes.short_pulse_ms))
        .unwrap();
    spawner.spawn(tasks::button_task(up, ButtonId::Up)).unwrap();
    spawner
        .spawn(tasks::button_task(select, ButtonId::Select))
        .unwrap();
    spawner.spawn(tasks::button_task(down, ButtonId::Down)).unwrap();
    spawner.spawn(tasks::app_task(config)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// Parse the embedded watch.toml, falling back to defaults
fn load_config() -> AppConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Configuration loaded");
            config
        }
        Err(e) => {
            error!("Invalid watch.toml ({:?}), using defaults", e);
            AppConfig::default()
        }
    }
}
