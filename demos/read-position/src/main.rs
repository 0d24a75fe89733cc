//! AMT21 position readout
//!
//! Polls a single-turn AMT21 encoder over RS-485 on the Raspberry Pi Pico 2
//! and logs every reading via defmt.
//!
//! # Wiring
//!
//! | Signal       | Pico 2 Pin | Notes                                  |
//! |--------------|------------|----------------------------------------|
//! | UART0 TX     | GP0        | to transceiver DI                      |
//! | UART0 RX     | GP1        | from transceiver RO                    |
//! | RS-485 DE/RE | GP2        | high while transmitting                |
//!
//! The UART runs 8N1 at the data rate printed on the encoder's part number.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::uart::{self, Uart};
use embassy_time::{Delay, Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use amt21_driver::{Amt21, Config, Resolution};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

/// AMT21 parts ship at either 115.2 kbps or 2 Mbps.
const BAUD_RATE: u32 = 115_200;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // --- UART0 (GP0 = TX, GP1 = RX), 8N1 ---
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = BAUD_RATE;
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);

    // --- Transceiver driver enable (GP2), idle in receive mode ---
    let de = Output::new(p.PIN_2, Level::Low);

    // --- Encoder ---
    let config = Config::default().with_resolution(Resolution::Bits12);
    let mut encoder = Amt21::single_turn(uart, de, Delay, config);

    if let Err(e) = encoder.init() {
        error!("Encoder init failed: {}", e);
    }

    info!(
        "AMT21 example started, node {=u8:#x}",
        encoder.config().node_address.get()
    );

    // Main loop: read, log, sleep. Failed reads are logged and skipped.
    loop {
        match encoder.get_position() {
            Ok(position) => info!("Position: {} / {}", position, encoder.ticks_per_turn()),
            Err(e) => warn!("Read failed: {}", e),
        }

        Timer::after(Duration::from_millis(100)).await;
    }
}
