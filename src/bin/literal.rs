//! QueueLink - literal queue firmware
//!
//! Reproduces the original demo's queue behaviour: one untagged byte queue,
//! the string producer enqueues only the first byte of its buffer, and the
//! consumer polls three slots per pass (string, button 2, button 1) without
//! knowing which producer each byte came from.
//!
//! Hardware: Raspberry Pi Pico (RP2040)

#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_halt as _;

use queuelink::config::QueueMode;
use queuelink::hardware;

const MODE: QueueMode = QueueMode::Literal;

#[cortex_m_rt::entry]
fn main() -> ! {
    defmt::info!("Starting QueueLink ({:?} queue)", MODE);
    hardware::run(MODE)
}
