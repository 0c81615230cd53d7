//! QueueLink - tagged queue firmware
//!
//! Producers send tagged messages and the UART consumer dispatches on the
//! tag, so every write matches the producer that sent the item.
//!
//! Hardware: Raspberry Pi Pico (RP2040)
//! UART0 TX on GPIO0 at 115200 baud
//! Buttons on GPIO14 and GPIO15, active high

#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_halt as _;

use queuelink::config::QueueMode;
use queuelink::hardware;

const MODE: QueueMode = QueueMode::Tagged;

#[cortex_m_rt::entry]
fn main() -> ! {
    defmt::info!("Starting QueueLink ({:?} queue)", MODE);
    hardware::run(MODE)
}
