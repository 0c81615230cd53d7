//! Serial output used by the UART consumer
//!
//! The consumer only needs two operations from the transport: write a run of
//! bytes and write a single byte. Neither adds framing.

use embassy_rp::uart::{self, Blocking, UartTx};

use crate::config::SERIAL_BAUD_RATE;

/// Byte-oriented serial transmitter
pub trait SerialPort {
    type Error: defmt::Format;

    /// Write every byte of `bytes`, blocking until accepted
    fn put_string(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Write exactly one byte
    fn put_char(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.put_string(&[byte])
    }
}

impl SerialPort for UartTx<'_, Blocking> {
    type Error = uart::Error;

    fn put_string(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.blocking_write(bytes)
    }
}

/// UART settings for the demo: fixed baud rate, 8N1
pub fn serial_config() -> uart::Config {
    let mut config = uart::Config::default();
    config.baudrate = SERIAL_BAUD_RATE;
    config.data_bits = uart::DataBits::DataBits8;
    config.stop_bits = uart::StopBits::STOP1;
    config.parity = uart::Parity::ParityNone;
    config
}
