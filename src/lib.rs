//! QueueLink - four-task queue demo for RP2040
//!
//! Two button tasks and a periodic string producer feed one bounded queue;
//! a UART consumer drains it and writes what it receives to the serial port.
//! Scheduling, timing, queues and drivers all come from Embassy.
//!
//! ## Tasks
//! - `read_button1` / `read_button2`: sample a GPIO every 20 ticks, enqueue 0 or 1
//! - `periodic_string`: enqueue the `"STRING"` buffer every 100 ticks
//! - `uart_consumer`: drain the queue to UART0 at 115200 baud
//! - supervisor: reports tasks that stop making progress
//!
//! ## Queue Modes
//! - **Tagged**: producers send tagged messages, the consumer dispatches on the tag
//! - **Literal**: one untagged byte queue drained three slots per pass, reproducing
//!   the original demo including its lack of tagging

#![no_std]

pub mod buttons;
pub mod channels;
pub mod config;
pub mod consumer;
pub mod hardware;
pub mod producer;
pub mod serial;
pub mod supervisor;
pub mod types;
