//! UART consumer
//!
//! Drains the shared queue and writes what it receives to the serial port.
//!
//! In literal mode the consumer polls the untagged byte queue three times per
//! pass, in the order string, button 2, button 1. Nothing on the queue says
//! which producer a byte came from, so the slot a byte lands in is decided
//! purely by arrival order. The "string" slot writes the shared string buffer
//! rather than the byte it dequeued.
//!
//! In tagged mode the consumer waits on the message queue and dispatches on
//! the message tag.

use defmt::*;
use embassy_futures::yield_now;
use embassy_rp::uart::{Blocking, UartTx};
use embassy_sync::once_lock::OnceLock;

use crate::channels::{ByteQueue, MessageQueue, SharedQueue, TX_STRING};
use crate::serial::SerialPort;
use crate::supervisor::TASK_COUNTERS;
use crate::types::{Message, TxString};

/// Writes issued during one literal pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, defmt::Format)]
pub struct LiteralPass {
    pub string_written: bool,
    pub event2: Option<u8>,
    pub event1: Option<u8>,
}

impl LiteralPass {
    /// Number of items drained from the queue
    pub fn drained(&self) -> usize {
        usize::from(self.string_written)
            + usize::from(self.event2.is_some())
            + usize::from(self.event1.is_some())
    }
}

pub struct UartConsumer<'a, S> {
    serial: S,
    shared: &'a OnceLock<TxString>,
}

impl<'a, S: SerialPort> UartConsumer<'a, S> {
    /// `shared` is the string buffer written by the literal-mode producer
    pub fn new(serial: S, shared: &'a OnceLock<TxString>) -> Self {
        Self { serial, shared }
    }

    pub fn serial(&self) -> &S {
        &self.serial
    }

    /// One pass of three non-blocking receives against the byte queue
    pub fn service_literal(&mut self, queue: &ByteQueue) -> LiteralPass {
        let mut pass = LiteralPass::default();

        if queue.try_receive().is_ok() {
            let text = self.shared.try_get().copied().unwrap_or_default();
            self.write_string(&text);
            pass.string_written = true;
        }

        if let Ok(byte) = queue.try_receive() {
            self.write_char(byte);
            pass.event2 = Some(byte);
        }

        if let Ok(byte) = queue.try_receive() {
            self.write_char(byte);
            pass.event1 = Some(byte);
        }

        pass
    }

    /// Write one tagged message to the serial port
    pub fn dispatch(&mut self, message: Message) {
        match message {
            Message::Text(text) => self.write_string(&text),
            Message::Button(event) => {
                debug!("{:?} level {}", event.button, event.as_byte());
                self.write_char(event.as_byte());
            }
        }
    }

    pub async fn run_literal(&mut self, queue: &ByteQueue) -> ! {
        loop {
            let pass = self.service_literal(queue);
            if pass.drained() > 0 {
                TASK_COUNTERS.bump_consumer();
            }
            yield_now().await;
        }
    }

    pub async fn run_tagged(&mut self, queue: &MessageQueue) -> ! {
        loop {
            let message = queue.receive().await;
            self.dispatch(message);
            TASK_COUNTERS.bump_consumer();
        }
    }

    fn write_string(&mut self, text: &TxString) {
        if let Err(e) = self.serial.put_string(text.as_bytes()) {
            warn!("Serial string write failed: {:?}", e);
        }
    }

    fn write_char(&mut self, byte: u8) {
        if let Err(e) = self.serial.put_char(byte) {
            warn!("Serial char write failed: {:?}", e);
        }
    }
}

#[embassy_executor::task]
pub async fn consumer_task(serial: UartTx<'static, Blocking>, queue: SharedQueue<'static>) {
    info!("UART consumer task started");

    let mut consumer = UartConsumer::new(serial, &TX_STRING);
    match queue {
        SharedQueue::Literal(queue) => consumer.run_literal(queue).await,
        SharedQueue::Tagged(queue) => consumer.run_tagged(queue).await,
    }
}
