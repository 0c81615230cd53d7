//! Periodic string producer
//!
//! Copies the `"STRING"` literal into its buffer once at start-up and then
//! sends that same buffer every `STRING_PERIOD_TICKS`.

use defmt::*;
use embassy_sync::once_lock::OnceLock;
use embassy_time::Timer;

use crate::channels::{SharedQueue, TX_STRING};
use crate::config::{ticks, STRING_PERIOD_TICKS};
use crate::supervisor::TASK_COUNTERS;
use crate::types::TxString;

pub struct StringProducer {
    text: TxString,
}

impl StringProducer {
    /// Fill the buffer from the literal. Runs once per producer.
    pub fn start() -> Self {
        Self {
            text: TxString::literal(),
        }
    }

    /// Fill the buffer and publish it to `shared` for readers that only see
    /// the byte queue. A cell that is already set keeps its first value.
    pub fn start_published(shared: &OnceLock<TxString>) -> Self {
        let producer = Self::start();
        if shared.init(producer.text).is_err() {
            warn!("Shared string already published, keeping first value");
        }
        producer
    }

    pub fn text(&self) -> TxString {
        self.text
    }

    /// Send the buffer once, waiting for queue space if needed
    pub async fn send_once(&self, queue: &SharedQueue<'_>) {
        queue.send_string(self.text).await;
        trace!("String sent");
    }

    pub async fn run(self, queue: SharedQueue<'_>) -> ! {
        let period = ticks(STRING_PERIOD_TICKS);

        loop {
            self.send_once(&queue).await;
            TASK_COUNTERS.bump_string();
            Timer::after(period).await;
        }
    }
}

#[embassy_executor::task]
pub async fn string_task(queue: SharedQueue<'static>) {
    info!("String producer task started");

    let producer = match queue {
        SharedQueue::Literal(_) => StringProducer::start_published(&TX_STRING),
        SharedQueue::Tagged(_) => StringProducer::start(),
    };

    producer.run(queue).await
}
