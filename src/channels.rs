//! Inter-task communication channels
//!
//! This module defines the shared queues used between the producer tasks and
//! the UART consumer, plus the write-once string buffer read by the literal
//! consumer.
//!
//! All channels use `CriticalSectionRawMutex` because producers run on
//! interrupt executors while the consumer runs in thread mode.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::once_lock::OnceLock;

use crate::config::{QueueMode, QUEUE_CAPACITY};
use crate::types::{ButtonEvent, Message, TxString};

/// Untagged queue of one-byte items
pub type ByteQueue = Channel<CriticalSectionRawMutex, u8, QUEUE_CAPACITY>;

/// Queue of tagged messages
pub type MessageQueue = Channel<CriticalSectionRawMutex, Message, QUEUE_CAPACITY>;

/// Shared byte queue used in literal mode
/// Buffer size: 8 items of 1 byte
pub static BYTE_QUEUE: ByteQueue = Channel::new();

/// Shared message queue used in tagged mode
/// Buffer size: 8 messages
pub static MESSAGE_QUEUE: MessageQueue = Channel::new();

/// String published once by the producer in literal mode
pub static TX_STRING: OnceLock<TxString> = OnceLock::new();

/// Whichever shared queue the current mode uses
#[derive(Clone, Copy)]
pub enum SharedQueue<'a> {
    Literal(&'a ByteQueue),
    Tagged(&'a MessageQueue),
}

impl<'a> SharedQueue<'a> {
    /// Handle on the static queue for `mode`
    pub fn for_mode(mode: QueueMode) -> SharedQueue<'static> {
        match mode {
            QueueMode::Literal => SharedQueue::Literal(&BYTE_QUEUE),
            QueueMode::Tagged => SharedQueue::Tagged(&MESSAGE_QUEUE),
        }
    }

    /// Enqueue a button sample, waiting for space without timeout
    pub async fn send_button(&self, event: ButtonEvent) {
        match self {
            SharedQueue::Literal(queue) => queue.send(event.as_byte()).await,
            SharedQueue::Tagged(queue) => queue.send(Message::Button(event)).await,
        }
    }

    /// Enqueue the periodic string, waiting for space without timeout
    ///
    /// A byte queue item holds one byte, so only the head of the string is
    /// enqueued in literal mode.
    pub async fn send_string(&self, text: TxString) {
        match self {
            SharedQueue::Literal(queue) => queue.send(text.head()).await,
            SharedQueue::Tagged(queue) => queue.send(Message::Text(text)).await,
        }
    }

    /// Items currently queued
    pub fn occupancy(&self) -> usize {
        match self {
            SharedQueue::Literal(queue) => queue.len(),
            SharedQueue::Tagged(queue) => queue.len(),
        }
    }

    /// Total slots in the queue
    pub fn capacity(&self) -> usize {
        match self {
            SharedQueue::Literal(queue) => queue.capacity(),
            SharedQueue::Tagged(queue) => queue.capacity(),
        }
    }
}
