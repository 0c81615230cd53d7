//! Common types and data structures used across the QueueLink application
//!
//! This module contains the queue payloads, button identifiers and the
//! task table entries shared by the producer, consumer and startup code.

use embassy_executor::SpawnError;

use crate::config::{TX_STRING_LEN, TX_STRING_LITERAL};

/// Logical level of a digital input pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum PinState {
    Low,
    High,
}

impl PinState {
    /// Byte placed on the queue for this level (0 or 1)
    pub const fn as_byte(self) -> u8 {
        match self {
            PinState::Low => 0,
            PinState::High => 1,
        }
    }
}

impl From<bool> for PinState {
    fn from(high: bool) -> Self {
        if high {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

/// Which of the two demo buttons produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum ButtonId {
    Button1,
    Button2,
}

/// One sample taken by a button task
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct ButtonEvent {
    pub button: ButtonId,
    pub level: PinState,
}

impl ButtonEvent {
    pub const fn new(button: ButtonId, level: PinState) -> Self {
        Self { button, level }
    }

    /// Queue byte for this event
    pub const fn as_byte(&self) -> u8 {
        self.level.as_byte()
    }
}

/// Fixed six byte string sent by the periodic producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct TxString([u8; TX_STRING_LEN]);

impl TxString {
    /// Empty buffer, as seen before the producer has run
    pub const fn empty() -> Self {
        Self([0; TX_STRING_LEN])
    }

    /// The demo's `"STRING"` literal
    pub const fn literal() -> Self {
        Self(TX_STRING_LITERAL)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// First byte, the only part that fits a one-byte queue item
    pub const fn head(&self) -> u8 {
        self.0[0]
    }
}

impl Default for TxString {
    fn default() -> Self {
        Self::empty()
    }
}

/// Tagged queue item carried by the tagged queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Message {
    /// Sampled level from one of the button tasks
    Button(ButtonEvent),
    /// The periodic string, passed by value
    Text(TxString),
}

// ===================================================================
// Task Table
// ===================================================================

/// Scheduler priority of a demo task
///
/// Higher priorities run on interrupt executors and preempt lower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, defmt::Format)]
pub enum TaskPriority {
    /// Thread-mode executor
    Low = 1,
    /// Interrupt executor on SWI_IRQ_0
    Medium = 2,
    /// Interrupt executor on SWI_IRQ_1
    High = 3,
}

impl TaskPriority {
    pub const fn level(self) -> u8 {
        self as u8
    }
}

/// Static description of one demo task
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct TaskSpec {
    pub name: &'static str,
    /// Stack budget in words. Embassy tasks are statically sized, so this is
    /// informational only.
    pub stack_words: usize,
    pub priority: TaskPriority,
}

impl TaskSpec {
    pub const fn new(name: &'static str, stack_words: usize, priority: TaskPriority) -> Self {
        Self {
            name,
            stack_words,
            priority,
        }
    }

    /// Turn the result of a spawn call into a handle, logging the outcome
    pub fn spawned(&self, result: Result<(), SpawnError>) -> Result<TaskHandle, SpawnError> {
        match result {
            Ok(()) => {
                defmt::info!(
                    "Spawned {} (priority {}, {} words)",
                    self.name,
                    self.priority.level(),
                    self.stack_words
                );
                Ok(TaskHandle {
                    name: self.name,
                    priority: self.priority,
                })
            }
            Err(e) => {
                defmt::error!("Failed to spawn {}: {:?}", self.name, e);
                Err(e)
            }
        }
    }
}

/// Handle of a spawned task, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct TaskHandle {
    pub name: &'static str,
    pub priority: TaskPriority,
}

/// Current application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
