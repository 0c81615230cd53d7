//! Hardware and application configuration for QueueLink
//! RP2040-based four-task queue demo

use embassy_time::Duration;

use crate::types::{TaskPriority, TaskSpec};

// ===================================================================
// Kernel Timing
// ===================================================================

pub const KERNEL_TICK_HZ: u64 = 1000; // 1ms scheduler tick
pub const BUTTON_POLL_TICKS: u64 = 20; // Delay between button samples
pub const STRING_PERIOD_TICKS: u64 = 100; // Delay between string sends
pub const SUPERVISOR_PERIOD_SECS: u64 = 10; // Progress check interval

/// Convert a delay expressed in kernel ticks into an embassy duration
pub const fn ticks(count: u64) -> Duration {
    Duration::from_millis(count * 1000 / KERNEL_TICK_HZ)
}

// ===================================================================
// Shared Queue
// ===================================================================

pub const QUEUE_CAPACITY: usize = 8; // Items, not bytes
pub const TX_STRING_LEN: usize = 6;
pub const TX_STRING_LITERAL: [u8; TX_STRING_LEN] = *b"STRING";

// ===================================================================
// Serial Configuration
// ===================================================================

pub const SERIAL_BAUD_RATE: u32 = 115_200;

// ===================================================================
// GPIO Pin Assignments - Raspberry Pi Pico
// ===================================================================

pub const UART_TX_PIN: u8 = 0; // UART0 TX
pub const BUTTON1_PIN: u8 = 14; // Active high, pulled down
pub const BUTTON2_PIN: u8 = 15; // Active high, pulled down

// ===================================================================
// Task Table
// ===================================================================

pub const TASK_STACK_WORDS: usize = 100;
pub const TASK_COUNT: usize = 4;

pub const BUTTON1_TASK: TaskSpec =
    TaskSpec::new("read_button1", TASK_STACK_WORDS, TaskPriority::Medium);
pub const BUTTON2_TASK: TaskSpec =
    TaskSpec::new("read_button2", TASK_STACK_WORDS, TaskPriority::Medium);
pub const STRING_TASK: TaskSpec =
    TaskSpec::new("periodic_string", TASK_STACK_WORDS, TaskPriority::High);
pub const CONSUMER_TASK: TaskSpec =
    TaskSpec::new("uart_consumer", TASK_STACK_WORDS, TaskPriority::Low);

// ===================================================================
// Queue Mode Selection
// ===================================================================

/// How producers and the consumer share the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum QueueMode {
    /// Tagged messages, consumer dispatches on the tag
    Tagged,
    /// One untagged byte queue drained three slots at a time
    Literal,
}
