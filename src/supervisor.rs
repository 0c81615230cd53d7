//! Application supervisor and monitoring
//!
//! Every demo task bumps its own progress counter once per completed cycle.
//! The supervisor snapshots the counters periodically and reports any task
//! that has not moved since the previous check, which is how a task stuck on
//! a full or empty queue shows up in the log. It never restarts anything.

use defmt::*;
use embassy_time::{Duration, Timer};
use heapless::Vec;
use portable_atomic::{AtomicU32, Ordering};

use crate::channels::SharedQueue;
use crate::config::{self, QueueMode, SERIAL_BAUD_RATE, SUPERVISOR_PERIOD_SECS, TASK_COUNT};
use crate::types::{ButtonId, TaskHandle, APP_VERSION};

// ===================================================================
// Task Progress Counters
// ===================================================================

const SLOT_BUTTON1: usize = 0;
const SLOT_BUTTON2: usize = 1;
const SLOT_STRING: usize = 2;
const SLOT_CONSUMER: usize = 3;

/// Per-task cycle counters, indexed in task table order
pub struct TaskCounters {
    counts: [AtomicU32; TASK_COUNT],
}

impl TaskCounters {
    pub const fn new() -> Self {
        Self {
            counts: [
                AtomicU32::new(0),
                AtomicU32::new(0),
                AtomicU32::new(0),
                AtomicU32::new(0),
            ],
        }
    }

    pub fn bump_button(&self, button: ButtonId) {
        let slot = match button {
            ButtonId::Button1 => SLOT_BUTTON1,
            ButtonId::Button2 => SLOT_BUTTON2,
        };
        self.bump(slot);
    }

    pub fn bump_string(&self) {
        self.bump(SLOT_STRING);
    }

    pub fn bump_consumer(&self) {
        self.bump(SLOT_CONSUMER);
    }

    pub fn snapshot(&self) -> [u32; TASK_COUNT] {
        core::array::from_fn(|i| self.counts[i].load(Ordering::Relaxed))
    }

    fn bump(&self, slot: usize) {
        self.counts[slot].fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for TaskCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters shared by all demo tasks
pub static TASK_COUNTERS: TaskCounters = TaskCounters::new();

// ===================================================================
// Supervisor
// ===================================================================

/// Application supervisor responsible for monitoring
pub struct AppSupervisor {
    mode: QueueMode,
    handles: Vec<TaskHandle, TASK_COUNT>,
    last_counts: [u32; TASK_COUNT],
    uptime_seconds: u32,
}

impl AppSupervisor {
    pub fn new_for_mode(mode: QueueMode) -> Self {
        Self {
            mode,
            handles: Vec::new(),
            last_counts: [0; TASK_COUNT],
            uptime_seconds: 0,
        }
    }

    /// Record a spawned task. Handles beyond the task table are dropped.
    pub fn register(&mut self, handle: TaskHandle) {
        if self.handles.push(handle).is_err() {
            warn!("Task table full, not tracking {}", handle.name);
        }
    }

    /// Print application startup banner
    pub fn print_startup_banner(&self) {
        info!("========================================");
        info!("QueueLink v{}", APP_VERSION);
        info!("Four-task queue demo");
        info!("========================================");
        info!("Hardware: RP2040 (Raspberry Pi Pico)");
        info!("Queue mode: {:?}", self.mode);
        info!("Queue: {} slots", config::QUEUE_CAPACITY);
        info!("UART: {} baud on GPIO{}", SERIAL_BAUD_RATE, config::UART_TX_PIN);
        info!("Buttons: GPIO{}, GPIO{}", config::BUTTON1_PIN, config::BUTTON2_PIN);
        info!("========================================");
    }

    /// Print the spawned task table
    pub fn print_task_table(&self) {
        for handle in self.handles.iter() {
            info!("  {} (priority {})", handle.name, handle.priority.level());
        }
    }

    /// Compare `counts` with the previous snapshot and return the names of
    /// tasks that made no progress
    pub fn check(&mut self, counts: [u32; TASK_COUNT]) -> Vec<&'static str, TASK_COUNT> {
        let mut stalled = Vec::new();

        for (slot, name) in TASK_NAMES.iter().enumerate() {
            if counts[slot] == self.last_counts[slot] {
                // Capacity equals TASK_COUNT, so this cannot fail
                let _ = stalled.push(*name);
            }
        }

        self.last_counts = counts;
        stalled
    }

    /// Run the periodic check loop
    pub async fn run(&mut self, queue: SharedQueue<'_>) -> ! {
        info!("Application supervisor started");

        loop {
            Timer::after(Duration::from_secs(SUPERVISOR_PERIOD_SECS)).await;
            self.uptime_seconds += SUPERVISOR_PERIOD_SECS as u32;

            let counts = TASK_COUNTERS.snapshot();
            for name in self.check(counts).iter() {
                warn!("Task {} made no progress in {}s", name, SUPERVISOR_PERIOD_SECS);
            }

            info!(
                "Status: uptime {}s, queue {}/{}, cycles {:?}",
                self.uptime_seconds,
                queue.occupancy(),
                queue.capacity(),
                counts
            );
        }
    }
}

const TASK_NAMES: [&str; TASK_COUNT] = [
    config::BUTTON1_TASK.name,
    config::BUTTON2_TASK.name,
    config::STRING_TASK.name,
    config::CONSUMER_TASK.name,
];

#[embassy_executor::task]
pub async fn supervisor_task(mut supervisor: AppSupervisor, queue: SharedQueue<'static>) {
    supervisor.run(queue).await
}
