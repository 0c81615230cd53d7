//! Hardware bring-up and task startup
//!
//! Brings up clocks, UART and button inputs once, then spawns the four demo
//! tasks onto executors that stand in for the three scheduler priorities:
//!
//! | Priority | Executor                   | Tasks                     |
//! |----------|----------------------------|---------------------------|
//! | High     | interrupt, SWI_IRQ_1 at P2 | periodic string           |
//! | Medium   | interrupt, SWI_IRQ_0 at P3 | button 1, button 2        |
//! | Low      | thread mode                | UART consumer, supervisor |

use defmt::*;
use embassy_executor::{Executor, InterruptExecutor, SpawnError, Spawner};
use embassy_rp::clocks::PeriClkSrc;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::uart::{Blocking, UartTx};
use heapless::Vec;
use static_cell::StaticCell;

use crate::buttons::{button_task, ButtonSampler};
use crate::channels::SharedQueue;
use crate::config::{self, QueueMode, TASK_COUNT};
use crate::consumer::consumer_task;
use crate::producer::string_task;
use crate::serial::serial_config;
use crate::supervisor::{supervisor_task, AppSupervisor};
use crate::types::{ButtonId, TaskHandle, TaskPriority};

// ===================================================================
// Executors
// ===================================================================

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MEDIUM: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[interrupt]
unsafe fn SWI_IRQ_0() {
    EXECUTOR_MEDIUM.on_interrupt()
}

/// NVIC priority backing an interrupt executor, `None` for thread mode
pub fn interrupt_priority(priority: TaskPriority) -> Option<Priority> {
    match priority {
        TaskPriority::High => Some(Priority::P2),
        TaskPriority::Medium => Some(Priority::P3),
        TaskPriority::Low => None,
    }
}

// ===================================================================
// Board Bring-Up
// ===================================================================

/// Peripherals owned by the demo after bring-up
pub struct Board {
    pub serial: UartTx<'static, Blocking>,
    pub button1: Input<'static>,
    pub button2: Input<'static>,
}

/// Chip configuration: the peripheral clock runs at the system PLL rate
pub fn chip_config() -> embassy_rp::config::Config {
    let mut config = embassy_rp::config::Config::default();
    config.clocks.peri_clk_src = Some(PeriClkSrc::Sys);
    config
}

/// One-time bring-up of clocks, UART and button inputs
pub fn bring_up() -> Board {
    let p = embassy_rp::init(chip_config());

    // Configure UART
    let serial = UartTx::new_blocking(p.UART0, p.PIN_0, serial_config());
    info!("UART0 ready at {} baud", config::SERIAL_BAUD_RATE);

    // Configure GPIO
    let button1 = Input::new(p.PIN_14, Pull::Down);
    let button2 = Input::new(p.PIN_15, Pull::Down);
    info!("Buttons on GPIO{} and GPIO{}", config::BUTTON1_PIN, config::BUTTON2_PIN);

    Board {
        serial,
        button1,
        button2,
    }
}

// ===================================================================
// Task Startup
// ===================================================================

/// Start the interrupt executors and spawn the string and button tasks
pub fn start_producers(
    button1: Input<'static>,
    button2: Input<'static>,
    queue: SharedQueue<'static>,
) -> Result<Vec<TaskHandle, TASK_COUNT>, SpawnError> {
    let mut handles = Vec::new();

    if let Some(priority) = interrupt_priority(config::STRING_TASK.priority) {
        interrupt::SWI_IRQ_1.set_priority(priority);
    }
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);

    if let Some(priority) = interrupt_priority(config::BUTTON1_TASK.priority) {
        interrupt::SWI_IRQ_0.set_priority(priority);
    }
    let medium = EXECUTOR_MEDIUM.start(interrupt::SWI_IRQ_0);

    let _ = handles.push(config::STRING_TASK.spawned(high.spawn(string_task(queue)))?);

    let sampler1 = ButtonSampler::new(ButtonId::Button1, button1);
    let _ = handles.push(config::BUTTON1_TASK.spawned(medium.spawn(button_task(sampler1, queue)))?);

    let sampler2 = ButtonSampler::new(ButtonId::Button2, button2);
    let _ = handles.push(config::BUTTON2_TASK.spawned(medium.spawn(button_task(sampler2, queue)))?);

    Ok(handles)
}

/// Spawn the UART consumer on the thread-mode executor
pub fn spawn_consumer(
    spawner: &Spawner,
    serial: UartTx<'static, Blocking>,
    queue: SharedQueue<'static>,
) -> Result<TaskHandle, SpawnError> {
    config::CONSUMER_TASK.spawned(spawner.spawn(consumer_task(serial, queue)))
}

/// Bring up the board, spawn every task for `mode` and run the scheduler
pub fn run(mode: QueueMode) -> ! {
    let Board {
        serial,
        button1,
        button2,
    } = bring_up();

    let mut supervisor = AppSupervisor::new_for_mode(mode);
    supervisor.print_startup_banner();

    let queue = SharedQueue::for_mode(mode);
    for handle in unwrap!(start_producers(button1, button2, queue)) {
        supervisor.register(handle);
    }

    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(move |spawner| {
        supervisor.register(unwrap!(spawn_consumer(&spawner, serial, queue)));
        supervisor.print_task_table();
        unwrap!(spawner.spawn(supervisor_task(supervisor, queue)));
    })
}
