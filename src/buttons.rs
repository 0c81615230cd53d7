//! Button polling implementation
//!
//! Each of the two buttons is sampled by its own task. Every poll enqueues
//! the current level (0 or 1) on the shared queue, then sleeps for
//! `BUTTON_POLL_TICKS`. There is no debouncing and no change detection:
//! one item per cycle, pressed or not.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;
use embedded_hal::digital::InputPin;

use crate::channels::SharedQueue;
use crate::config::{ticks, BUTTON_POLL_TICKS};
use crate::supervisor::TASK_COUNTERS;
use crate::types::{ButtonEvent, ButtonId, PinState};

// ===================================================================
// Button Sampler
// ===================================================================

pub struct ButtonSampler<P> {
    id: ButtonId,
    pin: P,
}

impl<P: InputPin> ButtonSampler<P> {
    pub fn new(id: ButtonId, pin: P) -> Self {
        Self { id, pin }
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    /// Read the pin once. A failed read counts as released.
    pub fn sample(&mut self) -> ButtonEvent {
        let level = match self.pin.is_high() {
            Ok(high) => PinState::from(high),
            Err(_) => {
                warn!("{:?}: pin read failed, reporting low", self.id);
                PinState::Low
            }
        };
        ButtonEvent::new(self.id, level)
    }

    /// Sample and enqueue once, waiting for queue space if needed
    pub async fn poll_once(&mut self, queue: &SharedQueue<'_>) -> ButtonEvent {
        let event = self.sample();
        queue.send_button(event).await;
        trace!("{:?} -> {}", event.button, event.as_byte());
        event
    }

    /// Poll forever at the configured interval
    pub async fn run(mut self, queue: SharedQueue<'_>) -> ! {
        let interval = ticks(BUTTON_POLL_TICKS);

        loop {
            self.poll_once(&queue).await;
            TASK_COUNTERS.bump_button(self.id);
            Timer::after(interval).await;
        }
    }
}

// ===================================================================
// Button Task Implementation
// ===================================================================

#[embassy_executor::task(pool_size = 2)]
pub async fn button_task(sampler: ButtonSampler<Input<'static>>, queue: SharedQueue<'static>) {
    info!("Button task ({:?}) started", sampler.id());
    sampler.run(queue).await
}
