#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

use embedded_hal::digital::{Error, ErrorKind, ErrorType, InputPin};
use heapless::Vec;
use queuelink::serial::SerialPort;

/// Input pin with a fixed level, or one that always fails to read
pub struct MockPin {
    level: Option<bool>,
}

impl MockPin {
    pub fn high() -> Self {
        Self { level: Some(true) }
    }

    pub fn low() -> Self {
        Self { level: Some(false) }
    }

    pub fn broken() -> Self {
        Self { level: None }
    }
}

#[derive(Debug)]
pub struct PinFault;

impl Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for MockPin {
    type Error = PinFault;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.level.ok_or(PinFault)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Serial port that records every byte and counts write calls
#[derive(Default)]
pub struct RecordingPort {
    pub bytes: Vec<u8, 64>,
    pub writes: usize,
}

#[derive(Debug, defmt::Format)]
pub struct Overflow;

impl SerialPort for RecordingPort {
    type Error = Overflow;

    fn put_string(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.writes += 1;
        self.bytes.extend_from_slice(bytes).map_err(|_| Overflow)
    }
}

#[defmt_test::tests]
mod tests {
    use defmt::{assert, assert_eq};
    use embassy_executor::SpawnError;
    use embassy_futures::block_on;
    use embassy_futures::select::select;
    use embassy_sync::channel::Channel;
    use embassy_sync::once_lock::OnceLock;
    use embassy_time::{Duration, Timer};

    use queuelink::buttons::ButtonSampler;
    use queuelink::channels::{ByteQueue, MessageQueue, SharedQueue};
    use queuelink::config::{self, ticks, BUTTON_POLL_TICKS, STRING_PERIOD_TICKS};
    use queuelink::consumer::{LiteralPass, UartConsumer};
    use queuelink::hardware::interrupt_priority;
    use queuelink::producer::StringProducer;
    use queuelink::serial::{serial_config, SerialPort};
    use queuelink::supervisor::{AppSupervisor, TaskCounters};
    use queuelink::types::{
        ButtonEvent, ButtonId, Message, PinState, TaskPriority, TxString, APP_VERSION,
    };

    use super::{MockPin, RecordingPort};

    #[init]
    fn init() -> embassy_rp::Peripherals {
        // Starts the TIMER used by embassy-time and the defmt timestamps
        embassy_rp::init(Default::default())
    }

    // ---------------------------------------------------------------
    // Button tasks
    // ---------------------------------------------------------------

    #[test]
    fn button_high_enqueues_one() {
        let queue: ByteQueue = Channel::new();
        let mut sampler = ButtonSampler::new(ButtonId::Button1, MockPin::high());

        let event = block_on(sampler.poll_once(&SharedQueue::Literal(&queue)));

        assert_eq!(event, ButtonEvent::new(ButtonId::Button1, PinState::High));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.try_receive().ok(), Some(1));
    }

    #[test]
    fn button_low_enqueues_zero_every_cycle() {
        let queue: ByteQueue = Channel::new();
        let shared = SharedQueue::Literal(&queue);
        let mut sampler = ButtonSampler::new(ButtonId::Button2, MockPin::low());

        // No change detection: a steady level is still sent each cycle
        for _ in 0..3 {
            block_on(sampler.poll_once(&shared));
        }

        assert_eq!(queue.len(), 3);
        for _ in 0..3 {
            assert_eq!(queue.try_receive().ok(), Some(0));
        }
    }

    #[test]
    fn failed_pin_read_reports_low() {
        let mut sampler = ButtonSampler::new(ButtonId::Button1, MockPin::broken());
        assert_eq!(sampler.sample().level, PinState::Low);
    }

    #[test]
    fn tagged_button_event_names_its_button() {
        let queue: MessageQueue = Channel::new();
        let mut sampler = ButtonSampler::new(ButtonId::Button2, MockPin::high());

        block_on(sampler.poll_once(&SharedQueue::Tagged(&queue)));

        assert_eq!(
            queue.try_receive().ok(),
            Some(Message::Button(ButtonEvent::new(ButtonId::Button2, PinState::High)))
        );
    }

    #[test]
    fn poll_intervals_follow_kernel_ticks() {
        assert_eq!(ticks(BUTTON_POLL_TICKS), Duration::from_millis(20));
        assert_eq!(ticks(STRING_PERIOD_TICKS), Duration::from_millis(100));
    }

    #[test]
    fn button_loop_sends_once_per_poll_interval() {
        let queue: ByteQueue = Channel::new();
        let sampler = ButtonSampler::new(ButtonId::Button1, MockPin::high());

        // Polls land at 0, 20 and 40 ms
        block_on(select(
            sampler.run(SharedQueue::Literal(&queue)),
            Timer::after(Duration::from_millis(45)),
        ));

        assert_eq!(queue.len(), 3);
        for _ in 0..3 {
            assert_eq!(queue.try_receive().ok(), Some(1));
        }
    }

    // ---------------------------------------------------------------
    // String producer
    // ---------------------------------------------------------------

    #[test]
    fn producer_buffer_holds_literal() {
        let producer = StringProducer::start();
        assert_eq!(producer.text().as_bytes(), b"STRING");
    }

    #[test]
    fn producer_resends_unchanged_buffer() {
        let queue: MessageQueue = Channel::new();
        let shared = SharedQueue::Tagged(&queue);
        let producer = StringProducer::start();

        block_on(producer.send_once(&shared));
        block_on(producer.send_once(&shared));

        let first = queue.try_receive().ok();
        let second = queue.try_receive().ok();
        assert_eq!(first, Some(Message::Text(TxString::literal())));
        assert_eq!(first, second);
    }

    #[test]
    fn producer_publishes_shared_string_once() {
        let shared: OnceLock<TxString> = OnceLock::new();
        assert!(shared.try_get().is_none());

        let _first = StringProducer::start_published(&shared);
        let _second = StringProducer::start_published(&shared);

        assert_eq!(shared.try_get().copied(), Some(TxString::literal()));
    }

    #[test]
    fn producer_loop_sends_once_per_period() {
        let queue: MessageQueue = Channel::new();

        // Next send would be at 100 ms
        block_on(select(
            StringProducer::start().run(SharedQueue::Tagged(&queue)),
            Timer::after(Duration::from_millis(45)),
        ));

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.try_receive().ok(), Some(Message::Text(TxString::literal())));
    }

    // ---------------------------------------------------------------
    // UART consumer
    // ---------------------------------------------------------------

    #[test]
    fn literal_pass_drains_three_slots_in_order() {
        let queue: ByteQueue = Channel::new();
        let shared: OnceLock<TxString> = OnceLock::new();
        let _ = shared.init(TxString::literal());

        // String head, then button 2, then button 1
        let _ = queue.try_send(b'S');
        let _ = queue.try_send(0);
        let _ = queue.try_send(1);

        let mut consumer = UartConsumer::new(RecordingPort::default(), &shared);
        let pass = consumer.service_literal(&queue);

        assert_eq!(
            pass,
            LiteralPass {
                string_written: true,
                event2: Some(0),
                event1: Some(1),
            }
        );
        assert_eq!(pass.drained(), 3);
        assert_eq!(consumer.serial().bytes.as_slice(), b"STRING\x00\x01");
        assert_eq!(consumer.serial().writes, 3);
    }

    #[test]
    fn literal_pass_on_empty_queue_writes_nothing() {
        let queue: ByteQueue = Channel::new();
        let shared: OnceLock<TxString> = OnceLock::new();
        let mut consumer = UartConsumer::new(RecordingPort::default(), &shared);

        let pass = consumer.service_literal(&queue);

        assert_eq!(pass.drained(), 0);
        assert_eq!(consumer.serial().writes, 0);
    }

    #[test]
    fn literal_string_slot_ignores_dequeued_byte() {
        // Untagged queue: a lone button byte lands in the string slot
        let queue: ByteQueue = Channel::new();
        let shared: OnceLock<TxString> = OnceLock::new();
        let _ = shared.init(TxString::literal());
        let _ = queue.try_send(1);

        let mut consumer = UartConsumer::new(RecordingPort::default(), &shared);
        let pass = consumer.service_literal(&queue);

        assert!(pass.string_written);
        assert_eq!(pass.event2, None);
        assert_eq!(consumer.serial().bytes.as_slice(), b"STRING");
    }

    #[test]
    fn literal_string_slot_before_publish_writes_empty_buffer() {
        let queue: ByteQueue = Channel::new();
        let shared: OnceLock<TxString> = OnceLock::new();
        let _ = queue.try_send(0);

        let mut consumer = UartConsumer::new(RecordingPort::default(), &shared);
        consumer.service_literal(&queue);

        assert_eq!(consumer.serial().bytes.as_slice(), &[0u8; 6]);
    }

    #[test]
    fn tagged_dispatch_writes_by_tag() {
        let shared: OnceLock<TxString> = OnceLock::new();
        let mut consumer = UartConsumer::new(RecordingPort::default(), &shared);

        consumer.dispatch(Message::Text(TxString::literal()));
        consumer.dispatch(Message::Button(ButtonEvent::new(ButtonId::Button1, PinState::High)));
        consumer.dispatch(Message::Button(ButtonEvent::new(ButtonId::Button2, PinState::Low)));

        assert_eq!(consumer.serial().bytes.as_slice(), b"STRING\x01\x00");
        assert_eq!(consumer.serial().writes, 3);
    }

    #[test]
    fn literal_loop_drains_full_queue() {
        let queue: ByteQueue = Channel::new();
        let shared: OnceLock<TxString> = OnceLock::new();
        let _ = shared.init(TxString::literal());
        for byte in [b'S', 0, 1, b'S', 0, 1, b'S', 0] {
            assert!(queue.try_send(byte).is_ok());
        }

        let mut consumer = UartConsumer::new(RecordingPort::default(), &shared);
        block_on(select(
            consumer.run_literal(&queue),
            Timer::after(Duration::from_millis(5)),
        ));

        // Two full passes, a pass with two items, then empty passes
        assert!(queue.is_empty());
        assert_eq!(
            consumer.serial().bytes.as_slice(),
            b"STRING\x00\x01STRING\x00\x01STRING\x00"
        );
        assert_eq!(consumer.serial().writes, 8);
    }

    #[test]
    fn tagged_loop_writes_messages_in_order() {
        let queue: MessageQueue = Channel::new();
        let shared: OnceLock<TxString> = OnceLock::new();
        let released = ButtonEvent::new(ButtonId::Button2, PinState::Low);
        let pressed = ButtonEvent::new(ButtonId::Button1, PinState::High);
        let _ = queue.try_send(Message::Button(released));
        let _ = queue.try_send(Message::Text(TxString::literal()));
        let _ = queue.try_send(Message::Button(pressed));

        let mut consumer = UartConsumer::new(RecordingPort::default(), &shared);
        block_on(select(
            consumer.run_tagged(&queue),
            Timer::after(Duration::from_millis(5)),
        ));

        assert!(queue.is_empty());
        assert_eq!(consumer.serial().bytes.as_slice(), b"\x00STRING\x01");
        assert_eq!(consumer.serial().writes, 3);
    }

    // ---------------------------------------------------------------
    // Serial
    // ---------------------------------------------------------------

    #[test]
    fn serial_runs_at_115200_baud() {
        assert_eq!(serial_config().baudrate, 115_200);
    }

    #[test]
    fn put_char_writes_exactly_one_byte() {
        let mut port = RecordingPort::default();
        assert!(port.put_char(1).is_ok());
        assert_eq!(port.bytes.as_slice(), &[1u8]);
        assert_eq!(port.writes, 1);
    }

    // ---------------------------------------------------------------
    // Task table and supervisor
    // ---------------------------------------------------------------

    #[test]
    fn task_table_priorities() {
        assert_eq!(config::STRING_TASK.priority, TaskPriority::High);
        assert_eq!(config::BUTTON1_TASK.priority, TaskPriority::Medium);
        assert_eq!(config::BUTTON2_TASK.priority, TaskPriority::Medium);
        assert_eq!(config::CONSUMER_TASK.priority, TaskPriority::Low);
        assert!(interrupt_priority(TaskPriority::Low).is_none());
        assert!(interrupt_priority(TaskPriority::High).is_some());
    }

    #[test]
    fn spawn_result_becomes_handle() {
        let handle = config::STRING_TASK.spawned(Ok(())).ok();
        assert_eq!(handle.map(|h| h.name), Some("periodic_string"));
        assert!(config::CONSUMER_TASK.spawned(Err(SpawnError::Busy)).is_err());
    }

    #[test]
    fn app_version_comes_from_package() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
        assert!(!APP_VERSION.is_empty());
    }

    #[test]
    fn supervisor_flags_tasks_without_progress() {
        let counters = TaskCounters::new();
        let mut supervisor = AppSupervisor::new_for_mode(config::QueueMode::Tagged);

        counters.bump_button(ButtonId::Button1);
        counters.bump_button(ButtonId::Button2);
        counters.bump_string();
        let stalled = supervisor.check(counters.snapshot());
        assert_eq!(stalled.as_slice(), &["uart_consumer"]);

        counters.bump_consumer();
        let stalled = supervisor.check(counters.snapshot());
        assert_eq!(stalled.len(), 3);

        counters.bump_button(ButtonId::Button1);
        counters.bump_button(ButtonId::Button2);
        counters.bump_string();
        counters.bump_consumer();
        assert!(supervisor.check(counters.snapshot()).is_empty());
    }
}
