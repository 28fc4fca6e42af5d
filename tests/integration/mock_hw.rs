//! Mock adapters for integration tests.
//!
//! Every mock appends to a shared [`Journal`] so tests can assert on the
//! cross-port ordering of a tick (e.g. no sampling while reconnecting)
//! without touching real GPIO, ADC or sockets.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};
use garagesensor::app::events::AppEvent;
use garagesensor::app::ports::{
    BrokerError, BrokerPort, ClimatePort, ClockPort, DistancePort, EventSink, IndicatorPort,
    TokenSource,
};
use garagesensor::detector::DoorState;

/// Ordered record of every port call across all mocks.
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::default()
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    journal: Journal,
    distances: VecDeque<u16>,
    last_raw: u16,
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub indicator: Vec<DoorState>,
    pub distance_reads: u32,
}

#[allow(dead_code)]
impl MockHardware {
    /// Raw 500 converts to 22 cm, so the default reads as open.
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            distances: VecDeque::new(),
            last_raw: 500,
            temperature_c: 22.5,
            humidity_pct: 45.0,
            indicator: Vec::new(),
            distance_reads: 0,
        }
    }

    /// Queue raw counts; the last one repeats once the queue drains.
    pub fn queue_raw(&mut self, raws: &[u16]) {
        self.distances.extend(raws.iter().copied());
    }
}

impl DistancePort for MockHardware {
    fn read_distance_raw(&mut self) -> u16 {
        if let Some(raw) = self.distances.pop_front() {
            self.last_raw = raw;
        }
        self.distance_reads += 1;
        self.journal.borrow_mut().push("read_distance".to_string());
        self.last_raw
    }
}

impl ClimatePort for MockHardware {
    fn read_humidity(&mut self) -> f32 {
        self.journal.borrow_mut().push("read_humidity".to_string());
        self.humidity_pct
    }

    fn read_temperature(&mut self) -> f32 {
        self.journal.borrow_mut().push("read_temperature".to_string());
        self.temperature_c
    }
}

impl IndicatorPort for MockHardware {
    fn show_door(&mut self, state: DoorState) {
        self.indicator.push(state);
        self.journal.borrow_mut().push(format!("show:{:?}", state));
    }
}

// ── MockBroker ────────────────────────────────────────────────

pub struct MockBroker {
    journal: Journal,
    failures: VecDeque<i32>,
    connected: bool,
    pub reject_publish: bool,
    pub client_ids: Vec<String>,
    pub published: Vec<(String, String)>,
}

#[allow(dead_code)]
impl MockBroker {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            failures: VecDeque::new(),
            connected: false,
            reject_publish: false,
            client_ids: Vec::new(),
            published: Vec::new(),
        }
    }

    /// The next `rcs.len()` connect attempts fail with these codes.
    pub fn fail_next(&mut self, rcs: &[i32]) {
        self.failures.extend(rcs.iter().copied());
    }

    /// Simulate the broker closing the session.
    pub fn drop_session(&mut self) {
        self.connected = false;
    }

    pub fn payloads_on(&self, topic: &str) -> Vec<&str> {
        self.published
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| p.as_str())
            .collect()
    }
}

impl BrokerPort for MockBroker {
    fn connect(&mut self, client_id: &str) -> Result<(), BrokerError> {
        self.client_ids.push(client_id.to_string());
        self.journal.borrow_mut().push("connect".to_string());
        match self.failures.pop_front() {
            Some(rc) => Err(BrokerError::ConnectFailed(rc)),
            None => {
                self.connected = true;
                Ok(())
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), BrokerError> {
        if !self.connected {
            return Err(BrokerError::NotConnected);
        }
        if self.reject_publish {
            return Err(BrokerError::PublishFailed);
        }
        self.journal
            .borrow_mut()
            .push(format!("publish:{}={}", topic, payload));
        self.published.push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

// ── FakeClock ─────────────────────────────────────────────────

/// Time only moves when the code under test sleeps.
pub struct FakeClock {
    journal: Journal,
    pub now_ms: u64,
    pub sleeps: Vec<u32>,
}

impl FakeClock {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            now_ms: 0,
            sleeps: Vec::new(),
        }
    }
}

impl ClockPort for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.now_ms += u64::from(ms);
        self.sleeps.push(ms);
        self.journal.borrow_mut().push(format!("sleep:{}", ms));
    }
}

// ── Tokens ────────────────────────────────────────────────────

/// Deterministic token source counting up from its seed.
pub struct SeqTokens(pub u16);

impl TokenSource for SeqTokens {
    fn next_token(&mut self) -> u16 {
        let t = self.0;
        self.0 = self.0.wrapping_add(1);
        t
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── RecordingPin ──────────────────────────────────────────────

/// Output pin that remembers its level, for driving real adapters.
#[derive(Clone, Default)]
pub struct RecordingPin {
    pub level: Rc<RefCell<bool>>,
}

#[allow(dead_code)]
impl RecordingPin {
    pub fn is_high(&self) -> bool {
        *self.level.borrow()
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        *self.level.borrow_mut() = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        *self.level.borrow_mut() = true;
        Ok(())
    }
}
