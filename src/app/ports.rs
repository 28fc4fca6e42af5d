//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ NodeService (domain)
//! ```
//!
//! Driven adapters (sensors, indicator LEDs, broker link, clock, event
//! sinks) implement these traits. The [`NodeService`](super::service::NodeService)
//! consumes them via generics, so the domain core never touches hardware
//! directly and every tick can be replayed against mocks on the host.

use crate::detector::DoorState;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapters: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the IR distance sensor.
pub trait DistancePort {
    /// One raw analog count. No retries, no filtering.
    fn read_distance_raw(&mut self) -> u16;
}

/// Read-side port for the humidity/temperature sensor.
///
/// Failures are reported in-band as `f32::NAN`. Callers do not guard.
pub trait ClimatePort {
    /// Relative humidity in percent, or NaN.
    fn read_humidity(&mut self) -> f32;

    /// Temperature in degrees Celsius, or NaN.
    fn read_temperature(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Two mutually exclusive digital outputs reflecting the door state.
pub trait IndicatorPort {
    fn show_door(&mut self, state: DoorState);
}

// ───────────────────────────────────────────────────────────────
// Broker port (driven adapter: domain ↔ MQTT)
// ───────────────────────────────────────────────────────────────

/// Connection to the message broker.
pub trait BrokerPort {
    /// Open a fresh session under `client_id`. Blocks for at most the
    /// adapter's network timeout.
    fn connect(&mut self, client_id: &str) -> Result<(), BrokerError>;

    /// Whether the session is currently up.
    fn is_connected(&self) -> bool;

    /// Fire-and-forget publish. No acknowledgement tracking.
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), BrokerError>;
}

// ───────────────────────────────────────────────────────────────
// Platform ports
// ───────────────────────────────────────────────────────────────

/// Monotonic time and the loop's only suspension point.
pub trait ClockPort {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Block the calling task for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}

/// Source of distinct values for per-attempt client identifiers.
/// Cryptographic quality is not required.
pub trait TokenSource {
    /// A value in `0..0xFFFF`.
    fn next_token(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`BrokerPort`] operations.
///
/// Connect failures carry a numeric state code in the PubSubClient
/// convention (`-4` timeout, `-3` lost, `-2` failed, `1..=5` refused by
/// the broker) so logs stay comparable across firmware generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerError {
    /// The connect attempt failed with the given state code.
    ConnectFailed(i32),
    /// No CONNACK within the network timeout.
    Timeout,
    /// Publish attempted without an open session.
    NotConnected,
    /// The client refused to enqueue the message.
    PublishFailed,
}

impl BrokerError {
    /// PubSubClient-style state code for logging.
    pub fn code(&self) -> i32 {
        match self {
            Self::ConnectFailed(rc) => *rc,
            Self::Timeout => -4,
            Self::NotConnected => -1,
            Self::PublishFailed => -3,
        }
    }
}

/// Errors from configuration parsing and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Override text failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for BrokerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ConnectFailed(rc) => write!(f, "connect failed, rc={}", rc),
            Self::Timeout => write!(f, "connect timed out, rc=-4"),
            Self::NotConnected => write!(f, "not connected"),
            Self::PublishFailed => write!(f, "publish failed"),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
