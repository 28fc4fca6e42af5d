//! Topic/payload emission over the established broker session.
//!
//! Every publish is fire-and-forget: no acknowledgement tracking and no
//! retry. A failed send is logged and dropped; a dead session is noticed
//! by the connection check at the top of the next tick.

use core::fmt::Write;

use log::{debug, warn};

use crate::app::events::TelemetryReading;
use crate::app::ports::BrokerPort;
use crate::config::{Name, NodeConfig};
use crate::detector::DoorState;

/// Liveness payload published at the start of every telemetry cycle.
pub const PING: &str = "ping";

/// Room for `-f32::MAX` with two decimals.
const FIXED_CAPACITY: usize = 48;

/// Fixed-point telemetry text: width 5, two decimals, right aligned.
/// Non-finite values render as-is (`"  NaN"`, `"  inf"`).
pub fn format_fixed(value: f32) -> heapless::String<FIXED_CAPACITY> {
    let mut s = heapless::String::new();
    if write!(s, "{:5.2}", value).is_err() {
        warn!("MQTT: telemetry value {} did not fit its buffer", value);
    }
    s
}

pub struct Publisher {
    state_topic: Name,
    liveness_topic: Name,
    temperature_topic: Name,
    humidity_topic: Name,
    failures: u32,
}

impl Publisher {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            state_topic: config.state_topic.clone(),
            liveness_topic: config.liveness_topic.clone(),
            temperature_topic: config.temperature_topic.clone(),
            humidity_topic: config.humidity_topic.clone(),
            failures: 0,
        }
    }

    pub fn publish(&mut self, link: &mut impl BrokerPort, topic: &str, payload: &str) {
        match link.publish(topic, payload) {
            Ok(()) => debug!("MQTT: {} <- {}", topic, payload),
            Err(e) => {
                self.failures = self.failures.wrapping_add(1);
                warn!("MQTT: publish to {} dropped ({})", topic, e);
            }
        }
    }

    pub fn publish_door(&mut self, link: &mut impl BrokerPort, state: DoorState) {
        let topic = self.state_topic.clone();
        self.publish(link, &topic, state.payload());
    }

    /// Ping, then temperature, then humidity. Values go out unguarded.
    pub fn publish_telemetry(&mut self, link: &mut impl BrokerPort, reading: &TelemetryReading) {
        let liveness = self.liveness_topic.clone();
        let temperature = self.temperature_topic.clone();
        let humidity = self.humidity_topic.clone();

        self.publish(link, &liveness, PING);
        self.publish(link, &temperature, &format_fixed(reading.temperature_c));
        self.publish(link, &humidity, &format_fixed(reading.humidity_pct));
    }

    /// Publishes dropped since boot.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}
