//! Node configuration parameters
//!
//! All tunable parameters for the garage sensor node. Defaults match the
//! deployed installation; a build-time JSON override can replace them.

use core::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Short fixed-capacity string used for hosts, topics and prefixes.
pub type Name = heapless::String<32>;

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    // --- Broker ---
    /// MQTT broker host name or IPv4 address
    pub broker_host: Name,
    /// MQTT broker TCP port
    pub broker_port: u16,
    /// Prefix for the per-attempt randomised client identifier
    pub client_id_prefix: Name,

    // --- Topics ---
    /// Door state and online announcements
    pub state_topic: Name,
    /// Liveness ping published every telemetry cycle
    pub liveness_topic: Name,
    pub temperature_topic: Name,
    pub humidity_topic: Name,

    // --- Detection ---
    /// Distances at or above this value (cm) read as open
    pub open_threshold_cm: f32,

    // --- Timing ---
    /// Sleep at the end of every main-loop iteration (milliseconds)
    pub loop_interval_ms: u32,
    /// Sleep after each failed broker connect attempt (milliseconds)
    pub reconnect_delay_ms: u32,
    /// Minimum gap between telemetry publishes (milliseconds)
    pub telemetry_interval_ms: u32,
    /// Poll interval while waiting for the WiFi station to associate
    pub wifi_poll_interval_ms: u32,
}

fn name(s: &str) -> Name {
    let mut n = Name::new();
    // Every literal below fits; an oversized one would truncate to empty and fail validate().
    let _ = n.push_str(s);
    n
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            // Broker
            broker_host: name("192.168.0.9"),
            broker_port: 1883,
            client_id_prefix: name("DistanceSenso-"),

            // Topics
            state_topic: name("garagedoor"),
            liveness_topic: name("pong"),
            temperature_topic: name("garage_temp"),
            humidity_topic: name("garage_humi"),

            // Detection
            open_threshold_cm: 20.0,

            // Timing
            loop_interval_ms: 900,
            reconnect_delay_ms: 5_000,
            telemetry_interval_ms: 10_000,
            wifi_poll_interval_ms: 500,
        }
    }
}

impl NodeConfig {
    /// Parse a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every field. Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker_host.is_empty() {
            return Err(ConfigError::ValidationFailed("broker_host is empty"));
        }
        if self.broker_port == 0 {
            return Err(ConfigError::ValidationFailed("broker_port must be non-zero"));
        }
        for topic in [
            &self.state_topic,
            &self.liveness_topic,
            &self.temperature_topic,
            &self.humidity_topic,
        ] {
            if topic.is_empty() {
                return Err(ConfigError::ValidationFailed("topic names must be non-empty"));
            }
        }
        if !self.open_threshold_cm.is_finite() {
            return Err(ConfigError::ValidationFailed("open_threshold_cm must be finite"));
        }
        if self.loop_interval_ms == 0
            || self.reconnect_delay_ms == 0
            || self.telemetry_interval_ms == 0
            || self.wifi_poll_interval_ms == 0
        {
            return Err(ConfigError::ValidationFailed("intervals must be non-zero"));
        }
        Ok(())
    }

    /// Broker URL in the form `mqtt://host:port`.
    pub fn broker_url(&self) -> heapless::String<64> {
        let mut url = heapless::String::<64>::new();
        let _ = write!(url, "mqtt://{}:{}", self.broker_host, self.broker_port);
        url
    }
}
