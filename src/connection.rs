//! Broker connection resilience.
//!
//! ```text
//!        ┌──────────────┐  connect()  ┌────────────┐   Ok   ┌───────────┐
//!   ───▶ │ Disconnected │ ──────────▶ │ Connecting │ ─────▶ │ Connected │
//!        └──────────────┘             └────────────┘        └─────┬─────┘
//!               ▲                          │ Err                  │ link down
//!               │     sleep(reconnect)     │                      │
//!               └──────────────────────────┘◀─────────────────────┘
//! ```
//!
//! [`ConnectionManager::ensure_connected`] blocks the caller until the
//! broker session is up. There is no retry cap, no backoff and no jitter;
//! each attempt uses a fresh client identifier and every failure is
//! followed by the same fixed delay. While it blocks, nothing else on the
//! node runs: sampling, telemetry and the indicator all wait.
//!
//! [`ConnectionManager::step`] is the single-attempt building block for
//! callers that need to interleave other work between attempts.

use core::fmt::Write;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{BrokerError, BrokerPort, ClockPort, EventSink, TokenSource};

/// Per-attempt MQTT client identifier.
pub type ClientId = heapless::String<40>;

/// Announcement published to the state topic after every (re)connect.
pub const SENSOR_ONLINE: &str = "sensor_online";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

pub struct ConnectionManager {
    client_id_prefix: heapless::String<32>,
    state_topic: heapless::String<32>,
    reconnect_delay_ms: u32,
    state: ConnectionState,
    last_failure: Option<BrokerError>,
    sessions: u32,
}

impl ConnectionManager {
    pub fn new(client_id_prefix: &str, state_topic: &str, reconnect_delay_ms: u32) -> Self {
        let mut prefix = heapless::String::new();
        let _ = prefix.push_str(client_id_prefix);
        let mut topic = heapless::String::new();
        let _ = topic.push_str(state_topic);
        Self {
            client_id_prefix: prefix,
            state_topic: topic,
            reconnect_delay_ms,
            state: ConnectionState::Disconnected,
            last_failure: None,
            sessions: 0,
        }
    }

    /// `prefix` followed by the token in uppercase hex, unpadded.
    pub fn client_id(&self, token: u16) -> ClientId {
        let mut id = ClientId::new();
        let _ = write!(id, "{}{:X}", self.client_id_prefix, token);
        id
    }

    /// One connect attempt. On success the online announcement has been
    /// published to the state topic.
    pub fn step(
        &mut self,
        link: &mut impl BrokerPort,
        ids: &mut impl TokenSource,
        sink: &mut impl EventSink,
    ) -> Result<ClientId, BrokerError> {
        let client_id = self.client_id(ids.next_token());
        self.state = ConnectionState::Connecting;
        sink.emit(&AppEvent::Connecting(client_id.clone()));
        info!("Attempting MQTT connection as {}...", client_id);

        match link.connect(&client_id) {
            Ok(()) => {
                self.state = ConnectionState::Connected;
                self.last_failure = None;
                self.sessions = self.sessions.wrapping_add(1);
                info!("MQTT connected");
                if let Err(e) = link.publish(&self.state_topic, SENSOR_ONLINE) {
                    warn!("MQTT: online announcement not sent ({})", e);
                }
                Ok(client_id)
            }
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                self.last_failure = Some(e);
                sink.emit(&AppEvent::ConnectFailed {
                    client_id,
                    error: e,
                });
                Err(e)
            }
        }
    }

    /// Block until the broker session is up. Returns the number of attempts
    /// made, zero when the link was already connected.
    pub fn ensure_connected(
        &mut self,
        link: &mut impl BrokerPort,
        clock: &mut impl ClockPort,
        ids: &mut impl TokenSource,
        sink: &mut impl EventSink,
    ) -> u32 {
        if link.is_connected() {
            self.state = ConnectionState::Connected;
            return 0;
        }

        if self.state == ConnectionState::Connected {
            warn!("MQTT: connection lost");
            sink.emit(&AppEvent::ConnectionLost);
        }
        self.state = ConnectionState::Disconnected;

        let mut attempts: u32 = 0;
        while !link.is_connected() {
            attempts = attempts.saturating_add(1);
            match self.step(link, ids, sink) {
                Ok(client_id) => {
                    sink.emit(&AppEvent::Connected {
                        client_id,
                        attempts,
                    });
                    break;
                }
                Err(e) => {
                    warn!(
                        "MQTT: failed, rc={} try again in {} seconds",
                        e.code(),
                        self.reconnect_delay_ms / 1000
                    );
                    clock.sleep_ms(self.reconnect_delay_ms);
                }
            }
        }
        attempts
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Most recent connect failure, cleared on success.
    pub fn last_failure(&self) -> Option<BrokerError> {
        self.last_failure
    }

    /// Successful sessions since boot.
    pub fn sessions(&self) -> u32 {
        self.sessions
    }
}
