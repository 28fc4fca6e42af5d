//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | T={:.2}\u{00b0}C | RH={:.2}%",
                    t.temperature_c, t.humidity_pct
                );
            }
            AppEvent::DistanceChanged(sample) => {
                info!(
                    "DIST | raw={} | distance={}cm",
                    sample.raw, sample.distance_cm
                );
            }
            AppEvent::DoorChanged(state) => {
                info!("DOOR | {:?} ({})", state, state.payload());
            }
            AppEvent::Connecting(client_id) => {
                info!("LINK | connecting as {}", client_id);
            }
            AppEvent::ConnectFailed { client_id, error } => {
                warn!("LINK | {} failed, rc={}", client_id, error.code());
            }
            AppEvent::Connected {
                client_id,
                attempts,
            } => {
                info!("LINK | up as {} after {} attempt(s)", client_id, attempts);
            }
            AppEvent::ConnectionLost => {
                warn!("LINK | session lost, sampling halted until reconnect");
            }
            AppEvent::PhaseChanged { from, to } => {
                debug!("PHASE | {:?} -> {:?}", from, to);
            }
            AppEvent::Started(identity) => {
                info!("START | device={}", identity);
            }
        }
    }
}
