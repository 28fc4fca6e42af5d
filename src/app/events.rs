//! Outbound application events.
//!
//! The [`NodeService`](super::service::NodeService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. They are diagnostics only;
//! broker traffic goes through the [`Publisher`](crate::publisher::Publisher).

use crate::app::ports::BrokerError;
use crate::app::service::NodePhase;
use crate::connection::ClientId;
use crate::detector::DoorState;
use crate::sensors::distance::DistanceSample;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The node service started (carries the device identity).
    Started(heapless::String<24>),

    /// A connect attempt is about to run.
    Connecting(ClientId),

    /// A connect attempt failed; a fixed delay follows.
    ConnectFailed { client_id: ClientId, error: BrokerError },

    /// The broker session is up and `sensor_online` was announced.
    Connected { client_id: ClientId, attempts: u32 },

    /// The session was found down at the start of a tick.
    ConnectionLost,

    /// The process lifecycle moved on. `Disconnected` is only ever seen
    /// here, since reconnecting starts within the same tick.
    PhaseChanged { from: NodePhase, to: NodePhase },

    /// The distance differs from the previous tick's distance.
    DistanceChanged(DistanceSample),

    /// The door state flipped.
    DoorChanged(DoorState),

    /// A telemetry cycle ran.
    Telemetry(TelemetryReading),
}

/// One environmental read. Either value may be NaN after a failed read.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}
