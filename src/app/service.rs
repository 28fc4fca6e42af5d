//! Application service: the hexagonal core.
//!
//! [`NodeService`] owns the door detector, the telemetry scheduler, the
//! connection manager and the publisher. It exposes a clean,
//! hardware-agnostic API. All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  DistancePort ──▶ ┌──────────────────────────────┐ ──▶ BrokerPort
//!   ClimatePort ──▶ │          NodeService          │ ──▶ EventSink
//! IndicatorPort ◀── │ Detector · Scheduler · Link   │ ◀── ClockPort
//!                   └──────────────────────────────┘
//! ```
//!
//! One [`tick`](NodeService::tick) is one main-loop iteration:
//!
//! 1. block until the broker session is up
//! 2. telemetry, if the cadence gate fires
//! 3. sample distance, infer door state, act on an edge
//! 4. sleep the loop interval

use log::info;

use crate::config::NodeConfig;
use crate::connection::ConnectionManager;
use crate::detector::{DoorState, StateDetector};
use crate::publisher::Publisher;
use crate::scheduler::TelemetryScheduler;
use crate::sensors::distance::DistanceSample;

use super::events::{AppEvent, TelemetryReading};
use super::ports::{
    BrokerPort, ClimatePort, ClockPort, DistancePort, EventSink, IndicatorPort, TokenSource,
};

/// Process-level lifecycle.
///
/// ```text
/// Booting ─▶ ConnectingBroker ─▶ Connected ─▶ Disconnected ─▶ ConnectingBroker ...
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePhase {
    /// Before [`NodeService::start`]; the WiFi join happens here.
    Booting,
    ConnectingBroker,
    /// Sampling and telemetry run only in this phase.
    Connected,
    /// Session found down; reported through `AppEvent::PhaseChanged`.
    Disconnected,
}

// ───────────────────────────────────────────────────────────────
// NodeService
// ───────────────────────────────────────────────────────────────

pub struct NodeService {
    config: NodeConfig,
    identity: heapless::String<24>,
    detector: StateDetector,
    scheduler: TelemetryScheduler,
    connection: ConnectionManager,
    publisher: Publisher,
    phase: NodePhase,
    tick_count: u64,
}

impl NodeService {
    /// Construct the service. `identity` is the formatted device MAC.
    pub fn new(config: NodeConfig, identity: &str) -> Self {
        let mut id = heapless::String::new();
        let _ = id.push_str(identity);
        Self {
            detector: StateDetector::new(config.open_threshold_cm),
            scheduler: TelemetryScheduler::new(config.telemetry_interval_ms),
            connection: ConnectionManager::new(
                &config.client_id_prefix,
                &config.state_topic,
                config.reconnect_delay_ms,
            ),
            publisher: Publisher::new(&config),
            config,
            identity: id,
            phase: NodePhase::Booting,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Leave `Booting`. Call once the network interface is up.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.identity.clone()));
        self.enter(NodePhase::ConnectingBroker, sink);
        info!("NodeService started (device {})", self.identity);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full loop iteration, including the trailing sleep.
    ///
    /// `hw` satisfies all three hardware ports so a single adapter can
    /// own every peripheral without a double mutable borrow.
    pub fn tick(
        &mut self,
        hw: &mut (impl DistancePort + ClimatePort + IndicatorPort),
        link: &mut impl BrokerPort,
        clock: &mut impl ClockPort,
        ids: &mut impl TokenSource,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Connectivity. Blocks the whole node until the broker is back.
        if !link.is_connected() {
            if self.phase == NodePhase::Connected {
                self.enter(NodePhase::Disconnected, sink);
            }
            self.enter(NodePhase::ConnectingBroker, sink);
            self.connection.ensure_connected(link, clock, ids, sink);
        }
        self.enter(NodePhase::Connected, sink);

        // 2. Telemetry cadence
        if self.scheduler.tick(clock.now_ms()) {
            let humidity_pct = hw.read_humidity();
            let temperature_c = hw.read_temperature();
            let reading = TelemetryReading {
                temperature_c,
                humidity_pct,
            };
            self.publisher.publish_telemetry(link, &reading);
            sink.emit(&AppEvent::Telemetry(reading));
        }

        // 3. Door state
        let sample = DistanceSample::from_raw(hw.read_distance_raw());
        let detection = self.detector.update(sample.distance_cm);
        if detection.distance_changed {
            sink.emit(&AppEvent::DistanceChanged(sample));
        }
        if detection.changed {
            self.publisher.publish_door(link, detection.state);
            hw.show_door(detection.state);
            sink.emit(&AppEvent::DoorChanged(detection.state));
        }

        // 4. Pace
        clock.sleep_ms(self.config.loop_interval_ms);
    }

    fn enter(&mut self, to: NodePhase, sink: &mut impl EventSink) {
        if self.phase == to {
            return;
        }
        let from = self.phase;
        self.phase = to;
        sink.emit(&AppEvent::PhaseChanged { from, to });
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> NodePhase {
        self.phase
    }

    /// Door state as of the last tick (`Open` before the first).
    pub fn door_state(&self) -> DoorState {
        self.detector.state()
    }

    /// Total loop iterations since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Publishes dropped since boot.
    pub fn publish_failures(&self) -> u32 {
        self.publisher.failures()
    }
}
