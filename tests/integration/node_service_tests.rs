//! Integration tests for the NodeService tick pipeline:
//! connection → telemetry → sample → publish-on-edge → indicator → sleep.

use crate::mock_hw::{
    FakeClock, Journal, MockBroker, MockHardware, RecordingPin, RecordingSink, SeqTokens, journal,
};

use garagesensor::adapters::hardware::HardwareAdapter;
use garagesensor::adapters::mqtt::MqttLink;
use garagesensor::app::events::AppEvent;
use garagesensor::app::ports::BrokerPort;
use garagesensor::app::service::{NodePhase, NodeService};
use garagesensor::config::NodeConfig;
use garagesensor::detector::DoorState;
use garagesensor::drivers::indicator::IndicatorLeds;
use garagesensor::sensors::climate::ClimateSensor;
use garagesensor::sensors::distance::{DistanceSensor, sim_set_distance_adc};

// Raw counts and what they convert to.
const OPEN_22CM: u16 = 500;
const CLOSED_17CM: u16 = 600;
const OPEN_41CM: u16 = 300;

struct Rig {
    journal: Journal,
    svc: NodeService,
    hw: MockHardware,
    link: MockBroker,
    clock: FakeClock,
    ids: SeqTokens,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let journal = journal();
        let mut sink = RecordingSink::default();
        let mut svc = NodeService::new(NodeConfig::default(), "1:a:ff:0:2:3");
        svc.start(&mut sink);
        Self {
            hw: MockHardware::new(&journal),
            link: MockBroker::new(&journal),
            clock: FakeClock::new(&journal),
            ids: SeqTokens(0xBEEF),
            sink,
            svc,
            journal,
        }
    }

    fn tick(&mut self) {
        self.svc.tick(
            &mut self.hw,
            &mut self.link,
            &mut self.clock,
            &mut self.ids,
            &mut self.sink,
        );
    }

    fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    fn door_payloads(&self) -> Vec<&str> {
        self.link
            .payloads_on("garagedoor")
            .into_iter()
            .filter(|p| *p != "sensor_online")
            .collect()
    }
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn first_tick_announces_online_and_nothing_else() {
    let mut rig = Rig::new();
    rig.tick();

    assert_eq!(
        rig.link.published,
        vec![("garagedoor".to_string(), "sensor_online".to_string())]
    );
    assert!(rig.hw.indicator.is_empty(), "open at boot is not an edge");
    assert_eq!(rig.clock.sleeps, vec![900]);
    assert_eq!(rig.svc.phase(), NodePhase::Connected);
    assert_eq!(rig.link.client_ids, vec!["DistanceSenso-BEEF"]);
    assert!(matches!(rig.sink.events.first(), Some(AppEvent::Started(id)) if id == "1:a:ff:0:2:3"));
}

// ── Door edges ────────────────────────────────────────────────

#[test]
fn closing_publishes_once_and_lights_red() {
    let mut rig = Rig::new();
    rig.hw.queue_raw(&[OPEN_22CM, CLOSED_17CM]);
    rig.ticks(6);

    assert_eq!(rig.door_payloads(), vec!["garage_closed"]);
    assert_eq!(rig.hw.indicator, vec![DoorState::Closed]);
    assert_eq!(rig.svc.door_state(), DoorState::Closed);
}

#[test]
fn close_then_open_sequence_yields_two_edges() {
    let mut rig = Rig::new();
    rig.hw
        .queue_raw(&[OPEN_22CM, OPEN_22CM, CLOSED_17CM, CLOSED_17CM, OPEN_41CM]);
    rig.ticks(5);

    assert_eq!(rig.door_payloads(), vec!["garage_closed", "garage_opened"]);
    assert_eq!(rig.hw.indicator, vec![DoorState::Closed, DoorState::Open]);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::DoorChanged(_))),
        2
    );
}

#[test]
fn edge_publishes_before_driving_indicator() {
    let mut rig = Rig::new();
    rig.hw.queue_raw(&[CLOSED_17CM]);
    rig.tick();

    let j = rig.journal.borrow();
    let publish = j
        .iter()
        .position(|e| e == "publish:garagedoor=garage_closed")
        .unwrap();
    let show = j.iter().position(|e| e == "show:Closed").unwrap();
    assert!(publish < show);
}

#[test]
fn steady_distance_never_republishes() {
    let mut rig = Rig::new();
    rig.hw.queue_raw(&[CLOSED_17CM]);
    rig.ticks(30);

    assert_eq!(rig.door_payloads(), vec!["garage_closed"]);
    assert_eq!(rig.hw.indicator.len(), 1);
    // Only the first tick moved the distance (0 → 17 cm).
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::DistanceChanged(_))),
        1
    );
}

#[test]
fn distance_change_without_state_change_is_logged_only() {
    let mut rig = Rig::new();
    rig.hw.queue_raw(&[OPEN_22CM, OPEN_41CM, OPEN_22CM]);
    rig.ticks(3);

    assert!(rig.door_payloads().is_empty());
    assert!(rig.hw.indicator.is_empty());
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::DistanceChanged(_))),
        3
    );
}

// ── Telemetry cadence ─────────────────────────────────────────

#[test]
fn telemetry_waits_for_interval_then_publishes_in_order() {
    let mut rig = Rig::new();

    // Tick n sees now = (n - 1) * 900 ms; 12 ticks reach 9.9 s.
    rig.ticks(12);
    assert!(rig.link.payloads_on("pong").is_empty());

    // Tick 13 sees 10.8 s.
    rig.tick();
    let telemetry: Vec<_> = rig
        .link
        .published
        .iter()
        .filter(|(t, _)| t != "garagedoor")
        .cloned()
        .collect();
    assert_eq!(
        telemetry,
        vec![
            ("pong".to_string(), "ping".to_string()),
            ("garage_temp".to_string(), "22.50".to_string()),
            ("garage_humi".to_string(), "45.00".to_string()),
        ]
    );

    let j = rig.journal.borrow();
    let humi = j.iter().position(|e| e == "read_humidity").unwrap();
    let temp = j.iter().position(|e| e == "read_temperature").unwrap();
    assert!(humi < temp, "humidity is read first");
}

#[test]
fn telemetry_fires_once_per_interval() {
    let mut rig = Rig::new();
    // 120 ticks span 107.1 s of fake time.
    rig.ticks(120);
    assert_eq!(rig.link.payloads_on("pong").len(), 9);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::Telemetry(_))),
        9
    );
}

#[test]
fn failed_climate_read_is_published_unguarded() {
    let mut rig = Rig::new();
    rig.hw.temperature_c = f32::NAN;
    rig.hw.humidity_pct = f32::NAN;
    rig.ticks(13);

    assert_eq!(rig.link.payloads_on("garage_temp"), vec!["  NaN"]);
    assert_eq!(rig.link.payloads_on("garage_humi"), vec!["  NaN"]);
}

// ── Connection resilience ─────────────────────────────────────

#[test]
fn failed_connects_block_sampling_with_fixed_delay() {
    let mut rig = Rig::new();
    rig.link.fail_next(&[-2, -2, -4]);
    rig.tick();

    assert_eq!(rig.clock.sleeps, vec![5_000, 5_000, 5_000, 900]);
    assert_eq!(rig.link.client_ids.len(), 4);
    assert_eq!(rig.hw.distance_reads, 1);

    let j = rig.journal.borrow();
    let first_read = j.iter().position(|e| e == "read_distance").unwrap();
    let last_retry_sleep = j.iter().rposition(|e| e == "sleep:5000").unwrap();
    assert!(last_retry_sleep < first_read, "no sampling while reconnecting");

    assert_eq!(
        rig.link.payloads_on("garagedoor"),
        vec!["sensor_online"],
        "exactly one announcement"
    );
}

#[test]
fn each_attempt_uses_a_fresh_client_id() {
    let mut rig = Rig::new();
    rig.link.fail_next(&[-2, -2]);
    rig.tick();
    assert_eq!(
        rig.link.client_ids,
        vec!["DistanceSenso-BEEF", "DistanceSenso-BEF0", "DistanceSenso-BEF1"]
    );
}

#[test]
fn dropped_session_is_restored_and_reannounced() {
    let mut rig = Rig::new();
    rig.ticks(2);
    rig.link.drop_session();
    rig.link.fail_next(&[-3]);
    rig.tick();

    assert_eq!(
        rig.link.payloads_on("garagedoor"),
        vec!["sensor_online", "sensor_online"]
    );
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::ConnectionLost)),
        1
    );
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::Connected { attempts: 2, .. }
    )));
    assert_eq!(rig.svc.phase(), NodePhase::Connected);
    assert_eq!(rig.svc.connection().sessions(), 2);
}

#[test]
fn session_loss_walks_through_disconnected() {
    let mut rig = Rig::new();
    rig.ticks(2);
    rig.link.drop_session();
    rig.tick();

    let phases: Vec<(NodePhase, NodePhase)> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::PhaseChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            (NodePhase::Booting, NodePhase::ConnectingBroker),
            (NodePhase::ConnectingBroker, NodePhase::Connected),
            (NodePhase::Connected, NodePhase::Disconnected),
            (NodePhase::Disconnected, NodePhase::ConnectingBroker),
            (NodePhase::ConnectingBroker, NodePhase::Connected),
        ]
    );
}

#[test]
fn dropped_publishes_do_not_stop_the_indicator() {
    let mut rig = Rig::new();
    rig.tick();
    rig.link.reject_publish = true;
    rig.hw.queue_raw(&[CLOSED_17CM]);
    rig.tick();

    assert_eq!(rig.hw.indicator, vec![DoorState::Closed]);
    assert_eq!(rig.svc.publish_failures(), 1);
    assert!(rig.link.is_connected());
}

// ── Real adapters in simulation ───────────────────────────────

#[test]
fn simulated_node_drives_leds_from_distance() {
    let journal = journal();
    let red = RecordingPin::default();
    let green = RecordingPin::default();
    let mut hw = HardwareAdapter::new(
        DistanceSensor::new(garagesensor::pins::DISTANCE_ADC_CHANNEL),
        ClimateSensor::new(),
        IndicatorLeds::new(red.clone(), green.clone()),
    );
    let mut link = MqttLink::new(&NodeConfig::default().broker_url());
    let mut clock = FakeClock::new(&journal);
    let mut ids = SeqTokens(1);
    let mut sink = RecordingSink::default();
    let mut svc = NodeService::new(NodeConfig::default(), "de:ad:be:ef:a:5");
    svc.start(&mut sink);

    sim_set_distance_adc(CLOSED_17CM);
    svc.tick(&mut hw, &mut link, &mut clock, &mut ids, &mut sink);
    assert!(red.is_high());
    assert!(!green.is_high());
    assert_eq!(hw.shown_door(), Some(DoorState::Closed));

    sim_set_distance_adc(OPEN_41CM);
    svc.tick(&mut hw, &mut link, &mut clock, &mut ids, &mut sink);
    assert!(!red.is_high());
    assert!(green.is_high());

    sim_set_distance_adc(OPEN_22CM);

    let door: Vec<&str> = link
        .sim_published()
        .iter()
        .filter(|(t, _)| t == "garagedoor")
        .map(|(_, p)| p.as_str())
        .collect();
    assert_eq!(door, vec!["sensor_online", "garage_closed", "garage_opened"]);
}
