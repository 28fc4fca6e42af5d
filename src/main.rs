//! Garage Sensor Firmware: Main Entry Point
//!
//! Single-threaded polling node: join WiFi, then loop forever over
//! connect → telemetry → sample → publish-on-edge → sleep.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter     MqttLink      Esp32Time    LogEventSink   │
//! │  (Distance+Climate   (Broker)      (Clock)      (EventSink)    │
//! │   +Indicator)        RandomTokens  WifiStation  device_id      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              NodeService (pure logic)                  │    │
//! │  │  Detector · TelemetryScheduler · Connection · Publish  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::gpio::{IOPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use garagesensor::adapters::device_id;
use garagesensor::adapters::entropy::RandomTokens;
use garagesensor::adapters::hardware::HardwareAdapter;
use garagesensor::adapters::log_sink::LogEventSink;
use garagesensor::adapters::mqtt::MqttLink;
use garagesensor::adapters::time::Esp32TimeAdapter;
use garagesensor::adapters::wifi::WifiStation;
use garagesensor::app::service::NodeService;
use garagesensor::config::NodeConfig;
use garagesensor::drivers::hw_init;
use garagesensor::drivers::indicator::IndicatorLeds;
use garagesensor::error::Error;
use garagesensor::pins;
use garagesensor::sensors::climate::ClimateSensor;
use garagesensor::sensors::distance::DistanceSensor;

/// Build-time config override (JSON, any subset of `NodeConfig` fields).
fn load_config() -> NodeConfig {
    match option_env!("GARAGE_NODE_CONFIG") {
        None => NodeConfig::default(),
        Some(json) => match NodeConfig::from_json(json) {
            Ok(cfg) => {
                info!("Config: build-time override applied");
                cfg
            }
            Err(e) => {
                warn!("Config: override rejected ({}), using defaults", e);
                NodeConfig::default()
            }
        },
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GarageSensor v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = load_config();
    config.validate().map_err(Error::from)?;

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(Error::from)?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let red = PinDriver::output(peripherals.pins.gpio11)?;
    let green = PinDriver::output(peripherals.pins.gpio12)?;
    let dht_line = PinDriver::input_output_od(peripherals.pins.gpio6.downgrade())?;
    info!(
        "Pins: distance=GPIO{} dht=GPIO{} red=GPIO{} green=GPIO{}",
        pins::DISTANCE_ADC_GPIO,
        pins::DHT_GPIO,
        pins::LED_RED_GPIO,
        pins::LED_GREEN_GPIO
    );

    let mut hw = HardwareAdapter::new(
        DistanceSensor::new(pins::DISTANCE_ADC_CHANNEL),
        ClimateSensor::new(dht_line),
        IndicatorLeds::new(red, green),
    );

    // ── 3. Network ────────────────────────────────────────────
    let mut clock = Esp32TimeAdapter::new();
    let mut wifi = WifiStation::new(peripherals.modem, sysloop, Some(nvs)).map_err(Error::from)?;
    wifi.set_credentials(
        option_env!("WIFI_SSID").unwrap_or(""),
        option_env!("WIFI_PASS").unwrap_or(""),
    )
    .map_err(Error::from)?;
    wifi.join(&mut clock, config.wifi_poll_interval_ms)
        .map_err(Error::from)?;

    let identity = device_id::device_identity();
    info!("MAC address: {}", identity);

    // ── 4. Service ────────────────────────────────────────────
    let mut link = MqttLink::new(&config.broker_url());
    let mut ids = RandomTokens::new();
    let mut sink = LogEventSink::new();
    let mut service = NodeService::new(config, &identity);
    service.start(&mut sink);

    info!("System ready. Entering main loop.");

    // ── 5. Main loop ──────────────────────────────────────────
    loop {
        service.tick(&mut hw, &mut link, &mut clock, &mut ids, &mut sink);
    }
}
