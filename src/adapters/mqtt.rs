//! MQTT broker adapter.
//!
//! Implements [`BrokerPort`] over `esp-idf-svc`'s MQTT client. A new
//! client is created for every connect attempt so each attempt carries its
//! own client identifier; the previous client (if any) is dropped first.
//! Connection state is tracked through the client's event callback.
//!
//! Publishes are enqueued at QoS 0 without retain: no acknowledgement is
//! tracked, matching the fire-and-forget contract of the port.
//!
//! Keep-alives run on the esp-mqtt network task, so the main loop has
//! nothing to pump. The client's own auto-reconnect is switched off: a
//! dropped session stays down until [`ConnectionManager`] opens a new one
//! with a fresh identifier and the online announcement.
//!
//! [`ConnectionManager`]: crate::connection::ConnectionManager
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `EspMqttClient` over TCP.
//! - **all other targets**: in-memory broker for host-side simulation.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};

use crate::app::ports::{BrokerError, BrokerPort};

#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::FreeRtos;
#[cfg(target_os = "espidf")]
use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};

/// How long a single attempt waits for the broker's CONNACK.
pub const CONNECT_TIMEOUT_MS: u32 = 5_000;

const CONNECT_POLL_MS: u32 = 100;

pub struct MqttLink {
    url: heapless::String<64>,
    connected: Arc<AtomicBool>,
    #[cfg(target_os = "espidf")]
    client: Option<EspMqttClient<'static>>,
    /// Simulation: whether connect attempts succeed.
    #[cfg(not(target_os = "espidf"))]
    sim_reachable: bool,
    /// Simulation: everything published, in order.
    #[cfg(not(target_os = "espidf"))]
    sim_published: Vec<(String, String)>,
}

impl MqttLink {
    pub fn new(url: &str) -> Self {
        let mut u = heapless::String::new();
        if u.push_str(url).is_err() {
            warn!("MQTT: broker URL '{}' truncated to nothing", url);
        }
        Self {
            url: u,
            connected: Arc::new(AtomicBool::new(false)),
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(not(target_os = "espidf"))]
            sim_reachable: true,
            #[cfg(not(target_os = "espidf"))]
            sim_published: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Simulation: make the broker reachable or not. Going unreachable
    /// drops the current session.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_reachable(&mut self, reachable: bool) {
        self.sim_reachable = reachable;
        if !reachable {
            self.connected.store(false, Ordering::SeqCst);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_published(&self) -> &[(String, String)] {
        &self.sim_published
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, client_id: &str) -> Result<(), BrokerError> {
        // Release the old socket before opening a new one.
        self.client = None;

        let conf = MqttClientConfiguration {
            client_id: Some(client_id),
            keep_alive_interval: Some(core::time::Duration::from_secs(15)),
            network_timeout: core::time::Duration::from_secs(2),
            disable_auto_reconnect: true,
            ..Default::default()
        };

        let flag = Arc::new(AtomicBool::new(false));
        let cb_flag = flag.clone();
        let client = EspMqttClient::new_cb(&self.url, &conf, move |event| match event.payload() {
            EventPayload::Connected(_) => cb_flag.store(true, Ordering::SeqCst),
            EventPayload::Disconnected => cb_flag.store(false, Ordering::SeqCst),
            EventPayload::Error(e) => warn!("MQTT: error event: {:?}", e),
            _ => {}
        })
        .map_err(|e| {
            warn!("MQTT: client creation failed ({})", e);
            BrokerError::ConnectFailed(-2)
        })?;

        let start = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        let timeout_us = i64::from(CONNECT_TIMEOUT_MS) * 1_000;
        while !flag.load(Ordering::SeqCst) {
            if unsafe { esp_idf_svc::sys::esp_timer_get_time() } - start > timeout_us {
                return Err(BrokerError::Timeout);
            }
            FreeRtos::delay_ms(CONNECT_POLL_MS);
        }

        self.connected = flag;
        self.client = Some(client);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, _client_id: &str) -> Result<(), BrokerError> {
        if !self.sim_reachable {
            return Err(BrokerError::ConnectFailed(-2));
        }
        self.connected = Arc::new(AtomicBool::new(true));
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_publish(&mut self, topic: &str, payload: &str) -> Result<(), BrokerError> {
        let client = self.client.as_mut().ok_or(BrokerError::NotConnected)?;
        client
            .enqueue(topic, QoS::AtMostOnce, false, payload.as_bytes())
            .map(|_| ())
            .map_err(|_| BrokerError::PublishFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_publish(&mut self, topic: &str, payload: &str) -> Result<(), BrokerError> {
        self.sim_published.push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

impl BrokerPort for MqttLink {
    fn connect(&mut self, client_id: &str) -> Result<(), BrokerError> {
        self.connected.store(false, Ordering::SeqCst);
        self.platform_connect(client_id)?;
        info!("MQTT: session open at {} as {}", self.url, client_id);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), BrokerError> {
        if !self.is_connected() {
            return Err(BrokerError::NotConnected);
        }
        self.platform_publish(topic, payload)
    }
}
