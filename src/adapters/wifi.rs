//! WiFi station-mode adapter.
//!
//! Joins the configured access point once at boot and blocks until the
//! station has an IP address. Association loss after boot is not handled
//! here; only the broker layer reconnects.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.

use core::fmt;
use log::{info, warn};

use crate::app::ports::ClockPort;

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    /// The WiFi driver could not be created or configured.
    DriverFailed,
    /// Associated, but the interface never came up.
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::DriverFailed => write!(f, "WiFi driver setup failed"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectivityError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Station
// ───────────────────────────────────────────────────────────────

pub struct WifiStation {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    polls: u32,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    /// Simulation: failed association polls before the join succeeds.
    #[cfg(not(target_os = "espidf"))]
    sim_pending_polls: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_connected: bool,
}

impl WifiStation {
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: esp_idf_hal::modem::Modem,
        sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
        nvs: Option<esp_idf_svc::nvs::EspDefaultNvsPartition>,
    ) -> Result<Self, ConnectivityError> {
        let driver =
            EspWifi::new(modem, sysloop.clone(), nvs).map_err(|_| ConnectivityError::DriverFailed)?;
        let wifi = BlockingWifi::wrap(driver, sysloop).map_err(|_| ConnectivityError::DriverFailed)?;
        Ok(Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            polls: 0,
            wifi,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            polls: 0,
            sim_pending_polls: 0,
            sim_connected: false,
        }
    }

    /// Simulation: make the next join poll `polls` times before associating.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_association_delay(&mut self, polls: u32) {
        self.sim_pending_polls = polls;
    }

    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password.push_str(password).map_err(|_| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials set (SSID='{}')", self.ssid);
        Ok(())
    }

    /// Join the access point, polling every `poll_interval_ms` until
    /// associated. Never gives up on association.
    pub fn join(
        &mut self,
        clock: &mut impl ClockPort,
        poll_interval_ms: u32,
    ) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        info!("Connecting to {}", self.ssid);
        self.platform_start()?;

        self.polls = 0;
        while !self.platform_try_associate() {
            self.polls = self.polls.saturating_add(1);
            if self.polls % 20 == 0 {
                warn!("WiFi: still waiting for '{}' ({} polls)", self.ssid, self.polls);
            }
            clock.sleep_ms(poll_interval_ms);
        }

        self.platform_wait_up()
    }

    /// Association polls taken by the last join.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> Result<(), ConnectivityError> {
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: self.ssid.as_str().try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });
        self.wifi
            .set_configuration(&config)
            .map_err(|_| ConnectivityError::DriverFailed)?;
        self.wifi.start().map_err(|_| ConnectivityError::DriverFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) -> Result<(), ConnectivityError> {
        info!("WiFi(sim): STA started");
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_try_associate(&mut self) -> bool {
        self.wifi.connect().is_ok()
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_try_associate(&mut self) -> bool {
        if self.sim_pending_polls > 0 {
            self.sim_pending_polls -= 1;
            return false;
        }
        self.sim_connected = true;
        true
    }

    #[cfg(target_os = "espidf")]
    fn platform_wait_up(&mut self) -> Result<(), ConnectivityError> {
        self.wifi
            .wait_netif_up()
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        match self.wifi.wifi().sta_netif().get_ip_info() {
            Ok(ip) => info!("WiFi connected, IP address: {}", ip.ip),
            Err(_) => info!("WiFi connected"),
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_wait_up(&mut self) -> Result<(), ConnectivityError> {
        info!("WiFi(sim): connected to '{}' after {} polls", self.ssid, self.polls);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    pub fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn is_connected(&self) -> bool {
        self.sim_connected
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiStation {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
