//! Unified error types for the garage sensor firmware.
//!
//! Subsystems keep their own typed errors (broker, config, sensor, WiFi,
//! peripheral init); every one of them converts into [`Error`] so the boot
//! path in `main` can propagate with `?`.

use core::fmt;

use crate::adapters::wifi::ConnectivityError;
use crate::app::ports::{BrokerError, ConfigError};
use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned a corrupt frame.
    Sensor(SensorError),
    /// The broker link failed.
    Broker(BrokerError),
    /// WiFi station setup failed.
    Wifi(ConnectivityError),
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Broker(e) => write!(f, "broker: {e}"),
            Self::Wifi(e) => write!(f, "wifi: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor never answered the start signal.
    NoResponse,
    /// A bit pulse exceeded its timing window.
    Timeout,
    /// The 40-bit frame checksum did not match.
    ChecksumMismatch,
    /// GPIO read or write returned an error.
    PinFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no response"),
            Self::Timeout => write!(f, "pulse timeout"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::PinFailed => write!(f, "GPIO access failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

impl From<BrokerError> for Error {
    fn from(e: BrokerError) -> Self {
        Self::Broker(e)
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Wifi(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_subsystem() {
        let e: Error = SensorError::ChecksumMismatch.into();
        assert_eq!(e.to_string(), "sensor: checksum mismatch");

        let e: Error = BrokerError::ConnectFailed(-2).into();
        assert_eq!(e.to_string(), "broker: connect failed, rc=-2");
    }
}
