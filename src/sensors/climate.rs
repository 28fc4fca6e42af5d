//! Humidity / temperature channel backed by the DHT22.
//!
//! Presents the sensor as an opaque read channel: each accessor returns an
//! `f32`, or NaN when the underlying conversion failed. Humidity and
//! temperature are read independently; the driver's two-second cache means
//! back-to-back calls share one conversion.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the DHT22 over an open-drain `PinDriver`.
//! On host/test: reads from static `AtomicU32`s (f32 bit patterns) for
//! injection; store NaN to simulate a failed read.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::dht22::Dht22;
#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::Ets;
#[cfg(target_os = "espidf")]
use esp_idf_hal::gpio::{AnyIOPin, InputOutput, PinDriver};

#[cfg(not(target_os = "espidf"))]
static SIM_TEMPERATURE_BITS: AtomicU32 = AtomicU32::new(0x41B4_0000); // 22.5
#[cfg(not(target_os = "espidf"))]
static SIM_HUMIDITY_BITS: AtomicU32 = AtomicU32::new(0x4234_0000); // 45.0

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(temperature_c: f32, humidity_pct: f32) {
    SIM_TEMPERATURE_BITS.store(temperature_c.to_bits(), Ordering::Relaxed);
    SIM_HUMIDITY_BITS.store(humidity_pct.to_bits(), Ordering::Relaxed);
}

#[cfg(target_os = "espidf")]
type DhtLine = PinDriver<'static, AnyIOPin, InputOutput>;

pub struct ClimateSensor {
    #[cfg(target_os = "espidf")]
    dht: Dht22<DhtLine, Ets>,
}

impl ClimateSensor {
    #[cfg(target_os = "espidf")]
    pub fn new(line: DhtLine) -> Self {
        Self {
            dht: Dht22::new(line, Ets),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {}
    }

    #[cfg(target_os = "espidf")]
    pub fn humidity_pct(&mut self) -> f32 {
        self.dht
            .read(crate::adapters::time::uptime_us())
            .map_or(f32::NAN, |m| m.humidity_pct)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn humidity_pct(&mut self) -> f32 {
        f32::from_bits(SIM_HUMIDITY_BITS.load(Ordering::Relaxed))
    }

    #[cfg(target_os = "espidf")]
    pub fn temperature_c(&mut self) -> f32 {
        self.dht
            .read(crate::adapters::time::uptime_us())
            .map_or(f32::NAN, |m| m.temperature_c)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn temperature_c(&mut self) -> f32 {
        f32::from_bits(SIM_TEMPERATURE_BITS.load(Ordering::Relaxed))
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for ClimateSensor {
    fn default() -> Self {
        Self::new()
    }
}
