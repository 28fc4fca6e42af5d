//! IR distance sensor (analog output, inverse-power response).
//!
//! The sensor's output voltage falls roughly with the inverse of distance.
//! A single power-law fit maps one raw ADC count to centimetres:
//!
//! ```text
//! cm = round(10650.08 * raw^-0.935 - 10)
//! ```
//!
//! No clamping and no rejection: a zero count yields `+inf` and a count
//! past the curve's range goes negative. Both pass through unchanged.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads its ADC1 channel via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_DISTANCE_ADC: AtomicU16 = AtomicU16::new(500);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_distance_adc(raw: u16) {
    SIM_DISTANCE_ADC.store(raw, Ordering::Relaxed);
}

const CURVE_GAIN: f32 = 10_650.08;
const CURVE_EXPONENT: f32 = -0.935;
const CURVE_OFFSET_CM: f32 = 10.0;

/// Convert one raw count to a distance in whole centimetres.
pub fn distance_cm(raw: u16) -> f32 {
    (CURVE_GAIN * f32::from(raw).powf(CURVE_EXPONENT) - CURVE_OFFSET_CM).round()
}

/// One tick's reading: the raw count and the derived distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceSample {
    pub raw: u16,
    pub distance_cm: f32,
}

impl DistanceSample {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            raw,
            distance_cm: distance_cm(raw),
        }
    }
}

pub struct DistanceSensor {
    channel: u32,
}

impl DistanceSensor {
    /// `channel` is the ADC1 channel, normally `pins::DISTANCE_ADC_CHANNEL`.
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }

    /// One raw count, already scaled to the curve's 10-bit domain.
    pub fn read_raw(&self) -> u16 {
        self.read_adc()
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(self.channel) >> crate::pins::DISTANCE_ADC_SHIFT
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_DISTANCE_ADC.load(Ordering::Relaxed)
    }
}
