//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the distance sensor, the climate sensor and the indicator LEDs,
//! exposing them through [`DistancePort`], [`ClimatePort`] and
//! [`IndicatorPort`]. This is the only module in the system that touches
//! actual hardware. On non-espidf targets, the sensors use cfg-gated
//! simulation stubs and the LEDs can be any `embedded-hal` output pin.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{ClimatePort, DistancePort, IndicatorPort};
use crate::detector::DoorState;
use crate::drivers::indicator::IndicatorLeds;
use crate::sensors::climate::ClimateSensor;
use crate::sensors::distance::DistanceSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<R, G> {
    distance: DistanceSensor,
    climate: ClimateSensor,
    leds: IndicatorLeds<R, G>,
}

impl<R: OutputPin, G: OutputPin> HardwareAdapter<R, G> {
    pub fn new(distance: DistanceSensor, climate: ClimateSensor, leds: IndicatorLeds<R, G>) -> Self {
        Self {
            distance,
            climate,
            leds,
        }
    }

    pub fn shown_door(&self) -> Option<DoorState> {
        self.leds.current()
    }
}

// ── Sensor ports ──────────────────────────────────────────────

impl<R, G> DistancePort for HardwareAdapter<R, G> {
    fn read_distance_raw(&mut self) -> u16 {
        self.distance.read_raw()
    }
}

impl<R, G> ClimatePort for HardwareAdapter<R, G> {
    fn read_humidity(&mut self) -> f32 {
        self.climate.humidity_pct()
    }

    fn read_temperature(&mut self) -> f32 {
        self.climate.temperature_c()
    }
}

// ── Indicator port ────────────────────────────────────────────

impl<R: OutputPin, G: OutputPin> IndicatorPort for HardwareAdapter<R, G> {
    fn show_door(&mut self, state: DoorState) {
        self.leds.show(state);
    }
}
