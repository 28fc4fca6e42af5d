//! Door indicator LEDs.
//!
//! Two discrete LEDs, exactly one lit at a time: green while the door is
//! open, red while it is closed. Generic over `embedded-hal` output pins;
//! on target these are `esp-idf-hal` `PinDriver`s.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::detector::DoorState;

pub struct IndicatorLeds<R, G> {
    red: R,
    green: G,
    current: Option<DoorState>,
}

impl<R: OutputPin, G: OutputPin> IndicatorLeds<R, G> {
    /// Both LEDs start dark; nothing is shown until the first edge.
    pub fn new(mut red: R, mut green: G) -> Self {
        let _ = red.set_low();
        let _ = green.set_low();
        Self {
            red,
            green,
            current: None,
        }
    }

    pub fn show(&mut self, state: DoorState) {
        let open = state == DoorState::Open;
        // Drop the outgoing LED first so both are never lit together.
        let ok = if open {
            self.red.set_low().is_ok() & self.green.set_high().is_ok()
        } else {
            self.green.set_low().is_ok() & self.red.set_high().is_ok()
        };
        if !ok {
            warn!("Indicator: GPIO write failed while showing {:?}", state);
        }
        self.current = Some(state);
    }

    /// Last state shown, `None` before the first edge.
    pub fn current(&self) -> Option<DoorState> {
        self.current
    }
}
