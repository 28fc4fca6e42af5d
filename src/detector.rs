//! Door state inference.
//!
//! The door is `Open` when the measured distance is at least the threshold
//! (20 cm by default) and `Closed` otherwise. There is no hysteresis band
//! and no smoothing: a single sample on either side of the threshold flips
//! the state.
//!
//! The detector remembers the previous state and distance. Both are
//! overwritten on every update, changed or not, and both start at boot
//! values (`Open`, 0 cm) so the very first tick publishes nothing while the
//! door really is open.

/// Binary door state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Open,
    Closed,
}

impl DoorState {
    /// Payload published to the state topic on an edge into this state.
    pub const fn payload(self) -> &'static str {
        match self {
            Self::Open => "garage_opened",
            Self::Closed => "garage_closed",
        }
    }

    pub fn from_distance(distance_cm: f32, threshold_cm: f32) -> Self {
        if distance_cm >= threshold_cm {
            Self::Open
        } else {
            Self::Closed
        }
    }
}

/// Result of one [`StateDetector::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub state: DoorState,
    /// `state` differs from the previous update's state.
    pub changed: bool,
    /// Raw distance differs from the previous update's distance.
    /// Diagnostic only; independent of `changed`.
    pub distance_changed: bool,
}

pub struct StateDetector {
    threshold_cm: f32,
    previous_state: DoorState,
    previous_distance_cm: f32,
}

impl StateDetector {
    pub fn new(threshold_cm: f32) -> Self {
        Self {
            threshold_cm,
            previous_state: DoorState::Open,
            previous_distance_cm: 0.0,
        }
    }

    #[allow(clippy::float_cmp)]
    pub fn update(&mut self, distance_cm: f32) -> Detection {
        let state = DoorState::from_distance(distance_cm, self.threshold_cm);
        let detection = Detection {
            state,
            changed: state != self.previous_state,
            distance_changed: distance_cm != self.previous_distance_cm,
        };
        self.previous_state = state;
        self.previous_distance_cm = distance_cm;
        detection
    }

    pub fn state(&self) -> DoorState {
        self.previous_state
    }

    pub fn previous_distance_cm(&self) -> f32 {
        self.previous_distance_cm
    }
}
