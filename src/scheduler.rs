//! Telemetry cadence gate.
//!
//! Fires when strictly more than `interval_ms` has elapsed since the last
//! fire. The last-fire timestamp starts at zero, so the first telemetry
//! cycle happens just after the node has been up for one interval.
//!
//! ```text
//!   now - last >  interval  ──▶ fire, last = now
//!   now - last <= interval  ──▶ hold
//! ```
//!
//! Driven by the main loop tick, so the real period is the interval
//! rounded up to the next tick (about 10.8 s with the default 900 ms
//! loop). Ticks that land after a long reconnect stall still fire only
//! once: missed intervals are not caught up.

use log::debug;

pub struct TelemetryScheduler {
    interval_ms: u64,
    last_fire_ms: u64,
    fired: u32,
}

impl TelemetryScheduler {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: u64::from(interval_ms),
            last_fire_ms: 0,
            fired: 0,
        }
    }

    /// Returns `true` when the caller should read and publish telemetry.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_fire_ms) > self.interval_ms {
            self.last_fire_ms = now_ms;
            self.fired = self.fired.wrapping_add(1);
            debug!("Scheduler: telemetry due at {} ms (#{})", now_ms, self.fired);
            true
        } else {
            false
        }
    }

    pub fn last_fire_ms(&self) -> u64 {
        self.last_fire_ms
    }

    /// Number of cycles fired since boot.
    pub fn fired_count(&self) -> u32 {
        self.fired
    }
}
