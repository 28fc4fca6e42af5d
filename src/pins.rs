//! GPIO / peripheral pin assignments for the garage sensor board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Distance sensor (Sharp GP2Y0A02 style IR ranger, analog out)
// ---------------------------------------------------------------------------

/// IR distance sensor, analog voltage (GPIO 5 on ESP32-S3).
pub const DISTANCE_ADC_GPIO: i32 = 5;

/// ADC1 channel wired to [`DISTANCE_ADC_GPIO`]. On the S3, ADC1 channel
/// `n` sits on GPIO `n + 1`.
pub const DISTANCE_ADC_CHANNEL: u32 = 4;

/// The conversion curve was fitted against 10-bit counts; the oneshot
/// driver samples at 12 bits, so raw reads are shifted down by this amount.
pub const DISTANCE_ADC_SHIFT: u32 = 2;

// ---------------------------------------------------------------------------
// Humidity / temperature (DHT22, single-wire, open-drain with pull-up)
// ---------------------------------------------------------------------------

pub const DHT_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Indicator LEDs (mutually exclusive)
// ---------------------------------------------------------------------------

/// Lit while the door is closed.
pub const LED_RED_GPIO: i32 = 11;
/// Lit while the door is open.
pub const LED_GREEN_GPIO: i32 = 12;
