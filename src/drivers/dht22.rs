//! DHT22 / AM2302 humidity and temperature sensor.
//!
//! Single-wire protocol on an open-drain line with pull-up:
//!
//! ```text
//! host  ‾‾‾\____1.1ms____/‾‾‾
//! dht                     \__80us__/‾‾80us‾‾\ 40 × (50us low + 26us|70us high)
//! ```
//!
//! Bits are sampled 35 µs after each rising edge: still high means `1`.
//! The frame is humidity (16 bit, ×10), temperature (15 bit magnitude,
//! sign in the top bit, ×10) and an 8-bit additive checksum.
//!
//! The sensor needs two seconds between conversions, so reads inside that
//! window return the previous result (good or bad) without touching the line.
//!
//! Generic over `embedded-hal` 1.0 pin and delay traits; on target the pin
//! is an `esp-idf-hal` open-drain `PinDriver` and the delay is `Ets`.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::SensorError;

/// Minimum spacing between conversions (microseconds).
pub const MIN_READ_INTERVAL_US: u64 = 2_000_000;

const START_LOW_US: u32 = 1_100;
const RESPONSE_TIMEOUT_US: u32 = 100;
const BIT_TIMEOUT_US: u32 = 100;
const BIT_SAMPLE_DELAY_US: u32 = 35;

/// One decoded conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub humidity_pct: f32,
    pub temperature_c: f32,
}

/// Decode a raw 5-byte frame.
pub fn decode_frame(frame: &[u8; 5]) -> Result<Measurement, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ChecksumMismatch);
    }

    let humidity = u16::from_be_bytes([frame[0], frame[1]]);
    let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]);
    let mut temperature_c = f32::from(magnitude) / 10.0;
    if frame[2] & 0x80 != 0 {
        temperature_c = -temperature_c;
    }

    Ok(Measurement {
        humidity_pct: f32::from(humidity) / 10.0,
        temperature_c,
    })
}

pub struct Dht22<P, D> {
    pin: P,
    delay: D,
    last_read_us: Option<u64>,
    last: Result<Measurement, SensorError>,
}

impl<P, D> Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(mut pin: P, delay: D) -> Self {
        // Idle the bus high so the first start pulse is well-formed.
        let _ = pin.set_high();
        Self {
            pin,
            delay,
            last_read_us: None,
            last: Err(SensorError::NoResponse),
        }
    }

    /// Read humidity and temperature, honouring the minimum interval.
    /// `now_us` is monotonic time since boot.
    pub fn read(&mut self, now_us: u64) -> Result<Measurement, SensorError> {
        if let Some(at) = self.last_read_us {
            if now_us.saturating_sub(at) < MIN_READ_INTERVAL_US {
                return self.last;
            }
        }
        self.last_read_us = Some(now_us);
        self.last = self.read_frame().and_then(|frame| decode_frame(&frame));
        if let Err(e) = self.last {
            log::debug!("DHT22: read failed ({})", e);
        }
        self.last
    }

    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        // Start signal.
        self.pin.set_low().map_err(|_| SensorError::PinFailed)?;
        self.delay.delay_us(START_LOW_US);
        self.pin.set_high().map_err(|_| SensorError::PinFailed)?;

        // Sensor response: low 80 µs, high 80 µs, then the first bit's low.
        self.wait_for(false, RESPONSE_TIMEOUT_US)
            .map_err(|_| SensorError::NoResponse)?;
        self.wait_for(true, RESPONSE_TIMEOUT_US)
            .map_err(|_| SensorError::NoResponse)?;
        self.wait_for(false, RESPONSE_TIMEOUT_US)
            .map_err(|_| SensorError::NoResponse)?;

        let mut frame = [0u8; 5];
        for byte in &mut frame {
            for _ in 0..8 {
                *byte = (*byte << 1) | u8::from(self.read_bit()?);
            }
        }
        Ok(frame)
    }

    fn read_bit(&mut self) -> Result<bool, SensorError> {
        self.wait_for(true, BIT_TIMEOUT_US)?;
        self.delay.delay_us(BIT_SAMPLE_DELAY_US);
        let bit = self.pin.is_high().map_err(|_| SensorError::PinFailed)?;
        if bit {
            self.wait_for(false, BIT_TIMEOUT_US)?;
        }
        Ok(bit)
    }

    fn wait_for(&mut self, high: bool, timeout_us: u32) -> Result<(), SensorError> {
        for _ in 0..timeout_us {
            if self.pin.is_high().map_err(|_| SensorError::PinFailed)? == high {
                return Ok(());
            }
            self.delay.delay_us(1);
        }
        Err(SensorError::Timeout)
    }
}
