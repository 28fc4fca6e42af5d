//! Client-identifier token source.
//!
//! On target the ESP32 hardware RNG feeds the token; on host `rand`'s
//! thread-local generator stands in. Tokens only need to differ between
//! reconnect attempts.

use crate::app::ports::TokenSource;

/// Exclusive upper bound for tokens.
pub const TOKEN_BOUND: u16 = 0xFFFF;

#[derive(Default)]
pub struct RandomTokens;

impl RandomTokens {
    pub fn new() -> Self {
        Self
    }
}

impl TokenSource for RandomTokens {
    #[cfg(target_os = "espidf")]
    fn next_token(&mut self) -> u16 {
        let r = unsafe { esp_idf_svc::sys::esp_random() };
        (r % u32::from(TOKEN_BOUND)) as u16
    }

    #[cfg(not(target_os = "espidf"))]
    fn next_token(&mut self) -> u16 {
        use rand::Rng;
        rand::rng().random_range(0..TOKEN_BOUND)
    }
}
