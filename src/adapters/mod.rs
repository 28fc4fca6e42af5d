//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements      | Connects to                 |
//! |-------------|-----------------|-----------------------------|
//! | `hardware`  | DistancePort    | ESP32 ADC1 (IR sensor)      |
//! |             | ClimatePort     | DHT22 single-wire GPIO      |
//! |             | IndicatorPort   | Red / green LED GPIOs       |
//! | `mqtt`      | BrokerPort      | ESP-IDF MQTT client         |
//! | `time`      | ClockPort       | ESP32 system timer          |
//! | `entropy`   | TokenSource     | ESP32 hardware RNG          |
//! | `log_sink`  | EventSink       | Serial log output           |
//! | `wifi`      | (boot only)     | ESP-IDF WiFi STA            |
//! | `device_id` | (boot only)     | Station MAC address         |

pub mod device_id;
pub mod entropy;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
