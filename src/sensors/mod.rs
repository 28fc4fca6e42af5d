//! Sensor subsystem: the IR distance ranger and the climate channel.
//!
//! Both are owned by the [`HardwareAdapter`](crate::adapters::hardware::HardwareAdapter),
//! which exposes them through the `DistancePort` and `ClimatePort` traits.

pub mod climate;
pub mod distance;
