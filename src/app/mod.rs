//! Application core: pure domain logic, zero I/O.
//!
//! This module wires the garage sensor's decision logic together:
//! connection upkeep, telemetry cadence, distance sampling and door
//! state detection. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
