//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules of the illumination rig:
//! command parsing, exclusive pulses and set-all lighting, and the
//! non-blocking pulse timer.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod illumination;
pub mod lights;
pub mod ports;
pub mod pulse;
pub mod service;
