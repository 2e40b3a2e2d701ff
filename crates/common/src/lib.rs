//! Shared types and utilities for the quadsim flight core.
//!
//! # Invariants
//! - Types here carry no behavior that depends on simulation state.
//! - Rotor index to spin direction mapping is fixed: 0 and 3 clockwise.

mod rotation;
mod types;

pub use rotation::{ParseRotationOrderError, RotationOrder};
pub use types::{ControlInputs, ROTOR_CLOCKWISE, ROTOR_COUNT, RotorSpin, VehicleId};
