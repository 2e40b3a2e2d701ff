//! Flight Kernel: authoritative vehicle state, fixed-timestep integration,
//! deterministic multi-vehicle stepping.
//!
//! # Invariants
//! - A step is a pure function of (state, inputs, dt); no hidden randomness.
//! - A rejected step leaves every state untouched.
//! - Rendering reads state, never writes it.

pub mod clock;
pub mod config;
pub mod error;
pub mod flight;
pub mod integrator;
pub mod rotor;
pub mod simulation;
pub mod vehicle;

pub use clock::{ClockConfig, FixedTimestep, ManualClock, TimeSource, WallClock};
pub use config::{ConfigError, SimConfig};
pub use error::FlightError;
pub use flight::{
    FlightConfig, FlightState, IntegrationStrategy, ParsePresetError, Preset, RotorSpeedPolicy,
    SPAWN_POSITION, TuningConstants,
};
pub use integrator::FlightIntegrator;
pub use rotor::{Rotor, RotorLayout, RotorRig};
pub use simulation::{InputFrame, Simulation};
pub use vehicle::Vehicle;
