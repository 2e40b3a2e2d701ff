use glam::Vec3;
use quadsim_common::RotationOrder;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FlightError;

/// Spawn position of every new vehicle, two meters above the origin.
pub const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 2.0, 0.0);

/// Kinematic state of one vehicle.
///
/// Orientation holds raw Euler angles (`x` pitch, `y` yaw, `z` roll) and is
/// never wrapped; angles accumulate without bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Vec3,
    /// Only evolved by [`IntegrationStrategy::DampedAngularVelocity`].
    pub angular_velocity: Vec3,
}

impl FlightState {
    /// State at simulation start: hovering point at `(0, 2, 0)`, at rest.
    pub fn spawn() -> Self {
        Self {
            position: SPAWN_POSITION,
            velocity: Vec3::ZERO,
            orientation: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.orientation.is_finite()
            && self.angular_velocity.is_finite()
    }
}

impl Default for FlightState {
    fn default() -> Self {
        Self::spawn()
    }
}

/// Physical and tuning constants, fixed for the lifetime of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConstants {
    /// Declared but never divides a force: thrust is applied as acceleration
    /// directly, i.e. an implicit mass of 1.
    pub mass: f32,
    /// m/s², pulls along -Y.
    pub gravity: f32,
    /// Thrust at full throttle.
    pub max_thrust: f32,
    /// Angular acceleration (damped strategy) or angular rate (direct
    /// strategy) per unit of stick deflection.
    pub rotation_gain: f32,
    /// Per-tick multiplier on angular velocity, 1.0 disables damping.
    pub angular_damping: f32,
    /// Per-tick multiplier on linear velocity, 1.0 disables damping.
    pub linear_damping: f32,
    pub base_rotor_speed: f32,
    pub max_extra_rotor_speed: f32,
}

impl TuningConstants {
    /// Throttle at which thrust exactly cancels gravity, if reachable.
    pub fn hover_throttle(&self) -> Option<f32> {
        if self.max_thrust <= 0.0 {
            return None;
        }
        let t = 2.0 * self.gravity / self.max_thrust - 1.0;
        (-1.0..=1.0).contains(&t).then_some(t)
    }

    /// Check every constant against its admissible range.
    pub fn validate(&self) -> Result<(), FlightError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(FlightError::config("mass", self.mass, "a finite value > 0"));
        }
        non_negative("gravity", self.gravity)?;
        non_negative("max_thrust", self.max_thrust)?;
        non_negative("rotation_gain", self.rotation_gain)?;
        unit_interval("angular_damping", self.angular_damping)?;
        unit_interval("linear_damping", self.linear_damping)?;
        non_negative("base_rotor_speed", self.base_rotor_speed)?;
        non_negative("max_extra_rotor_speed", self.max_extra_rotor_speed)?;
        Ok(())
    }
}

impl Default for TuningConstants {
    fn default() -> Self {
        FlightConfig::damped().tuning
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), FlightError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FlightError::config(field, value, "a finite value >= 0"));
    }
    Ok(())
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), FlightError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(FlightError::config(field, value, "a value in [0, 1]"));
    }
    Ok(())
}

/// How stick deflection turns into attitude change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStrategy {
    /// Sticks drive angular acceleration; angular and linear velocity are
    /// damped every tick.
    #[default]
    DampedAngularVelocity,
    /// Sticks drive angle rates directly; nothing is damped.
    DirectAngleRate,
}

/// How rotor spin speed follows the throttle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotorSpeedPolicy {
    /// `base + extra * throttle_fraction`.
    #[default]
    ThrottleRamped,
    /// Always `base`.
    Flat,
}

/// Full configuration of one vehicle's dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub strategy: IntegrationStrategy,
    pub rotor_speed: RotorSpeedPolicy,
    pub rotation_order: RotationOrder,
    pub tuning: TuningConstants,
}

impl FlightConfig {
    /// Torque-style sticks with angular and linear damping and throttle-ramped
    /// rotors.
    pub fn damped() -> Self {
        Self {
            strategy: IntegrationStrategy::DampedAngularVelocity,
            rotor_speed: RotorSpeedPolicy::ThrottleRamped,
            rotation_order: RotationOrder::Xyz,
            tuning: TuningConstants {
                mass: 1.0,
                gravity: 9.81,
                max_thrust: 15.0,
                rotation_gain: 2.0,
                angular_damping: 0.9,
                linear_damping: 0.995,
                base_rotor_speed: 10.0,
                max_extra_rotor_speed: 40.0,
            },
        }
    }

    /// Rate-style sticks, undamped, rotors at a constant speed.
    pub fn direct() -> Self {
        Self {
            strategy: IntegrationStrategy::DirectAngleRate,
            rotor_speed: RotorSpeedPolicy::Flat,
            rotation_order: RotationOrder::Xyz,
            tuning: TuningConstants {
                mass: 1.0,
                gravity: 9.81,
                max_thrust: 15.0,
                rotation_gain: 1.5,
                angular_damping: 1.0,
                linear_damping: 1.0,
                base_rotor_speed: 20.0,
                max_extra_rotor_speed: 0.0,
            },
        }
    }

    pub fn with_rotation_order(mut self, order: RotationOrder) -> Self {
        self.rotation_order = order;
        self
    }

    pub fn validate(&self) -> Result<(), FlightError> {
        self.tuning.validate()
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self::damped()
    }
}

/// Named starting points for [`FlightConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Damped,
    Direct,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Self::Damped, Self::Direct];

    pub fn config(self) -> FlightConfig {
        match self {
            Self::Damped => FlightConfig::damped(),
            Self::Direct => FlightConfig::direct(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Damped => "damped",
            Self::Direct => "direct",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset {0:?}, expected damped or direct")]
pub struct ParsePresetError(pub String);

impl FromStr for Preset {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParsePresetError(s.to_string()))
    }
}
