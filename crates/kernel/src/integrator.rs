use glam::Vec3;
use quadsim_common::{ControlInputs, ROTOR_COUNT, RotorSpin};

use crate::error::{FlightError, check_dt, check_inputs};
use crate::flight::{FlightConfig, FlightState, IntegrationStrategy, RotorSpeedPolicy};

/// Explicit-Euler flight integrator for one vehicle.
///
/// The integrator holds only validated configuration. State lives in a
/// [`FlightState`] owned by the caller and is advanced in place by
/// [`FlightIntegrator::step`].
#[derive(Debug, Clone)]
pub struct FlightIntegrator {
    config: FlightConfig,
}

impl FlightIntegrator {
    pub fn new(config: FlightConfig) -> Result<Self, FlightError> {
        config.validate()?;
        if config.tuning.mass != 1.0 {
            tracing::warn!(
                mass = config.tuning.mass,
                "mass does not scale thrust; dynamics behave as if mass were 1"
            );
        }
        tracing::debug!(
            strategy = ?config.strategy,
            rotor_speed = ?config.rotor_speed,
            order = %config.rotation_order,
            max_thrust = config.tuning.max_thrust,
            "flight integrator configured"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    /// Thrust magnitude for a throttle in `[-1, 1]`.
    pub fn thrust(&self, throttle: f32) -> f32 {
        throttle_fraction(throttle) * self.config.tuning.max_thrust
    }

    /// Rotor angular speed for a throttle in `[-1, 1]`.
    pub fn rotor_speed(&self, throttle: f32) -> f32 {
        let t = &self.config.tuning;
        match self.config.rotor_speed {
            RotorSpeedPolicy::ThrottleRamped => {
                t.base_rotor_speed + t.max_extra_rotor_speed * throttle_fraction(throttle)
            }
            RotorSpeedPolicy::Flat => t.base_rotor_speed,
        }
    }

    /// Advance `state` by `dt` seconds under `inputs`.
    ///
    /// Attitude is updated first and thrust is rotated by the new attitude,
    /// so rotation and translation couple within the same tick. On error the
    /// state is left untouched.
    pub fn step(
        &self,
        state: &mut FlightState,
        inputs: ControlInputs,
        dt: f32,
    ) -> Result<[RotorSpin; ROTOR_COUNT], FlightError> {
        check_dt(dt)?;
        check_inputs(&inputs)?;

        let t = &self.config.tuning;
        let damped = self.config.strategy == IntegrationStrategy::DampedAngularVelocity;
        let mut next = *state;

        // Stick axes map onto (x, y, z) = (pitch, yaw, roll), inverted.
        let stick = Vec3::new(-inputs.pitch, -inputs.yaw, -inputs.roll) * t.rotation_gain;
        if damped {
            next.angular_velocity += stick * dt;
            next.angular_velocity *= t.angular_damping;
            next.orientation += next.angular_velocity * dt;
        } else {
            next.orientation += stick * dt;
        }

        let thrust = self
            .config
            .rotation_order
            .rotate(next.orientation, Vec3::new(0.0, self.thrust(inputs.throttle), 0.0));
        let accel = thrust + Vec3::new(0.0, -t.gravity, 0.0);

        next.velocity += accel * dt;
        if damped {
            next.velocity *= t.linear_damping;
        }
        next.position += next.velocity * dt;

        // Finite inputs can still overflow; never commit a poisoned state.
        if !next.is_finite() {
            return Err(FlightError::InvalidInput {
                what: "integrated state",
                value: first_non_finite(&next),
            });
        }
        *state = next;

        tracing::trace!(
            pos = ?state.position,
            vel = ?state.velocity,
            rot = ?state.orientation,
            "flight step"
        );

        Ok(RotorSpin::uniform(self.rotor_speed(inputs.throttle)))
    }
}

fn throttle_fraction(throttle: f32) -> f32 {
    ControlInputs::throttle(throttle).throttle_fraction()
}

fn first_non_finite(state: &FlightState) -> f32 {
    [
        state.position,
        state.velocity,
        state.orientation,
        state.angular_velocity,
    ]
    .iter()
    .flat_map(|v| v.to_array())
    .find(|c| !c.is_finite())
    .unwrap_or(f32::NAN)
}
