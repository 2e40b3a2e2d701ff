use quadsim_common::{ControlInputs, ROTOR_COUNT, RotorSpin};

use crate::error::FlightError;
use crate::flight::{FlightConfig, FlightState};
use crate::integrator::FlightIntegrator;
use crate::rotor::{RotorLayout, RotorRig};

/// One simulated vehicle: its state, the integrator that advances it, and the
/// cosmetic rotors that follow the integrator's spin commands.
#[derive(Debug, Clone)]
pub struct Vehicle {
    state: FlightState,
    integrator: FlightIntegrator,
    rotors: RotorRig,
    last_spins: [RotorSpin; ROTOR_COUNT],
}

impl Vehicle {
    pub fn new(config: FlightConfig, layout: RotorLayout) -> Result<Self, FlightError> {
        layout.validate()?;
        let integrator = FlightIntegrator::new(config)?;
        Ok(Self {
            state: FlightState::spawn(),
            integrator,
            rotors: RotorRig::new(layout),
            last_spins: RotorSpin::uniform(0.0),
        })
    }

    /// Start from an explicit state instead of the spawn point.
    pub fn with_state(mut self, state: FlightState) -> Self {
        self.state = state;
        self
    }

    /// Integrate one slice and spin the rotors with the resulting commands.
    pub fn advance(
        &mut self,
        inputs: ControlInputs,
        dt: f32,
    ) -> Result<[RotorSpin; ROTOR_COUNT], FlightError> {
        let spins = self.integrator.step(&mut self.state, inputs, dt)?;
        self.rotors.apply(&spins, dt);
        self.last_spins = spins;
        Ok(spins)
    }

    pub fn state(&self) -> &FlightState {
        &self.state
    }

    pub fn integrator(&self) -> &FlightIntegrator {
        &self.integrator
    }

    pub fn config(&self) -> &FlightConfig {
        self.integrator.config()
    }

    pub fn rotors(&self) -> &RotorRig {
        &self.rotors
    }

    /// Spin commands from the most recent successful step.
    pub fn last_spins(&self) -> &[RotorSpin; ROTOR_COUNT] {
        &self.last_spins
    }

    /// Back to the spawn point with rotors stopped.
    pub fn reset(&mut self) {
        self.state = FlightState::spawn();
        self.rotors.reset();
        self.last_spins = RotorSpin::uniform(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn advance_moves_state_and_rotors() {
        let mut v = Vehicle::new(FlightConfig::damped(), RotorLayout::default()).unwrap();
        let spins = v.advance(ControlInputs::throttle(1.0), 0.1).unwrap();

        assert!(v.state().position.y > 2.0);
        assert_eq!(v.last_spins(), &spins);
        let angles = v.rotors().angles();
        assert_relative_eq!(angles[0], 50.0 * 0.1);
        assert_relative_eq!(angles[1], -50.0 * 0.1);
    }

    #[test]
    fn rejected_step_does_not_spin_rotors() {
        let mut v = Vehicle::new(FlightConfig::direct(), RotorLayout::default()).unwrap();
        assert!(v.advance(ControlInputs::throttle(0.0), -1.0).is_err());
        assert_eq!(v.rotors().angles(), [0.0; 4]);
        assert_eq!(v.state(), &FlightState::spawn());
    }

    #[test]
    fn bad_layout_is_rejected_at_construction() {
        let layout = RotorLayout {
            arm_length: f32::NAN,
            ..RotorLayout::default()
        };
        let err = Vehicle::new(FlightConfig::damped(), layout).unwrap_err();
        assert!(matches!(
            err,
            FlightError::InvalidConfiguration {
                field: "arm_length",
                ..
            }
        ));
    }

    #[test]
    fn reset_returns_to_spawn() {
        let mut v = Vehicle::new(FlightConfig::direct(), RotorLayout::default()).unwrap();
        for _ in 0..10 {
            v.advance(ControlInputs::new(1.0, 0.3, 0.2, 0.1), 0.05).unwrap();
        }
        v.reset();
        assert_eq!(v.state(), &FlightState::spawn());
        assert_eq!(v.rotors().angles(), [0.0; 4]);
    }

    #[test]
    fn with_state_overrides_spawn() {
        let start = FlightState {
            position: glam::Vec3::new(1.0, 5.0, -2.0),
            ..FlightState::spawn()
        };
        let v = Vehicle::new(FlightConfig::damped(), RotorLayout::default())
            .unwrap()
            .with_state(start);
        assert_eq!(v.state().position, start.position);
    }

    #[test]
    fn vehicles_step_on_separate_threads() {
        let handles: Vec<_> = [FlightConfig::damped(), FlightConfig::direct()]
            .into_iter()
            .map(|cfg| {
                let mut v = Vehicle::new(cfg, RotorLayout::default()).unwrap();
                std::thread::spawn(move || {
                    v.advance(ControlInputs::throttle(1.0), 0.1).unwrap();
                    v
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap().state().position.y > 2.0 - 1e-3);
        }
    }
}
