use glam::Vec3;
use quadsim_common::{ROTOR_CLOCKWISE, ROTOR_COUNT, RotorSpin};
use serde::{Deserialize, Serialize};

use crate::error::FlightError;

/// Ratio between arm length and the rotor hub offset along each axis.
const ARM_TO_OFFSET: f32 = 2.9;

/// Cosmetic spinning rotor. Its angle never feeds back into the dynamics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotor {
    /// Hub position in the vehicle body frame.
    pub offset: Vec3,
    /// Nominal spin direction for this position.
    pub clockwise: bool,
    /// Accumulated spin angle in radians, unbounded.
    pub angle: f32,
}

impl Rotor {
    pub fn new(offset: Vec3, clockwise: bool) -> Self {
        Self {
            offset,
            clockwise,
            angle: 0.0,
        }
    }

    /// Advance the spin angle by `speed * dt` in the given direction.
    pub fn spin(&mut self, dt: f32, speed: f32, clockwise: bool) {
        let sign = if clockwise { 1.0 } else { -1.0 };
        self.angle += sign * speed * dt;
    }
}

/// Placement of the four rotor hubs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotorLayout {
    pub arm_length: f32,
    /// Height of the hubs above the body origin.
    pub hub_height: f32,
}

impl Default for RotorLayout {
    fn default() -> Self {
        Self {
            arm_length: 2.5,
            hub_height: 0.05,
        }
    }
}

impl RotorLayout {
    pub fn validate(&self) -> Result<(), FlightError> {
        if !self.arm_length.is_finite() || self.arm_length < 0.0 {
            return Err(FlightError::config(
                "arm_length",
                self.arm_length,
                "a finite value >= 0",
            ));
        }
        if !self.hub_height.is_finite() {
            return Err(FlightError::config(
                "hub_height",
                self.hub_height,
                "a finite value",
            ));
        }
        Ok(())
    }

    /// Hub offsets by rotor index, on the diagonals of the XZ plane.
    pub fn offsets(&self) -> [Vec3; ROTOR_COUNT] {
        let o = self.arm_length / ARM_TO_OFFSET;
        let h = self.hub_height;
        [
            Vec3::new(o, h, o),
            Vec3::new(-o, h, o),
            Vec3::new(o, h, -o),
            Vec3::new(-o, h, -o),
        ]
    }
}

/// The four rotors of one vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct RotorRig {
    rotors: [Rotor; ROTOR_COUNT],
}

impl RotorRig {
    pub fn new(layout: RotorLayout) -> Self {
        let offsets = layout.offsets();
        Self {
            rotors: std::array::from_fn(|i| Rotor::new(offsets[i], ROTOR_CLOCKWISE[i])),
        }
    }

    /// Spin every rotor with the matching command.
    pub fn apply(&mut self, spins: &[RotorSpin; ROTOR_COUNT], dt: f32) {
        for (rotor, spin) in self.rotors.iter_mut().zip(spins) {
            rotor.spin(dt, spin.speed, spin.clockwise);
        }
    }

    pub fn rotors(&self) -> &[Rotor; ROTOR_COUNT] {
        &self.rotors
    }

    pub fn angles(&self) -> [f32; ROTOR_COUNT] {
        self.rotors.map(|r| r.angle)
    }

    pub fn reset(&mut self) {
        for rotor in &mut self.rotors {
            rotor.angle = 0.0;
        }
    }
}

impl Default for RotorRig {
    fn default() -> Self {
        Self::new(RotorLayout::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn spin_accumulates_signed_angle() {
        let mut r = Rotor::new(Vec3::ZERO, true);
        r.spin(0.5, 20.0, true);
        assert_relative_eq!(r.angle, 10.0);
        r.spin(0.25, 20.0, false);
        assert_relative_eq!(r.angle, 5.0);
    }

    #[test]
    fn spin_never_wraps() {
        let mut r = Rotor::new(Vec3::ZERO, true);
        for _ in 0..100 {
            r.spin(0.1, 50.0, true);
        }
        assert_relative_eq!(r.angle, 500.0, epsilon = 1e-3);
    }

    #[test]
    fn layout_places_hubs_on_diagonals() {
        let offsets = RotorLayout::default().offsets();
        let o: f32 = 2.5 / 2.9;
        assert_relative_eq!(offsets[0].x, o);
        assert_relative_eq!(offsets[0].z, o);
        assert_relative_eq!(offsets[1].x, -o);
        assert_relative_eq!(offsets[2].z, -o);
        assert_relative_eq!(offsets[3].x, -o);
        assert_relative_eq!(offsets[3].z, -o);
        assert!(offsets.iter().all(|v| v.y == 0.05));
    }

    #[test]
    fn layout_rejects_non_finite_geometry() {
        assert!(RotorLayout::default().validate().is_ok());
        let bad_arm = RotorLayout {
            arm_length: -1.0,
            ..RotorLayout::default()
        };
        assert!(matches!(
            bad_arm.validate(),
            Err(FlightError::InvalidConfiguration {
                field: "arm_length",
                ..
            })
        ));
        let bad_hub = RotorLayout {
            hub_height: f32::NAN,
            ..RotorLayout::default()
        };
        assert!(matches!(
            bad_hub.validate(),
            Err(FlightError::InvalidConfiguration {
                field: "hub_height",
                ..
            })
        ));
        // Hubs may sit below the body origin.
        let low = RotorLayout {
            hub_height: -0.1,
            ..RotorLayout::default()
        };
        assert!(low.validate().is_ok());
    }

    #[test]
    fn rig_directions_follow_index() {
        let rig = RotorRig::default();
        let dirs = rig.rotors().map(|r| r.clockwise);
        assert_eq!(dirs, [true, false, false, true]);
    }

    #[test]
    fn rig_apply_spins_pairs_in_opposite_directions() {
        let mut rig = RotorRig::default();
        rig.apply(&RotorSpin::uniform(10.0), 0.1);
        let a = rig.angles();
        assert_relative_eq!(a[0], 1.0);
        assert_relative_eq!(a[1], -1.0);
        assert_relative_eq!(a[2], -1.0);
        assert_relative_eq!(a[3], 1.0);

        rig.reset();
        assert_eq!(rig.angles(), [0.0; 4]);
    }
}
