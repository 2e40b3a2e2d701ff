use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of rotors on every simulated vehicle.
pub const ROTOR_COUNT: usize = 4;

/// Spin direction by rotor index. Diagonal pairs share a direction so the
/// reaction torques cancel visually.
pub const ROTOR_CLOCKWISE: [bool; ROTOR_COUNT] = [true, false, false, true];

/// Unique identifier for a vehicle in a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub Uuid);

impl VehicleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug output.
    pub fn short(&self) -> String {
        let mut s = self.0.simple().to_string();
        s.truncate(8);
        s
    }
}

impl Default for VehicleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized pilot inputs for one tick.
///
/// Each axis is expected in `[-1, 1]`. Nothing here enforces that range;
/// out-of-range values propagate linearly through the integrator, so the input
/// collaborator is responsible for clamping raw axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlInputs {
    pub throttle: f32,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl ControlInputs {
    pub fn new(throttle: f32, roll: f32, pitch: f32, yaw: f32) -> Self {
        Self {
            throttle,
            roll,
            pitch,
            yaw,
        }
    }

    /// Throttle only, all rotation axes centered.
    pub fn throttle(throttle: f32) -> Self {
        Self {
            throttle,
            ..Self::default()
        }
    }

    /// Throttle remapped from `[-1, 1]` to `[0, 1]`.
    pub fn throttle_fraction(&self) -> f32 {
        (self.throttle + 1.0) / 2.0
    }

    /// The first axis holding NaN or an infinity, if any.
    pub fn first_non_finite(&self) -> Option<(&'static str, f32)> {
        [
            ("throttle", self.throttle),
            ("roll", self.roll),
            ("pitch", self.pitch),
            ("yaw", self.yaw),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
    }

    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }

    /// Copy with every axis clamped to `[-1, 1]`.
    pub fn clamped(&self) -> Self {
        Self {
            throttle: self.throttle.clamp(-1.0, 1.0),
            roll: self.roll.clamp(-1.0, 1.0),
            pitch: self.pitch.clamp(-1.0, 1.0),
            yaw: self.yaw.clamp(-1.0, 1.0),
        }
    }
}

/// Spin command for one rotor: angular speed and direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotorSpin {
    /// Angular speed in radians per second, never negative for valid configs.
    pub speed: f32,
    pub clockwise: bool,
}

impl RotorSpin {
    /// Spins for all rotors at a common speed, directions fixed by index.
    pub fn uniform(speed: f32) -> [RotorSpin; ROTOR_COUNT] {
        ROTOR_CLOCKWISE.map(|clockwise| RotorSpin { speed, clockwise })
    }

    /// `+1` for clockwise, `-1` for counter-clockwise.
    pub fn sign(&self) -> f32 {
        if self.clockwise { 1.0 } else { -1.0 }
    }

    /// Signed angular rate.
    pub fn signed_speed(&self) -> f32 {
        self.sign() * self.speed
    }
}
