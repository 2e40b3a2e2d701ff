use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Order in which the three Euler angles of a vehicle are applied.
///
/// Angles are always stored per axis: `x` is pitch, `y` is yaw, `z` is roll.
/// The order only decides how they compose. For order `ABC` the rotation is
/// `R_A * R_B * R_C`, so the same angles give different attitudes (and a
/// different thrust direction) under different orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationOrder {
    #[default]
    Xyz,
    Yxz,
    Zxy,
    Zyx,
    Yzx,
    Xzy,
}

impl RotationOrder {
    pub const ALL: [RotationOrder; 6] = [
        Self::Xyz,
        Self::Yxz,
        Self::Zxy,
        Self::Zyx,
        Self::Yzx,
        Self::Xzy,
    ];

    /// Compose per-axis Euler angles into a rotation.
    pub fn to_quat(self, angles: Vec3) -> Quat {
        let x = Quat::from_rotation_x(angles.x);
        let y = Quat::from_rotation_y(angles.y);
        let z = Quat::from_rotation_z(angles.z);
        match self {
            Self::Xyz => x * y * z,
            Self::Yxz => y * x * z,
            Self::Zxy => z * x * y,
            Self::Zyx => z * y * x,
            Self::Yzx => y * z * x,
            Self::Xzy => x * z * y,
        }
    }

    /// Rotate a body-frame vector into the world frame.
    pub fn rotate(self, angles: Vec3, v: Vec3) -> Vec3 {
        self.to_quat(angles) * v
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xyz => "xyz",
            Self::Yxz => "yxz",
            Self::Zxy => "zxy",
            Self::Zyx => "zyx",
            Self::Yzx => "yzx",
            Self::Xzy => "xzy",
        }
    }
}

impl std::fmt::Display for RotationOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rotation order {0:?}, expected one of xyz, yxz, zxy, zyx, yzx, xzy")]
pub struct ParseRotationOrderError(pub String);

impl FromStr for RotationOrder {
    type Err = ParseRotationOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == lower)
            .ok_or(ParseRotationOrderError(s.to_string()))
    }
}
