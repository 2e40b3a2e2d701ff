use glam::{Quat, Vec3};
use quadsim_common::ROTOR_COUNT;
use quadsim_kernel::Vehicle;

/// One rotor as a scene graph would place it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotorPose {
    /// Hub position in the body frame.
    pub offset: Vec3,
    /// Hub position in world space.
    pub world_position: Vec3,
    /// Spin angle about the body up axis, radians.
    pub angle: f32,
    pub clockwise: bool,
}

/// Snapshot of a vehicle for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehiclePose {
    pub position: Vec3,
    /// Body-to-world rotation built with the vehicle's rotation order.
    pub rotation: Quat,
    /// Raw Euler angles as stored in the flight state.
    pub euler: Vec3,
    pub rotors: [RotorPose; ROTOR_COUNT],
}

impl VehiclePose {
    /// Body up axis in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

/// Read-only bridge from kernel vehicles to scene poses.
#[derive(Debug, Default, Clone, Copy)]
pub struct SceneAdapter;

impl SceneAdapter {
    pub fn pose(vehicle: &Vehicle) -> VehiclePose {
        let state = vehicle.state();
        let rotation = vehicle.config().rotation_order.to_quat(state.orientation);
        let rotors = vehicle.rotors().rotors().map(|r| RotorPose {
            offset: r.offset,
            world_position: state.position + rotation * r.offset,
            angle: r.angle,
            clockwise: r.clockwise,
        });
        VehiclePose {
            position: state.position,
            rotation,
            euler: state.orientation,
            rotors,
        }
    }
}
