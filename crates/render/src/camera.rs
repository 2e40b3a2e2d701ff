use glam::Vec3;

use crate::renderer::RenderView;
use crate::scene::VehiclePose;

/// Camera rigidly attached behind and above the vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseCamera {
    /// Eye offset in the vehicle body frame.
    pub offset: Vec3,
    pub fov_degrees: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 2.0, 6.0),
            fov_degrees: 75.0,
        }
    }
}

impl ChaseCamera {
    pub fn view(&self, pose: &VehiclePose) -> RenderView {
        RenderView {
            eye: pose.position + pose.rotation * self.offset,
            target: pose.position,
            fov_degrees: self.fov_degrees,
        }
    }
}
