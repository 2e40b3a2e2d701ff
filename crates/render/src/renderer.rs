use glam::Vec3;
use quadsim_kernel::Simulation;

use crate::scene::SceneAdapter;

/// Where a frame is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 4.0, 8.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

/// Backend-agnostic frame producer.
///
/// Takes the simulation by shared reference; nothing drawn can flow back
/// into flight state.
pub trait Renderer {
    type Output;

    fn render(&self, sim: &Simulation, view: &RenderView) -> Self::Output;
}

/// Human-readable frame dump for terminals, logs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct DebugTextRenderer {
    /// Include per-rotor angles.
    pub show_rotors: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rotors(mut self) -> Self {
        self.show_rotors = true;
        self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, sim: &Simulation, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== tick={} t={:.3}s vehicles={} ===\n",
            sim.tick(),
            sim.elapsed(),
            sim.vehicle_count()
        ));
        out.push_str(&format!(
            "camera eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        for (id, vehicle) in sim.vehicles() {
            let pose = SceneAdapter::pose(vehicle);
            let v = vehicle.state().velocity;
            out.push_str(&format!(
                "  [{}] pos=({:.3}, {:.3}, {:.3}) vel=({:.3}, {:.3}, {:.3}) rot=({:.3}, {:.3}, {:.3})\n",
                id.short(),
                pose.position.x,
                pose.position.y,
                pose.position.z,
                v.x,
                v.y,
                v.z,
                pose.euler.x,
                pose.euler.y,
                pose.euler.z
            ));
            if self.show_rotors {
                for (i, rotor) in pose.rotors.iter().enumerate() {
                    let dir = if rotor.clockwise { "cw" } else { "ccw" };
                    out.push_str(&format!("    rotor{i} {dir} angle={:.2}\n", rotor.angle));
                }
            }
        }

        tracing::trace!(tick = sim.tick(), bytes = out.len(), "debug frame rendered");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadsim_common::ControlInputs;
    use quadsim_kernel::{FlightConfig, InputFrame, RotorLayout};

    #[test]
    fn empty_simulation() {
        let sim = Simulation::new();
        let out = DebugTextRenderer::new().render(&sim, &RenderView::default());
        assert!(out.contains("tick=0"));
        assert!(out.contains("vehicles=0"));
        assert!(out.contains("fov=75"));
    }

    #[test]
    fn lists_each_vehicle() {
        let mut sim = Simulation::new();
        let a = sim.spawn(FlightConfig::damped(), RotorLayout::default()).unwrap();
        sim.spawn(FlightConfig::direct(), RotorLayout::default()).unwrap();
        let frame = InputFrame::from([(a, ControlInputs::throttle(1.0))]);
        sim.step(&frame).unwrap();

        let out = DebugTextRenderer::new().render(&sim, &RenderView::default());
        assert!(out.contains("tick=1"));
        assert!(out.contains("vehicles=2"));
        assert!(out.contains(&format!("[{}]", a.short())));
        assert_eq!(out.matches("pos=").count(), 2);
        assert!(!out.contains("rotor0"));
    }

    #[test]
    fn rotor_lines_are_optional() {
        let mut sim = Simulation::new();
        sim.spawn(FlightConfig::damped(), RotorLayout::default()).unwrap();
        let out = DebugTextRenderer::new()
            .with_rotors()
            .render(&sim, &RenderView::default());
        assert!(out.contains("rotor0 cw"));
        assert!(out.contains("rotor1 ccw"));
        assert!(out.contains("rotor3 cw"));
    }
}
