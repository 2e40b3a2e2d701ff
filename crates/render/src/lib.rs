//! Render Adapter: turns kernel state into scene-ready snapshots.
//!
//! # Invariants
//! - Renderers receive shared references only; flight state is kernel-owned.
//! - A pose is derived from exactly one vehicle at one tick.
//! - Camera placement is a pure function of the pose.

mod camera;
mod renderer;
mod scene;

pub use camera::ChaseCamera;
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{RotorPose, SceneAdapter, VehiclePose};
