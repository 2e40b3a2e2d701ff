//! Input sampling: raw gamepad axes and scripted sequences mapped to
//! normalized control inputs.
//!
//! # Invariants
//! - Every source yields finite axes clamped to `[-1, 1]`.
//! - The flight core consumes `ControlInputs`, never raw device axes.

pub mod mapping;
pub mod source;

pub use mapping::{AxisBinding, AxisMap, InputError};
pub use source::{ConstantInput, GamepadSource, InputSource, ScriptedInput, Segment};
