use quadsim_common::ControlInputs;

use crate::mapping::{AxisMap, InputError};

/// Anything that can produce pilot inputs once per simulation tick.
pub trait InputSource {
    /// Inputs for the tick about to run, which lasts `dt` seconds.
    fn sample(&mut self, dt: f32) -> ControlInputs;
}

/// Latest axes reported by a physical gamepad.
///
/// The caller polls the device and pushes raw axes with [`update`]; the
/// source maps them at sample time. While disconnected it yields centered
/// sticks.
///
/// [`update`]: GamepadSource::update
#[derive(Debug, Clone)]
pub struct GamepadSource {
    map: AxisMap,
    axes: Vec<f32>,
    connected: bool,
}

impl GamepadSource {
    pub fn new(map: AxisMap) -> Result<Self, InputError> {
        map.validate()?;
        Ok(Self {
            map,
            axes: Vec::new(),
            connected: false,
        })
    }

    /// Store the most recent raw axis values.
    pub fn update(&mut self, axes: &[f32]) {
        if !self.connected {
            tracing::info!(axes = axes.len(), "gamepad connected");
            self.connected = true;
        }
        self.axes.clear();
        self.axes.extend_from_slice(axes);
    }

    pub fn disconnect(&mut self) {
        if self.connected {
            tracing::info!("gamepad disconnected");
        }
        self.connected = false;
        self.axes.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn map(&self) -> &AxisMap {
        &self.map
    }
}

impl InputSource for GamepadSource {
    fn sample(&mut self, _dt: f32) -> ControlInputs {
        if !self.connected {
            return ControlInputs::default();
        }
        self.map.sample(&self.axes)
    }
}

/// The same inputs every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConstantInput(pub ControlInputs);

impl InputSource for ConstantInput {
    fn sample(&mut self, _dt: f32) -> ControlInputs {
        sanitize(self.0)
    }
}

/// Inputs held for a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub duration: f32,
    pub inputs: ControlInputs,
}

impl Segment {
    pub fn new(duration: f32, inputs: ControlInputs) -> Self {
        Self { duration, inputs }
    }
}

/// Plays back a timed sequence of inputs. After the last segment ends its
/// inputs are held.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    segments: Vec<Segment>,
    elapsed: f32,
    total: f32,
}

impl ScriptedInput {
    pub fn new(segments: Vec<Segment>) -> Result<Self, InputError> {
        if segments.is_empty() {
            return Err(InputError::EmptyScript);
        }
        for (index, seg) in segments.iter().enumerate() {
            if !seg.duration.is_finite() || seg.duration < 0.0 {
                return Err(InputError::InvalidSegment {
                    index,
                    duration: seg.duration,
                });
            }
        }
        let total = segments.iter().map(|s| s.duration).sum();
        Ok(Self {
            segments,
            elapsed: 0.0,
            total,
        })
    }

    /// Script time consumed so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total
    }

    pub fn rewind(&mut self) {
        self.elapsed = 0.0;
    }

    fn current(&self) -> ControlInputs {
        let mut end = 0.0;
        for seg in &self.segments {
            end += seg.duration;
            if self.elapsed < end {
                return seg.inputs;
            }
        }
        // Non-empty by construction.
        self.segments
            .last()
            .map(|s| s.inputs)
            .unwrap_or_default()
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self, dt: f32) -> ControlInputs {
        let inputs = sanitize(self.current());
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        inputs
    }
}

fn sanitize(inputs: ControlInputs) -> ControlInputs {
    let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
    ControlInputs {
        throttle: finite(inputs.throttle),
        roll: finite(inputs.roll),
        pitch: finite(inputs.pitch),
        yaw: finite(inputs.yaw),
    }
    .clamped()
}
