use quadsim_common::ControlInputs;

/// Errors from building an input mapping or source.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("axis {index} is bound to both {first} and {second}")]
    DuplicateAxis {
        index: usize,
        first: &'static str,
        second: &'static str,
    },
    #[error("deadzone {0} outside [0, 1)")]
    InvalidDeadzone(f32),
    #[error("script segment {index} has invalid duration {duration}")]
    InvalidSegment { index: usize, duration: f32 },
    #[error("script has no segments")]
    EmptyScript,
}

/// Which raw axis drives a control, and whether to flip its sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisBinding {
    pub index: usize,
    pub inverted: bool,
}

impl AxisBinding {
    pub const fn axis(index: usize) -> Self {
        Self {
            index,
            inverted: false,
        }
    }

    pub const fn inverted(index: usize) -> Self {
        Self {
            index,
            inverted: true,
        }
    }
}

/// Maps a raw axis array (as reported by a gamepad) onto control inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMap {
    pub throttle: AxisBinding,
    pub roll: AxisBinding,
    pub pitch: AxisBinding,
    pub yaw: AxisBinding,
    /// Magnitudes below this read as zero; the rest of the travel is
    /// rescaled so full deflection still reaches 1.
    pub deadzone: f32,
}

impl Default for AxisMap {
    /// Mode-2 style layout: right stick X/Y on axes 0/1 for roll/pitch, left
    /// stick Y/X on axes 3/4 for throttle/yaw.
    fn default() -> Self {
        Self {
            roll: AxisBinding::axis(0),
            pitch: AxisBinding::axis(1),
            throttle: AxisBinding::axis(3),
            yaw: AxisBinding::axis(4),
            deadzone: 0.0,
        }
    }
}

impl AxisMap {
    pub fn with_deadzone(mut self, deadzone: f32) -> Self {
        self.deadzone = deadzone;
        self
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if !(0.0..1.0).contains(&self.deadzone) {
            return Err(InputError::InvalidDeadzone(self.deadzone));
        }
        let bindings = self.named();
        for (i, (first, a)) in bindings.iter().enumerate() {
            let clash = bindings[i + 1..].iter().find(|(_, b)| b.index == a.index);
            if let Some((second, _)) = clash {
                return Err(InputError::DuplicateAxis {
                    index: a.index,
                    first: *first,
                    second: *second,
                });
            }
        }
        Ok(())
    }

    /// Read control inputs from raw axes. Missing or non-finite axes read 0.
    pub fn sample(&self, axes: &[f32]) -> ControlInputs {
        ControlInputs {
            throttle: self.read(axes, self.throttle),
            roll: self.read(axes, self.roll),
            pitch: self.read(axes, self.pitch),
            yaw: self.read(axes, self.yaw),
        }
    }

    fn named(&self) -> [(&'static str, AxisBinding); 4] {
        [
            ("throttle", self.throttle),
            ("roll", self.roll),
            ("pitch", self.pitch),
            ("yaw", self.yaw),
        ]
    }

    fn read(&self, axes: &[f32], binding: AxisBinding) -> f32 {
        let raw = axes.get(binding.index).copied().unwrap_or(0.0);
        if !raw.is_finite() {
            return 0.0;
        }
        let signed = if binding.inverted { -raw } else { raw };
        let v = signed.clamp(-1.0, 1.0);
        let magnitude = v.abs();
        if magnitude < self.deadzone {
            return 0.0;
        }
        v.signum() * (magnitude - self.deadzone) / (1.0 - self.deadzone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_layout_reads_gamepad_axes() {
        let map = AxisMap::default();
        let inputs = map.sample(&[0.1, -0.2, 0.9, 0.3, -0.4, 0.0]);
        assert_eq!(inputs, ControlInputs::new(0.3, 0.1, -0.2, -0.4));
    }

    #[test]
    fn missing_axes_read_zero() {
        let inputs = AxisMap::default().sample(&[0.5]);
        assert_eq!(inputs, ControlInputs::new(0.0, 0.5, 0.0, 0.0));
        assert_eq!(AxisMap::default().sample(&[]), ControlInputs::default());
    }

    #[test]
    fn raw_axes_are_clamped_and_sanitized() {
        let inputs = AxisMap::default().sample(&[2.0, f32::NAN, 0.0, -3.0, f32::INFINITY]);
        assert_eq!(inputs, ControlInputs::new(-1.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn inverted_binding_flips_sign() {
        let map = AxisMap {
            pitch: AxisBinding::inverted(1),
            ..AxisMap::default()
        };
        assert_eq!(map.sample(&[0.0, 0.6]).pitch, -0.6);
    }

    #[test]
    fn deadzone_snaps_and_rescales() {
        let map = AxisMap::default().with_deadzone(0.1);
        let inputs = map.sample(&[0.05, -0.55, 0.0, 1.0, -1.0]);
        assert_eq!(inputs.roll, 0.0);
        assert_relative_eq!(inputs.pitch, -0.5, epsilon = 1e-6);
        assert_relative_eq!(inputs.throttle, 1.0);
        assert_relative_eq!(inputs.yaw, -1.0);
    }

    #[test]
    fn duplicate_bindings_are_rejected() {
        let map = AxisMap {
            yaw: AxisBinding::axis(0),
            ..AxisMap::default()
        };
        assert_eq!(
            map.validate(),
            Err(InputError::DuplicateAxis {
                index: 0,
                first: "roll",
                second: "yaw"
            })
        );
        assert!(AxisMap::default().validate().is_ok());
    }

    #[test]
    fn deadzone_must_leave_travel() {
        assert!(AxisMap::default().with_deadzone(1.0).validate().is_err());
        assert!(AxisMap::default().with_deadzone(-0.1).validate().is_err());
        assert!(AxisMap::default().with_deadzone(f32::NAN).validate().is_err());
    }
}
