//! Timestep sources and the fixed-step accumulator.
//!
//! Render frames arrive at whatever rate the display manages. The simulation
//! only ever advances in whole ticks of a constant length, so physics results
//! do not depend on frame rate.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{FlightError, check_dt};

/// Fixed-step clock settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Length of one simulation tick in seconds.
    pub tick_seconds: f32,
    /// Longest frame delta accepted in one go; longer frames are clamped so a
    /// stall does not turn into a burst of catch-up ticks.
    pub max_frame_seconds: f32,
    /// Upper bound on ticks run for a single frame.
    pub max_substeps: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 1.0 / 60.0,
            max_frame_seconds: 0.1,
            max_substeps: 8,
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<(), FlightError> {
        if !self.tick_seconds.is_finite() || self.tick_seconds <= 0.0 {
            return Err(FlightError::config(
                "tick_seconds",
                self.tick_seconds,
                "a finite value > 0",
            ));
        }
        if !self.max_frame_seconds.is_finite() || self.max_frame_seconds <= 0.0 {
            return Err(FlightError::config(
                "max_frame_seconds",
                self.max_frame_seconds,
                "a finite value > 0",
            ));
        }
        if self.max_substeps == 0 {
            return Err(FlightError::config("max_substeps", 0.0, "at least 1"));
        }
        Ok(())
    }
}

/// Converts variable frame deltas into a whole number of fixed ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    config: ClockConfig,
    accumulator: f64,
}

impl FixedTimestep {
    pub fn new(config: ClockConfig) -> Result<Self, FlightError> {
        config.validate()?;
        Ok(Self {
            config,
            accumulator: 0.0,
        })
    }

    /// Tick length in seconds.
    pub fn step(&self) -> f32 {
        self.config.tick_seconds
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Add a frame delta and return how many ticks to run now.
    pub fn accumulate(&mut self, frame_dt: f32) -> Result<u32, FlightError> {
        check_dt(frame_dt)?;
        let step = self.config.tick_seconds as f64;
        self.accumulator += frame_dt.min(self.config.max_frame_seconds) as f64;

        let mut ticks = 0;
        while self.accumulator >= step && ticks < self.config.max_substeps {
            self.accumulator -= step;
            ticks += 1;
        }
        if self.accumulator >= step {
            let dropped = (self.accumulator / step).floor();
            tracing::debug!(dropped, "fixed timestep saturated, dropping backlog");
            self.accumulator -= dropped * step;
        }
        Ok(ticks)
    }

    /// Put back time for ticks that were handed out but never ran.
    pub(crate) fn refund(&mut self, ticks: u32) {
        self.accumulator += ticks as f64 * self.config.tick_seconds as f64;
    }

    /// Fraction of a tick left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.config.tick_seconds as f64) as f32
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self {
            config: ClockConfig::default(),
            accumulator: 0.0,
        }
    }
}

/// Injectable source of frame deltas.
pub trait TimeSource {
    /// Seconds elapsed since the previous call.
    fn frame_delta(&mut self) -> f32;
}

/// Real time, measured between calls.
#[derive(Debug)]
pub struct WallClock {
    last: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallClock {
    fn frame_delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

/// Deterministic clock that reports the same delta every frame.
#[derive(Debug, Clone)]
pub struct ManualClock {
    delta: f32,
    elapsed: f64,
}

impl ManualClock {
    pub fn new(delta: f32) -> Self {
        Self {
            delta,
            elapsed: 0.0,
        }
    }

    /// Clock running at `hz` frames per second.
    pub fn from_rate(hz: f32) -> Self {
        Self::new(1.0 / hz)
    }

    /// Total time handed out so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl TimeSource for ManualClock {
    fn frame_delta(&mut self) -> f32 {
        self.elapsed += self.delta as f64;
        self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter_clock() -> FixedTimestep {
        FixedTimestep::new(ClockConfig {
            tick_seconds: 0.25,
            max_frame_seconds: 1.0,
            max_substeps: 8,
        })
        .unwrap()
    }

    #[test]
    fn accumulates_partial_frames() {
        let mut clock = quarter_clock();
        assert_eq!(clock.accumulate(0.625).unwrap(), 2);
        assert_eq!(clock.alpha(), 0.5);
        assert_eq!(clock.accumulate(0.625).unwrap(), 3);
        assert_eq!(clock.alpha(), 0.0);
        assert_eq!(clock.accumulate(0.125).unwrap(), 0);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut clock = quarter_clock();
        // 5 seconds clamps to 1 second = 4 ticks.
        assert_eq!(clock.accumulate(5.0).unwrap(), 4);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn substeps_are_capped_and_backlog_dropped() {
        let mut clock = FixedTimestep::new(ClockConfig {
            tick_seconds: 0.25,
            max_frame_seconds: 4.0,
            max_substeps: 2,
        })
        .unwrap();
        assert_eq!(clock.accumulate(2.125).unwrap(), 2);
        assert!(clock.alpha() < 1.0);
        assert_eq!(clock.accumulate(0.0).unwrap(), 0);
    }

    #[test]
    fn rate_independence() {
        // The same wall time yields the same tick count at 30 and 120 fps.
        let count = |hz: f32, frames: usize| {
            let mut clock = FixedTimestep::new(ClockConfig {
                tick_seconds: 1.0 / 64.0,
                max_frame_seconds: 0.5,
                max_substeps: 16,
            })
            .unwrap();
            let mut source = ManualClock::from_rate(hz);
            (0..frames)
                .map(|_| clock.accumulate(source.frame_delta()).unwrap())
                .sum::<u32>()
        };
        let slow = count(32.0, 32);
        let fast = count(128.0, 128);
        assert_eq!(slow, 64);
        assert_eq!(fast, 64);
    }

    #[test]
    fn negative_frame_delta_is_rejected() {
        let mut clock = FixedTimestep::default();
        assert!(clock.accumulate(-0.01).is_err());
        assert!(clock.accumulate(f32::NAN).is_err());
    }

    #[test]
    fn invalid_clock_config_is_rejected() {
        let bad = ClockConfig {
            tick_seconds: 0.0,
            ..ClockConfig::default()
        };
        assert!(FixedTimestep::new(bad).is_err());
        let bad = ClockConfig {
            max_substeps: 0,
            ..ClockConfig::default()
        };
        assert!(FixedTimestep::new(bad).is_err());
    }

    #[test]
    fn manual_clock_tracks_elapsed() {
        let mut c = ManualClock::new(0.5);
        c.frame_delta();
        c.frame_delta();
        assert_eq!(c.elapsed(), 1.0);
    }

    #[test]
    fn wall_clock_is_non_negative() {
        let mut c = WallClock::new();
        assert!(c.frame_delta() >= 0.0);
    }
}
