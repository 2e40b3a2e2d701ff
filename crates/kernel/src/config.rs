//! File-backed simulation configuration.
//!
//! Accepts YAML (`.yaml`, `.yml`) or JSON (`.json`). Every field is optional;
//! omitted fields fall back to the damped preset and default clock.
//!
//! ```yaml
//! clock:
//!   tick_seconds: 0.016
//! flight:
//!   strategy: direct_angle_rate
//!   rotor_speed: flat
//!   rotation_order: yxz
//!   tuning:
//!     max_thrust: 20.0
//! rotors:
//!   arm_length: 2.5
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::clock::ClockConfig;
use crate::error::FlightError;
use crate::flight::FlightConfig;
use crate::rotor::RotorLayout;

/// Errors from loading or validating a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config extension {0:?}, expected yaml, yml or json")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Invalid(#[from] FlightError),
}

/// Everything needed to build a simulation and its vehicles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub clock: ClockConfig,
    pub flight: FlightConfig,
    pub rotors: RotorLayout,
}

impl SimConfig {
    /// Load and validate a config file, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = std::fs::read_to_string(path)?;
        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(ext)),
        };
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), FlightError> {
        self.clock.validate()?;
        self.flight.validate()?;
        self.rotors.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::{IntegrationStrategy, RotorSpeedPolicy};
    use quadsim_common::RotationOrder;
    use std::io::Write;

    #[test]
    fn empty_yaml_gives_defaults() {
        let cfg = SimConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg, SimConfig::default());
        assert_eq!(cfg.flight, FlightConfig::damped());
    }

    #[test]
    fn partial_yaml_overrides_selected_fields() {
        let yaml = "
flight:
  strategy: direct_angle_rate
  rotor_speed: flat
  rotation_order: yxz
  tuning:
    max_thrust: 20.0
clock:
  tick_seconds: 0.016
";
        let cfg = SimConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.flight.strategy, IntegrationStrategy::DirectAngleRate);
        assert_eq!(cfg.flight.rotor_speed, RotorSpeedPolicy::Flat);
        assert_eq!(cfg.flight.rotation_order, RotationOrder::Yxz);
        assert_eq!(cfg.flight.tuning.max_thrust, 20.0);
        assert_eq!(cfg.flight.tuning.gravity, 9.81);
        assert_eq!(cfg.clock.tick_seconds, 0.016);
        assert_eq!(cfg.rotors, RotorLayout::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let yaml = "flight:\n  tuning:\n    angular_damping: 1.5\n";
        let err = SimConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(FlightError::InvalidConfiguration {
                field: "angular_damping",
                ..
            })
        ));
    }

    #[test]
    fn unknown_strategy_is_a_parse_error() {
        let err = SimConfig::from_yaml_str("flight:\n  strategy: rk4\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn yaml_and_json_round_trip() {
        let cfg = SimConfig {
            flight: FlightConfig::direct().with_rotation_order(RotationOrder::Zyx),
            ..SimConfig::default()
        };
        let yaml = cfg.to_yaml_string().unwrap();
        assert_eq!(SimConfig::from_yaml_str(&yaml).unwrap(), cfg);
        let json = cfg.to_json_string().unwrap();
        assert_eq!(SimConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("quad.yaml");
        let mut f = std::fs::File::create(&yaml_path).unwrap();
        writeln!(f, "flight:\n  tuning:\n    max_thrust: 18.0").unwrap();
        assert_eq!(SimConfig::load(&yaml_path).unwrap().flight.tuning.max_thrust, 18.0);

        let json_path = dir.path().join("quad.json");
        std::fs::write(&json_path, r#"{"rotors": {"arm_length": 3.0}}"#).unwrap();
        assert_eq!(SimConfig::load(&json_path).unwrap().rotors.arm_length, 3.0);

        let toml_path = dir.path().join("quad.toml");
        std::fs::write(&toml_path, "").unwrap();
        assert!(matches!(
            SimConfig::load(&toml_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            SimConfig::load(dir.path().join("missing.yaml")),
            Err(ConfigError::Io(_))
        ));
    }
}
