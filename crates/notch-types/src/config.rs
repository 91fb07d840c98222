//! Build configuration: bar geometry and cut cross-section.

use serde::{Deserialize, Serialize};

use crate::notch::{Bar, CutProfile};

/// Everything the construction pipeline needs besides the notch list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub bar: Bar,
    pub cut: CutProfile,
}

/// Errors from loading or validating a configuration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid {field}: {value} (must be finite and positive)")]
    InvalidDimension { field: &'static str, value: f64 },

    #[error("invalid cut.overshoot: {0} (must be finite and not negative)")]
    InvalidOvershoot(f64),
}

impl BuildConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BuildConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every dimension is finite and positive, and the cut
    /// overshoot finite and not negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("bar.width", self.bar.width),
            ("bar.length", self.bar.length),
            ("bar.height", self.bar.height),
            ("cut.length", self.cut.length),
            ("cut.depth", self.cut.depth),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDimension { field, value });
            }
        }
        let overshoot = self.cut.overshoot;
        if !overshoot.is_finite() || overshoot < 0.0 {
            return Err(ConfigError::InvalidOvershoot(overshoot));
        }
        Ok(())
    }
}
