//! Shared configuration for apainter
//!
//! This crate provides the single source of truth for the knobs that change
//! how strokes are captured and how saved paintings are reloaded.

use serde::{Deserialize, Serialize};

/// Default spacing for brushes registered without explicit options
pub const DEFAULT_SPACING: f32 = 0.0;

/// Default point cap (0 = unbounded)
pub const DEFAULT_MAX_POINTS: u32 = 0;

/// Errors raised while reading a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid spacing: {0} (must be finite and >= 0)")]
    InvalidSpacing(f32),
}

/// Capture and load configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    /// Re-run reloaded points through the current admission policy.
    ///
    /// When false, points are appended exactly as stored.
    pub refilter_on_load: bool,
    /// Treat a version mismatch as fatal instead of a warning
    pub strict_version: bool,
    /// Spacing applied by `BrushOptions::from_config`
    pub default_spacing: f32,
    /// Point cap applied by `BrushOptions::from_config`
    pub default_max_points: u32,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            refilter_on_load: true,
            strict_version: false,
            default_spacing: DEFAULT_SPACING,
            default_max_points: DEFAULT_MAX_POINTS,
        }
    }
}

impl PainterConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_spacing.is_finite() || self.default_spacing < 0.0 {
            return Err(ConfigError::InvalidSpacing(self.default_spacing));
        }
        Ok(())
    }
}
