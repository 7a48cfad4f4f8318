//! Brush variants, options and the descriptor registry
//!
//! A brush is split in two halves:
//! - [`BrushDescriptor`] - the named, shared definition (options + factory)
//! - [`Brush`] - the per-stroke variant state created by the factory
//!
//! The spacing/cap gate lives in [`crate::stroke::Stroke::add_point`] and is
//! shared by every variant; [`Brush::add_point`] is only the second stage.

mod registry;
mod variants;

pub use registry::{BrushDescriptor, BrushFactory, BrushRegistry, RegistryError};
pub use variants::{FlatBrush, RibbonBrush};

use apainter_config::PainterConfig;

use crate::stroke::StrokeData;
use crate::types::PointSample;

/// Admission options shared by every stroke of a brush type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushOptions {
    /// Minimum distance a new point must travel from the previous one.
    /// Points at distance <= spacing are rejected.
    pub spacing: f32,
    /// Hard cap on admitted points (0 = unbounded)
    pub max_points: u32,
}

impl Default for BrushOptions {
    fn default() -> Self {
        Self {
            spacing: apainter_config::DEFAULT_SPACING,
            max_points: apainter_config::DEFAULT_MAX_POINTS,
        }
    }
}

impl BrushOptions {
    pub fn new(spacing: f32, max_points: u32) -> Self {
        Self {
            spacing: spacing.max(0.0),
            max_points,
        }
    }

    /// Options seeded from the configured defaults
    pub fn from_config(config: &PainterConfig) -> Self {
        Self::new(config.default_spacing, config.default_max_points)
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    pub fn with_max_points(mut self, max_points: u32) -> Self {
        self.max_points = max_points;
        self
    }

    /// True when `max_points` limits the stroke
    pub fn is_capped(&self) -> bool {
        self.max_points != 0
    }
}

/// Per-stroke behavior of a brush type.
///
/// Every hook has a default, so a variant only overrides what it customizes.
pub trait Brush: Send + Sync {
    /// Called once, right after the stroke is created.
    fn init(&mut self, _stroke: &StrokeData) {}

    /// Drop any variant state accumulated while drawing.
    fn reset(&mut self) {}

    /// Per-frame update driven by the host.
    fn tick(&mut self, _time_ms: f64, _delta_ms: f64) {}

    /// Variant-specific veto, consulted after the spacing and cap gates pass.
    ///
    /// Returning `false` rejects the sample.
    fn add_point(&mut self, _stroke: &StrokeData, _sample: &PointSample) -> bool {
        true
    }
}
