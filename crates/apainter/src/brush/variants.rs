//! Built-in brush variants.

use crate::stroke::StrokeData;
use crate::types::PointSample;

use super::Brush;

/// Plain brush: no veto beyond the shared spacing and cap gates.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatBrush;

impl Brush for FlatBrush {}

/// Ribbon brush.
///
/// A ribbon is built from the controller orientation, so a sample is only
/// worth keeping if the controller rotated by at least `min_angle` radians or
/// the pointer tip moved by at least `min_pointer_travel`.
#[derive(Debug, Clone, Copy)]
pub struct RibbonBrush {
    pub min_angle: f32,
    pub min_pointer_travel: f32,
}

impl Default for RibbonBrush {
    fn default() -> Self {
        Self {
            min_angle: 0.01,
            min_pointer_travel: 0.002,
        }
    }
}

impl Brush for RibbonBrush {
    fn add_point(&mut self, stroke: &StrokeData, sample: &PointSample) -> bool {
        let Some(prev) = stroke.last_point() else {
            return true;
        };

        let rotated = prev.orientation.angle_between(sample.orientation) >= self.min_angle;
        let travelled = stroke
            .prev_pointer_position()
            .is_none_or(|p| p.distance(sample.pointer_position) >= self.min_pointer_travel);

        rotated || travelled
    }
}
