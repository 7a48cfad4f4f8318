//! Stroke: an append-only point buffer and its admission policy
//!
//! Admission is two-staged:
//! 1. the shared gate - spacing against the previous admitted point, then the
//!    `max_points` cap
//! 2. the brush variant's own [`Brush::add_point`] veto
//!
//! Only a sample that passes both is appended.

use std::sync::Arc;

use glam::Vec3;
use tracing::trace;

use crate::brush::{Brush, BrushDescriptor};
use crate::types::{Color, Point, PointSample};

/// Point buffer and cursor state of a stroke.
///
/// Read-only outside this module, so brush variants can inspect it while
/// deciding whether to admit a sample.
#[derive(Debug, Clone)]
pub struct StrokeData {
    color: Color,
    size: f32,
    points: Vec<Point>,
    prev_position: Option<Vec3>,
    prev_pointer_position: Option<Vec3>,
    num_points: usize,
}

impl StrokeData {
    fn new(color: Color, size: f32) -> Self {
        Self {
            color,
            size,
            points: Vec::new(),
            prev_position: None,
            prev_pointer_position: None,
            num_points: 0,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn last_point(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Position of the last admitted sample
    pub fn prev_position(&self) -> Option<Vec3> {
        self.prev_position
    }

    /// Pointer position of the last admitted sample
    pub fn prev_pointer_position(&self) -> Option<Vec3> {
        self.prev_pointer_position
    }

    /// Number of admitted points
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    fn push(&mut self, sample: &PointSample) {
        self.points.push(Point::from(sample));
        self.num_points += 1;
        self.prev_position = Some(sample.position);
        self.prev_pointer_position = Some(sample.pointer_position);
    }
}

/// One continuous drawing gesture.
pub struct Stroke {
    descriptor: Arc<BrushDescriptor>,
    brush: Box<dyn Brush>,
    data: StrokeData,
}

impl std::fmt::Debug for Stroke {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stroke")
            .field("brush", &self.descriptor.name())
            .field("color", &self.data.color)
            .field("size", &self.data.size)
            .field("num_points", &self.data.num_points)
            .finish()
    }
}

impl Stroke {
    /// Create an empty stroke and initialize fresh variant state for it.
    pub fn new(descriptor: Arc<BrushDescriptor>, color: Color, size: f32) -> Self {
        let data = StrokeData::new(color, size);
        let mut brush = descriptor.instantiate();
        brush.init(&data);

        Self {
            descriptor,
            brush,
            data,
        }
    }

    /// Offer a sample to the stroke. Returns true if it was admitted.
    pub fn add_point(&mut self, sample: PointSample) -> bool {
        let options = self.descriptor.options();

        if let Some(prev) = self.data.prev_position {
            let distance = prev.distance(sample.position);
            if distance <= options.spacing {
                trace!(
                    "Stroke::add_point: `{}` rejected, distance {:.6} <= spacing {:.6}",
                    self.descriptor.name(),
                    distance,
                    options.spacing
                );
                return false;
            }
        }

        if options.is_capped() && self.data.num_points >= options.max_points as usize {
            trace!(
                "Stroke::add_point: `{}` rejected, cap of {} reached",
                self.descriptor.name(),
                options.max_points
            );
            return false;
        }

        if !self.brush.add_point(&self.data, &sample) {
            trace!(
                "Stroke::add_point: `{}` rejected by variant",
                self.descriptor.name()
            );
            return false;
        }

        self.data.push(&sample);
        true
    }

    /// Append a sample without consulting any gate.
    ///
    /// Used when reloading with re-filtering disabled.
    pub fn push_unfiltered(&mut self, sample: PointSample) {
        self.data.push(&sample);
    }

    pub fn tick(&mut self, time_ms: f64, delta_ms: f64) {
        self.brush.tick(time_ms, delta_ms);
    }

    /// Reset the variant state. Admitted points are kept.
    pub fn reset(&mut self) {
        self.brush.reset();
    }

    pub fn descriptor(&self) -> &Arc<BrushDescriptor> {
        &self.descriptor
    }

    pub fn brush_name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn data(&self) -> &StrokeData {
        &self.data
    }

    pub fn color(&self) -> Color {
        self.data.color
    }

    pub fn size(&self) -> f32 {
        self.data.size
    }

    pub fn points(&self) -> &[Point] {
        &self.data.points
    }

    pub fn len(&self) -> usize {
        self.data.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.points.is_empty()
    }
}
