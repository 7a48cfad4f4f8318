use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Linear RGB stroke color, fixed for the lifetime of a stroke
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn from_array(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Color {
    fn from(rgb: [f32; 3]) -> Self {
        Self::from_array(rgb)
    }
}

/// A raw sample handed over by the input layer, before admission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSample {
    pub position: Vec3,
    /// Unit quaternion of the controller
    pub orientation: Quat,
    /// Where the pointer tip was at capture time. Never persisted.
    pub pointer_position: Vec3,
    pub pressure: f32,
    /// Capture clock value
    pub timestamp: u32,
}

impl PointSample {
    pub fn new(
        position: Vec3,
        orientation: Quat,
        pointer_position: Vec3,
        pressure: f32,
        timestamp: u32,
    ) -> Self {
        Self {
            position,
            orientation,
            pointer_position,
            pressure,
            timestamp,
        }
    }

    /// A sample whose pointer position equals its position.
    ///
    /// This is how points are re-hydrated on load.
    pub fn at(position: Vec3, orientation: Quat, pressure: f32, timestamp: u32) -> Self {
        Self::new(position, orientation, position, pressure, timestamp)
    }
}

/// An admitted point. Immutable once stored in a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Vec3,
    pub orientation: Quat,
    pub pressure: f32,
    pub timestamp: u32,
}

impl From<&PointSample> for Point {
    fn from(sample: &PointSample) -> Self {
        Self {
            position: sample.position,
            orientation: sample.orientation,
            pressure: sample.pressure,
            timestamp: sample.timestamp,
        }
    }
}
