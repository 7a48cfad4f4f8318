//! Structured (JSON) painting format.
//!
//! ```json
//! {
//!   "version": 1,
//!   "brushes": ["flat"],
//!   "strokes": [{
//!     "brush": {"index": 0, "color": [1, 0, 0], "size": 0.05},
//!     "points": [{"orientation": [0, 0, 0, 1], "position": [0, 0, 0.02],
//!                 "pressure": 0.5, "timestamp": 120}]
//!   }]
//! }
//! ```
//!
//! Every float is rounded to 6 decimals on export so diffs stay stable.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::{Document, FormatError, LoadError, StrokeRecord};
use crate::constants::STRUCTURED_PRECISION;
use crate::types::{Color, Point};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredPainting {
    pub version: u16,
    pub brushes: Vec<String>,
    pub strokes: Vec<StructuredStroke>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredStroke {
    pub brush: StructuredBrush,
    pub points: Vec<StructuredPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredBrush {
    /// Index into [`StructuredPainting::brushes`]. Signed so that foreign
    /// documents with `-1` still parse and fall back to the default brush.
    pub index: i64,
    pub color: [f64; 3],
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredPoint {
    pub orientation: [f64; 4],
    pub position: [f64; 3],
    pub pressure: f64,
    pub timestamp: u32,
}

/// Round to the structured format's fixed precision
pub fn round_fixed(value: f32) -> f64 {
    let scale = 10f64.powi(STRUCTURED_PRECISION);
    (f64::from(value) * scale).round() / scale
}

fn round_all<const N: usize>(values: [f32; N]) -> [f64; N] {
    values.map(round_fixed)
}

fn narrow_all<const N: usize>(values: [f64; N]) -> [f32; N] {
    values.map(|v| v as f32)
}

/// Build the JSON tree for a document.
pub fn to_structured(document: &Document) -> StructuredPainting {
    let strokes = document
        .strokes
        .iter()
        .map(|stroke| StructuredStroke {
            brush: StructuredBrush {
                index: stroke.brush_index as i64,
                color: round_all(stroke.color.to_array()),
                size: round_fixed(stroke.size),
            },
            points: stroke
                .points
                .iter()
                .map(|point| StructuredPoint {
                    orientation: round_all(point.orientation.to_array()),
                    position: round_all(point.position.to_array()),
                    pressure: round_fixed(point.pressure),
                    timestamp: point.timestamp,
                })
                .collect(),
        })
        .collect();

    StructuredPainting {
        version: document.version,
        brushes: document.brushes.clone(),
        strokes,
    }
}

/// Convert a parsed JSON tree back into a document.
///
/// Negative brush indices map to an index no table can hold, so they resolve
/// as unknown brushes.
pub fn from_structured(tree: &StructuredPainting) -> Document {
    let strokes = tree
        .strokes
        .iter()
        .map(|stroke| StrokeRecord {
            brush_index: usize::try_from(stroke.brush.index).unwrap_or(usize::MAX),
            color: Color::from_array(narrow_all(stroke.brush.color)),
            size: stroke.brush.size as f32,
            points: stroke
                .points
                .iter()
                .map(|point| Point {
                    position: Vec3::from_array(narrow_all(point.position)),
                    orientation: Quat::from_array(narrow_all(point.orientation)),
                    pressure: point.pressure as f32,
                    timestamp: point.timestamp,
                })
                .collect(),
        })
        .collect();

    Document {
        version: tree.version,
        brushes: tree.brushes.clone(),
        strokes,
    }
}

/// Serialize a document to a JSON string.
pub fn to_json_string(document: &Document) -> Result<String, FormatError> {
    Ok(serde_json::to_string(&to_structured(document))?)
}

/// Parse a JSON string into a tree.
pub fn parse_json(json: &str) -> Result<StructuredPainting, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse JSON bytes into a tree.
pub fn parse_json_slice(bytes: &[u8]) -> Result<StructuredPainting, LoadError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::constants::FORMAT_VERSION;

    fn document() -> Document {
        Document {
            version: FORMAT_VERSION,
            brushes: vec!["flat".into()],
            strokes: vec![StrokeRecord {
                brush_index: 0,
                color: Color::new(0.1234567, 0.0, 1.0),
                size: 0.05,
                points: vec![Point {
                    position: Vec3::new(1.0 / 3.0, 0.0, -2.5),
                    orientation: Quat::from_rotation_y(0.25),
                    pressure: 0.333_333_34,
                    timestamp: 4_000_000_000,
                }],
            }],
        }
    }

    #[test]
    fn test_round_fixed() {
        assert_eq!(round_fixed(0.0), 0.0);
        assert_eq!(round_fixed(1.0), 1.0);
        assert_abs_diff_eq!(round_fixed(1.0 / 3.0), 0.333333, epsilon = 1e-12);
        assert_abs_diff_eq!(round_fixed(-2.0000004), -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tree_shape() {
        let value = serde_json::to_value(to_structured(&document())).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["brushes"][0], "flat");
        assert_eq!(value["strokes"][0]["brush"]["index"], 0);
        assert_eq!(value["strokes"][0]["brush"]["color"][0], 0.123457);
        assert_eq!(value["strokes"][0]["points"][0]["position"][0], 0.333333);
        assert_eq!(value["strokes"][0]["points"][0]["timestamp"], 4_000_000_000u32);
    }

    #[test]
    fn test_round_trip_within_precision() {
        let original = document();
        let json = to_json_string(&original).unwrap();
        let restored = from_structured(&parse_json(&json).unwrap());

        assert_eq!(restored.brushes, original.brushes);
        let (a, b) = (&original.strokes[0], &restored.strokes[0]);
        assert_eq!(b.brush_index, 0);
        assert_abs_diff_eq!(a.size, b.size, epsilon = 1e-6);
        assert_abs_diff_eq!(a.color.r, b.color.r, epsilon = 1e-6);

        let (p, q) = (&a.points[0], &b.points[0]);
        assert_eq!(p.timestamp, q.timestamp);
        assert_abs_diff_eq!(p.pressure, q.pressure, epsilon = 1e-6);
        for (x, y) in p.position.to_array().iter().zip(q.position.to_array()) {
            assert_abs_diff_eq!(*x, y, epsilon = 1e-6);
        }
        for (x, y) in p.orientation.to_array().iter().zip(q.orientation.to_array()) {
            assert_abs_diff_eq!(*x, y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_negative_index_maps_out_of_range() {
        let json = r#"{"version":1,"brushes":[],"strokes":[
            {"brush":{"index":-1,"color":[0,0,0],"size":1},"points":[]}]}"#;
        let document = from_structured(&parse_json(json).unwrap());
        assert_eq!(document.strokes[0].brush_index, usize::MAX);
        assert!(document.brush_name(usize::MAX).is_none());
    }

    #[test]
    fn test_missing_field_is_error() {
        let err = parse_json(r#"{"version":1,"strokes":[]}"#).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
