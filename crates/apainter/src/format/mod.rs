//! Painting formats.
//!
//! Both formats are produced from and decoded into a [`Document`], a plain
//! snapshot of the used-brush table and every stroke. Decoding always builds
//! the full `Document` before any stroke is created, so a fatal error leaves
//! the painting untouched.
//!
//! - [`binary`] - the compact `.apa` layout
//! - [`structured`] - the JSON tree, floats rounded to 6 decimals

pub mod binary;
mod error;
pub mod structured;

pub use error::{FormatError, LoadError, LoadWarning};
pub use structured::{StructuredBrush, StructuredPainting, StructuredPoint, StructuredStroke};

use std::path::Path;

use crate::constants::{BINARY_EXTENSION, STRUCTURED_EXTENSION};
use crate::types::{Color, Point};

/// On-disk representation of a painting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Binary,
    Structured,
}

impl Format {
    /// Pick a format from a file extension (`.apa` or `.json`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case(BINARY_EXTENSION) {
            Some(Format::Binary)
        } else if extension.eq_ignore_ascii_case(STRUCTURED_EXTENSION) {
            Some(Format::Structured)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Binary => write!(f, "binary"),
            Format::Structured => write!(f, "structured"),
        }
    }
}

/// A serialized stroke. `brush_index` points into [`Document::brushes`].
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeRecord {
    pub brush_index: usize,
    pub color: Color,
    pub size: f32,
    pub points: Vec<Point>,
}

/// Snapshot of a painting as it is written to, or read from, either format.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub version: u16,
    /// Used-brush table; no duplicates
    pub brushes: Vec<String>,
    /// Strokes in draw order
    pub strokes: Vec<StrokeRecord>,
}

impl Document {
    /// Resolve a stroke's brush index to its name
    pub fn brush_name(&self, index: usize) -> Option<&str> {
        self.brushes.get(index).map(String::as_str)
    }

    /// Total number of points across all strokes
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub format: Format,
    /// Version tag found in the document
    pub version: u16,
    pub strokes_created: usize,
    /// Points kept after re-running the admission policy
    pub points_admitted: usize,
    /// Points present in the document but rejected by the current policy
    pub points_dropped: usize,
    pub warnings: Vec<LoadWarning>,
}
