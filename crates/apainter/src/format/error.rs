//! Error and warning types for saving and loading paintings.

use std::path::PathBuf;

use crate::codec::CodecError;
use crate::painting::PaintingError;

/// Errors raised while producing a binary or structured painting.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Too many used brushes: {0} (max 255)")]
    TooManyBrushes(usize),
    #[error("Too many strokes: {0}")]
    TooManyStrokes(usize),
    #[error("Too many points in one stroke: {0}")]
    TooManyPoints(usize),
    #[error("Brush index {index} outside a table of {brushes} brushes")]
    InvalidBrushIndex { index: usize, brushes: usize },
    #[error("Brush `{0}` has a stroke but is not flagged as used")]
    UnusedBrush(String),
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(PathBuf),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Failed to serialize painting: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal errors raised while loading a painting. Nothing is created when
/// one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Invalid `magic` header: {found:?}")]
    InvalidFormat { found: Option<String> },
    #[error("Unsupported version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(PathBuf),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Failed to parse painting: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Painting error: {0}")]
    Painting(#[from] PaintingError),
}

/// Non-fatal conditions met while loading. They are logged and reported,
/// and never change control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The document carries a version other than [`crate::FORMAT_VERSION`].
    VersionMismatch { found: u16, expected: u16 },
    /// A stroke's brush could not be resolved and was substituted.
    /// `requested` is `None` when the index fell outside the brush table.
    UnknownBrush {
        requested: Option<String>,
        substituted: String,
    },
    /// Bytes left over after the last stroke.
    TrailingBytes(usize),
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadWarning::VersionMismatch { found, expected } => {
                write!(f, "invalid version: {found} (expected: {expected})")
            }
            LoadWarning::UnknownBrush {
                requested: Some(name),
                substituted,
            } => write!(f, "invalid brush name: `{name}` using `{substituted}`"),
            LoadWarning::UnknownBrush {
                requested: None,
                substituted,
            } => write!(f, "brush index out of range, using `{substituted}`"),
            LoadWarning::TrailingBytes(count) => {
                write!(f, "{count} trailing bytes after last stroke")
            }
        }
    }
}
