//! apainter - freehand 3D stroke capture and persistence
//!
//! This crate provides the core of the stroke system:
//! - [`brush`] - Brush variants, options and the descriptor registry
//! - [`stroke::Stroke`] - Append-only point buffer with the admission policy
//! - [`codec`] - Cursor-based little-endian reader/writer
//! - [`format`] - Binary (`.apa`) and structured (JSON) painting formats
//! - [`painting::Painting`] - Capture/load/save session tying it all together

pub mod brush;
pub mod codec;
pub mod constants;
pub mod format;
pub mod painting;
pub mod stroke;
pub mod types;

pub use apainter_config::PainterConfig;
pub use brush::*;
pub use codec::*;
pub use constants::*;
pub use format::*;
pub use painting::*;
pub use stroke::*;
pub use types::*;
