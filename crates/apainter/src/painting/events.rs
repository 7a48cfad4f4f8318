//! Events emitted by a painting session for the rendering layer.

use crate::format::Format;

use super::StrokeHandle;

/// Events emitted by a [`super::Painting`].
///
/// Live capture and loading go through the same stroke creation path, so a
/// renderer sees one `StrokeCreated` per stroke either way.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintingEvent {
    /// A stroke was created and is ready to receive points.
    StrokeCreated { handle: StrokeHandle, brush: String },
    /// A load finished and every stroke in it has been created.
    ModelLoaded { format: Format, strokes: usize },
    /// All strokes were dropped; previously issued handles are stale.
    Cleared,
}
