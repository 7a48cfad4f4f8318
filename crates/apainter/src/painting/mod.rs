//! Painting session: live capture, loading and saving.
//!
//! A [`Painting`] owns its strokes and shares a [`BrushRegistry`] with any
//! other session in the process. The registry's used flags decide the brush
//! table written on save.
//!
//! [`Painting::begin_stroke`] and the loaders share one stroke creation path,
//! so listeners registered with [`Painting::add_event_listener`] see the same
//! events for loaded strokes as for live ones.

mod events;
mod persist;

pub use events::PaintingEvent;

use std::sync::Arc;

use apainter_config::PainterConfig;
use tracing::{debug, warn};

use crate::brush::{BrushDescriptor, BrushRegistry};
use crate::format::LoadWarning;
use crate::stroke::Stroke;
use crate::types::{Color, PointSample};

/// Opaque reference to a stroke in a [`Painting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrokeHandle(usize);

impl StrokeHandle {
    /// Position of the stroke in draw order
    pub fn index(self) -> usize {
        self.0
    }
}

/// Error type for capture operations.
#[derive(Debug, thiserror::Error)]
pub enum PaintingError {
    #[error("No brushes registered")]
    NoBrushes,
    #[error("Invalid stroke handle: {0:?}")]
    InvalidHandle(StrokeHandle),
}

/// An ordered collection of strokes plus the session state around it.
pub struct Painting {
    registry: Arc<BrushRegistry>,
    config: PainterConfig,
    /// Draw order; significant for replay
    strokes: Vec<Stroke>,
    #[allow(clippy::type_complexity)]
    event_listeners: Vec<Box<dyn Fn(PaintingEvent) + Send + Sync>>,
}

impl std::fmt::Debug for Painting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Painting")
            .field("config", &self.config)
            .field("stroke_count", &self.strokes.len())
            .field("listener_count", &self.event_listeners.len())
            .finish()
    }
}

impl Painting {
    /// Create an empty painting with the default config.
    pub fn new(registry: Arc<BrushRegistry>) -> Self {
        Self::with_config(registry, PainterConfig::default())
    }

    pub fn with_config(registry: Arc<BrushRegistry>, config: PainterConfig) -> Self {
        Self {
            registry,
            config,
            strokes: Vec::new(),
            event_listeners: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Arc<BrushRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn stroke(&self, handle: StrokeHandle) -> Option<&Stroke> {
        self.strokes.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Register a listener for stroke lifecycle events.
    pub fn add_event_listener<F>(&mut self, listener: F)
    where
        F: Fn(PaintingEvent) + Send + Sync + 'static,
    {
        self.event_listeners.push(Box::new(listener));
    }

    fn emit_event(&self, event: PaintingEvent) {
        for listener in &self.event_listeners {
            listener(event.clone());
        }
    }

    /// Start a new stroke.
    ///
    /// An unknown brush name is not an error: the first registered brush is
    /// used instead and a warning is logged.
    pub fn begin_stroke(
        &mut self,
        brush_name: &str,
        color: Color,
        size: f32,
    ) -> Result<StrokeHandle, PaintingError> {
        let (descriptor, _) = self.resolve_brush(Some(brush_name))?;
        Ok(self.create_stroke(descriptor, color, size))
    }

    /// Offer a sample to a stroke. Returns whether it was admitted.
    pub fn feed_point(
        &mut self,
        handle: StrokeHandle,
        sample: PointSample,
    ) -> Result<bool, PaintingError> {
        let stroke = self
            .strokes
            .get_mut(handle.0)
            .ok_or(PaintingError::InvalidHandle(handle))?;
        Ok(stroke.add_point(sample))
    }

    /// Forward a host frame tick to every stroke.
    pub fn tick(&mut self, time_ms: f64, delta_ms: f64) {
        for stroke in &mut self.strokes {
            stroke.tick(time_ms, delta_ms);
        }
    }

    /// Reset and drop every stroke. Brush used flags are left as they are.
    pub fn clear(&mut self) {
        for stroke in &mut self.strokes {
            stroke.reset();
        }
        let dropped = self.strokes.len();
        self.strokes.clear();
        debug!("Painting::clear: dropped {} strokes", dropped);
        self.emit_event(PaintingEvent::Cleared);
    }

    /// Look up `requested`, falling back to the first registered brush.
    fn resolve_brush(
        &self,
        requested: Option<&str>,
    ) -> Result<(Arc<BrushDescriptor>, Option<LoadWarning>), PaintingError> {
        if let Some(descriptor) = requested.and_then(|name| self.registry.lookup(name)) {
            return Ok((Arc::clone(descriptor), None));
        }

        let fallback = self.registry.first().ok_or(PaintingError::NoBrushes)?;
        let warning = LoadWarning::UnknownBrush {
            requested: requested.map(str::to_owned),
            substituted: fallback.name().to_owned(),
        };
        warn!("Painting: {}", warning);
        Ok((Arc::clone(fallback), Some(warning)))
    }

    fn create_stroke(
        &mut self,
        descriptor: Arc<BrushDescriptor>,
        color: Color,
        size: f32,
    ) -> StrokeHandle {
        if self.registry.mark_used(descriptor.name()) {
            debug!("Painting: brush `{}` used for the first time", descriptor.name());
        }

        let handle = StrokeHandle(self.strokes.len());
        let brush = descriptor.name().to_owned();
        self.strokes.push(Stroke::new(descriptor, color, size));
        debug!(
            "Painting::create_stroke: #{} brush=`{}` size={:.3}",
            handle.0, brush, size
        );

        self.emit_event(PaintingEvent::StrokeCreated { handle, brush });
        handle
    }
}
