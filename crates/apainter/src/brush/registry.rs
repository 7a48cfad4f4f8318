//! Name-keyed registry of brush descriptors with session-wide used tracking.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use super::variants::{FlatBrush, RibbonBrush};
use super::{Brush, BrushOptions};

/// Creates fresh variant state for each new stroke.
pub type BrushFactory = dyn Fn() -> Box<dyn Brush> + Send + Sync;

/// Error type for brush registration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(
        "The brush `{0}` has already been registered - check for two brushes sharing a name"
    )]
    DuplicateBrush(String),
    #[error("Brush name must not be empty")]
    EmptyName,
}

/// The named, shared definition of a brush type.
///
/// Strokes hold an `Arc` to their descriptor; they never own it.
pub struct BrushDescriptor {
    name: String,
    options: BrushOptions,
    factory: Box<BrushFactory>,
    /// Set once any stroke of this brush is created in the session
    used: AtomicBool,
}

impl std::fmt::Debug for BrushDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrushDescriptor")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("used", &self.is_used())
            .finish()
    }
}

impl BrushDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &BrushOptions {
        &self.options
    }

    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::Relaxed)
    }

    /// Build the variant state for a new stroke
    pub fn instantiate(&self) -> Box<dyn Brush> {
        (self.factory)()
    }

    /// Returns true if this call flipped the flag.
    fn mark_used(&self) -> bool {
        !self.used.swap(true, Ordering::Relaxed)
    }
}

/// Registry of brush descriptors keyed by name.
///
/// Registration needs `&mut self`; once built the registry is usually shared
/// behind an `Arc`, and used tracking works through `&self`.
///
/// Registration order is significant: the first registered brush is the
/// fallback for unknown names, and [`BrushRegistry::list_used`] reports used
/// brushes in registration order.
#[derive(Debug, Default)]
pub struct BrushRegistry {
    descriptors: Vec<Arc<BrushDescriptor>>,
    by_name: HashMap<String, usize>,
}

impl BrushRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `flat` and `ribbon` brushes.
    pub fn with_builtin_brushes() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register_brush::<FlatBrush>("flat", BrushOptions::default())?;
        registry.register_brush::<RibbonBrush>("ribbon", BrushOptions::new(0.001, 0))?;
        Ok(registry)
    }

    /// Register a brush type under a unique name.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        options: BrushOptions,
        factory: F,
    ) -> Result<Arc<BrushDescriptor>, RegistryError>
    where
        F: Fn() -> Box<dyn Brush> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateBrush(name));
        }

        let descriptor = Arc::new(BrushDescriptor {
            name: name.clone(),
            options,
            factory: Box::new(factory),
            used: AtomicBool::new(false),
        });

        debug!("BrushRegistry::register: `{}` {:?}", name, options);
        self.by_name.insert(name, self.descriptors.len());
        self.descriptors.push(Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Register a variant that can be built with `Default`.
    pub fn register_brush<B>(
        &mut self,
        name: impl Into<String>,
        options: BrushOptions,
    ) -> Result<Arc<BrushDescriptor>, RegistryError>
    where
        B: Brush + Default + 'static,
    {
        self.register(name, options, || Box::new(B::default()) as Box<dyn Brush>)
    }

    pub fn lookup(&self, name: &str) -> Option<&Arc<BrushDescriptor>> {
        self.by_name.get(name).map(|&index| &self.descriptors[index])
    }

    /// The first registered descriptor, used as the fallback brush
    pub fn first(&self) -> Option<&Arc<BrushDescriptor>> {
        self.descriptors.first()
    }

    /// Flag a brush as used. Idempotent; unknown names are ignored.
    ///
    /// Returns true only on the first call for a registered name.
    pub fn mark_used(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|descriptor| descriptor.mark_used())
    }

    /// Names of used brushes, in registration order.
    ///
    /// This is the index space for serialized brush references.
    pub fn list_used(&self) -> Vec<String> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.is_used())
            .map(|descriptor| descriptor.name.clone())
            .collect()
    }

    /// Clear every used flag, as when a session is torn down.
    pub fn reset_used(&self) {
        for descriptor in &self.descriptors {
            descriptor.used.store(false, Ordering::Relaxed);
        }
    }

    /// All registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.name())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
