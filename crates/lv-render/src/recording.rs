//! Headless surface that mirrors what would be on screen

use indexmap::IndexMap;

use crate::{Primitive, PrimitiveKey, Scene, SceneDiff, Style, Surface, SurfaceError, SurfaceLayout};

/// Surface keeping an in-memory copy of its primitives.
///
/// Used for tests and for hosts that only need the computed geometry.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    layout: Option<SurfaceLayout>,
    primitives: IndexMap<PrimitiveKey, Primitive>,
    listeners: usize,
    allocations: usize,
    last_diff: SceneDiff,
    reject_transform: bool,
    reject_all: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that refuses positioned content but accepts a plain one
    pub fn without_transform() -> Self {
        Self {
            reject_transform: true,
            ..Self::default()
        }
    }

    /// A surface whose allocation always fails
    pub fn unavailable() -> Self {
        Self {
            reject_all: true,
            ..Self::default()
        }
    }

    pub fn layout(&self) -> Option<SurfaceLayout> {
        self.layout
    }

    pub fn primitive(&self, key: &PrimitiveKey) -> Option<&Primitive> {
        self.primitives.get(key)
    }

    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.values()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Number of attached pointer listeners
    pub fn listeners(&self) -> usize {
        self.listeners
    }

    /// How many times a drawing area was allocated
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    pub fn last_diff(&self) -> &SceneDiff {
        &self.last_diff
    }
}

impl Surface for RecordingSurface {
    fn allocate(&mut self, layout: SurfaceLayout) -> Result<(), SurfaceError> {
        if self.reject_all {
            return Err(SurfaceError::Backend("no drawing backend".into()));
        }
        if self.reject_transform && layout.offset.is_some() {
            return Err(SurfaceError::TransformUnsupported);
        }
        if !(layout.size.x > 0.0 && layout.size.y > 0.0) {
            return Err(SurfaceError::InvalidSize {
                width: layout.size.x,
                height: layout.size.y,
            });
        }

        self.primitives.clear();
        self.layout = Some(layout);
        self.allocations += 1;
        Ok(())
    }

    fn apply(&mut self, scene: &Scene, diff: &SceneDiff) {
        for key in &diff.exited {
            self.primitives.shift_remove(key);
        }
        for key in diff.entered.iter().chain(&diff.updated) {
            if let Some(primitive) = scene.get(key) {
                self.primitives.insert(key.clone(), primitive.clone());
            }
        }
        // Styles may change without a geometry update.
        for primitive in scene.iter() {
            if let Some(mirrored) = self.primitives.get_mut(&primitive.key) {
                mirrored.style = primitive.style;
            }
        }
        self.last_diff = diff.clone();
    }

    fn restyle(&mut self, key: &PrimitiveKey, style: Style) {
        if let Some(primitive) = self.primitives.get_mut(key) {
            primitive.style = style;
        }
    }

    fn attach_listeners(&mut self) {
        self.listeners += 1;
    }

    fn detach_listeners(&mut self) {
        self.listeners = self.listeners.saturating_sub(1);
    }

    fn release(&mut self) {
        self.primitives.clear();
        self.layout = None;
    }
}
