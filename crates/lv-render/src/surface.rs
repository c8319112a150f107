use egui::Vec2;
use thiserror::Error;

use crate::{PrimitiveKey, Scene, SceneDiff, Style};

/// Errors raised while allocating a drawing surface
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: f32, height: f32 },

    #[error("surface does not support positioned content")]
    TransformUnsupported,

    #[error("surface backend error: {0}")]
    Backend(String),
}

/// Outer size of a surface and the offset of its plot area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    pub size: Vec2,
    /// Translation applied to every primitive; `None` for a degraded surface
    /// that draws plot-local coordinates as-is
    pub offset: Option<Vec2>,
}

/// A drawing target exclusively owned by one view
pub trait Surface: Send {
    /// Discard any previous content and prepare a new drawing area
    fn allocate(&mut self, layout: SurfaceLayout) -> Result<(), SurfaceError>;

    /// Bring the surface in line with `scene` using the keys in `diff`
    fn apply(&mut self, scene: &Scene, diff: &SceneDiff);

    /// Change only the paint attributes of one primitive
    fn restyle(&mut self, key: &PrimitiveKey, style: Style);

    /// Start delivering pointer input to the owning view
    fn attach_listeners(&mut self);

    /// Stop delivering pointer input
    fn detach_listeners(&mut self);

    /// Remove every primitive and free the drawing area
    fn release(&mut self);
}
