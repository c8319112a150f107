//! Drawing surface abstraction layer
//!
//! Views never draw directly. They describe what should be on screen as a
//! keyed set of primitives, reconcile it against what is already there and
//! hand the resulting add/update/remove sets to a [`Surface`].

mod primitive;
mod recording;
mod scene;
mod shapes;
mod surface;

pub use primitive::{Axis, OutlineRow, Primitive, PrimitiveKey, Shape, Style};
pub use recording::RecordingSurface;
pub use scene::{Scene, SceneDiff};
pub use shapes::{ShapeSurface, TextLabel};
pub use surface::{Surface, SurfaceError, SurfaceLayout};
