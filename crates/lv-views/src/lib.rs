//! Linked chart views: violin scatter, scatter and dual scatter layouts,
//! brushing, highlighting and the host that keeps their selections in sync.

pub mod brush;
pub mod config;
pub mod error;
pub mod linked;
pub mod plots;
pub mod scales;
pub mod view;

pub use brush::{BrushAxes, BrushMode, BrushUpdate};
pub use config::{HighlightStyle, Margin, RenderOptions, Size, VariableSpec, ViewConfig};
pub use error::{ViewError, ViewResult};
pub use linked::LinkedViews;
pub use plots::{ChartKind, DualScatterConfig, Mark, ScatterConfig, ViolinScatterConfig};
pub use scales::{BandScale, LinearScale};
pub use view::{Lifecycle, PointerEvent, ViewRenderer};
