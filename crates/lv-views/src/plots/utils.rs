//! Utilities for plot views

pub mod colors;
pub mod stats;

// Re-export commonly used items
pub use colors::{categorical_color, color_or_palette, parse_hex_color};
pub use stats::{DensityCurve, DensityGrid};
