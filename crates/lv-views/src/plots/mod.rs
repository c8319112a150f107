//! Chart layouts.
//!
//! A layout turns a dataset into positioned primitives plus the marks that
//! pointer input is tested against. Layouts are pure apart from the jitter
//! generator handed in by the renderer.

pub mod dual_scatter;
pub mod scatter;
pub mod utils;
pub mod violin;

use egui::{pos2, Pos2, Vec2};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use lv_core::{Dataset, Record, SharedDomain};
use lv_render::{Axis, Primitive, PrimitiveKey, Shape, Style};

use crate::brush::{format_value, BrushMode};
use crate::config::{merge_config, HighlightStyle, Margin, VariableSpec};
use crate::scales::LinearScale;

pub use dual_scatter::DualScatterConfig;
pub use scatter::ScatterConfig;
pub use utils::stats::DensityCurve;
pub use violin::ViolinScatterConfig;

/// A hit-testable mark standing for one record
#[derive(Debug, Clone)]
pub struct Mark {
    pub key: PrimitiveKey,
    pub record: Arc<Record>,
    /// Center in plot-local coordinates
    pub pos: Pos2,
    pub radius: f32,
}

/// Inputs shared by every layout
pub struct LayoutInput<'a> {
    pub dataset: &'a Dataset,
    /// Size of the plot area
    pub plot: Vec2,
    pub shared_domain: Option<SharedDomain>,
    pub variables: Option<&'a [VariableSpec]>,
}

/// Output of a layout pass
#[derive(Debug, Clone)]
pub struct ChartGeometry {
    pub primitives: Vec<Primitive>,
    pub marks: Vec<Mark>,
    pub y_scale: LinearScale,
    /// Density curves keyed by variable and category
    pub densities: IndexMap<(String, u8), DensityCurve>,
}

/// The chart a view draws, with its configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    ViolinScatter(ViolinScatterConfig),
    Scatter(ScatterConfig),
    DualScatter(DualScatterConfig),
}

impl ChartKind {
    pub fn violin_scatter() -> Self {
        Self::ViolinScatter(ViolinScatterConfig::default())
    }

    pub fn scatter() -> Self {
        Self::Scatter(ScatterConfig::default())
    }

    pub fn dual_scatter() -> Self {
        Self::DualScatter(DualScatterConfig::default())
    }

    pub fn view_type(&self) -> &'static str {
        match self {
            Self::ViolinScatter(_) => "ViolinScatter",
            Self::Scatter(_) => "Scatter",
            Self::DualScatter(_) => "DualScatter",
        }
    }

    pub fn margin(&self) -> Margin {
        match self {
            Self::ViolinScatter(config) => config.margin,
            Self::Scatter(config) => config.margin,
            Self::DualScatter(config) => config.margin,
        }
    }

    pub fn brush_mode(&self) -> BrushMode {
        match self {
            Self::ViolinScatter(config) => config.brush,
            Self::Scatter(config) => config.brush,
            Self::DualScatter(config) => config.brush,
        }
    }

    pub fn highlight(&self) -> &HighlightStyle {
        match self {
            Self::ViolinScatter(config) => &config.highlight,
            Self::Scatter(config) => &config.highlight,
            Self::DualScatter(config) => &config.highlight,
        }
    }

    /// Jitter seed fixed by the configuration, if any
    pub fn jitter_seed(&self) -> Option<u64> {
        match self {
            Self::ViolinScatter(config) => config.jitter_seed,
            Self::Scatter(_) | Self::DualScatter(_) => None,
        }
    }

    /// Lay out the chart; `None` when the charted attribute has no valid value
    pub fn layout(&self, input: &LayoutInput<'_>, rng: &mut StdRng) -> Option<ChartGeometry> {
        match self {
            Self::ViolinScatter(config) => violin::layout(config, input, rng),
            Self::Scatter(config) => scatter::layout(config, input),
            Self::DualScatter(config) => dual_scatter::layout(config, input),
        }
    }

    pub fn save_config(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Apply the keys present in `config`, keeping every other setting
    pub fn load_config(&mut self, config: Value) -> Result<(), serde_json::Error> {
        *self = merge_config(self, config)?;
        Ok(())
    }
}

/// y-scale over the shared domain, or the extent of `values` without one
pub(crate) fn value_scale(
    shared: Option<SharedDomain>,
    values: &[f64],
    height: f32,
) -> Option<LinearScale> {
    let domain = shared.or_else(|| SharedDomain::from_values(values.iter().copied()))?;
    Some(LinearScale::new((domain.min(), domain.max()), (height, 0.0)).nice(10))
}

/// Labels along the left edge of the plot
pub(crate) fn y_ticks(scale: &LinearScale, count: usize) -> Vec<Primitive> {
    scale
        .ticks(count)
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            tick_label(Axis::Y, index, pos2(-8.0, scale.map(value)), format_tick(value))
        })
        .collect()
}

/// Labels below the plot
pub(crate) fn x_ticks(scale: &LinearScale, count: usize, height: f32) -> Vec<Primitive> {
    scale
        .ticks(count)
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            tick_label(Axis::X, index, pos2(scale.map(value), height + 16.0), format_tick(value))
        })
        .collect()
}

pub(crate) fn tick_label(axis: Axis, index: usize, anchor: Pos2, text: String) -> Primitive {
    Primitive::new(
        PrimitiveKey::Tick { axis, index },
        Shape::Text { anchor, text, angle: 0.0 },
        Style::filled(utils::colors::AXIS_TEXT, 1.0),
    )
}

/// Axis caption; `angle` rotates it around `anchor`
pub(crate) fn axis_title(axis: Axis, anchor: Pos2, text: String, angle: f32) -> Primitive {
    Primitive::new(
        PrimitiveKey::AxisTitle(axis),
        Shape::Text { anchor, text, angle },
        Style::filled(utils::colors::AXIS_TEXT, 1.0),
    )
}

fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        return format_value(value);
    }
    let text = format!("{value:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(250000.0), "250,000");
        assert_eq!(format_tick(0.2), "0.2");
        assert_eq!(format_tick(1.25), "1.25");
    }

    #[test]
    fn test_config_round_trips_through_load() {
        let mut chart = ChartKind::scatter();
        chart
            .load_config(serde_json::json!({"type": "scatter", "point_radius": 5.0}))
            .unwrap();
        let ChartKind::Scatter(config) = &chart else {
            panic!("chart kind changed");
        };
        assert_eq!(config.point_radius, 5.0);
        assert_eq!(config.x_column, "area");
        assert_eq!(chart.save_config()["type"], "scatter");
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let mut chart = ChartKind::violin_scatter();
        assert!(chart.load_config(serde_json::json!({"point_radius": "big"})).is_err());
        assert_eq!(chart, ChartKind::violin_scatter());
    }
}
