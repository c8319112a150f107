//! Two-attribute scatter plot

use egui::pos2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

use lv_core::SharedDomain;
use lv_render::{Primitive, PrimitiveKey, Shape, Style};

use super::utils::colors::color_or_palette;
use super::{value_scale, x_ticks, y_ticks, ChartGeometry, LayoutInput, Mark};
use crate::brush::{BrushAxes, BrushMode};
use crate::config::{HighlightStyle, Margin};
use crate::scales::LinearScale;

/// Configuration for scatter plot view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterConfig {
    /// X-axis column
    pub x_column: String,

    /// Y-axis column, the attribute shared with linked views
    pub y_column: String,

    pub margin: Margin,

    pub point_radius: f32,

    /// Hex fill of every point
    pub point_color: String,

    /// Approximate number of ticks per axis
    pub tick_count: usize,

    pub show_axes: bool,

    pub highlight: HighlightStyle,

    pub brush: BrushMode,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            x_column: "area".to_string(),
            y_column: "price".to_string(),
            margin: Margin::new(100.0, 10.0, 50.0, 100.0),
            point_radius: 3.0,
            point_color: "#4682b4".to_string(),
            tick_count: 10,
            show_axes: true,
            highlight: HighlightStyle::translucent(),
            brush: BrushMode::Live { axes: BrushAxes::XY },
        }
    }
}

pub(crate) fn layout(config: &ScatterConfig, input: &LayoutInput<'_>) -> Option<ChartGeometry> {
    let (width, height) = (input.plot.x, input.plot.y);
    let ys = input.dataset.valid_values(&config.y_column);
    let x_domain = SharedDomain::from_values(input.dataset.valid_values(&config.x_column))?;
    let y = value_scale(input.shared_domain, &ys, height)?;
    let x = LinearScale::new((x_domain.min(), x_domain.max()), (0.0, width));

    let fill = color_or_palette(Some(&config.point_color), 0);
    let mut primitives = Vec::with_capacity(input.dataset.len());
    let mut marks = Vec::with_capacity(input.dataset.len());
    let mut hidden = 0;

    for record in input.dataset.iter() {
        let pos = pos2(
            x.map(record.number(&config.x_column)),
            y.map(record.number(&config.y_column)),
        );
        if !(pos.x.is_finite() && pos.y.is_finite()) {
            hidden += 1;
            continue;
        }
        let key = PrimitiveKey::point(record.index());
        primitives.push(
            Primitive::new(
                key.clone(),
                Shape::Circle {
                    center: pos,
                    radius: config.point_radius,
                },
                Style::filled(fill, config.highlight.default_opacity),
            )
            .for_record(record.index()),
        );
        marks.push(Mark {
            key,
            record: Arc::clone(record),
            pos,
            radius: config.point_radius,
        });
    }

    if hidden > 0 {
        trace!(hidden, "Records without a position were not drawn");
    }

    if config.show_axes {
        primitives.extend(x_ticks(&x, config.tick_count, height));
        primitives.extend(y_ticks(&y, config.tick_count));
    }

    Some(ChartGeometry {
        primitives,
        marks,
        y_scale: y,
        densities: IndexMap::new(),
    })
}
