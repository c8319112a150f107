//! Several count variables against one value on a shared x axis.
//!
//! Every variable gets its own marker; even series draw circles and odd
//! series draw squares. Series are shifted horizontally so marks of the
//! same record do not overlap.

use egui::pos2;
use lv_render::Axis;
use std::f32::consts::FRAC_PI_2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use lv_core::{Record, SharedDomain};
use lv_render::{Primitive, PrimitiveKey, Shape, Style};

use super::utils::colors::{self, color_or_palette};
use super::{axis_title, value_scale, x_ticks, y_ticks, ChartGeometry, LayoutInput, Mark};
use crate::brush::{BrushAxes, BrushMode};
use crate::config::{HighlightStyle, Margin, VariableSpec};
use crate::scales::LinearScale;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualScatterConfig {
    pub variables: Vec<VariableSpec>,
    pub y_column: String,
    pub margin: Margin,
    pub circle_radius: f32,
    pub square_size: f32,
    /// Horizontal distance between neighbouring series, in pixels
    pub series_offset: f32,
    pub tick_count: usize,
    pub show_y_axis: bool,
    pub highlight: HighlightStyle,
    pub brush: BrushMode,
}

impl Default for DualScatterConfig {
    fn default() -> Self {
        Self {
            variables: vec![
                VariableSpec::new("bedrooms")
                    .with_label("Bedrooms")
                    .with_colors(colors::BEDROOMS.0, colors::BEDROOMS.1),
                VariableSpec::new("bathrooms")
                    .with_label("Bathrooms")
                    .with_colors(colors::BATHROOMS.0, colors::BATHROOMS.1),
            ],
            y_column: "price".to_string(),
            margin: Margin::new(100.0, 10.0, 50.0, 100.0),
            circle_radius: 4.0,
            square_size: 8.0,
            series_offset: 12.0,
            tick_count: 6,
            show_y_axis: true,
            highlight: HighlightStyle::translucent(),
            brush: BrushMode::Live { axes: BrushAxes::XY },
        }
    }
}

/// Pixel shift of series `index` out of `count`, symmetric around zero
pub fn series_shift(index: usize, count: usize, offset: f32) -> f32 {
    (2.0 * index as f32 - (count as f32 - 1.0)) * offset
}

pub(crate) fn layout(config: &DualScatterConfig, input: &LayoutInput<'_>) -> Option<ChartGeometry> {
    let (width, height) = (input.plot.x, input.plot.y);
    let variables = input.variables.unwrap_or(&config.variables);
    if variables.is_empty() {
        return None;
    }

    let complete = |record: &Record| {
        record.number(&config.y_column).is_finite()
            && variables.iter().all(|v| record.number(&v.name).is_finite())
    };
    let valid: Vec<&Arc<Record>> = input.dataset.iter().filter(|r| complete(r)).collect();
    if valid.is_empty() {
        return None;
    }

    let ys: Vec<f64> = valid.iter().map(|r| r.number(&config.y_column)).collect();
    let y = value_scale(input.shared_domain, &ys, height)?;
    let x_domain = SharedDomain::from_values(
        valid
            .iter()
            .flat_map(|r| variables.iter().map(move |v| r.number(&v.name))),
    )?;
    let x = LinearScale::new((x_domain.min(), x_domain.max()), (0.0, width));

    let mut primitives = Vec::with_capacity(valid.len() * variables.len());
    let mut marks = Vec::with_capacity(valid.len() * variables.len());

    for (i, variable) in variables.iter().enumerate() {
        let fill = color_or_palette(variable.fill_color.as_deref(), i);
        let shift = series_shift(i, variables.len(), config.series_offset);

        for record in &valid {
            let pos = pos2(
                x.map(record.number(&variable.name)) + shift,
                y.map(record.number(&config.y_column)),
            );
            if !(pos.x.is_finite() && pos.y.is_finite()) {
                continue;
            }
            let (shape, radius) = if i % 2 == 0 {
                (
                    Shape::Circle {
                        center: pos,
                        radius: config.circle_radius,
                    },
                    config.circle_radius,
                )
            } else {
                (
                    Shape::Square {
                        center: pos,
                        size: config.square_size,
                    },
                    config.square_size / 2.0,
                )
            };
            let key = PrimitiveKey::series_point(record.index(), variable.name.clone());
            primitives.push(
                Primitive::new(key.clone(), shape, Style::filled(fill, config.highlight.default_opacity))
                    .for_record(record.index()),
            );
            marks.push(Mark {
                key,
                record: Arc::clone(record),
                pos,
                radius,
            });
        }
    }

    primitives.extend(x_ticks(&x, config.tick_count, height));
    let x_title = variables.iter().map(|v| v.name.as_str()).collect::<Vec<_>>().join(" / ");
    primitives.push(axis_title(Axis::X, pos2(width / 2.0, height + 40.0), x_title, 0.0));
    if config.show_y_axis {
        primitives.extend(y_ticks(&y, config.tick_count));
        primitives.push(axis_title(
            Axis::Y,
            pos2(-config.margin.left + 20.0, height / 2.0),
            config.y_column.clone(),
            -FRAC_PI_2,
        ));
    }

    Some(ChartGeometry {
        primitives,
        marks,
        y_scale: y,
        densities: IndexMap::new(),
    })
}
