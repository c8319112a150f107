//! Violin outlines with jittered points, one band per category value

use egui::{pos2, Color32, Stroke};
use indexmap::IndexMap;
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use lv_render::{OutlineRow, Primitive, PrimitiveKey, Shape, Style};

use super::utils::colors::{self, color_or_palette, parse_hex_color};
use super::utils::stats::{DensityGrid, BANDWIDTH_DIVISOR, GRID_POINTS};
use super::{tick_label, value_scale, y_ticks, ChartGeometry, LayoutInput, Mark};
use crate::brush::BrushMode;
use crate::config::{HighlightStyle, Margin, VariableSpec};
use crate::scales::{variable_center, BandScale, LinearScale, CATEGORIES};

/// Configuration for the violin scatter view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolinScatterConfig {
    /// Numeric column charted on the y axis
    pub value_column: String,

    /// Variables drawn side by side in every band
    pub variables: Vec<VariableSpec>,

    pub margin: Margin,

    /// Inner and outer padding between bands, as a fraction of the step
    pub band_padding: f32,

    /// Widest outline as a fraction of the half band
    pub violin_width: f32,

    /// Lower bound for the widest outline's half width, in pixels
    pub min_half_width: f32,

    /// Evaluation points per density curve
    pub grid_points: usize,

    /// Kernel bandwidth is the domain span divided by this
    pub bandwidth_divisor: f64,

    pub point_radius: f32,

    /// Jitter spread as a fraction of the local outline half width
    pub jitter: f32,

    pub show_separators: bool,

    /// Draw value ticks on the left. Off when a linked view already shows
    /// the shared value axis.
    pub show_y_axis: bool,

    /// Fixed jitter seed; each view picks its own when unset
    pub jitter_seed: Option<u64>,

    pub highlight: HighlightStyle,

    pub brush: BrushMode,
}

impl Default for ViolinScatterConfig {
    fn default() -> Self {
        Self {
            value_column: "price".to_string(),
            variables: default_variables(),
            margin: Margin::new(20.0, 16.0, 40.0, 120.0),
            band_padding: 0.06,
            violin_width: 0.72,
            min_half_width: 12.0,
            grid_points: GRID_POINTS,
            bandwidth_divisor: BANDWIDTH_DIVISOR,
            point_radius: 3.0,
            jitter: 0.9,
            show_separators: true,
            show_y_axis: false,
            jitter_seed: None,
            highlight: HighlightStyle::default(),
            brush: BrushMode::MultiRect { min_size: 4.0 },
        }
    }
}

pub fn default_variables() -> Vec<VariableSpec> {
    [
        ("bedrooms", "Bedrooms", colors::BEDROOMS),
        ("stories", "Stories", colors::STORIES),
        ("bathrooms", "Bathrooms", colors::BATHROOMS),
    ]
    .into_iter()
    .map(|(name, label, (fill, stroke))| VariableSpec::new(name).with_label(label).with_colors(fill, stroke))
    .collect()
}

pub(crate) fn layout(
    config: &ViolinScatterConfig,
    input: &LayoutInput<'_>,
    rng: &mut StdRng,
) -> Option<ChartGeometry> {
    let (width, height) = (input.plot.x, input.plot.y);
    let values = input.dataset.valid_values(&config.value_column);
    if values.is_empty() {
        return None;
    }
    let y = value_scale(input.shared_domain, &values, height)?;
    let variables = input.variables.unwrap_or(&config.variables);

    let (lo, hi) = y.domain();
    let grid = DensityGrid::with_resolution(lo, hi, config.grid_points, config.bandwidth_divisor);

    let mut densities = IndexMap::new();
    for variable in variables {
        for &category in &CATEGORIES {
            let sample: Vec<f64> = input
                .dataset
                .iter()
                .filter(|record| record.in_category(&variable.name, category))
                .map(|record| record.number(&config.value_column))
                .filter(|v| v.is_finite())
                .collect();
            densities.insert((variable.name.clone(), category), grid.estimate(&sample));
        }
    }

    let bands = BandScale::new(&CATEGORIES, (0.0, width), config.band_padding);
    let bandwidth = bands.bandwidth();
    let global_max = densities.values().map(|curve| curve.max_density()).fold(0.0, f64::max);
    let max_half_width = config.min_half_width.max(bandwidth / 2.0 * config.violin_width);
    let half_width = LinearScale::new(
        (0.0, if global_max > 0.0 { global_max } else { 1.0 }),
        (0.0, max_half_width),
    );

    let highlight = &config.highlight;
    let mut primitives = Vec::new();
    let mut marks = Vec::new();

    if config.show_separators {
        for (i, pair) in CATEGORIES.windows(2).enumerate() {
            let (Some(a), Some(b)) = (bands.position(pair[0]), bands.position(pair[1])) else {
                continue;
            };
            let x = (a + b) / 2.0 + bandwidth / 2.0;
            primitives.push(Primitive::new(
                PrimitiveKey::Separator(i),
                Shape::Line {
                    from: pos2(x, 0.0),
                    to: pos2(x, height),
                    dashed: true,
                },
                Style::filled(Color32::TRANSPARENT, 1.0).with_stroke(Stroke::new(1.0, colors::SEPARATOR)),
            ));
        }
    }

    for (band, &category) in CATEGORIES.iter().enumerate() {
        let Some(band_start) = bands.position(category) else {
            continue;
        };

        for (i, variable) in variables.iter().enumerate() {
            let Some(curve) = densities.get(&(variable.name.clone(), category)) else {
                continue;
            };
            let center = variable_center(band_start, bandwidth, i, variables.len());
            let fill = color_or_palette(variable.fill_color.as_deref(), i);
            let stroke = variable
                .stroke_color
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(fill);

            let rows = curve
                .samples()
                .iter()
                .map(|&(value, density)| {
                    let half = half_width.map(density);
                    OutlineRow {
                        y: y.map(value),
                        left: center - half,
                        right: center + half,
                    }
                })
                .collect();
            primitives.push(Primitive::new(
                PrimitiveKey::Outline {
                    variable: variable.name.clone(),
                    category,
                },
                Shape::Outline { rows },
                Style::filled(stroke.linear_multiply(0.4), highlight.outline_opacity)
                    .with_stroke(Stroke::new(1.0, stroke)),
            ));

            for record in input.dataset.iter() {
                if !record.in_category(&variable.name, category) {
                    continue;
                }
                let value = record.number(&config.value_column);
                let py = y.map(value);
                if !py.is_finite() {
                    continue;
                }
                let spread = (half_width.map(curve.nearest(value)) * config.jitter).max(1.0);
                let px = center + (rng.gen::<f32>() * 2.0 - 1.0) * spread;
                let key = PrimitiveKey::series_point(record.index(), variable.name.clone());
                let pos = pos2(px, py);

                primitives.push(
                    Primitive::new(
                        key.clone(),
                        Shape::Circle {
                            center: pos,
                            radius: config.point_radius,
                        },
                        Style::filled(fill, highlight.default_opacity),
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
        }

        primitives.push(tick_label(
            lv_render::Axis::X,
            band,
            pos2(band_start + bandwidth / 2.0, height + 14.0),
            category.to_string(),
        ));
    }

    if config.show_y_axis {
        primitives.extend(y_ticks(&y, 10));
    }

    Some(ChartGeometry {
        primitives,
        marks,
        y_scale: y,
        densities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;
    use lv_core::{Dataset, Record, SharedDomain};
    use lv_render::Axis;
    use rand::SeedableRng;

    fn dataset() -> Dataset {
        [(100.0, 1, 2, 1), (150.0, 2, 2, 1), (150.0, 2, 1, 2), (200.0, 3, 2, 2), (250.0, 4, 3, 3)]
            .into_iter()
            .enumerate()
            .map(|(i, (price, bedrooms, stories, bathrooms))| {
                Record::builder(i)
                    .number("price", price)
                    .number("bedrooms", bedrooms as f64)
                    .number("stories", stories as f64)
                    .number("bathrooms", bathrooms as f64)
                    .build()
            })
            .collect()
    }

    fn run(data: &Dataset, shared: Option<SharedDomain>, seed: u64) -> ChartGeometry {
        run_with(&ViolinScatterConfig::default(), data, shared, seed)
    }

    fn run_with(
        config: &ViolinScatterConfig,
        data: &Dataset,
        shared: Option<SharedDomain>,
        seed: u64,
    ) -> ChartGeometry {
        let input = LayoutInput {
            dataset: data,
            plot: vec2(664.0, 340.0),
            shared_domain: shared,
            variables: None,
        };
        layout(config, &input, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_value_axis_hidden_by_default() {
        let data = dataset();
        let ticks = |geometry: &ChartGeometry, axis: Axis| {
            geometry
                .primitives
                .iter()
                .filter(|p| matches!(p.key, PrimitiveKey::Tick { axis: a, .. } if a == axis))
                .count()
        };
        let geometry = run(&data, None, 0);
        assert_eq!(ticks(&geometry, Axis::Y), 0);
        assert_eq!(ticks(&geometry, Axis::X), CATEGORIES.len());

        let config = ViolinScatterConfig {
            show_y_axis: true,
            ..ViolinScatterConfig::default()
        };
        assert!(ticks(&run_with(&config, &data, None, 0), Axis::Y) > 0);
    }

    #[test]
    fn test_one_mark_per_record_and_variable() {
        let data = dataset();
        let geometry = run(&data, None, 7);
        assert_eq!(geometry.marks.len(), 15);
        assert!(geometry.marks.iter().all(|m| m.pos.x.is_finite() && m.pos.y.is_finite()));
        assert_eq!(geometry.densities.len(), 15);
        assert_eq!(geometry.y_scale.range(), (340.0, 0.0));
    }

    #[test]
    fn test_marks_stay_near_their_variable_center() {
        let data = dataset();
        let geometry = run(&data, None, 3);
        let config = ViolinScatterConfig::default();
        let bands = BandScale::new(&CATEGORIES, (0.0, 664.0), config.band_padding);
        let max_spread = config.min_half_width.max(bands.bandwidth() / 2.0 * config.violin_width);

        for mark in &geometry.marks {
            let PrimitiveKey::Point { series: Some(series), .. } = &mark.key else {
                panic!("violin marks carry their variable");
            };
            let index = config.variables.iter().position(|v| &v.name == series).unwrap();
            let category = mark.record.number(series) as u8;
            let center = variable_center(bands.position(category).unwrap(), bands.bandwidth(), index, 3);
            assert!((mark.pos.x - center).abs() <= max_spread);
        }
    }

    #[test]
    fn test_same_seed_same_positions() {
        let data = dataset();
        let a: Vec<_> = run(&data, None, 11).marks.iter().map(|m| m.pos).collect();
        let b: Vec<_> = run(&data, None, 11).marks.iter().map(|m| m.pos).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_values_skipped() {
        let mut records: Vec<Record> = dataset().iter().map(|r| (**r).clone()).collect();
        records.push(
            Record::builder(5)
                .raw("price", "abc")
                .number("bedrooms", 1.0)
                .number("stories", 1.0)
                .number("bathrooms", 1.0)
                .build(),
        );
        let data = Dataset::new(records);
        let geometry = run(&data, None, 1);
        assert_eq!(geometry.marks.len(), 15);
        assert!(geometry.marks.iter().all(|m| m.record.index() != 5));
        let bedrooms_total: usize = geometry
            .densities
            .iter()
            .filter(|((variable, _), _)| variable == "bedrooms")
            .map(|(_, curve)| curve.sample_size())
            .sum();
        assert_eq!(bedrooms_total, 5);
    }

    #[test]
    fn test_no_valid_values_yields_nothing() {
        let data: Dataset = (0..3).map(|i| Record::builder(i).raw("price", "n/a").build()).collect();
        let input = LayoutInput {
            dataset: &data,
            plot: vec2(664.0, 340.0),
            shared_domain: None,
            variables: None,
        };
        assert!(layout(&ViolinScatterConfig::default(), &input, &mut StdRng::seed_from_u64(0)).is_none());
    }
}
