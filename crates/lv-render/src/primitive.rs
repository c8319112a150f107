use egui::{Color32, Pos2, Rect, Stroke};
use std::fmt;

/// Axis a tick belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Stable identity of a primitive across re-renders
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveKey {
    /// A record's mark. `series` is set when one record contributes a mark
    /// per rendered variable.
    Point { record: usize, series: Option<String> },
    /// Density outline of one variable in one category band
    Outline { variable: String, category: u8 },
    /// Separator between two adjacent bands
    Separator(usize),
    Tick { axis: Axis, index: usize },
    AxisTitle(Axis),
    /// A committed brush rectangle
    Brush(usize),
    /// The brush currently being dragged
    BrushDraft,
}

impl PrimitiveKey {
    pub fn point(record: usize) -> Self {
        Self::Point { record, series: None }
    }

    pub fn series_point(record: usize, series: impl Into<String>) -> Self {
        Self::Point {
            record,
            series: Some(series.into()),
        }
    }

    pub fn is_brush(&self) -> bool {
        matches!(self, Self::Brush(_) | Self::BrushDraft)
    }
}

impl fmt::Display for PrimitiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point { record, series: None } => write!(f, "{record}"),
            Self::Point { record, series: Some(series) } => write!(f, "{record}_{series}"),
            Self::Outline { variable, category } => write!(f, "violin-{variable}-{category}"),
            Self::Separator(i) => write!(f, "sep-{i}"),
            Self::Tick { axis: Axis::X, index } => write!(f, "tick-x-{index}"),
            Self::Tick { axis: Axis::Y, index } => write!(f, "tick-y-{index}"),
            Self::AxisTitle(Axis::X) => write!(f, "title-x"),
            Self::AxisTitle(Axis::Y) => write!(f, "title-y"),
            Self::Brush(id) => write!(f, "brush-{id}"),
            Self::BrushDraft => write!(f, "brush-draft"),
        }
    }
}

/// Half widths of a symmetric outline at one sampled height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineRow {
    pub y: f32,
    pub left: f32,
    pub right: f32,
}

/// Geometry in plot-local pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { center: Pos2, radius: f32 },
    Square { center: Pos2, size: f32 },
    Outline { rows: Vec<OutlineRow> },
    Line { from: Pos2, to: Pos2, dashed: bool },
    /// `angle` is a clockwise rotation in radians around `anchor`
    Text { anchor: Pos2, text: String, angle: f32 },
    Rect(Rect),
}

impl Shape {
    /// Position used for hit testing marks
    pub fn anchor(&self) -> Option<Pos2> {
        match self {
            Self::Circle { center, .. } | Self::Square { center, .. } => Some(*center),
            _ => None,
        }
    }
}

/// Paint attributes that a highlight pass may change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill: Color32,
    pub stroke: Stroke,
    pub opacity: f32,
}

impl Style {
    pub fn filled(fill: Color32, opacity: f32) -> Self {
        Self {
            fill,
            stroke: Stroke::NONE,
            opacity,
        }
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }
}

/// One positioned, keyed visual element
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub key: PrimitiveKey,
    pub shape: Shape,
    pub style: Style,
    /// Record this primitive stands for, if any
    pub record: Option<usize>,
}

impl Primitive {
    pub fn new(key: PrimitiveKey, shape: Shape, style: Style) -> Self {
        Self {
            key,
            shape,
            style,
            record: None,
        }
    }

    pub fn for_record(mut self, index: usize) -> Self {
        self.record = Some(index);
        self
    }
}
