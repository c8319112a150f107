//! Configuration shared by every chart kind

use egui::{vec2, Vec2};
use lv_core::SharedDomain;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Outer size of a view in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const DEFAULT: Size = Size {
        width: 800.0,
        height: 400.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Replace each missing (zero or non-finite) dimension with the default
    pub fn or_default(self) -> Self {
        let pick = |value: f32, fallback: f32| if value.is_finite() && value > 0.0 { value } else { fallback };
        Self {
            width: pick(self.width, Self::DEFAULT.width),
            height: pick(self.height, Self::DEFAULT.height),
        }
    }

    pub fn to_vec2(self) -> Vec2 {
        vec2(self.width, self.height)
    }
}

/// Space between the outer bounds and the plot area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margin {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }

    /// Translation from outer to plot-local coordinates
    pub fn offset(&self) -> Vec2 {
        vec2(self.left, self.top)
    }

    /// Size of the plot area inside `size`; may be non-positive
    pub fn plot_size(&self, size: Size) -> Vec2 {
        vec2(
            size.width - self.left - self.right,
            size.height - self.top - self.bottom,
        )
    }
}

/// One rendered categorical variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    /// Field read from each record
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Mark fill as a hex color
    #[serde(default)]
    pub fill_color: Option<String>,
    /// Outline stroke as a hex color
    #[serde(default)]
    pub stroke_color: Option<String>,
}

impl VariableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            fill_color: None,
            stroke_color: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_colors(mut self, fill: impl Into<String>, stroke: impl Into<String>) -> Self {
        self.fill_color = Some(fill.into());
        self.stroke_color = Some(stroke.into());
        self
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Settings passed to `create`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Outer size; zero dimensions fall back to 800x400
    #[serde(default)]
    pub size: Size,
    /// Common y-domain so linked views line up
    #[serde(default)]
    pub shared_domain: Option<SharedDomain>,
    /// Overrides the chart's default variable list
    #[serde(default)]
    pub variables: Option<Vec<VariableSpec>>,
}

impl ViewConfig {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            ..Self::default()
        }
    }

    pub fn with_shared_domain(mut self, domain: SharedDomain) -> Self {
        self.shared_domain = Some(domain);
        self
    }

    pub fn with_variables(mut self, variables: Vec<VariableSpec>) -> Self {
        self.variables = Some(variables);
        self
    }
}

/// Per-render overrides supplied alongside the data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub shared_domain: Option<SharedDomain>,
    pub variables: Option<Vec<VariableSpec>>,
}

/// Opacities and strokes used by the highlight pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyle {
    /// Mark opacity with nothing selected
    pub default_opacity: f32,
    pub selected_opacity: f32,
    /// Opacity of unselected marks while a selection exists
    pub dimmed_opacity: f32,
    pub selected_stroke_width: f32,
    pub selected_stroke_color: String,
    /// Outline opacity with nothing selected
    pub outline_opacity: f32,
    pub outline_dimmed_opacity: f32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            default_opacity: 0.85,
            selected_opacity: 1.0,
            dimmed_opacity: 0.12,
            selected_stroke_width: 1.2,
            selected_stroke_color: "#333333".to_string(),
            outline_opacity: 0.6,
            outline_dimmed_opacity: 0.25,
        }
    }
}

impl HighlightStyle {
    /// Marks that stay translucent unless selected
    pub fn translucent() -> Self {
        Self {
            default_opacity: 0.3,
            dimmed_opacity: 0.3,
            selected_stroke_width: 2.0,
            selected_stroke_color: "#ff0000".to_string(),
            ..Self::default()
        }
    }
}

/// Overlay the top-level keys of `patch` onto the serialized `current`
pub fn merge_config<T>(current: &T, patch: Value) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut base = serde_json::to_value(current)?;
    match (&mut base, patch) {
        (Value::Object(base), Value::Object(patch)) => base.extend(patch),
        (_, patch) => base = patch,
    }
    serde_json::from_value(base)
}
