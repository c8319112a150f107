//! Lifecycle and interaction of one chart bound to one surface.
//!
//! A renderer goes through `create` (allocate the surface, bind listeners),
//! any number of `render` and `highlight` calls, and `dispose`. Pointer
//! input arrives through `handle_pointer` in surface coordinates; selections
//! are reported to the controller given with the latest render.

use egui::{Color32, Pos2, Rect, Stroke, Vec2};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use lv_core::{Dataset, Record, SelectionController, SelectionSet, ViewId};
use lv_render::{Primitive, PrimitiveKey, Scene, SceneDiff, Shape, Style, Surface, SurfaceLayout};

use crate::brush::{format_readout, BrushEngine, BrushUpdate};
use crate::config::{RenderOptions, Size, ViewConfig};
use crate::error::{ViewError, ViewResult};
use crate::plots::utils::colors::{parse_hex_color, BRUSH_FILL};
use crate::plots::{ChartGeometry, ChartKind, DensityCurve, LayoutInput, Mark};
use crate::scales::LinearScale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uncreated,
    Created,
    Rendered,
    Disposed,
}

/// Pointer input in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
    Click(Pos2),
}

/// Where the plot area sits inside the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub size: Size,
    pub plot: Vec2,
    /// `None` when the surface could not apply the margin translation
    pub offset: Option<Vec2>,
}

/// Everything kept from the latest successful render
pub struct RenderState {
    pub dataset: Arc<Dataset>,
    pub controller: Arc<dyn SelectionController>,
    pub marks: Vec<Mark>,
    pub y_scale: LinearScale,
    pub densities: indexmap::IndexMap<(String, u8), DensityCurve>,
}

pub struct ViewRenderer<S: Surface> {
    id: ViewId,
    chart: ChartKind,
    surface: S,
    lifecycle: Lifecycle,
    config: ViewConfig,
    frame: Option<Frame>,
    state: Option<RenderState>,
    scene: Scene,
    brush: Option<BrushEngine>,
    selection: Arc<SelectionSet>,
    jitter_seed: u64,
    listening: bool,
}

impl<S: Surface> ViewRenderer<S> {
    pub fn new(chart: ChartKind, surface: S) -> Self {
        Self {
            id: Uuid::new_v4(),
            chart,
            surface,
            lifecycle: Lifecycle::Uncreated,
            config: ViewConfig::default(),
            frame: None,
            state: None,
            scene: Scene::new(),
            brush: None,
            selection: Arc::new(SelectionSet::new()),
            jitter_seed: rand::random(),
            listening: false,
        }
    }

    pub fn with_id(mut self, id: ViewId) -> Self {
        self.id = id;
        self
    }

    /// Fix the jitter sequence unless the chart configuration sets one
    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = seed;
        self
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn view_type(&self) -> &'static str {
        self.chart.view_type()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn chart(&self) -> &ChartKind {
        &self.chart
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn frame(&self) -> Option<Frame> {
        self.frame
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn render_state(&self) -> Option<&RenderState> {
        self.state.as_ref()
    }

    pub fn brush(&self) -> Option<&BrushEngine> {
        self.brush.as_ref()
    }

    /// Selection most recently passed to `highlight`
    pub fn selection(&self) -> &Arc<SelectionSet> {
        &self.selection
    }

    /// Allocate the surface and bind pointer listeners.
    ///
    /// Calling `create` again tears the previous surface down first, so
    /// listeners are never bound twice.
    pub fn create(&mut self, config: ViewConfig) -> ViewResult<()> {
        if matches!(self.lifecycle, Lifecycle::Created | Lifecycle::Rendered) {
            self.teardown();
        }

        let size = config.size.or_default();
        let margin = self.chart.margin();
        let plot = margin.plot_size(size);
        let layout = SurfaceLayout {
            size: size.to_vec2(),
            offset: Some(margin.offset()),
        };

        let offset = match self.surface.allocate(layout) {
            Ok(()) => layout.offset,
            Err(err) => {
                tracing::error!(view = %self.id, "Failed to allocate positioned surface: {}", err);
                let plain = SurfaceLayout { offset: None, ..layout };
                if let Err(err) = self.surface.allocate(plain) {
                    tracing::error!(view = %self.id, "Surface unavailable: {}", err);
                    self.lifecycle = Lifecycle::Uncreated;
                    return Err(ViewError::SurfaceUnavailable(err));
                }
                tracing::warn!(view = %self.id, "Drawing without margin translation");
                None
            }
        };

        self.frame = Some(Frame { size, plot, offset });
        self.scene = Scene::new();
        self.state = None;
        self.brush = Some(BrushEngine::new(
            self.chart.brush_mode(),
            Rect::from_min_size(Pos2::ZERO, plot),
        ));
        self.surface.attach_listeners();
        self.listening = true;
        self.config = config;
        self.lifecycle = Lifecycle::Created;

        tracing::info!(
            view = %self.id,
            "Created {} view {}x{}",
            self.chart.view_type(),
            size.width,
            size.height
        );
        Ok(())
    }

    /// Lay out `data` and reconcile the surface with the result.
    ///
    /// Returns `Ok(None)` and leaves the previous output untouched when
    /// there is nothing to draw.
    pub fn render(
        &mut self,
        data: Arc<Dataset>,
        controller: Arc<dyn SelectionController>,
        options: RenderOptions,
    ) -> ViewResult<Option<SceneDiff>> {
        let frame = match self.lifecycle {
            Lifecycle::Uncreated => return Err(ViewError::NotCreated),
            Lifecycle::Disposed => return Err(ViewError::Disposed),
            Lifecycle::Created | Lifecycle::Rendered => self.frame.ok_or(ViewError::NotCreated)?,
        };

        if data.is_empty() {
            tracing::debug!(view = %self.id, "Skipping render: no records");
            return Ok(None);
        }
        if !(frame.plot.x > 0.0 && frame.plot.y > 0.0) {
            tracing::warn!(view = %self.id, "Skipping render: plot area {:?} is empty", frame.plot);
            return Ok(None);
        }

        let shared_domain = options.shared_domain.or(self.config.shared_domain);
        let variables = options.variables.as_deref().or(self.config.variables.as_deref());
        let input = LayoutInput {
            dataset: &data,
            plot: frame.plot,
            shared_domain,
            variables,
        };

        let mut rng = StdRng::seed_from_u64(self.chart.jitter_seed().unwrap_or(self.jitter_seed));
        let Some(geometry) = self.chart.layout(&input, &mut rng) else {
            tracing::debug!(view = %self.id, "Skipping render: no valid values");
            return Ok(None);
        };
        let ChartGeometry {
            mut primitives,
            marks,
            y_scale,
            densities,
        } = geometry;

        primitives.extend(self.brush_primitives());
        let diff = self.scene.reconcile(primitives);
        self.surface.apply(&self.scene, &diff);

        tracing::debug!(
            view = %self.id,
            entered = diff.entered.len(),
            updated = diff.updated.len(),
            exited = diff.exited.len(),
            "Rendered {} marks",
            marks.len()
        );

        self.state = Some(RenderState {
            dataset: data,
            controller,
            marks,
            y_scale,
            densities,
        });
        self.lifecycle = Lifecycle::Rendered;

        if !self.selection.is_empty() {
            self.apply_highlight();
        }
        Ok(Some(diff))
    }

    /// Restyle marks for `selection`. Touches each primitive once and never
    /// changes geometry.
    pub fn highlight(&mut self, selection: &Arc<SelectionSet>) {
        self.selection = Arc::clone(selection);
        if self.state.is_some() {
            self.apply_highlight();
        }
    }

    fn apply_highlight(&mut self) {
        let style = self.chart.highlight();
        let stroke_color = parse_hex_color(&style.selected_stroke_color).unwrap_or(Color32::from_gray(0x33));
        let selected_stroke = Stroke::new(style.selected_stroke_width, stroke_color);
        let active = !self.selection.is_empty();

        let restyled: Vec<(PrimitiveKey, Style)> = self
            .scene
            .iter()
            .filter_map(|primitive| {
                let mut next = primitive.style;
                match (&primitive.key, primitive.record) {
                    (_, Some(index)) => {
                        if !active {
                            next.opacity = style.default_opacity;
                            next.stroke = Stroke::NONE;
                        } else if self.selection.contains(index) {
                            next.opacity = style.selected_opacity;
                            next.stroke = selected_stroke;
                        } else {
                            next.opacity = style.dimmed_opacity;
                            next.stroke = Stroke::NONE;
                        }
                    }
                    (PrimitiveKey::Outline { .. }, None) => {
                        next.opacity = if active {
                            style.outline_dimmed_opacity
                        } else {
                            style.outline_opacity
                        };
                    }
                    _ => return None,
                }
                (next != primitive.style).then(|| (primitive.key.clone(), next))
            })
            .collect();

        for (key, next) in restyled {
            self.scene.set_style(&key, next);
            self.surface.restyle(&key, next);
        }
    }

    /// Feed pointer input to the brush or the click handler
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if !self.listening || self.state.is_none() {
            return;
        }
        let Some(frame) = self.frame else {
            return;
        };
        let local = |pos: Pos2| pos - frame.offset.unwrap_or(Vec2::ZERO);

        if let PointerEvent::Click(pos) = event {
            self.click(local(pos));
            return;
        }
        let Some(brush) = self.brush.as_mut() else {
            return;
        };
        let update = match event {
            PointerEvent::Down(pos) => brush.pointer_down(local(pos)),
            PointerEvent::Move(pos) => brush.pointer_move(local(pos)),
            PointerEvent::Up(pos) => brush.pointer_up(local(pos)),
            PointerEvent::Click(_) => BrushUpdate::Unchanged,
        };
        self.apply_brush_update(update);
    }

    fn click(&self, pos: Pos2) {
        let Some(state) = &self.state else {
            return;
        };
        let hit = state
            .marks
            .iter()
            .filter(|mark| mark.pos.distance(pos) <= mark.radius)
            .min_by(|a, b| a.pos.distance(pos).total_cmp(&b.pos.distance(pos)));
        if let Some(mark) = hit {
            tracing::debug!(view = %self.id, record = mark.record.index(), "Point clicked");
            state.controller.on_point_click(Arc::clone(&mark.record));
        }
    }

    fn apply_brush_update(&mut self, update: BrushUpdate) {
        match update {
            BrushUpdate::Unchanged => {}
            BrushUpdate::Draft(rect) | BrushUpdate::Live(rect) => {
                let diff = self.scene.upsert(brush_rect(PrimitiveKey::BrushDraft, rect));
                self.surface.apply(&self.scene, &diff);
                if matches!(update, BrushUpdate::Live(_)) {
                    self.report_brush();
                }
            }
            BrushUpdate::LiveCleared => {
                let diff = self.scene.remove(&PrimitiveKey::BrushDraft);
                self.surface.apply(&self.scene, &diff);
                self.report(Vec::new());
            }
            BrushUpdate::Discarded => {
                let diff = self.scene.remove(&PrimitiveKey::BrushDraft);
                self.surface.apply(&self.scene, &diff);
                tracing::debug!(view = %self.id, "Discarded brush below minimum size");
            }
            BrushUpdate::Committed(committed) => {
                let mut diff = self.scene.remove(&PrimitiveKey::BrushDraft);
                let added = self
                    .scene
                    .upsert(brush_rect(PrimitiveKey::Brush(committed.id), committed.rect));
                diff.entered.extend(added.entered);
                diff.updated.extend(added.updated);
                self.surface.apply(&self.scene, &diff);
                tracing::debug!(view = %self.id, brush = committed.id, "Committed brush {:?}", committed.rect);
                self.report_brush();
            }
        }
    }

    fn report_brush(&self) {
        let (Some(state), Some(brush)) = (&self.state, &self.brush) else {
            return;
        };
        self.report(brush.select(&state.marks));
    }

    fn report(&self, records: Vec<Arc<Record>>) {
        if let Some(state) = &self.state {
            state.controller.on_brush_select(records);
        }
    }

    fn brush_primitives(&self) -> Vec<Primitive> {
        let Some(brush) = &self.brush else {
            return Vec::new();
        };
        let mut primitives: Vec<Primitive> = brush
            .committed()
            .iter()
            .map(|committed| brush_rect(PrimitiveKey::Brush(committed.id), committed.rect))
            .collect();
        if let Some(region) = brush.live_region() {
            primitives.push(brush_rect(PrimitiveKey::BrushDraft, region));
        }
        primitives
    }

    /// Remove every brush rectangle and report an empty brush selection
    pub fn clear_all_brushes(&mut self) -> usize {
        let Some(brush) = self.brush.as_mut() else {
            return 0;
        };
        let removed = brush.clear_all();

        let mut diff = self.scene.remove(&PrimitiveKey::BrushDraft);
        for id in &removed {
            diff.exited.extend(self.scene.remove(&PrimitiveKey::Brush(*id)).exited);
        }
        self.surface.apply(&self.scene, &diff);
        self.report(Vec::new());
        removed.len()
    }

    /// Value range covered by the live brush, low to high
    pub fn brush_range(&self) -> Option<(f64, f64)> {
        let region = self.brush.as_ref()?.live_region()?;
        let scale = &self.state.as_ref()?.y_scale;
        let (a, b) = (scale.invert(region.max.y), scale.invert(region.min.y));
        Some((a.min(b), a.max(b)))
    }

    /// Readout text for the live brush, e.g. `100 – 250`
    pub fn brush_readout(&self) -> Option<String> {
        self.brush_range().map(|(low, high)| format_readout(low, high))
    }

    /// Translate a plot-local position to surface coordinates
    pub fn to_surface(&self, local: Pos2) -> Pos2 {
        let offset = self.frame.and_then(|frame| frame.offset).unwrap_or(Vec2::ZERO);
        local + offset
    }

    /// Release the surface and unbind listeners. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if matches!(self.lifecycle, Lifecycle::Uncreated | Lifecycle::Disposed) {
            return;
        }
        self.teardown();
        self.lifecycle = Lifecycle::Disposed;
        tracing::info!(view = %self.id, "Disposed {} view", self.chart.view_type());
    }

    fn teardown(&mut self) {
        if self.listening {
            self.surface.detach_listeners();
            self.listening = false;
        }
        self.surface.release();
        self.scene.clear();
        self.state = None;
        self.brush = None;
        self.frame = None;
    }

    pub fn save_config(&self) -> Value {
        serde_json::json!({
            "chart": self.chart.save_config(),
            "view": serde_json::to_value(&self.config).unwrap_or(Value::Null),
        })
    }

    /// Apply a saved configuration. Takes effect on the next `create`.
    pub fn load_config(&mut self, config: Value) -> ViewResult<()> {
        if let Some(chart) = config.get("chart") {
            self.chart.load_config(chart.clone())?;
        }
        if let Some(view) = config.get("view") {
            self.config = serde_json::from_value(view.clone())?;
        }
        Ok(())
    }
}

impl<S: Surface> Drop for ViewRenderer<S> {
    fn drop(&mut self) {
        if self.listening {
            self.surface.detach_listeners();
        }
    }
}

fn brush_rect(key: PrimitiveKey, rect: Rect) -> Primitive {
    Primitive::new(
        key,
        Shape::Rect(rect),
        Style::filled(BRUSH_FILL, 0.3).with_stroke(Stroke::new(1.0, BRUSH_FILL)),
    )
}
