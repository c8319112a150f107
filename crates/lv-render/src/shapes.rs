//! Surface producing egui shapes for an immediate-mode host

use egui::{Color32, Mesh, Pos2, Stroke, Vec2};
use indexmap::IndexMap;

use crate::{OutlineRow, Primitive, PrimitiveKey, Scene, SceneDiff, Shape, Style, Surface, SurfaceError, SurfaceLayout};

const DASH_LENGTH: f32 = 4.0;
const GAP_LENGTH: f32 = 4.0;

/// Text the host paints with its own fonts
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub pos: Pos2,
    pub text: String,
    pub color: Color32,
    pub angle: f32,
}

/// Retained primitives converted to `egui::Shape` on demand.
///
/// The host calls [`ShapeSurface::shapes`] each frame and extends its
/// painter with the result, offset by the top-left of the allocated rect.
#[derive(Debug, Default)]
pub struct ShapeSurface {
    layout: Option<SurfaceLayout>,
    primitives: IndexMap<PrimitiveKey, Primitive>,
    listening: bool,
}

impl ShapeSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outer size requested by the view
    pub fn desired_size(&self) -> Option<Vec2> {
        self.layout.map(|layout| layout.size)
    }

    /// Whether the host should forward pointer input
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Every non-text primitive as egui shapes, translated by `origin`
    pub fn shapes(&self, origin: Pos2) -> Vec<egui::Shape> {
        let offset = origin.to_vec2() + self.offset();
        let mut shapes = Vec::with_capacity(self.primitives.len());
        for primitive in self.primitives.values() {
            push_shapes(&mut shapes, primitive, offset);
        }
        shapes
    }

    /// Text primitives, translated by `origin`
    pub fn labels(&self, origin: Pos2) -> Vec<TextLabel> {
        let offset = origin.to_vec2() + self.offset();
        self.primitives
            .values()
            .filter_map(|primitive| match &primitive.shape {
                Shape::Text { anchor, text, angle } => Some(TextLabel {
                    pos: *anchor + offset,
                    text: text.clone(),
                    color: primitive.style.fill.linear_multiply(primitive.style.opacity),
                    angle: *angle,
                }),
                _ => None,
            })
            .collect()
    }

    fn offset(&self) -> Vec2 {
        self.layout.and_then(|layout| layout.offset).unwrap_or(Vec2::ZERO)
    }
}

fn faded(style: &Style) -> (Color32, Stroke) {
    let fill = style.fill.linear_multiply(style.opacity);
    let stroke = Stroke::new(style.stroke.width, style.stroke.color.linear_multiply(style.opacity));
    (fill, stroke)
}

fn push_shapes(out: &mut Vec<egui::Shape>, primitive: &Primitive, offset: Vec2) {
    let (fill, stroke) = faded(&primitive.style);

    match &primitive.shape {
        Shape::Circle { center, radius } => {
            out.push(egui::Shape::circle_filled(*center + offset, *radius, fill));
            if stroke.width > 0.0 {
                out.push(egui::Shape::circle_stroke(*center + offset, *radius, stroke));
            }
        }
        Shape::Square { center, size } => {
            let rect = egui::Rect::from_center_size(*center + offset, Vec2::splat(*size));
            out.push(egui::Shape::rect_filled(rect, 0.0, fill));
            if stroke.width > 0.0 {
                out.push(egui::Shape::rect_stroke(rect, 0.0, stroke));
            }
        }
        Shape::Outline { rows } => {
            if rows.len() < 2 {
                return;
            }
            out.push(egui::Shape::mesh(outline_mesh(rows, offset, fill)));
            if stroke.width > 0.0 {
                let mut ring: Vec<Pos2> = rows.iter().map(|r| Pos2::new(r.right, r.y) + offset).collect();
                ring.extend(rows.iter().rev().map(|r| Pos2::new(r.left, r.y) + offset));
                out.push(egui::Shape::closed_line(ring, stroke));
            }
        }
        Shape::Line { from, to, dashed } => {
            let points = [*from + offset, *to + offset];
            if *dashed {
                out.extend(egui::Shape::dashed_line(&points, stroke, DASH_LENGTH, GAP_LENGTH));
            } else {
                out.push(egui::Shape::line_segment(points, stroke));
            }
        }
        Shape::Rect(rect) => {
            let rect = rect.translate(offset);
            out.push(egui::Shape::rect_filled(rect, 0.0, fill));
            out.push(egui::Shape::rect_stroke(rect, 0.0, stroke));
        }
        Shape::Text { .. } => {}
    }
}

/// Fill a symmetric outline with one quad per pair of adjacent rows, which
/// stays correct for non-convex shapes.
fn outline_mesh(rows: &[OutlineRow], offset: Vec2, fill: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    for pair in rows.windows(2) {
        let base = mesh.vertices.len() as u32;
        mesh.colored_vertex(Pos2::new(pair[0].left, pair[0].y) + offset, fill);
        mesh.colored_vertex(Pos2::new(pair[0].right, pair[0].y) + offset, fill);
        mesh.colored_vertex(Pos2::new(pair[1].right, pair[1].y) + offset, fill);
        mesh.colored_vertex(Pos2::new(pair[1].left, pair[1].y) + offset, fill);
        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base, base + 2, base + 3);
    }
    mesh
}

impl Surface for ShapeSurface {
    fn allocate(&mut self, layout: SurfaceLayout) -> Result<(), SurfaceError> {
        if !(layout.size.x > 0.0 && layout.size.y > 0.0) {
            return Err(SurfaceError::InvalidSize {
                width: layout.size.x,
                height: layout.size.y,
            });
        }
        self.primitives.clear();
        self.layout = Some(layout);
        Ok(())
    }

    fn apply(&mut self, scene: &Scene, _diff: &SceneDiff) {
        // Rebuilt in scene order so draw order follows the view.
        self.primitives = scene
            .iter()
            .map(|primitive| (primitive.key.clone(), primitive.clone()))
            .collect();
    }

    fn restyle(&mut self, key: &PrimitiveKey, style: Style) {
        if let Some(primitive) = self.primitives.get_mut(key) {
            primitive.style = style;
        }
    }

    fn attach_listeners(&mut self) {
        self.listening = true;
    }

    fn detach_listeners(&mut self) {
        self.listening = false;
    }

    fn release(&mut self) {
        self.primitives.clear();
        self.layout = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn test_shapes_follow_scene() {
        let mut surface = ShapeSurface::new();
        surface
            .allocate(SurfaceLayout {
                size: vec2(200.0, 100.0),
                offset: Some(vec2(10.0, 5.0)),
            })
            .unwrap();

        let mut scene = Scene::new();
        let diff = scene.reconcile(vec![
            Primitive::new(
                PrimitiveKey::point(0),
                Shape::Circle { center: pos2(1.0, 1.0), radius: 3.0 },
                Style::filled(Color32::BLUE, 0.85),
            ),
            Primitive::new(
                PrimitiveKey::Outline { variable: "bedrooms".into(), category: 1 },
                Shape::Outline {
                    rows: vec![
                        OutlineRow { y: 0.0, left: -1.0, right: 1.0 },
                        OutlineRow { y: 5.0, left: -3.0, right: 3.0 },
                        OutlineRow { y: 9.0, left: 0.0, right: 0.0 },
                    ],
                },
                Style::filled(Color32::LIGHT_BLUE, 0.6).with_stroke(Stroke::new(1.0, Color32::BLUE)),
            ),
            Primitive::new(
                PrimitiveKey::Tick { axis: crate::Axis::X, index: 1 },
                Shape::Text { anchor: pos2(0.0, 0.0), text: "1".into(), angle: 0.0 },
                Style::filled(Color32::BLACK, 1.0),
            ),
        ]);
        surface.apply(&scene, &diff);

        // circle fill, outline mesh, outline stroke
        assert_eq!(surface.shapes(Pos2::ZERO).len(), 3);
        let labels = surface.labels(pos2(100.0, 100.0));
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].pos, pos2(110.0, 105.0));

        surface.release();
        assert!(surface.shapes(Pos2::ZERO).is_empty());
    }
}
