//! Rectangular brushing.
//!
//! Two modes exist. A live brush keeps one region that follows the pointer
//! and reports its selection on every move. A persistent multi-rect brush
//! commits a rectangle on release; every committed rectangle contributes to
//! the view's selection until all of them are cleared.

use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use lv_core::Record;

use crate::plots::Mark;

/// Axes a live brush spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushAxes {
    /// Vertical range only; spans the full plot width
    Y,
    XY,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BrushMode {
    Live { axes: BrushAxes },
    MultiRect { min_size: f32 },
}

/// A committed rectangle in plot-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommittedBrush {
    pub id: usize,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushState {
    Idle,
    Dragging { start: Pos2, current: Pos2 },
}

/// What a pointer event did to the brush
#[derive(Debug, Clone, PartialEq)]
pub enum BrushUpdate {
    Unchanged,
    /// The live region moved; selection follows it
    Live(Rect),
    /// The live region is gone, either released without area or replaced
    /// by a new drag
    LiveCleared,
    /// The rectangle being dragged changed
    Draft(Rect),
    /// The dragged rectangle was too small and was dropped
    Discarded,
    Committed(CommittedBrush),
}

#[derive(Debug, Clone)]
pub struct BrushEngine {
    mode: BrushMode,
    extent: Rect,
    state: BrushState,
    live: Option<Rect>,
    committed: Vec<CommittedBrush>,
    next_id: usize,
}

impl BrushEngine {
    pub fn new(mode: BrushMode, extent: Rect) -> Self {
        Self {
            mode,
            extent,
            state: BrushState::Idle,
            live: None,
            committed: Vec::new(),
            next_id: 0,
        }
    }

    pub fn mode(&self) -> BrushMode {
        self.mode
    }

    pub fn state(&self) -> BrushState {
        self.state
    }

    /// Region of the live brush, while it has one
    pub fn live_region(&self) -> Option<Rect> {
        self.live
    }

    pub fn committed(&self) -> &[CommittedBrush] {
        &self.committed
    }

    pub fn pointer_down(&mut self, pos: Pos2) -> BrushUpdate {
        let pos = self.constrain(pos);
        self.state = BrushState::Dragging { start: pos, current: pos };
        match self.mode {
            BrushMode::Live { .. } => match self.live.take() {
                Some(_) => BrushUpdate::LiveCleared,
                None => BrushUpdate::Unchanged,
            },
            BrushMode::MultiRect { .. } => BrushUpdate::Draft(Rect::from_two_pos(pos, pos)),
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2) -> BrushUpdate {
        let BrushState::Dragging { start, .. } = self.state else {
            return BrushUpdate::Unchanged;
        };
        let pos = self.constrain(pos);
        self.state = BrushState::Dragging { start, current: pos };
        match self.mode {
            BrushMode::Live { axes } => {
                let region = self.live_rect(start, pos, axes);
                self.live = Some(region);
                BrushUpdate::Live(region)
            }
            BrushMode::MultiRect { .. } => BrushUpdate::Draft(Rect::from_two_pos(start, pos)),
        }
    }

    pub fn pointer_up(&mut self, pos: Pos2) -> BrushUpdate {
        let BrushState::Dragging { start, .. } = self.state else {
            return BrushUpdate::Unchanged;
        };
        let pos = self.constrain(pos);
        self.state = BrushState::Idle;

        match self.mode {
            BrushMode::Live { axes } => {
                let region = self.live_rect(start, pos, axes);
                let degenerate = match axes {
                    BrushAxes::Y => region.height() <= 0.0,
                    BrushAxes::XY => region.width() <= 0.0 || region.height() <= 0.0,
                };
                if degenerate {
                    self.live = None;
                    BrushUpdate::LiveCleared
                } else {
                    self.live = Some(region);
                    BrushUpdate::Live(region)
                }
            }
            BrushMode::MultiRect { min_size } => {
                let rect = Rect::from_two_pos(start, pos);
                if rect.width() < min_size || rect.height() < min_size {
                    return BrushUpdate::Discarded;
                }
                let brush = CommittedBrush {
                    id: self.next_id,
                    rect,
                };
                self.next_id += 1;
                self.committed.push(brush);
                BrushUpdate::Committed(brush)
            }
        }
    }

    /// Drop every rectangle and any drag in progress, returning the ids of
    /// committed rectangles that were removed
    pub fn clear_all(&mut self) -> Vec<usize> {
        self.state = BrushState::Idle;
        self.live = None;
        self.committed.drain(..).map(|brush| brush.id).collect()
    }

    /// Records whose marks fall inside any active region, each once
    pub fn select(&self, marks: &[Mark]) -> Vec<Arc<Record>> {
        match self.mode {
            BrushMode::Live { .. } => match self.live {
                Some(region) => records_in(marks, |pos| contains(&region, pos)),
                None => Vec::new(),
            },
            BrushMode::MultiRect { .. } => {
                records_in(marks, |pos| self.committed.iter().any(|brush| contains(&brush.rect, pos)))
            }
        }
    }

    fn constrain(&self, pos: Pos2) -> Pos2 {
        match self.mode {
            BrushMode::Live { .. } => self.extent.clamp(pos),
            BrushMode::MultiRect { .. } => pos,
        }
    }

    fn live_rect(&self, start: Pos2, end: Pos2, axes: BrushAxes) -> Rect {
        match axes {
            BrushAxes::XY => Rect::from_two_pos(start, end),
            BrushAxes::Y => Rect::from_x_y_ranges(
                self.extent.x_range(),
                start.y.min(end.y)..=start.y.max(end.y),
            ),
        }
    }
}

/// Inclusive containment on all four edges
pub fn contains(rect: &Rect, pos: Pos2) -> bool {
    pos.x >= rect.min.x && pos.x <= rect.max.x && pos.y >= rect.min.y && pos.y <= rect.max.y
}

fn records_in(marks: &[Mark], hit: impl Fn(Pos2) -> bool) -> Vec<Arc<Record>> {
    let mut seen = ahash::AHashSet::new();
    marks
        .iter()
        .filter(|mark| hit(mark.pos))
        .filter(|mark| seen.insert(mark.record.index()))
        .map(|mark| mark.record.clone())
        .collect()
}

/// Format a value with thousands separators and no decimals
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Text shown while a vertical range is brushed
pub fn format_readout(low: f64, high: f64) -> String {
    format!("{} – {}", format_value(low), format_value(high))
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};
    use lv_render::PrimitiveKey;

    fn extent() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(200.0, 100.0))
    }

    fn mark(index: usize, x: f32, y: f32) -> Mark {
        Mark {
            key: PrimitiveKey::point(index),
            record: Arc::new(Record::builder(index).number("price", index as f64).build()),
            pos: pos2(x, y),
            radius: 3.0,
        }
    }

    #[test]
    fn test_hit_test_is_inclusive() {
        let rect = Rect::from_min_max(pos2(10.0, 10.0), pos2(20.0, 20.0));
        assert!(contains(&rect, pos2(10.0, 20.0)));
        assert!(contains(&rect, pos2(20.0, 10.0)));
        assert!(!contains(&rect, pos2(20.01, 15.0)));
    }

    #[test]
    fn test_multi_rect_discards_small() {
        let mut brush = BrushEngine::new(BrushMode::MultiRect { min_size: 4.0 }, extent());
        brush.pointer_down(pos2(10.0, 10.0));
        brush.pointer_move(pos2(13.0, 30.0));
        assert_eq!(brush.pointer_up(pos2(13.0, 30.0)), BrushUpdate::Discarded);
        assert!(brush.committed().is_empty());
        assert_eq!(brush.state(), BrushState::Idle);
    }

    #[test]
    fn test_multi_rect_union_dedups() {
        let mut brush = BrushEngine::new(BrushMode::MultiRect { min_size: 4.0 }, extent());
        brush.pointer_down(pos2(0.0, 0.0));
        assert!(matches!(brush.pointer_up(pos2(50.0, 50.0)), BrushUpdate::Committed(b) if b.id == 0));
        brush.pointer_down(pos2(100.0, 0.0));
        assert!(matches!(brush.pointer_up(pos2(150.0, 50.0)), BrushUpdate::Committed(b) if b.id == 1));

        let marks = vec![mark(1, 10.0, 10.0), mark(1, 120.0, 10.0), mark(2, 120.0, 20.0), mark(3, 75.0, 10.0)];
        let indices: Vec<usize> = brush.select(&marks).iter().map(|r| r.index()).collect();
        assert_eq!(indices, vec![1, 2]);

        assert_eq!(brush.clear_all(), vec![0, 1]);
        assert!(brush.select(&marks).is_empty());
    }

    #[test]
    fn test_live_y_brush_spans_width() {
        let mut brush = BrushEngine::new(BrushMode::Live { axes: BrushAxes::Y }, extent());
        assert_eq!(brush.pointer_down(pos2(50.0, 20.0)), BrushUpdate::Unchanged);
        let BrushUpdate::Live(region) = brush.pointer_move(pos2(60.0, 140.0)) else {
            panic!("expected a live region");
        };
        assert_eq!(region, Rect::from_min_max(pos2(0.0, 20.0), pos2(200.0, 100.0)));

        let marks = vec![mark(1, 190.0, 50.0), mark(2, 5.0, 10.0)];
        assert_eq!(brush.select(&marks).len(), 1);
    }

    #[test]
    fn test_live_release_without_area_clears() {
        let mut brush = BrushEngine::new(BrushMode::Live { axes: BrushAxes::XY }, extent());
        brush.pointer_down(pos2(30.0, 30.0));
        assert_eq!(brush.pointer_up(pos2(30.0, 30.0)), BrushUpdate::LiveCleared);
        assert!(brush.live_region().is_none());
        assert_eq!(brush.pointer_move(pos2(40.0, 40.0)), BrushUpdate::Unchanged);
    }

    #[test]
    fn test_new_live_drag_drops_previous_region() {
        let mut brush = BrushEngine::new(BrushMode::Live { axes: BrushAxes::Y }, extent());
        brush.pointer_down(pos2(10.0, 10.0));
        assert!(matches!(brush.pointer_up(pos2(10.0, 60.0)), BrushUpdate::Live(_)));
        let marks = vec![mark(1, 20.0, 30.0)];
        assert_eq!(brush.select(&marks).len(), 1);

        assert_eq!(brush.pointer_down(pos2(10.0, 90.0)), BrushUpdate::LiveCleared);
        assert!(brush.live_region().is_none());
        assert!(brush.select(&marks).is_empty());
    }

    #[test]
    fn test_format_readout() {
        assert_eq!(format_value(1234567.4), "1,234,567");
        assert_eq!(format_value(-1500.0), "-1,500");
        assert_eq!(format_value(999.0), "999");
        assert_eq!(format_readout(100.0, 250.0), "100 – 250");
    }
}
