//! Host that wires several views to one selection coordinator.
//!
//! Each view reports selections through its own controller. The merged
//! snapshot lands in an inbox and is applied to every view once the
//! interaction that produced it has returned.

use ahash::AHashMap;
use anyhow::{Context, Result};
use egui::Vec2;
use indexmap::IndexMap;
use std::sync::Arc;

use lv_core::events::events::{BrushesCleared, ViewCreated, ViewDisposed};
use lv_core::{
    Dataset, EventBus, SelectionCoordinator, SelectionInbox, SelectionSet, SelectionSubscriber,
    ViewId, ViewSelectionController,
};
use lv_render::{SceneDiff, Surface};

use crate::config::{RenderOptions, Size, ViewConfig};
use crate::error::ViewError;
use crate::view::{PointerEvent, ViewRenderer};

pub struct LinkedViews<S: Surface> {
    coordinator: Arc<SelectionCoordinator>,
    inbox: Arc<SelectionInbox>,
    event_bus: Arc<EventBus>,
    views: IndexMap<ViewId, ViewRenderer<S>>,
    /// Inputs of each view's latest render, replayed after a resize
    last_inputs: AHashMap<ViewId, (Arc<Dataset>, RenderOptions)>,
}

impl<S: Surface> LinkedViews<S> {
    pub fn new() -> Self {
        Self::with_event_bus(Arc::new(EventBus::new()))
    }

    pub fn with_event_bus(event_bus: Arc<EventBus>) -> Self {
        let coordinator = Arc::new(SelectionCoordinator::new().with_event_bus(event_bus.clone()));
        let inbox = Arc::new(SelectionInbox::new());
        coordinator.add_subscriber(inbox.clone() as Arc<dyn SelectionSubscriber>);
        Self {
            coordinator,
            inbox,
            event_bus,
            views: IndexMap::new(),
            last_inputs: AHashMap::new(),
        }
    }

    pub fn coordinator(&self) -> &Arc<SelectionCoordinator> {
        &self.coordinator
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// The merged selection of all views
    pub fn selection(&self) -> Arc<SelectionSet> {
        self.coordinator.merged()
    }

    pub fn view(&self, id: ViewId) -> Option<&ViewRenderer<S>> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut ViewRenderer<S>> {
        self.views.get_mut(&id)
    }

    pub fn view_ids(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.views.keys().copied()
    }

    /// Create `view` and start tracking its selection
    pub fn add_view(&mut self, mut view: ViewRenderer<S>, config: ViewConfig) -> Result<ViewId> {
        let id = view.id();
        view.create(config)
            .with_context(|| format!("Failed to create {} view", view.view_type()))?;
        self.coordinator.register_view(id);
        self.event_bus.publish(ViewCreated {
            view_id: id,
            view_type: view.view_type(),
        });
        self.views.insert(id, view);
        Ok(id)
    }

    /// Render one view and bring its highlight in line with the merged
    /// selection
    pub fn render(
        &mut self,
        id: ViewId,
        data: Arc<Dataset>,
        options: RenderOptions,
    ) -> Result<Option<SceneDiff>> {
        let view = self.views.get_mut(&id).ok_or(ViewError::UnknownView(id))?;
        let controller = Arc::new(ViewSelectionController::new(id, self.coordinator.clone()));
        let diff = view
            .render(data.clone(), controller, options.clone())
            .with_context(|| format!("Failed to render view {id}"))?;
        view.highlight(&self.coordinator.merged());
        self.last_inputs.insert(id, (data, options));
        Ok(diff)
    }

    pub fn render_all(&mut self, data: Arc<Dataset>, options: RenderOptions) -> Result<()> {
        let ids: Vec<ViewId> = self.views.keys().copied().collect();
        for id in ids {
            self.render(id, data.clone(), options.clone())?;
        }
        Ok(())
    }

    /// Route pointer input to one view, then propagate the selection
    pub fn handle_pointer(&mut self, id: ViewId, event: PointerEvent) -> Result<()> {
        let view = self.views.get_mut(&id).ok_or(ViewError::UnknownView(id))?;
        view.handle_pointer(event);
        self.flush_highlights();
        Ok(())
    }

    /// Remove every brush in every view and empty the merged selection
    pub fn clear_all(&mut self) {
        for view in self.views.values_mut() {
            view.clear_all_brushes();
        }
        self.coordinator.clear_all();
        self.event_bus.publish(BrushesCleared);
        self.flush_highlights();
    }

    /// Remove one view's brushes and restyle every view for the new
    /// merged selection. Returns how many committed rectangles went away.
    pub fn clear_view_brushes(&mut self, id: ViewId) -> Result<usize> {
        let view = self.views.get_mut(&id).ok_or(ViewError::UnknownView(id))?;
        let removed = view.clear_all_brushes();
        self.flush_highlights();
        Ok(removed)
    }

    /// Recreate a view at a new size and replay its last render. The
    /// view's selection is kept; brush rectangles are not.
    pub fn resize(&mut self, id: ViewId, size: Size) -> Result<()> {
        let view = self.views.get_mut(&id).ok_or(ViewError::UnknownView(id))?;
        let config = ViewConfig {
            size,
            ..view.config().clone()
        };
        view.dispose();
        view.create(config)
            .with_context(|| format!("Failed to recreate view {id}"))?;

        if let Some((data, options)) = self.last_inputs.get(&id).cloned() {
            self.render(id, data, options)?;
        }
        self.flush_highlights();
        Ok(())
    }

    /// Dispose a view and drop its selection from the merged set
    pub fn remove_view(&mut self, id: ViewId) -> Option<ViewRenderer<S>> {
        let mut view = self.views.shift_remove(&id)?;
        view.dispose();
        self.last_inputs.remove(&id);
        self.coordinator.unregister_view(id);
        self.event_bus.publish(ViewDisposed { view_id: id });
        self.flush_highlights();
        Some(view)
    }

    /// Plot area of a view, if it is created
    pub fn plot_size(&self, id: ViewId) -> Option<Vec2> {
        self.views.get(&id)?.frame().map(|frame| frame.plot)
    }

    fn flush_highlights(&mut self) {
        if let Some(selection) = self.inbox.take() {
            for view in self.views.values_mut() {
                view.highlight(&selection);
            }
        }
    }
}

impl<S: Surface> Default for LinkedViews<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> Drop for LinkedViews<S> {
    fn drop(&mut self) {
        for view in self.views.values_mut() {
            view.dispose();
        }
    }
}
