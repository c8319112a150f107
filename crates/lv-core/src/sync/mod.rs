//! Coordination of selections across views.
//!
//! Every view reports only its own selection. The coordinator keeps the
//! latest selection per view, recomputes the union keyed by record index on
//! every update and hands the merged snapshot to its subscribers. The merged
//! set is replaced wholesale; writers are serialized by the state lock and
//! readers always see the last committed snapshot.

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use tracing::debug;
use uuid::Uuid;

use crate::data::Record;
use crate::events::{events::SelectionMerged, EventBus};
use crate::selection::SelectionSet;

/// Unique identifier for a view
pub type ViewId = Uuid;

/// The two selection operations a view may report to its host
pub trait SelectionController: Send + Sync {
    /// A single primitive was clicked
    fn on_point_click(&self, record: Arc<Record>);

    /// A brush produced a new set of records (possibly empty)
    fn on_brush_select(&self, records: Vec<Arc<Record>>);
}

/// Receiver of merged selection snapshots
pub trait SelectionSubscriber: Send + Sync {
    fn on_selection_change(&self, selection: &Arc<SelectionSet>);
}

/// Union of every view's selection keyed by record index
pub fn merge(selections_by_view: &IndexMap<ViewId, Vec<Arc<Record>>>) -> SelectionSet {
    selections_by_view
        .values()
        .flat_map(|records| records.iter().cloned())
        .collect()
}

#[derive(Default)]
struct CoordinatorState {
    per_view: IndexMap<ViewId, Vec<Arc<Record>>>,
    merged: Arc<SelectionSet>,
}

/// Merges per-view selections into one canonical selection
pub struct SelectionCoordinator {
    state: RwLock<CoordinatorState>,
    subscribers: RwLock<Vec<Weak<dyn SelectionSubscriber>>>,
    event_bus: Option<Arc<EventBus>>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CoordinatorState::default()),
            subscribers: RwLock::new(Vec::new()),
            event_bus: None,
        }
    }

    /// Publish a `SelectionMerged` event on every commit
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Track a view with an empty selection
    pub fn register_view(&self, view_id: ViewId) {
        self.state.write().per_view.entry(view_id).or_default();
    }

    /// Forget a view and drop its contribution from the merged set
    pub fn unregister_view(&self, view_id: ViewId) -> Arc<SelectionSet> {
        self.commit(Some(view_id), |per_view| {
            per_view.shift_remove(&view_id);
        })
    }

    /// Replace one view's selection and re-merge
    pub fn update_view(&self, view_id: ViewId, records: Vec<Arc<Record>>) -> Arc<SelectionSet> {
        self.commit(Some(view_id), move |per_view| {
            per_view.insert(view_id, records);
        })
    }

    /// Clear one view's selection, leaving every other view's intact
    pub fn clear_view(&self, view_id: ViewId) -> Arc<SelectionSet> {
        self.update_view(view_id, Vec::new())
    }

    /// Reset every view's selection before merging
    pub fn clear_all(&self) -> Arc<SelectionSet> {
        self.commit(None, |per_view| {
            for records in per_view.values_mut() {
                records.clear();
            }
        })
    }

    /// The last committed merged selection
    pub fn merged(&self) -> Arc<SelectionSet> {
        self.state.read().merged.clone()
    }

    /// What a single view currently reports as selected
    pub fn view_selection(&self, view_id: ViewId) -> Vec<Arc<Record>> {
        self.state
            .read()
            .per_view
            .get(&view_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Add a subscriber; it is dropped automatically once released elsewhere
    pub fn add_subscriber(&self, subscriber: Arc<dyn SelectionSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    fn commit<F>(&self, source: Option<ViewId>, update: F) -> Arc<SelectionSet>
    where
        F: FnOnce(&mut IndexMap<ViewId, Vec<Arc<Record>>>),
    {
        let merged = {
            let mut state = self.state.write();
            update(&mut state.per_view);
            let merged = Arc::new(merge(&state.per_view));
            state.merged = merged.clone();
            merged
        };

        debug!(source = ?source, selected = merged.len(), "Merged view selections");

        if let Some(bus) = &self.event_bus {
            bus.publish(SelectionMerged {
                source,
                selected: merged.len(),
            });
        }
        self.notify_subscribers(&merged);
        merged
    }

    fn notify_subscribers(&self, merged: &Arc<SelectionSet>) {
        let live: Vec<Arc<dyn SelectionSubscriber>> = {
            let mut subscribers = self.subscribers.write();
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for subscriber in live {
            subscriber.on_selection_change(merged);
        }
    }
}

impl Default for SelectionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Controller handed to one view; writes that view's selection into the
/// coordinator. A click replaces the view's own selection with one record.
#[derive(Clone)]
pub struct ViewSelectionController {
    view_id: ViewId,
    coordinator: Arc<SelectionCoordinator>,
}

impl ViewSelectionController {
    pub fn new(view_id: ViewId, coordinator: Arc<SelectionCoordinator>) -> Self {
        coordinator.register_view(view_id);
        Self { view_id, coordinator }
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }
}

impl SelectionController for ViewSelectionController {
    fn on_point_click(&self, record: Arc<Record>) {
        self.coordinator.update_view(self.view_id, vec![record]);
    }

    fn on_brush_select(&self, records: Vec<Arc<Record>>) {
        self.coordinator.update_view(self.view_id, records);
    }
}

/// Subscriber that keeps only the newest snapshot until it is taken.
///
/// Lets a host apply highlights after an interaction has finished instead
/// of re-entering the view that is still handling the event.
#[derive(Default)]
pub struct SelectionInbox {
    latest: Mutex<Option<Arc<SelectionSet>>>,
}

impl SelectionInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Option<Arc<SelectionSet>> {
        self.latest.lock().take()
    }
}

impl SelectionSubscriber for SelectionInbox {
    fn on_selection_change(&self, selection: &Arc<SelectionSet>) {
        *self.latest.lock() = Some(selection.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(indices: &[usize]) -> Vec<Arc<Record>> {
        indices
            .iter()
            .map(|&i| Arc::new(Record::builder(i).number("price", i as f64).build()))
            .collect()
    }

    #[test]
    fn test_merge_is_union_by_index() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut by_view = IndexMap::new();
        by_view.insert(a, records(&[1, 2]));
        by_view.insert(b, records(&[2, 3]));

        let first = merge(&by_view);
        let second = merge(&by_view);
        assert_eq!(first, second);
        assert_eq!(first.indices().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_merge_of_empty_views_is_empty() {
        let mut by_view = IndexMap::new();
        by_view.insert(Uuid::new_v4(), Vec::new());
        by_view.insert(Uuid::new_v4(), Vec::new());
        assert!(merge(&by_view).is_empty());
    }

    #[test]
    fn test_clear_view_keeps_others() {
        let coordinator = SelectionCoordinator::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        coordinator.update_view(a, records(&[1]));
        coordinator.update_view(b, records(&[5, 6]));
        assert_eq!(coordinator.merged().len(), 3);

        let merged = coordinator.clear_view(a);
        assert_eq!(merged.indices().collect::<Vec<_>>(), vec![5, 6]);

        let merged = coordinator.clear_all();
        assert!(merged.is_empty());
        assert!(coordinator.view_selection(b).is_empty());
    }

    #[test]
    fn test_click_replaces_within_view() {
        let coordinator = Arc::new(SelectionCoordinator::new());
        let view = Uuid::new_v4();
        let controller = ViewSelectionController::new(view, coordinator.clone());

        controller.on_brush_select(records(&[1, 2, 3]));
        controller.on_point_click(records(&[9]).remove(0));

        assert_eq!(coordinator.merged().indices().collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn test_inbox_receives_latest_snapshot() {
        let coordinator = SelectionCoordinator::new();
        let inbox = Arc::new(SelectionInbox::new());
        coordinator.add_subscriber(inbox.clone());

        let view = Uuid::new_v4();
        coordinator.update_view(view, records(&[1]));
        coordinator.update_view(view, records(&[1, 2]));

        assert_eq!(inbox.take().map(|s| s.len()), Some(2));
        assert!(inbox.take().is_none());

        drop(inbox);
        coordinator.update_view(view, Vec::new());
    }
}
