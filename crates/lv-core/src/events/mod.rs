use parking_lot::Mutex;
use ahash::AHashMap;
use std::any::{Any, TypeId};

/// Bus for lifecycle notifications between views and their host
pub struct EventBus {
    handlers: Mutex<AHashMap<TypeId, Vec<Box<dyn EventHandler>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Events published by the view layer
pub mod events {
    use super::Event;
    use crate::sync::ViewId;

    /// A view allocated a drawing surface
    #[derive(Debug, Clone)]
    pub struct ViewCreated {
        pub view_id: ViewId,
        pub view_type: &'static str,
    }

    /// A view released its drawing surface and listeners
    #[derive(Debug, Clone)]
    pub struct ViewDisposed {
        pub view_id: ViewId,
    }

    /// The merged selection was replaced
    #[derive(Debug, Clone)]
    pub struct SelectionMerged {
        /// View whose update triggered the merge, `None` for a global clear
        pub source: Option<ViewId>,
        pub selected: usize,
    }

    /// Every brush of every view was removed
    #[derive(Debug, Clone)]
    pub struct BrushesCleared;

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(ViewCreated, ViewDisposed, SelectionMerged, BrushesCleared);
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(AHashMap::new()),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        self.handlers
            .lock()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(handler);
    }

    /// Publish an event to every handler registered for its type
    pub fn publish<E: Event>(&self, event: E) {
        let mut handlers = self.handlers.lock();
        if let Some(event_handlers) = handlers.get_mut(&TypeId::of::<E>()) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

#[cfg(test)]
mod tests {
    use super::events::{SelectionMerged, ViewDisposed};
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_publish_by_type() {
        let bus = EventBus::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let counter = seen.clone();
        bus.subscribe::<SelectionMerged>(handler_from_fn(move |event| {
            if let Some(merged) = event.as_any().downcast_ref::<SelectionMerged>() {
                counter.fetch_add(merged.selected, Ordering::SeqCst);
            }
        }));

        bus.publish(SelectionMerged { source: None, selected: 3 });
        bus.publish(ViewDisposed { view_id: uuid::Uuid::new_v4() });

        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }
}
