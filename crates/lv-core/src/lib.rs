//! Core functionality for the linked-view visualization system
//!
//! This crate provides the record model shared by every view and the
//! coordination of selections made independently in each of them.

pub mod data;
pub mod events;
pub mod selection;
pub mod sync;

// Re-export commonly used types
pub use data::{DataError, Dataset, FieldValue, NullConfig, Record, RecordBuilder, SharedDomain};
pub use events::EventBus;
pub use selection::SelectionSet;
pub use sync::{
    merge, SelectionController, SelectionCoordinator, SelectionInbox,
    SelectionSubscriber, ViewId, ViewSelectionController,
};
