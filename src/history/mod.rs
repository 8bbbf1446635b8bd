//! Persistent command history with shell-style recall.

pub mod buffer;
pub mod cursor;
pub mod entry;
pub mod error;
pub mod events;
pub mod frequency;
pub mod store;

pub use buffer::{BufferState, HistoryBuffer, LineLimits, PushOutcome, RecallMode};
pub use cursor::ScrollCursor;
pub use entry::HistoryEntry;
pub use error::{HistoryError, HistoryResult, WriteStage};
pub use events::{
    HistoryEvent, HistoryEventHandler, HistoryEventSender, HistoryHandle, SharedHistory,
};
pub use frequency::FrequencyMap;
pub use store::HistoryStore;
