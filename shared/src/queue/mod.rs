//! Queue domain types
//!
//! - **entry**: `QueueEntry` and the `QueueStatus` state machine
//! - **types**: operation inputs and per-salon `QueueStats`
//! - **event**: `QueueEvent` broadcast records for real-time viewers

pub mod entry;
pub mod event;
pub mod types;

pub use entry::{QueueEntry, QueueStatus};
pub use event::{EventPayload, QueueEvent, QueueEventType};
pub use types::{JoinQueueInput, QueueEntryUpdate, QueueStats};
