//! Shared types for the salon queue system
//!
//! Wire-stable types used by the queue engine and by real-time channel
//! subscribers: queue entries, per-salon statistics, operation inputs
//! and broadcast events.

pub mod queue;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use queue::{
    EventPayload, JoinQueueInput, QueueEntry, QueueEntryUpdate, QueueEvent, QueueEventType,
    QueueStats, QueueStatus,
};
