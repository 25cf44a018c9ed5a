//! Queue management core
//!
//! - **store**: `QueueStore` - per-salon entries, all mutation logic,
//!   derived statistics and event broadcast
//! - **session**: `QueueSession` - the async facade callers use, with
//!   loading/error bookkeeping ("never crash the UI" contract)
//! - **estimator**: pure wait-time math
//!
//! # Data flow
//!
//! ```text
//! booking confirmed → QueueSession::add_to_queue
//!                          ↓
//!                     QueueStore (position + estimate, stats recompute)
//!                          ↓                    ↓
//!                     QueueEntry          Broadcast (QueueEvent)
//!                                               ↓
//!                                        All subscribers
//! ```
//!
//! Cross-salon operations never share state; same-salon mutations are
//! serialized by the store's per-salon map entry.

pub mod estimator;
pub mod session;
pub mod store;

// Re-exports
pub use estimator::{Urgency, WaitEstimate, estimate};
pub use session::QueueSession;
pub use store::{QueueStore, StoreError, StoreResult};

// Re-export shared types for convenience
pub use shared::queue::{
    EventPayload, JoinQueueInput, QueueEntry, QueueEntryUpdate, QueueEvent, QueueEventType,
    QueueStats, QueueStatus,
};
