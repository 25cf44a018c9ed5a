//! QueueSession - the facade external callers use
//!
//! Wraps a shared [`QueueStore`] with request-scoped bookkeeping:
//! `loading` is true for the duration of an operation, `error` holds
//! the last failure message until the next success, `last_update` is
//! stamped on every successful mutation.
//!
//! Mutations are async purely so a networked store can be substituted
//! later without changing callers; the in-memory store completes
//! synchronously. Store failures never propagate - they are logged,
//! converted to a display string, and surfaced through [`error`]
//! (the queue must never crash the page it backs).
//!
//! [`error`]: QueueSession::error

use std::sync::Arc;

use parking_lot::RwLock;

use shared::queue::{JoinQueueInput, QueueEntry, QueueEntryUpdate, QueueEvent, QueueStats};
use shared::util::now_millis;

use super::store::{QueueStore, StoreError};

/// Request-scoped bookkeeping
#[derive(Debug, Default)]
struct SessionState {
    loading: bool,
    error: Option<String>,
    last_update: Option<i64>,
}

/// Session facade over a shared queue store
#[derive(Debug)]
pub struct QueueSession {
    store: Arc<QueueStore>,
    state: RwLock<SessionState>,
}

impl QueueSession {
    /// Create a session over an injected store
    ///
    /// Multiple sessions may share one store; each keeps its own
    /// loading/error bookkeeping.
    pub fn new(store: Arc<QueueStore>) -> Self {
        Self {
            store,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// The underlying store (e.g. to subscribe to its events)
    pub fn store(&self) -> &Arc<QueueStore> {
        &self.store
    }

    // ========== Mutations ==========

    /// Add a customer to a salon's queue
    ///
    /// Returns the created entry, or `None` when the store rejected
    /// the request (the message is then available via [`error`]).
    ///
    /// [`error`]: QueueSession::error
    pub async fn add_to_queue(&self, input: JoinQueueInput) -> Option<QueueEntry> {
        self.begin();
        match self.store.add(input) {
            Ok(entry) => {
                self.succeed();
                Some(entry)
            }
            Err(err) => {
                self.fail(&err);
                None
            }
        }
    }

    /// Apply a status transition and/or notes edit to an entry
    pub async fn update_queue_entry(
        &self,
        salon_id: &str,
        entry_id: &str,
        update: QueueEntryUpdate,
    ) {
        self.begin();
        match self.store.update_entry(salon_id, entry_id, update) {
            Ok(_) => self.succeed(),
            Err(err) => self.fail(&err),
        }
    }

    /// Remove an entry from a salon's queue
    pub async fn remove_from_queue(&self, salon_id: &str, entry_id: &str) {
        self.begin();
        match self.store.remove(salon_id, entry_id) {
            Ok(_) => self.succeed(),
            Err(err) => self.fail(&err),
        }
    }

    /// Recompute positions and estimates for a salon's queue
    pub async fn refresh_queue(&self, salon_id: &str) {
        self.begin();
        self.store.refresh(salon_id);
        self.succeed();
    }

    /// Ingest an event from the real-time channel
    pub fn apply_external(&self, event: QueueEvent) {
        self.store.apply_external(event);
    }

    // ========== Read accessors (synchronous, side-effect-free) ==========

    /// Full wait estimate for a prospective visit
    pub fn estimate_wait(
        &self,
        people_ahead: i32,
        service_duration_minutes: i32,
    ) -> super::estimator::WaitEstimate {
        self.store
            .estimate_wait(people_ahead, service_duration_minutes)
    }

    /// All entries for a salon in join order
    pub fn queue_for_salon(&self, salon_id: &str) -> Vec<QueueEntry> {
        self.store.list_active(salon_id)
    }

    /// Current aggregate, or `None` until the salon's first mutation
    pub fn queue_stats(&self, salon_id: &str) -> Option<QueueStats> {
        self.store.stats(salon_id)
    }

    /// Last failure message; cleared by the next successful operation
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Whether an operation is currently in flight
    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Timestamp of the last successful mutation (Unix millis)
    pub fn last_update(&self) -> Option<i64> {
        self.state.read().last_update
    }

    // ========== Bookkeeping ==========

    // The in-memory store completes before begin/succeed return to the
    // caller, so `loading` is only observable mid-operation once a
    // deferred (networked) store is substituted.
    fn begin(&self) {
        self.state.write().loading = true;
    }

    fn succeed(&self) {
        let mut state = self.state.write();
        state.loading = false;
        state.error = None;
        state.last_update = Some(now_millis());
    }

    fn fail(&self, err: &StoreError) {
        tracing::warn!(error = %err, "Queue operation failed");
        let mut state = self.state.write();
        state.loading = false;
        state.error = Some(err.to_string());
    }
}
