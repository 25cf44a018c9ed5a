//! QueueStore - per-salon queue state and all mutation logic
//!
//! The store owns every entry; booking flow and dashboards go through
//! the session facade, which calls into here. Each operation runs to
//! completion under its salon's map entry, so statistics are always
//! recomputed atomically with the entry mutation that triggered them.
//!
//! # Operation flow
//!
//! ```text
//! add / update_entry / remove / refresh
//!     ├─ 1. Lock the salon's map entry
//!     ├─ 2. Validate (input fields, existence, transition table)
//!     ├─ 3. Mutate entries
//!     ├─ 4. Reposition WAITING entries if the waiting set changed
//!     ├─ 5. Recompute salon stats
//!     ├─ 6. Release the entry
//!     └─ 7. Broadcast event(s)
//! ```
//!
//! Positions among WAITING entries are always dense 1..N in join
//! order; any entry leaving the waiting set (transition or removal)
//! immediately frees its position for everyone behind it.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::config::QueueConfig;
use shared::queue::{
    EventPayload, JoinQueueInput, QueueEntry, QueueEntryUpdate, QueueEvent, QueueEventType,
    QueueStats, QueueStatus,
};
use shared::util::now_millis;

use super::estimator::{clock_time_after, wait_for_people_ahead};

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid join request: {0}")]
    Validation(String),

    #[error("Queue entry not found: {entry_id} (salon {salon_id})")]
    NotFound { salon_id: String, entry_id: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: QueueStatus, to: QueueStatus },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One salon's queue: entries in join order plus the derived aggregate
#[derive(Debug, Default)]
struct SalonQueue {
    entries: Vec<QueueEntry>,
    stats: Option<QueueStats>,
}

/// In-memory queue store
///
/// Salons are fully isolated: each lives under its own `DashMap` key,
/// so same-salon mutations are serialized while different salons can
/// be mutated in parallel. A store-global sequence orders broadcast
/// events across all salons.
pub struct QueueStore {
    config: QueueConfig,
    salons: DashMap<String, SalonQueue>,
    sequence: AtomicU64,
    event_tx: broadcast::Sender<QueueEvent>,
}

impl std::fmt::Debug for QueueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueStore")
            .field("config", &self.config)
            .field("salons", &self.salons.len())
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish()
    }
}

impl QueueStore {
    /// Create a new store with the given configuration
    pub fn new(config: QueueConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            salons: DashMap::new(),
            sequence: AtomicU64::new(0),
            event_tx,
        }
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.event_tx.subscribe()
    }

    /// Engine configuration
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Broadcast events after a successful mutation (fire-and-forget)
    fn emit(&self, salon_id: &str, events: Vec<(QueueEventType, EventPayload)>) {
        for (event_type, payload) in events {
            let event = QueueEvent::new(
                self.next_sequence(),
                salon_id.to_string(),
                event_type,
                payload,
            );
            let _ = self.event_tx.send(event);
        }
    }

    // ========== Mutations ==========

    /// Add a customer to a salon's queue
    ///
    /// Position is one past the current WAITING count; the estimate is
    /// position math via the configured service slot. Always succeeds
    /// for a well-formed request - unknown salons get a fresh queue.
    pub fn add(&self, input: JoinQueueInput) -> StoreResult<QueueEntry> {
        validate_join_input(&input)?;

        let mut events = Vec::new();
        let entry = {
            let mut salon = self.salons.entry(input.salon_id.clone()).or_default();

            let people_ahead = waiting_count(&salon.entries);
            let wait = wait_for_people_ahead(people_ahead, self.config.slot_minutes);
            let entry = QueueEntry {
                id: uuid::Uuid::new_v4().to_string(),
                salon_id: input.salon_id.clone(),
                booking_id: input.booking_id,
                customer_name: input.customer_name,
                customer_phone: input.customer_phone,
                service_id: input.service_id,
                service_name: input.service_name,
                notes: input.notes,
                position: people_ahead + 1,
                total_in_queue: people_ahead + 1,
                estimated_wait_minutes: wait,
                estimated_time: clock_time_after(wait),
                status: QueueStatus::Waiting,
                joined_at: now_millis(),
                called_at: None,
                started_at: None,
                completed_at: None,
            };
            salon.entries.push(entry.clone());

            let stats = self.recompute_stats(&input.salon_id, &mut salon);
            events.push((
                QueueEventType::CustomerJoined,
                EventPayload::CustomerJoined {
                    entry: entry.clone(),
                },
            ));
            events.push((
                QueueEventType::StatsUpdated,
                EventPayload::StatsUpdated { stats },
            ));
            entry
        };

        tracing::info!(
            salon_id = %entry.salon_id,
            entry_id = %entry.id,
            position = entry.position,
            "Customer joined queue"
        );
        self.emit(&entry.salon_id, events);
        Ok(entry)
    }

    /// Apply a status transition and/or notes edit to an entry
    ///
    /// Status changes are checked against the `QueueStatus` transition
    /// table; entering Called/InService/Completed stamps the matching
    /// timestamp. Any transition out of WAITING repositions the
    /// remaining waiting entries.
    pub fn update_entry(
        &self,
        salon_id: &str,
        entry_id: &str,
        update: QueueEntryUpdate,
    ) -> StoreResult<QueueEntry> {
        let mut events = Vec::new();
        let updated = {
            let mut salon = self
                .salons
                .get_mut(salon_id)
                .ok_or_else(|| not_found(salon_id, entry_id))?;
            let idx = salon
                .entries
                .iter()
                .position(|e| e.id == entry_id)
                .ok_or_else(|| not_found(salon_id, entry_id))?;

            let mut left_waiting = false;
            if let Some(new_status) = update.status {
                let from = salon.entries[idx].status;
                if !from.can_transition_to(new_status, self.config.no_show_from_called) {
                    tracing::warn!(
                        salon_id,
                        entry_id,
                        from = %from,
                        to = %new_status,
                        "Rejected status transition"
                    );
                    return Err(StoreError::InvalidTransition {
                        from,
                        to: new_status,
                    });
                }

                let now = now_millis();
                let entry = &mut salon.entries[idx];
                entry.status = new_status;
                match new_status {
                    QueueStatus::Called => entry.called_at = Some(now),
                    QueueStatus::InService => entry.started_at = Some(now),
                    QueueStatus::Completed => entry.completed_at = Some(now),
                    // NoShow keeps its history as-is; Waiting is unreachable
                    // (no transition enters it)
                    QueueStatus::NoShow | QueueStatus::Waiting => {}
                }
                left_waiting = from.is_waiting();
            }

            if let Some(notes) = update.notes {
                salon.entries[idx].notes = Some(notes);
            }

            let updated = salon.entries[idx].clone();
            events.push((
                QueueEventType::EntryUpdated,
                EventPayload::EntryUpdated {
                    entry: updated.clone(),
                },
            ));

            if left_waiting {
                let repositioned = self.reposition_waiting(&mut salon.entries);
                events.push((
                    QueueEventType::QueueRepositioned,
                    EventPayload::QueueRepositioned {
                        entries: repositioned,
                    },
                ));
            }

            let stats = self.recompute_stats(salon_id, &mut salon);
            events.push((
                QueueEventType::StatsUpdated,
                EventPayload::StatsUpdated { stats },
            ));
            updated
        };

        tracing::info!(
            salon_id,
            entry_id,
            status = %updated.status,
            "Queue entry updated"
        );
        self.emit(salon_id, events);
        Ok(updated)
    }

    /// Remove an entry unconditionally, regardless of status
    pub fn remove(&self, salon_id: &str, entry_id: &str) -> StoreResult<QueueEntry> {
        let mut events = Vec::new();
        let removed = {
            let mut salon = self
                .salons
                .get_mut(salon_id)
                .ok_or_else(|| not_found(salon_id, entry_id))?;
            let idx = salon
                .entries
                .iter()
                .position(|e| e.id == entry_id)
                .ok_or_else(|| not_found(salon_id, entry_id))?;

            let removed = salon.entries.remove(idx);
            events.push((
                QueueEventType::EntryRemoved,
                EventPayload::EntryRemoved {
                    entry_id: removed.id.clone(),
                },
            ));

            if removed.is_waiting() {
                let repositioned = self.reposition_waiting(&mut salon.entries);
                events.push((
                    QueueEventType::QueueRepositioned,
                    EventPayload::QueueRepositioned {
                        entries: repositioned,
                    },
                ));
            }

            let stats = self.recompute_stats(salon_id, &mut salon);
            events.push((
                QueueEventType::StatsUpdated,
                EventPayload::StatsUpdated { stats },
            ));
            removed
        };

        tracing::info!(salon_id, entry_id, "Queue entry removed");
        self.emit(salon_id, events);
        Ok(removed)
    }

    /// Recompute positions and estimates for all WAITING entries
    ///
    /// Idempotent; used to resynchronize displays after external time
    /// has passed. Unknown salons are a no-op.
    pub fn refresh(&self, salon_id: &str) {
        let mut events = Vec::new();
        {
            let Some(mut salon) = self.salons.get_mut(salon_id) else {
                return;
            };
            let refreshed = self.reposition_waiting(&mut salon.entries);
            events.push((
                QueueEventType::QueueRefreshed,
                EventPayload::QueueRefreshed { entries: refreshed },
            ));

            let stats = self.recompute_stats(salon_id, &mut salon);
            events.push((
                QueueEventType::StatsUpdated,
                EventPayload::StatsUpdated { stats },
            ));
        }
        self.emit(salon_id, events);
    }

    // ========== Queries ==========

    /// Full wait estimate for a prospective visit
    ///
    /// Pure passthrough to the estimator with this store's configured
    /// service slot; backs the "how long would I wait" page.
    pub fn estimate_wait(
        &self,
        people_ahead: i32,
        service_duration_minutes: i32,
    ) -> super::estimator::WaitEstimate {
        super::estimator::estimate(
            people_ahead,
            service_duration_minutes,
            self.config.slot_minutes,
        )
    }

    /// All entries for a salon in join order (full snapshot)
    pub fn list_active(&self, salon_id: &str) -> Vec<QueueEntry> {
        self.salons
            .get(salon_id)
            .map(|salon| salon.entries.clone())
            .unwrap_or_default()
    }

    /// Current aggregate, or `None` until the salon's first mutation
    pub fn stats(&self, salon_id: &str) -> Option<QueueStats> {
        self.salons
            .get(salon_id)
            .and_then(|salon| salon.stats.clone())
    }

    // ========== Real-time channel ingest ==========

    /// Apply an event produced by a remote peer's store
    ///
    /// Payloads carry full snapshots, so application is a blind
    /// upsert/remove/replace. Nothing is re-broadcast - the transport
    /// already delivered this event to every viewer.
    pub fn apply_external(&self, event: QueueEvent) {
        tracing::debug!(
            salon_id = %event.salon_id,
            event_type = %event.event_type,
            sequence = event.sequence,
            "Applying external queue event"
        );
        let mut salon = self.salons.entry(event.salon_id.clone()).or_default();
        match event.payload {
            EventPayload::CustomerJoined { entry } | EventPayload::EntryUpdated { entry } => {
                upsert(&mut salon.entries, entry);
            }
            EventPayload::EntryRemoved { entry_id } => {
                salon.entries.retain(|e| e.id != entry_id);
            }
            EventPayload::QueueRepositioned { entries }
            | EventPayload::QueueRefreshed { entries } => {
                for entry in entries {
                    upsert(&mut salon.entries, entry);
                }
            }
            EventPayload::StatsUpdated { stats } => {
                salon.stats = Some(stats);
            }
        }
    }

    // ========== Internal helpers ==========

    /// Reassign dense positions 1..N to WAITING entries in join order
    /// and recompute their estimates; returns the updated snapshots.
    fn reposition_waiting(&self, entries: &mut [QueueEntry]) -> Vec<QueueEntry> {
        let total = waiting_count(entries);
        let mut position = 0u32;
        let mut updated = Vec::with_capacity(total as usize);
        for entry in entries.iter_mut().filter(|e| e.is_waiting()) {
            position += 1;
            let wait = wait_for_people_ahead(position - 1, self.config.slot_minutes);
            entry.position = position;
            entry.total_in_queue = total;
            entry.estimated_wait_minutes = wait;
            entry.estimated_time = clock_time_after(wait);
            updated.push(entry.clone());
        }
        updated
    }

    /// Rebuild the salon's aggregate from its entries
    fn recompute_stats(&self, salon_id: &str, salon: &mut SalonQueue) -> QueueStats {
        let waiting: Vec<&QueueEntry> = salon.entries.iter().filter(|e| e.is_waiting()).collect();
        let total_waiting = waiting.len() as u32;
        let average_wait_time = if waiting.is_empty() {
            0
        } else {
            waiting
                .iter()
                .map(|e| e.estimated_wait_minutes)
                .sum::<u32>()
                / total_waiting
        };
        let stats = QueueStats {
            salon_id: salon_id.to_string(),
            total_waiting,
            total_in_service: count_status(&salon.entries, QueueStatus::InService),
            total_completed: count_status(&salon.entries, QueueStatus::Completed),
            average_wait_time,
            next_customer_estimated_time: waiting
                .iter()
                .find(|e| e.position == 1)
                .map(|e| e.estimated_time.clone()),
            peak_hours: self.config.peak_hours.clone(),
            updated_at: now_millis(),
        };
        salon.stats = Some(stats.clone());
        stats
    }
}

impl Default for QueueStore {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

fn not_found(salon_id: &str, entry_id: &str) -> StoreError {
    StoreError::NotFound {
        salon_id: salon_id.to_string(),
        entry_id: entry_id.to_string(),
    }
}

fn waiting_count(entries: &[QueueEntry]) -> u32 {
    entries.iter().filter(|e| e.is_waiting()).count() as u32
}

fn count_status(entries: &[QueueEntry], status: QueueStatus) -> u32 {
    entries.iter().filter(|e| e.status == status).count() as u32
}

fn upsert(entries: &mut Vec<QueueEntry>, entry: QueueEntry) {
    match entries.iter_mut().find(|e| e.id == entry.id) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

/// Validate a join request before creating an entry
fn validate_join_input(input: &JoinQueueInput) -> StoreResult<()> {
    fn require(field: &'static str, value: &str) -> StoreResult<()> {
        if value.trim().is_empty() {
            return Err(StoreError::Validation(format!(
                "{} must not be empty",
                field
            )));
        }
        Ok(())
    }

    require("salon_id", &input.salon_id)?;
    require("booking_id", &input.booking_id)?;
    require("customer_name", &input.customer_name)?;
    require("customer_phone", &input.customer_phone)?;
    require("service_id", &input.service_id)?;
    require("service_name", &input.service_name)?;
    Ok(())
}
