//! Operation inputs and per-salon queue statistics

use super::entry::QueueStatus;
use serde::{Deserialize, Serialize};

/// Join request - produced by the booking flow when an appointment is
/// confirmed, or by a walk-in joining at the door
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinQueueInput {
    /// Salon to queue at
    pub salon_id: String,
    /// External booking record ID
    pub booking_id: String,
    /// Customer name
    pub customer_name: String,
    /// Customer phone
    pub customer_phone: String,
    /// Service ID
    pub service_id: String,
    /// Service name (snapshot for display)
    pub service_name: String,
    /// Free-text notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for a queue entry
///
/// `status: None` means a notes-only edit; status changes are
/// validated against the `QueueStatus` transition table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueEntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QueueStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl QueueEntryUpdate {
    /// Update that only changes status
    pub fn status(status: QueueStatus) -> Self {
        Self {
            status: Some(status),
            notes: None,
        }
    }

    /// Update that only changes notes
    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            status: None,
            notes: Some(notes.into()),
        }
    }
}

/// Per-salon derived aggregate
///
/// Recomputed by the store whenever entries change, never mutated
/// independently - `total_waiting` always equals the WAITING entry
/// count at computation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueStats {
    /// Salon these stats describe
    pub salon_id: String,
    /// Count of WAITING entries
    pub total_waiting: u32,
    /// Count of IN_SERVICE entries
    pub total_in_service: u32,
    /// Count of COMPLETED entries still in the collection
    pub total_completed: u32,
    /// Mean estimated wait over WAITING entries (minutes, 0 when empty)
    pub average_wait_time: u32,
    /// Target clock time of the position-1 entry, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_customer_estimated_time: Option<String>,
    /// Informational peak hours - configured, not derived from live data
    pub peak_hours: Vec<String>,
    /// Recompute timestamp (Unix millis)
    pub updated_at: i64,
}
