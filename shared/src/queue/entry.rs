//! Queue entry - one customer's place in a salon's line
//!
//! `QueueStatus` is a closed enum with its legal transitions expressed
//! as a table on the type itself; callers never compare status strings.

use serde::{Deserialize, Serialize};

/// Queue entry status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    #[default]
    Waiting,
    Called,
    InService,
    Completed,
    NoShow,
}

impl QueueStatus {
    /// Whether `self → target` is a legal transition.
    ///
    /// The service chain is strict and one-directional:
    ///
    /// ```text
    /// Waiting → Called → InService → Completed
    /// Waiting → NoShow
    /// Called  → NoShow   (only when `no_show_from_called` is set)
    /// ```
    ///
    /// Skipping ahead (e.g. `Waiting → Completed`) and backward moves
    /// are rejected. Removal is not a transition - entries in any
    /// status may be removed explicitly.
    pub fn can_transition_to(self, target: QueueStatus, no_show_from_called: bool) -> bool {
        use QueueStatus::*;
        match (self, target) {
            (Waiting, Called) => true,
            (Called, InService) => true,
            (InService, Completed) => true,
            (Waiting, NoShow) => true,
            (Called, NoShow) => no_show_from_called,
            _ => false,
        }
    }

    /// Entries in the waiting set participate in position numbering.
    pub fn is_waiting(self) -> bool {
        self == QueueStatus::Waiting
    }

    /// Terminal statuses never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, QueueStatus::Completed | QueueStatus::NoShow)
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueStatus::Waiting => write!(f, "WAITING"),
            QueueStatus::Called => write!(f, "CALLED"),
            QueueStatus::InService => write!(f, "IN_SERVICE"),
            QueueStatus::Completed => write!(f, "COMPLETED"),
            QueueStatus::NoShow => write!(f, "NO_SHOW"),
        }
    }
}

/// One customer's position in a salon's queue
///
/// Owned exclusively by the queue store; all mutation flows through
/// the store's operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueEntry {
    /// Entry ID (assigned by the store)
    pub id: String,
    /// Salon this entry belongs to
    pub salon_id: String,
    /// External booking record that created this entry
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
    /// 1-based rank among this salon's WAITING entries (dense, no gaps)
    pub position: u32,
    /// Count of WAITING entries at assignment time
    pub total_in_queue: u32,
    /// Estimated wait in minutes (position-derived)
    pub estimated_wait_minutes: u32,
    /// Human-readable target clock time ("HH:MM") - display only
    pub estimated_time: String,
    /// Entry status
    pub status: QueueStatus,
    /// Join timestamp (Unix millis)
    pub joined_at: i64,
    /// Set when entering Called
    #[serde(skip_serializing_if = "Option::is_none")]
    pub called_at: Option<i64>,
    /// Set when entering InService
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    /// Set when entering Completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl QueueEntry {
    /// Whether this entry still counts toward waiting positions
    pub fn is_waiting(&self) -> bool {
        self.status.is_waiting()
    }
}
