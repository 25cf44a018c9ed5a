//! Queue events - facts broadcast after each successful mutation
//!
//! Payloads carry full entry/stats snapshots so a real-time viewer can
//! apply them without reading back from the owning store.

use super::entry::QueueEntry;
use super::types::QueueStats;
use serde::{Deserialize, Serialize};

/// Queue event - broadcast record for real-time viewers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEvent {
    /// Event unique ID
    pub event_id: String,
    /// Store-global sequence number (authoritative ordering)
    pub sequence: u64,
    /// Salon this event belongs to
    pub salon_id: String,
    /// Server timestamp (Unix millis)
    pub timestamp: i64,
    /// Event type
    pub event_type: QueueEventType,
    /// Event payload
    pub payload: EventPayload,
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueEventType {
    CustomerJoined,
    EntryUpdated,
    EntryRemoved,
    QueueRepositioned,
    QueueRefreshed,
    StatsUpdated,
}

impl std::fmt::Display for QueueEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueEventType::CustomerJoined => write!(f, "CUSTOMER_JOINED"),
            QueueEventType::EntryUpdated => write!(f, "ENTRY_UPDATED"),
            QueueEventType::EntryRemoved => write!(f, "ENTRY_REMOVED"),
            QueueEventType::QueueRepositioned => write!(f, "QUEUE_REPOSITIONED"),
            QueueEventType::QueueRefreshed => write!(f, "QUEUE_REFRESHED"),
            QueueEventType::StatsUpdated => write!(f, "STATS_UPDATED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    CustomerJoined {
        entry: QueueEntry,
    },

    /// Status transition or notes edit - full snapshot after the change
    EntryUpdated {
        entry: QueueEntry,
    },

    EntryRemoved {
        entry_id: String,
    },

    /// WAITING entries after a reposition, in join order
    QueueRepositioned {
        entries: Vec<QueueEntry>,
    },

    /// WAITING entries after an explicit refresh, in join order
    QueueRefreshed {
        entries: Vec<QueueEntry>,
    },

    StatsUpdated {
        stats: QueueStats,
    },
}

impl QueueEvent {
    /// Create a new event with a server-assigned timestamp
    pub fn new(
        sequence: u64,
        salon_id: String,
        event_type: QueueEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            salon_id,
            timestamp: crate::util::now_millis(),
            event_type,
            payload,
        }
    }
}
