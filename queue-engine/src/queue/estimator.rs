//! Wait-time estimation
//!
//! Pure position math: people ahead × service slot. The only wall-clock
//! use is [`clock_time_after`], which renders a display string and never
//! feeds back into the calculation.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Total minutes at or below this are a short visit
const LOW_URGENCY_MAX_MINUTES: u32 = 30;
/// Total minutes at or below this are a moderate visit
const MEDIUM_URGENCY_MAX_MINUTES: u32 = 60;

/// Urgency tier for a prospective visit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    fn for_total_minutes(total: u32) -> Self {
        if total <= LOW_URGENCY_MAX_MINUTES {
            Urgency::Low
        } else if total <= MEDIUM_URGENCY_MAX_MINUTES {
            Urgency::Medium
        } else {
            Urgency::High
        }
    }

    /// Fixed recommendation text per tier
    pub fn recommendation(self) -> &'static str {
        match self {
            Urgency::Low => "Short wait - good time to come in.",
            Urgency::Medium => "Moderate wait - arriving a little early is worth it.",
            Urgency::High => {
                "Long wait expected - consider visiting outside peak hours for faster service."
            }
        }
    }
}

/// Result of a wait-time estimate
///
/// Serialize-only: this is a response type, never parsed back.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WaitEstimate {
    /// Minutes until the customer's turn
    pub estimated_wait_minutes: u32,
    /// Wait plus the service itself
    pub total_minutes: u32,
    /// Urgency tier derived from `total_minutes`
    pub urgency: Urgency,
    /// Display-ready recommendation text
    pub recommendation: &'static str,
}

/// Estimate the wait for a customer with `people_ahead` in line
///
/// `estimated_wait_minutes = people_ahead × slot_minutes`. Inputs are
/// always well-formed when called from the store; defensively, a
/// negative `people_ahead` clamps to 0 and a non-positive service
/// duration clamps to 1 minute.
pub fn estimate(people_ahead: i32, service_duration_minutes: i32, slot_minutes: u32) -> WaitEstimate {
    let people_ahead = people_ahead.max(0) as u32;
    let service_duration = service_duration_minutes.max(1) as u32;

    let estimated_wait_minutes = wait_for_people_ahead(people_ahead, slot_minutes);
    let total_minutes = estimated_wait_minutes.saturating_add(service_duration);
    let urgency = Urgency::for_total_minutes(total_minutes);

    WaitEstimate {
        estimated_wait_minutes,
        total_minutes,
        urgency,
        recommendation: urgency.recommendation(),
    }
}

/// Position-derived wait in minutes (the store's per-entry estimate)
///
/// Saturates rather than overflowing; the slot comes from the
/// environment and is not bounded above.
pub fn wait_for_people_ahead(people_ahead: u32, slot_minutes: u32) -> u32 {
    people_ahead.saturating_mul(slot_minutes)
}

/// Render the local clock time `minutes` from now as "HH:MM"
///
/// Display only - estimates are minute counts, not clock math.
pub fn clock_time_after(minutes: u32) -> String {
    (Local::now() + chrono::Duration::minutes(minutes as i64))
        .format("%H:%M")
        .to_string()
}
