/// Queue engine configuration
///
/// # Environment variables
///
/// All settings can be overridden through environment variables:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | QUEUE_SLOT_MINUTES | 15 | Average service slot used for wait estimates |
/// | QUEUE_NO_SHOW_FROM_CALLED | true | Whether CALLED → NO_SHOW is a legal transition |
/// | QUEUE_PEAK_HOURS | 12:00-14:00,17:00-20:00 | Informational peak hours shown in stats |
///
/// # Example
///
/// ```ignore
/// QUEUE_SLOT_MINUTES=20 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Average minutes one customer occupies a chair
    pub slot_minutes: u32,
    /// Whether a salon may mark a CALLED customer as a no-show
    pub no_show_from_called: bool,
    /// Informational peak hours, surfaced in stats as-is
    pub peak_hours: Vec<String>,
}

impl QueueConfig {
    /// Load configuration from environment variables
    ///
    /// Unset or unparseable variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            slot_minutes: std::env::var("QUEUE_SLOT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&m| m > 0)
                .unwrap_or(15),
            no_show_from_called: std::env::var("QUEUE_NO_SHOW_FROM_CALLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            peak_hours: std::env::var("QUEUE_PEAK_HOURS")
                .map(|v| parse_peak_hours(&v))
                .unwrap_or_else(|_| default_peak_hours()),
        }
    }

    /// Override the service slot, keeping the other defaults
    ///
    /// Mostly used by tests that need deterministic estimates.
    pub fn with_slot_minutes(slot_minutes: u32) -> Self {
        Self {
            slot_minutes,
            ..Self::default()
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            slot_minutes: 15,
            no_show_from_called: true,
            peak_hours: default_peak_hours(),
        }
    }
}

fn default_peak_hours() -> Vec<String> {
    vec!["12:00-14:00".to_string(), "17:00-20:00".to_string()]
}

fn parse_peak_hours(raw: &str) -> Vec<String> {
    let hours: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if hours.is_empty() {
        default_peak_hours()
    } else {
        hours
    }
}
