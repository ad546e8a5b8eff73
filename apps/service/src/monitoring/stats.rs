use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::{CheckOutcome, CheckResult};

/// Rolling status derived from an endpoint's most recent results.
///
/// All fields are absent when no history exists: an endpoint that has never
/// been checked has undefined uptime, not 0%.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointSummary {
    pub last_outcome: Option<CheckOutcome>,
    pub last_checked: Option<DateTime<Utc>>,
    pub uptime_percent: Option<f64>,
}

/// Summarize `results` (ordered most recent first, as the sink returns them)
/// over at most `window` entries.
pub fn summarize(results: &[CheckResult], window: usize) -> EndpointSummary {
    let considered = &results[..results.len().min(window)];

    let Some(latest) = considered.first() else {
        return EndpointSummary { last_outcome: None, last_checked: None, uptime_percent: None };
    };

    let up_count = considered.iter().filter(|r| r.outcome == CheckOutcome::Up).count();

    EndpointSummary {
        last_outcome: Some(latest.outcome),
        last_checked: Some(latest.checked_at),
        uptime_percent: Some(up_count as f64 / considered.len() as f64 * 100.0),
    }
}
