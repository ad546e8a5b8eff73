use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

use crate::monitoring::contract::Schema;

/// A registered third-party endpoint under monitoring.
///
/// Owned by the registry; the health-check engine only ever reads these.
#[derive(Debug, Clone)]
pub struct MonitoredEndpoint {
    /// Storage rowid, `None` until persisted
    pub id: Option<i64>,
    /// Stable public identifier
    pub uuid: Uuid,
    /// Probed URL, unique across all endpoints
    pub url: Url,
    /// HTTP status code a healthy response must carry
    pub expected_status: u16,
    /// Declared response contract; `None` means status-code check only
    pub expected_schema: Option<Schema>,
    pub created_at: DateTime<Utc>,
}

impl MonitoredEndpoint {
    pub fn new(url: Url, expected_status: u16, expected_schema: Option<Schema>) -> Self {
        Self {
            id: None,
            uuid: Uuid::new_v4(),
            url,
            expected_status,
            expected_schema,
            created_at: Utc::now(),
        }
    }
}

/// Validate a registration target URL.
pub fn validate_target(url: &Url) -> Result<()> {
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(anyhow!("invalid scheme for a monitored endpoint: {}", other)),
    }

    if url.host_str().is_none() {
        return Err(anyhow!("endpoint URL has no host"));
    }

    Ok(())
}

/// Validate that the expected status code is a real HTTP status.
pub fn validate_expected_status(expected_status: u16) -> Result<()> {
    if !(100..=599).contains(&expected_status) {
        return Err(anyhow!("expected status {} is not a valid HTTP status code", expected_status));
    }
    Ok(())
}
