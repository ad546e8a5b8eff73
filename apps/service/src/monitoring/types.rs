use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckOutcome {
    Up,
    Down,
    ContractBroken,
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::Up => write!(f, "UP"),
            CheckOutcome::Down => write!(f, "DOWN"),
            CheckOutcome::ContractBroken => write!(f, "CONTRACT_BROKEN"),
        }
    }
}

impl std::str::FromStr for CheckOutcome {
    type Err = UnknownOutcome;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UP" => Ok(CheckOutcome::Up),
            "DOWN" => Ok(CheckOutcome::Down),
            "CONTRACT_BROKEN" => Ok(CheckOutcome::ContractBroken),
            other => Err(UnknownOutcome(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown check outcome: {0}")]
pub struct UnknownOutcome(String);

/// Result of one probe against one endpoint.
///
/// Exactly one of these is produced per probe invocation, whatever the
/// failure mode. Immutable once constructed; the sink stores it append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// UUID of the endpoint that was probed
    pub endpoint_uuid: Uuid,

    /// Timestamp of the observation, not of the request start
    pub checked_at: DateTime<Utc>,

    /// Classification of the probe
    pub outcome: CheckOutcome,

    /// Response latency in milliseconds; absent when no response arrived
    pub latency_ms: Option<u64>,

    /// Observed HTTP status code; absent when no response arrived
    pub status_code: Option<u16>,

    /// Human-readable failure detail for DOWN and CONTRACT_BROKEN
    pub error: Option<String>,
}

impl CheckResult {
    /// Healthy endpoint: expected status observed and the contract, if any, held.
    pub fn up(endpoint_uuid: Uuid, status_code: u16, latency_ms: u64) -> Self {
        Self {
            endpoint_uuid,
            checked_at: Utc::now(),
            outcome: CheckOutcome::Up,
            latency_ms: Some(latency_ms),
            status_code: Some(status_code),
            error: None,
        }
    }

    /// Transport failure or status mismatch. Status code and latency are
    /// absent when the request never produced a response.
    pub fn down(
        endpoint_uuid: Uuid,
        status_code: Option<u16>,
        latency_ms: Option<u64>,
        error: String,
    ) -> Self {
        Self {
            endpoint_uuid,
            checked_at: Utc::now(),
            outcome: CheckOutcome::Down,
            latency_ms,
            status_code,
            error: Some(error),
        }
    }

    /// Expected status observed but the response body failed to decode or
    /// did not satisfy the declared contract.
    pub fn contract_broken(
        endpoint_uuid: Uuid,
        status_code: u16,
        latency_ms: u64,
        error: String,
    ) -> Self {
        Self {
            endpoint_uuid,
            checked_at: Utc::now(),
            outcome: CheckOutcome::ContractBroken,
            latency_ms: Some(latency_ms),
            status_code: Some(status_code),
            error: Some(error),
        }
    }
}
