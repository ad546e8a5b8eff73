use std::time::{Duration, Instant};

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use super::contract;
use super::types::CheckResult;
use crate::models::MonitoredEndpoint;

/// Executes single health checks against monitored endpoints.
///
/// One shared `reqwest::Client` with a fixed request timeout; connection
/// pooling across probes comes for free. `probe` is infallible at the call
/// site: every failure mode is folded into the returned [`CheckResult`].
pub struct EndpointProber {
    client: reqwest::Client,
}

impl EndpointProber {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client })
    }

    /// Perform one GET against the endpoint and classify the outcome.
    ///
    /// Transport failures (refused, timeout, DNS, TLS) yield DOWN with no
    /// status code or latency. A response with the wrong status yields DOWN
    /// without consulting the contract. With the expected status, a missing
    /// contract means UP; otherwise the body must decode as JSON and satisfy
    /// the contract, or the outcome is CONTRACT_BROKEN.
    pub async fn probe(&self, endpoint: &MonitoredEndpoint) -> CheckResult {
        let start = Instant::now();

        let response = match self.client.get(endpoint.url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(endpoint = %endpoint.uuid, error = %e, "probe transport failure");
                return CheckResult::down(endpoint.uuid, None, None, e.to_string());
            }
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        let status_code = response.status().as_u16();

        if status_code != endpoint.expected_status {
            return CheckResult::down(
                endpoint.uuid,
                Some(status_code),
                Some(latency_ms),
                format!("expected status {}, got {}", endpoint.expected_status, status_code),
            );
        }

        let Some(schema) = &endpoint.expected_schema else {
            return CheckResult::up(endpoint.uuid, status_code, latency_ms);
        };

        match response.json::<Value>().await {
            Err(e) => CheckResult::contract_broken(
                endpoint.uuid,
                status_code,
                latency_ms,
                format!("response body is not valid JSON: {}", e),
            ),
            Ok(body) if contract::validate(&body, schema) => {
                CheckResult::up(endpoint.uuid, status_code, latency_ms)
            }
            Ok(_) => CheckResult::contract_broken(
                endpoint.uuid,
                status_code,
                latency_ms,
                "response body does not satisfy the declared contract".to_string(),
            ),
        }
    }
}
