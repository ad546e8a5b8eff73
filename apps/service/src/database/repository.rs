use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::params;
use url::Url;
use uuid::Uuid;

use crate::models::MonitoredEndpoint;
use crate::monitoring::types::CheckResult;
use crate::pool::{LibsqlManager, LibsqlPool};

/// Read side of the endpoint registry, as seen by the health-check engine
/// and the API.
#[async_trait]
pub trait EndpointRegistry: Send + Sync {
    /// Snapshot of all registered endpoints
    async fn list_endpoints(&self) -> Result<Vec<MonitoredEndpoint>>;

    /// Look up an endpoint by its public identifier
    async fn get_endpoint(&self, uuid: Uuid) -> Result<Option<MonitoredEndpoint>>;

    /// Look up an endpoint by its (unique) URL
    async fn find_by_url(&self, url: &Url) -> Result<Option<MonitoredEndpoint>>;

    /// Register a new endpoint
    async fn insert_endpoint(&self, endpoint: &MonitoredEndpoint) -> Result<i64>;
}

/// Append-only sink for check results, plus the read path the API and
/// aggregator consume.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Persist one result
    async fn append(&self, result: &CheckResult) -> Result<i64>;

    /// Most recent results for an endpoint, newest first
    async fn recent_results(&self, endpoint_uuid: Uuid, limit: usize) -> Result<Vec<CheckResult>>;
}

/// libsql-backed implementation of both collaborator seams.
pub struct WatchdogDb {
    pool: LibsqlPool,
}

impl WatchdogDb {
    pub fn new_from_pool(pool: LibsqlPool) -> Self {
        Self { pool }
    }

    async fn get_conn(&self) -> Result<deadpool::managed::Object<LibsqlManager>> {
        Ok(self.pool.get().await?)
    }
}

fn endpoint_from_row(row: &libsql::Row) -> Result<MonitoredEndpoint> {
    let uuid_str: String = row.get(1)?;
    let url_str: String = row.get(2)?;
    let schema_json: Option<String> = row.get(4)?;
    let created_at: i64 = row.get(5)?;

    Ok(MonitoredEndpoint {
        id: Some(row.get(0)?),
        uuid: Uuid::parse_str(&uuid_str)?,
        url: Url::parse(&url_str).with_context(|| format!("stored URL is invalid: {}", url_str))?,
        expected_status: row.get::<i64>(3)? as u16,
        expected_schema: schema_json
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .context("stored schema descriptor failed to decode")?,
        created_at: DateTime::from_timestamp(created_at, 0)
            .ok_or_else(|| anyhow!("stored created_at is out of range: {}", created_at))?,
    })
}

fn result_from_row(row: &libsql::Row) -> Result<CheckResult> {
    let uuid_str: String = row.get(0)?;
    let checked_at_ms: i64 = row.get(1)?;
    let outcome: String = row.get(2)?;

    Ok(CheckResult {
        endpoint_uuid: Uuid::parse_str(&uuid_str)?,
        checked_at: DateTime::from_timestamp_millis(checked_at_ms)
            .ok_or_else(|| anyhow!("stored checked_at is out of range: {}", checked_at_ms))?,
        outcome: outcome.parse()?,
        latency_ms: row.get::<Option<i64>>(3)?.map(|v| v as u64),
        status_code: row.get::<Option<i64>>(4)?.map(|v| v as u16),
        error: row.get(5)?,
    })
}

const ENDPOINT_COLUMNS: &str = "id, uuid, url, expected_status, expected_schema, created_at";

#[async_trait]
impl EndpointRegistry for WatchdogDb {
    async fn list_endpoints(&self) -> Result<Vec<MonitoredEndpoint>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(&format!("SELECT {} FROM endpoints ORDER BY id", ENDPOINT_COLUMNS), ())
            .await?;

        let mut endpoints = Vec::new();
        while let Some(row) = rows.next().await? {
            endpoints.push(endpoint_from_row(&row)?);
        }

        Ok(endpoints)
    }

    async fn get_endpoint(&self, uuid: Uuid) -> Result<Option<MonitoredEndpoint>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(
                &format!("SELECT {} FROM endpoints WHERE uuid = ?", ENDPOINT_COLUMNS),
                params![uuid.to_string()],
            )
            .await?;

        rows.next().await?.map(|row| endpoint_from_row(&row)).transpose()
    }

    async fn find_by_url(&self, url: &Url) -> Result<Option<MonitoredEndpoint>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(
                &format!("SELECT {} FROM endpoints WHERE url = ?", ENDPOINT_COLUMNS),
                params![url.as_str()],
            )
            .await?;

        rows.next().await?.map(|row| endpoint_from_row(&row)).transpose()
    }

    async fn insert_endpoint(&self, endpoint: &MonitoredEndpoint) -> Result<i64> {
        let conn = self.get_conn().await?;
        let schema_json = endpoint
            .expected_schema
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("schema descriptor failed to encode")?;

        conn.execute(
            "INSERT INTO endpoints (uuid, url, expected_status, expected_schema, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                endpoint.uuid.to_string(),
                endpoint.url.as_str(),
                endpoint.expected_status as i64,
                schema_json,
                endpoint.created_at.timestamp()
            ],
        )
        .await?;

        Ok(conn.last_insert_rowid())
    }
}

#[async_trait]
impl ResultSink for WatchdogDb {
    async fn append(&self, result: &CheckResult) -> Result<i64> {
        let conn = self.get_conn().await?;

        conn.execute(
            "INSERT INTO checks (endpoint_uuid, checked_at_ms, outcome, latency_ms, status_code, error, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                result.endpoint_uuid.to_string(),
                result.checked_at.timestamp_millis(),
                result.outcome.to_string(),
                result.latency_ms.map(|v| v as i64),
                result.status_code.map(|v| v as i64),
                result.error.clone(),
                Utc::now().timestamp()
            ],
        )
        .await?;

        Ok(conn.last_insert_rowid())
    }

    async fn recent_results(&self, endpoint_uuid: Uuid, limit: usize) -> Result<Vec<CheckResult>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(
                "SELECT endpoint_uuid, checked_at_ms, outcome, latency_ms, status_code, error
                 FROM checks WHERE endpoint_uuid = ?
                 ORDER BY checked_at_ms DESC, id DESC LIMIT ?",
                params![endpoint_uuid.to_string(), limit as i64],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(result_from_row(&row)?);
        }

        Ok(results)
    }
}
