use actix_web::{get, web};
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::error::ApiError;
use crate::monitoring::CheckResult;

/// Manual on-demand check, outside the schedule.
///
/// Identical prober logic and identical persistence as a scheduled probe;
/// only the fan-out is bypassed. An unknown endpoint is a 404, distinct
/// from a completed check that came back DOWN.
#[get("/endpoints/{uuid}/check")]
pub async fn run_check(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<web::Json<CheckResult>, ApiError> {
    let uuid = path.into_inner();

    let endpoint = state.registry.get_endpoint(uuid).await?.ok_or(ApiError::NotFound)?;
    let result = state.prober.probe(&endpoint).await;
    state.sink.append(&result).await?;

    Ok(web::Json(result))
}

fn default_history_limit() -> usize {
    20
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

#[get("/endpoints/{uuid}/history")]
pub async fn check_history(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<HistoryQuery>,
) -> Result<web::Json<Vec<CheckResult>>, ApiError> {
    let uuid = path.into_inner();

    if state.registry.get_endpoint(uuid).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let results = state.sink.recent_results(uuid, query.limit).await?;

    Ok(web::Json(results))
}
