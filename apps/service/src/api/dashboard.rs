use actix_web::{get, web};
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use super::AppState;
use crate::error::ApiError;
use crate::monitoring::stats::{EndpointSummary, summarize};

#[derive(Debug, Serialize)]
pub struct DashboardRow {
    pub uuid: Uuid,
    pub url: Url,
    #[serde(flatten)]
    pub summary: EndpointSummary,
}

/// Rolling status and uptime for every registered endpoint.
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<AppState>,
) -> Result<web::Json<Vec<DashboardRow>>, ApiError> {
    let endpoints = state.registry.list_endpoints().await?;

    let mut rows = Vec::with_capacity(endpoints.len());
    for endpoint in endpoints {
        let results = state.sink.recent_results(endpoint.uuid, state.uptime_window).await?;
        rows.push(DashboardRow {
            uuid: endpoint.uuid,
            url: endpoint.url,
            summary: summarize(&results, state.uptime_window),
        });
    }

    Ok(web::Json(rows))
}
