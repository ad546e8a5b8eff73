use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::AppState;
use crate::error::ApiError;
use crate::models::MonitoredEndpoint;
use crate::models::endpoint::{validate_expected_status, validate_target};
use crate::monitoring::contract::Schema;

#[derive(Debug, Deserialize)]
pub struct RegisterEndpoint {
    pub url: Url,
    pub expected_status: u16,
    #[serde(default)]
    pub expected_schema: Option<Schema>,
}

#[derive(Debug, Serialize)]
pub struct EndpointOut {
    pub uuid: Uuid,
    pub url: Url,
    pub expected_status: u16,
    pub expected_schema: Option<Schema>,
    pub created_at: DateTime<Utc>,
}

impl From<MonitoredEndpoint> for EndpointOut {
    fn from(endpoint: MonitoredEndpoint) -> Self {
        Self {
            uuid: endpoint.uuid,
            url: endpoint.url,
            expected_status: endpoint.expected_status,
            expected_schema: endpoint.expected_schema,
            created_at: endpoint.created_at,
        }
    }
}

#[post("/endpoints")]
pub async fn register_endpoint(
    state: web::Data<AppState>,
    body: web::Json<RegisterEndpoint>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    validate_target(&body.url).map_err(|e| ApiError::Invalid(e.to_string()))?;
    validate_expected_status(body.expected_status).map_err(|e| ApiError::Invalid(e.to_string()))?;

    if state.registry.find_by_url(&body.url).await?.is_some() {
        return Err(ApiError::DuplicateUrl);
    }

    let endpoint = MonitoredEndpoint::new(body.url, body.expected_status, body.expected_schema);
    state.registry.insert_endpoint(&endpoint).await?;

    tracing::info!(endpoint = %endpoint.uuid, url = %endpoint.url, "endpoint registered");

    Ok(HttpResponse::Created().json(EndpointOut::from(endpoint)))
}

#[get("/endpoints")]
pub async fn list_endpoints(
    state: web::Data<AppState>,
) -> Result<web::Json<Vec<EndpointOut>>, ApiError> {
    let endpoints = state.registry.list_endpoints().await?;

    Ok(web::Json(endpoints.into_iter().map(EndpointOut::from).collect()))
}
