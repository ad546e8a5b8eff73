/// Management and read API.
///
/// Registration, manual on-demand checks, per-endpoint history, and the
/// dashboard view. Handlers depend only on the registry/sink seams, so the
/// same routes serve tests against in-memory or temp-file databases.
pub mod checks;
pub mod dashboard;
pub mod endpoints;

use std::sync::Arc;

use actix_web::web;

use crate::database::{EndpointRegistry, ResultSink};
use crate::monitoring::EndpointProber;

/// Shared handler state.
pub struct AppState {
    pub registry: Arc<dyn EndpointRegistry>,
    pub sink: Arc<dyn ResultSink>,
    pub prober: Arc<EndpointProber>,
    pub uptime_window: usize,
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(endpoints::register_endpoint)
        .service(endpoints::list_endpoints)
        .service(checks::run_check)
        .service(checks::check_history)
        .service(dashboard::dashboard);
}
