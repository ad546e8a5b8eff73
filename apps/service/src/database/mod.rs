/// Persistence layer.
///
/// Exposes the registry and result-sink seams the health-check engine and
/// API depend on, backed by a local libsql database behind a connection
/// pool.
pub mod migrations;
pub mod repository;

pub use repository::{EndpointRegistry, ResultSink, WatchdogDb};

use anyhow::Result;

/// Initialize the database schema.
pub async fn initialize_database(conn: &libsql::Connection) -> Result<()> {
    migrations::run_migrations(conn).await
}
