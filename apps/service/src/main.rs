use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use watchdog_service::api::{self, AppState};
use watchdog_service::config::Config;
use watchdog_service::database::{self, EndpointRegistry, ResultSink, WatchdogDb};
use watchdog_service::monitoring::{CheckScheduler, EndpointProber};
use watchdog_service::pool::LibsqlManager;

#[derive(Debug, Parser)]
#[command(name = "watchdog", version, about = "Third-party API watchdog")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();
    let config = Config::from_config(cli.config.as_deref()).context("failed to load config")?;

    let db_path = config.database.path.to_string_lossy().to_string();
    let database = libsql::Builder::new_local(&db_path).build().await?;
    let pool: watchdog_service::pool::LibsqlPool =
        deadpool::managed::Pool::builder(LibsqlManager::new(database)).build()?;

    {
        let conn = pool.get().await?;
        database::initialize_database(&conn).await?;
    }

    let db = Arc::new(WatchdogDb::new_from_pool(pool));
    let prober =
        Arc::new(EndpointProber::new(Duration::from_secs(config.monitoring.timeout_seconds))?);

    let scheduler = CheckScheduler::new(
        Arc::clone(&db) as Arc<dyn EndpointRegistry>,
        Arc::clone(&db) as Arc<dyn ResultSink>,
        Arc::clone(&prober),
        Duration::from_secs(config.monitoring.interval_seconds),
    );

    let cancel = CancellationToken::new();
    let scheduler_handle = scheduler.spawn(cancel.clone());

    let state = web::Data::new(AppState {
        registry: Arc::clone(&db) as Arc<dyn EndpointRegistry>,
        sink: db as Arc<dyn ResultSink>,
        prober,
        uptime_window: config.monitoring.uptime_window,
    });

    info!(bind = %config.http.bind, port = config.http.port, "management API listening");

    HttpServer::new(move || App::new().app_data(state.clone()).configure(api::routes))
        .bind((config.http.bind.as_str(), config.http.port))?
        .run()
        .await?;

    // Let an in-flight cycle drain before exiting
    cancel.cancel();
    scheduler_handle.await?;

    Ok(())
}
