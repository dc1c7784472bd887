//! # Noticeboard API Main Entry Point
//!
//! This is the main entry point for the noticeboard content service.

use std::sync::Arc;

use migration::MigratorTrait;
use noticeboard::clock::{Clock, SystemClock};
use noticeboard::config::ConfigLoader;
use noticeboard::db::init_pool;
use noticeboard::seeds::seed_categories;
use noticeboard::server::{AppState, run_server};
use noticeboard::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;

    telemetry::init_tracing(&config)?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::info!(configuration = %redacted_json, "Effective configuration");
    }

    let db = init_pool(&config).await?;
    migration::Migrator::up(&db, None).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    if config.seed_categories {
        seed_categories(&db, clock.now()).await?;
    }

    let state = AppState {
        db,
        config: Arc::new(config),
        clock,
    };

    run_server(state).await
}
