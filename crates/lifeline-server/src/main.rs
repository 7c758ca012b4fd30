//! Server binary for the Lifeline emergency call log.
//!
//! Wires configuration, logging, the record store, and the HTTP API
//! together, then serves until Ctrl-C or SIGTERM.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (file, `LIFELINE__*` env vars, `DATABASE_URL`)
//! 2. Initialize structured logging (tracing)
//! 3. Open the record store and apply migrations
//! 4. Serve the API with graceful shutdown
//! 5. Close the connection pool

mod config;
mod error;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use lifeline_api::AppState;
use lifeline_db::{CallStore, PostgresPool};
use tracing::{info, warn};

use crate::config::{AppConfig, CONFIG_PATH_ENV, StoreBackend, StoreConfig};
use crate::error::AppError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, logging, the store, or the server
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).map_err(AppError::from)?;

    logging::init(&config.logging)?;

    info!(
        config_file = ?config_path,
        host = config.server.host,
        port = config.server.port,
        history_requires_identity = config.api.history_requires_identity,
        "lifeline-server starting"
    );

    let (store, pool) = connect_store(&config.store).await?;

    let state = Arc::new(
        AppState::new(store).with_history_requires_identity(config.api.history_requires_identity),
    );

    let served = lifeline_api::start_server(&config.server.to_server_config(), state)
        .await
        .map_err(AppError::from);

    if let Some(pool) = pool {
        pool.close().await;
    }

    served?;
    info!("lifeline-server stopped");
    Ok(())
}

/// Open the configured record store.
///
/// Returns the pool alongside the store for the `PostgreSQL` backend so
/// it can be closed on shutdown.
async fn connect_store(config: &StoreConfig) -> Result<(CallStore, Option<PostgresPool>), AppError> {
    match config.backend {
        StoreBackend::Memory => {
            warn!("Using in-memory call store; records will not survive a restart");
            Ok((CallStore::memory(), None))
        }
        StoreBackend::Postgres => {
            let pool = PostgresPool::open(&config.postgres_config()).await?;
            Ok((CallStore::from(pool.calls()), Some(pool)))
        }
    }
}
