//! floor-server binary
//!
//! Loads `.env`, builds the configuration, checks the store key and serves
//! the API until Ctrl+C.

use std::sync::Arc;

use floor_server::store::RestStore;
use floor_server::utils::init_logger;
use floor_server::{AppState, Config, api};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logger(&config.log_level, config.log_dir.as_deref());
    config.verify_key_role()?;

    tracing::info!(
        environment = %config.environment,
        timezone = %config.timezone,
        key_role = config.key_role_label(),
        "Starting floor-server"
    );

    let store = RestStore::new(&config)?;
    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let state = AppState::new(config, Arc::new(store));
    let app = api::build_app(state);

    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("floor-server listening on http://{http_addr}/api");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("floor-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
