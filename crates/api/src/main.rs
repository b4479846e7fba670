//! Slotbook integrations service entrypoint

use std::path::Path;
use std::sync::Arc;

use slotbook_api::{build_router, AppState};
use slotbook_domain::{Result, SlotbookError};
use slotbook_infra::database::DbManager;
use slotbook_infra::{HttpProviderGateway, ProviderRegistry};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = slotbook_infra::config::load()?;

    let db = Arc::new(DbManager::new(
        Path::new(&config.database.path),
        config.database.pool_size,
    )?);

    let registry = ProviderRegistry::from_config(&config.providers);
    let gateway = Arc::new(HttpProviderGateway::new(registry)?);

    let state = AppState::new(db, gateway);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .map_err(|err| {
            SlotbookError::Config(format!("failed to bind {}: {err}", config.server.bind_addr))
        })?;

    tracing::info!(addr = %config.server.bind_addr, "integrations service listening");

    axum::serve(listener, app)
        .await
        .map_err(|err| SlotbookError::Internal(format!("server error: {err}")))?;

    Ok(())
}
