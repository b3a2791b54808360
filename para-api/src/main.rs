//! para-api - GTD/PARA task and project service
//!
//! Single-binary REST API over one SQLite store: inbox capture, actions,
//! projects, areas, resources, domain assets, assistant memory, research
//! logs, weekly reviews, dashboard aggregates, and a shared-secret
//! integration boundary for bots.

use anyhow::Result;
use para_common::config::{ServiceConfig, TomlConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use para_api::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting para-api");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let toml = TomlConfig::load()?;
    let config = ServiceConfig::resolve(toml)?;

    info!("Database: {}", config.database_path.display());
    let db_pool = para_common::db::init_pool(&config.database_path).await?;
    info!("Database connection established");

    if config.integration_api_key.is_none() {
        warn!("No integration API key configured - integration boundary is running OPEN");
    }

    let state = AppState::new(
        db_pool,
        config.integration_api_key.clone(),
        config.toml.clone(),
    );
    let app = para_api::build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/api/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
