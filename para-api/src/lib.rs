//! para-api library interface
//!
//! Exposes the application state and router for the binary and for
//! integration tests.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use para_common::config::TomlConfig;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Shared secret for the integration boundary; None = open mode
    pub integration_api_key: Option<String>,
    /// Loaded TOML config (oracle key lowest tier)
    pub toml: TomlConfig,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, integration_api_key: Option<String>, toml: TomlConfig) -> Self {
        Self {
            db,
            integration_api_key,
            toml,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::root_routes())
        .merge(api::health::routes())
        .merge(api::inbox::routes())
        .merge(api::actions::routes())
        .merge(api::projects::routes())
        .merge(api::areas::routes())
        .merge(api::resources::routes())
        .merge(api::assets::routes())
        .merge(api::memory::routes())
        .merge(api::research::routes())
        .merge(api::reviews::routes())
        .merge(api::dashboard::routes())
        .merge(api::classify::routes())
        .merge(api::integration::routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
