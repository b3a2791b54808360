//! Oracle credential resolution for para-api
//!
//! Three-tier lookup with Database → ENV → TOML priority, so a key stored
//! through the running service wins over deployment configuration.

use para_common::config::TomlConfig;
use para_common::{Error, Result};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Settings-table key holding the oracle credential
pub const ANTHROPIC_API_KEY_SETTING: &str = "anthropic_api_key";

/// Validate a key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve the Anthropic API key, failing with a configuration error when
/// no tier has a usable value. Callers surface that as a hard failure;
/// classification never falls back to a default answer.
pub async fn resolve_anthropic_api_key(db: &SqlitePool, toml: &TomlConfig) -> Result<String> {
    let db_key = para_common::db::get_setting(db, ANTHROPIC_API_KEY_SETTING).await?;
    let env_key = std::env::var("ANTHROPIC_API_KEY").ok();
    let toml_key = toml.anthropic_api_key.clone();

    let mut sources = Vec::new();
    if db_key.as_deref().is_some_and(is_valid_key) {
        sources.push("database");
    }
    if env_key.as_deref().is_some_and(is_valid_key) {
        sources.push("environment");
    }
    if toml_key.as_deref().is_some_and(is_valid_key) {
        sources.push("TOML");
    }
    if sources.len() > 1 {
        warn!(
            "Anthropic API key found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    for (key, source) in [
        (db_key, "database"),
        (env_key, "environment"),
        (toml_key, "TOML config"),
    ] {
        if let Some(key) = key {
            if is_valid_key(&key) {
                info!("Anthropic API key loaded from {}", source);
                return Ok(key);
            }
        }
    }

    Err(Error::Config(
        "Anthropic API key not configured. Provide it via one of:\n\
         1. settings table: key 'anthropic_api_key'\n\
         2. Environment: ANTHROPIC_API_KEY=your-key-here\n\
         3. TOML config: para.toml (anthropic_api_key = \"your-key\")"
            .to_string(),
    ))
}
