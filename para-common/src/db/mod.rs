//! Database bootstrap for para
//!
//! Opens (or creates) the single SQLite store and creates every table with
//! `CREATE TABLE IF NOT EXISTS`, so re-running initialization against an
//! existing file is a no-op. Seeds the `settings` table with a login secret
//! row on first run.

use std::path::Path;

use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::SqlitePool;

use crate::Result;

/// Schema for all para tables. Idempotent by construction.
const SCHEMA: &str = r#"
-- Capture & actions
CREATE TABLE IF NOT EXISTS inbox (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    raw_input TEXT NOT NULL,
    source TEXT NOT NULL DEFAULT 'manual',
    created_at TEXT NOT NULL,
    processed_at TEXT,
    processed_to TEXT,
    ai_notes TEXT
);

CREATE TABLE IF NOT EXISTS actions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'inbox',

    context TEXT,
    energy TEXT,
    time_estimate TEXT,

    project_id INTEGER,
    area_id INTEGER,

    waiting_on TEXT,
    delegated_to TEXT,

    due_date TEXT,
    scheduled_date TEXT,
    completed_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,

    source TEXT,
    ai_notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_actions_status ON actions(status);
CREATE INDEX IF NOT EXISTS idx_actions_project ON actions(project_id);
CREATE INDEX IF NOT EXISTS idx_actions_due ON actions(due_date);

-- Projects (PARA P)
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',

    outcome TEXT,
    success_criteria TEXT,

    area_id INTEGER,
    domain TEXT,

    target_date TEXT,
    completed_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,

    blocked INTEGER NOT NULL DEFAULT 0,
    blocker_note TEXT,
    priority TEXT NOT NULL DEFAULT 'normal',

    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_projects_status ON projects(status);
CREATE INDEX IF NOT EXISTS idx_projects_domain ON projects(domain);

-- Areas (PARA A)
CREATE TABLE IF NOT EXISTS areas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    icon TEXT,
    domain TEXT,

    description TEXT,
    standard TEXT,
    responsibilities TEXT,

    health TEXT NOT NULL DEFAULT 'healthy',
    last_review TEXT,
    review_notes TEXT,
    review_frequency TEXT NOT NULL DEFAULT 'monthly',

    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Resources (PARA R)
CREATE TABLE IF NOT EXISTS resources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    type TEXT,
    domain TEXT,

    description TEXT,
    content TEXT,
    location TEXT,

    tags TEXT,
    area_id INTEGER,

    version TEXT,
    last_updated TEXT,
    update_frequency TEXT,

    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_resources_type ON resources(type);
CREATE INDEX IF NOT EXISTS idx_resources_domain ON resources(domain);

-- Domain assets (curriculum pipeline)
CREATE TABLE IF NOT EXISTS assets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,

    module TEXT NOT NULL,
    level TEXT NOT NULL,
    type TEXT NOT NULL,
    category TEXT,

    pipeline_stage TEXT NOT NULL DEFAULT 'idea',

    description TEXT,
    link TEXT,
    file_path TEXT,

    version TEXT,
    quality_score INTEGER,
    skills_used TEXT,

    project_id INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    published_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_assets_module ON assets(module);
CREATE INDEX IF NOT EXISTS idx_assets_level ON assets(level);
CREATE INDEX IF NOT EXISTS idx_assets_pipeline ON assets(pipeline_stage);

-- AI memory
CREATE TABLE IF NOT EXISTS memories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    type TEXT NOT NULL,
    domain TEXT,
    content TEXT NOT NULL,

    confidence TEXT NOT NULL DEFAULT 'inferred',
    times_referenced INTEGER NOT NULL DEFAULT 0,
    last_referenced TEXT,

    status TEXT NOT NULL DEFAULT 'active',
    expires_at TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_memories_type ON memories(type);
CREATE INDEX IF NOT EXISTS idx_memories_domain ON memories(domain);

-- Research journal
CREATE TABLE IF NOT EXISTS research_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    family_lines TEXT,
    objective TEXT NOT NULL,

    sources_consulted TEXT,
    findings TEXT,
    new_questions TEXT,
    next_steps TEXT,

    time_spent INTEGER,
    confidence TEXT,

    created_at TEXT NOT NULL
);

-- Weekly reviews (one row per Monday-aligned week)
CREATE TABLE IF NOT EXISTS weekly_reviews (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    week_of TEXT NOT NULL UNIQUE,

    actions_completed INTEGER,
    projects_completed INTEGER,
    inbox_processed INTEGER,

    metrics_by_domain TEXT,

    key_wins TEXT,
    blockers_hit TEXT,
    next_week_focus TEXT,
    ai_summary TEXT,

    completed_at TEXT,
    created_at TEXT NOT NULL
);

-- Settings
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT,
    updated_at TEXT
);
"#;

/// Open (or create) the database and initialize the schema.
pub async fn init_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Create all tables and seed the settings row. Safe to call repeatedly.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    seed_settings(pool).await?;
    tracing::info!("Database schema initialized");
    Ok(())
}

/// Insert the login secret row if absent. Existing values are never
/// overwritten.
async fn seed_settings(pool: &SqlitePool) -> Result<()> {
    let existing: Option<(String,)> =
        sqlx::query_as("SELECT key FROM settings WHERE key = 'password'")
            .fetch_optional(pool)
            .await?;

    if existing.is_none() {
        let secret: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();

        sqlx::query("INSERT INTO settings (key, value, updated_at) VALUES ('password', ?, ?)")
            .bind(&secret)
            .bind(crate::time::format_datetime(&crate::time::now()))
            .execute(pool)
            .await?;
        tracing::info!("Seeded settings with generated login secret");
    }

    Ok(())
}

/// Read one settings value.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;
    Ok(row.and_then(|(value,)| value))
}
