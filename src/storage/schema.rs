//! Database schema definitions for shotcoach.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Device capability cache (single row)
CREATE TABLE IF NOT EXISTS device_capabilities (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    tier TEXT NOT NULL,
    available_ram_mb INTEGER NOT NULL,
    cpu_cores INTEGER NOT NULL,
    has_gpu INTEGER NOT NULL,
    ml_framework_supported INTEGER NOT NULL,
    benchmark_score INTEGER NOT NULL,
    last_assessed INTEGER NOT NULL
);

-- Shooting sessions table
CREATE TABLE IF NOT EXISTS shooting_sessions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    duration_secs REAL NOT NULL,
    form_score TEXT NOT NULL,
    detected_issues_json TEXT NOT NULL,
    form_analysis_json TEXT NOT NULL,
    video_metadata_json TEXT,
    sync_status TEXT NOT NULL DEFAULT 'pending'
);

CREATE INDEX IF NOT EXISTS idx_sessions_user_time ON shooting_sessions(user_id, timestamp);
"#;

/// SQL for schema version tracking.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version
pub const CURRENT_VERSION: i32 = 1;

/// Singleton key of the capability cache row.
pub const CAPABILITY_ROW_ID: i64 = 1;
