//! Database operations using rusqlite.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, Result as SqliteResult};
use thiserror::Error;

use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};

/// Database wrapper for SQLite operations.
///
/// The connection sits behind a mutex so one handle can be shared across
/// concurrent analysis requests.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.initialize()?;

        Ok(db)
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DatabaseError::ConnectionFailed(format!("connection lock poisoned: {}", e)))?;
        f(&conn)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), DatabaseError> {
        self.with_connection(|conn| {
            conn.execute_batch(SCHEMA_VERSION_TABLE)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            let current_version = schema_version(conn)?;
            if current_version < CURRENT_VERSION {
                migrate(conn, current_version)?;
            }

            Ok(())
        })
    }

    /// Get the current schema version.
    pub fn schema_version(&self) -> Result<i32, DatabaseError> {
        self.with_connection(schema_version)
    }
}

fn schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    let result: SqliteResult<i32> = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    );

    match result {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
    }
}

/// Run database migrations.
fn migrate(conn: &Connection, from_version: i32) -> Result<(), DatabaseError> {
    if from_version < 1 {
        // Initial schema
        conn.execute_batch(SCHEMA)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        conn.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
            [CURRENT_VERSION],
        )
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        tracing::info!("Database migrated to version {}", CURRENT_VERSION);
    }

    Ok(())
}

/// Database error types.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}
