//! Storage module for database and configuration.

pub mod capability_store;
pub mod config;
pub mod database;
pub mod schema;
pub mod session_store;

pub use capability_store::SqliteCapabilityCache;
pub use config::{AnalysisSettings, AppConfig, CapabilitySettings, ConfigError, ProcessingSettings};
pub use database::{Database, DatabaseError};
pub use session_store::SessionStore;
