//! SQLite-backed capability cache.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use crate::capability::{CachedCapabilities, CapabilityCache, CapabilityError, DeviceCapabilities, DeviceTier};
use crate::storage::database::{Database, DatabaseError};
use crate::storage::schema::CAPABILITY_ROW_ID;

/// Capability cache stored as the single `device_capabilities` row.
pub struct SqliteCapabilityCache {
    db: Arc<Database>,
}

impl SqliteCapabilityCache {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Load the cached record, if any.
    pub fn load_record(&self) -> Result<Option<CachedCapabilities>, DatabaseError> {
        let row = self.db.with_connection(|conn| {
            conn.query_row(
                "SELECT tier, available_ram_mb, cpu_cores, has_gpu, ml_framework_supported,
                        benchmark_score, last_assessed
                 FROM device_capabilities WHERE id = ?1",
                params![CAPABILITY_ROW_ID],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, bool>(3)?,
                        row.get::<_, bool>(4)?,
                        row.get::<_, i64>(5)?,
                        row.get::<_, i64>(6)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
        })?;

        let Some((tier, ram, cores, gpu, ml, benchmark, assessed_ms)) = row else {
            return Ok(None);
        };

        let last_assessed = DateTime::<Utc>::from_timestamp_millis(assessed_ms).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("invalid timestamp {}", assessed_ms))
        })?;

        let capabilities = DeviceCapabilities {
            tier: DeviceTier::from_stored(&tier),
            available_ram_mb: ram.max(0) as u64,
            cpu_cores: cores.clamp(0, u32::MAX as i64) as u32,
            has_gpu: gpu,
            ml_framework_supported: ml,
            benchmark_score: benchmark.clamp(0, 100) as u8,
        };

        Ok(Some(CachedCapabilities::new(capabilities, last_assessed)))
    }

    /// Replace the cached record.
    pub fn store_record(&self, record: &CachedCapabilities) -> Result<(), DatabaseError> {
        let caps = &record.capabilities;
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO device_capabilities
                 (id, tier, available_ram_mb, cpu_cores, has_gpu, ml_framework_supported,
                  benchmark_score, last_assessed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    CAPABILITY_ROW_ID,
                    caps.tier.as_str(),
                    caps.available_ram_mb as i64,
                    caps.cpu_cores,
                    caps.has_gpu,
                    caps.ml_framework_supported,
                    caps.benchmark_score,
                    record.last_assessed.timestamp_millis(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            Ok(())
        })
    }
}

impl CapabilityCache for SqliteCapabilityCache {
    fn load(&self) -> Result<Option<CachedCapabilities>, CapabilityError> {
        self.load_record()
            .map_err(|e| CapabilityError::Cache(e.to_string()))
    }

    fn store(&self, record: &CachedCapabilities) -> Result<(), CapabilityError> {
        self.store_record(record)
            .map_err(|e| CapabilityError::Cache(e.to_string()))
    }
}
