//! Single-record capability cache.

use std::sync::RwLock;

use super::types::{CachedCapabilities, CapabilityError};

/// Holds at most one capability record.
///
/// `store` replaces the whole record; readers never see a partial write.
pub trait CapabilityCache: Send + Sync {
    fn load(&self) -> Result<Option<CachedCapabilities>, CapabilityError>;

    fn store(&self, record: &CachedCapabilities) -> Result<(), CapabilityError>;
}

/// In-process cache.
#[derive(Debug, Default)]
pub struct MemoryCapabilityCache {
    record: RwLock<Option<CachedCapabilities>>,
}

impl MemoryCapabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-seeded with a record.
    pub fn with_record(record: CachedCapabilities) -> Self {
        Self {
            record: RwLock::new(Some(record)),
        }
    }
}

impl CapabilityCache for MemoryCapabilityCache {
    fn load(&self) -> Result<Option<CachedCapabilities>, CapabilityError> {
        self.record
            .read()
            .map(|r| *r)
            .map_err(|e| CapabilityError::Cache(e.to_string()))
    }

    fn store(&self, record: &CachedCapabilities) -> Result<(), CapabilityError> {
        let mut slot = self
            .record
            .write()
            .map_err(|e| CapabilityError::Cache(e.to_string()))?;
        *slot = Some(*record);
        Ok(())
    }
}
