//! Device capability types and tier classification.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for capability detection.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// A system signal could not be read
    #[error("Probe failed: {0}")]
    Probe(String),

    /// The capability cache could not be read or written
    #[error("Capability cache error: {0}")]
    Cache(String),
}

/// Coarse device performance class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    #[default]
    Low,
    Mid,
    High,
}

impl DeviceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceTier::Low => "low",
            DeviceTier::Mid => "mid",
            DeviceTier::High => "high",
        }
    }

    /// Parse the stored string form. Unknown values read as `Low`.
    pub fn from_stored(s: &str) -> Self {
        match s {
            "high" => DeviceTier::High,
            "mid" => DeviceTier::Mid,
            _ => DeviceTier::Low,
        }
    }
}

impl fmt::Display for DeviceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measured device capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    pub tier: DeviceTier,
    /// Available RAM in MB
    pub available_ram_mb: u64,
    pub cpu_cores: u32,
    pub has_gpu: bool,
    pub ml_framework_supported: bool,
    /// CPU and memory benchmark score (0-100)
    pub benchmark_score: u8,
}

impl DeviceCapabilities {
    /// Build capabilities from raw signals, classifying the tier.
    pub fn from_signals(
        available_ram_mb: u64,
        cpu_cores: u32,
        has_gpu: bool,
        ml_framework_supported: bool,
        benchmark_score: u8,
    ) -> Self {
        Self {
            tier: classify_device_tier(available_ram_mb, cpu_cores, benchmark_score),
            available_ram_mb,
            cpu_cores,
            has_gpu,
            ml_framework_supported,
            benchmark_score,
        }
    }
}

/// Capabilities with the time they were assessed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedCapabilities {
    pub capabilities: DeviceCapabilities,
    pub last_assessed: DateTime<Utc>,
}

impl CachedCapabilities {
    pub fn new(capabilities: DeviceCapabilities, last_assessed: DateTime<Utc>) -> Self {
        Self {
            capabilities,
            last_assessed,
        }
    }

    /// Whether the record is at least `max_age` old at `now`.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.last_assessed >= max_age
    }
}

/// Classify a device. First match wins; every condition of a tier must hold.
pub fn classify_device_tier(available_ram_mb: u64, cpu_cores: u32, benchmark_score: u8) -> DeviceTier {
    if available_ram_mb >= 6144 && cpu_cores >= 6 && benchmark_score > 70 {
        DeviceTier::High
    } else if available_ram_mb >= 3072 && cpu_cores >= 4 && benchmark_score > 40 {
        DeviceTier::Mid
    } else {
        DeviceTier::Low
    }
}
