//! Capability assessor: cached device detection.

use std::sync::Arc;

use chrono::{Duration, Utc};

use super::cache::CapabilityCache;
use super::probe::{SystemProbe, DEFAULT_BENCHMARK_SCORE, DEFAULT_CPU_CORES, DEFAULT_RAM_MB};
use super::types::{CachedCapabilities, CapabilityError, DeviceCapabilities};

/// Default cache lifetime in days.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// Detects device capabilities and keeps the latest record cached.
pub struct CapabilityAssessor {
    probe: Arc<dyn SystemProbe>,
    cache: Arc<dyn CapabilityCache>,
    max_age: Duration,
}

impl CapabilityAssessor {
    pub fn new(probe: Arc<dyn SystemProbe>, cache: Arc<dyn CapabilityCache>) -> Self {
        Self {
            probe,
            cache,
            max_age: Duration::days(DEFAULT_MAX_AGE_DAYS),
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Return cached capabilities if fresh, otherwise detect and cache them.
    ///
    /// Never fails: probe errors fall back to safe defaults and cache errors
    /// are logged.
    pub async fn detect_device_capabilities(&self, force_refresh: bool) -> DeviceCapabilities {
        if !force_refresh {
            match self.cache.load() {
                Ok(Some(record)) if !record.is_stale(Utc::now(), self.max_age) => {
                    tracing::debug!("Using cached capabilities from {}", record.last_assessed);
                    return record.capabilities;
                }
                Ok(Some(record)) => {
                    tracing::info!("Cached capabilities from {} are stale", record.last_assessed);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Failed to read capability cache: {}", e),
            }
        }

        let capabilities = self.measure().await;
        tracing::info!(
            "Detected {} tier device: {} MB RAM, {} cores, benchmark {}",
            capabilities.tier,
            capabilities.available_ram_mb,
            capabilities.cpu_cores,
            capabilities.benchmark_score
        );

        let record = CachedCapabilities::new(capabilities, Utc::now());
        if let Err(e) = self.cache.store(&record) {
            tracing::warn!("Failed to cache device capabilities: {}", e);
        }

        capabilities
    }

    async fn measure(&self) -> DeviceCapabilities {
        let bench_probe = Arc::clone(&self.probe);
        let sys_probe = Arc::clone(&self.probe);

        let benchmark = tokio::task::spawn_blocking(move || bench_probe.benchmark_score());
        let signals = tokio::task::spawn_blocking(move || {
            (
                sys_probe.available_ram_mb(),
                sys_probe.cpu_cores(),
                sys_probe.has_gpu(),
                sys_probe.ml_framework_supported(),
            )
        });
        let (benchmark, signals) = tokio::join!(benchmark, signals);

        let benchmark = benchmark.unwrap_or_else(|e| Err(CapabilityError::Probe(e.to_string())));
        let (ram, cores, gpu, ml) = signals.unwrap_or_else(|e| {
            let msg = e.to_string();
            (
                Err(CapabilityError::Probe(msg.clone())),
                Err(CapabilityError::Probe(msg.clone())),
                Err(CapabilityError::Probe(msg.clone())),
                Err(CapabilityError::Probe(msg)),
            )
        });

        DeviceCapabilities::from_signals(
            or_default(ram, DEFAULT_RAM_MB, "RAM"),
            or_default(cores, DEFAULT_CPU_CORES, "CPU cores"),
            or_default(gpu, false, "GPU"),
            or_default(ml, false, "ML framework"),
            or_default(benchmark, DEFAULT_BENCHMARK_SCORE, "benchmark"),
        )
    }
}

fn or_default<T: std::fmt::Debug>(result: Result<T, CapabilityError>, default: T, signal: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("{} probe failed ({}), using {:?}", signal, e, default);
        default
    })
}
