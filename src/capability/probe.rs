//! System signal probes.

use std::path::Path;

use sysinfo::System;

use super::benchmark;
use super::types::CapabilityError;

/// Safe RAM value used when the probe fails.
pub const DEFAULT_RAM_MB: u64 = 2048;
/// Safe core count used when the probe fails.
pub const DEFAULT_CPU_CORES: u32 = 2;
/// Safe benchmark score used when the benchmark fails.
pub const DEFAULT_BENCHMARK_SCORE: u8 = 30;

/// Independent device signals read during capability detection.
///
/// Methods block; the assessor runs them on blocking tasks.
pub trait SystemProbe: Send + Sync {
    fn available_ram_mb(&self) -> Result<u64, CapabilityError>;

    fn cpu_cores(&self) -> Result<u32, CapabilityError>;

    fn has_gpu(&self) -> Result<bool, CapabilityError>;

    fn ml_framework_supported(&self) -> Result<bool, CapabilityError>;

    /// Benchmark score (0-100).
    fn benchmark_score(&self) -> Result<u8, CapabilityError> {
        Ok(benchmark::run_benchmark())
    }
}

/// Probe backed by `sysinfo` and platform heuristics.
#[derive(Debug, Clone, Default)]
pub struct SysinfoProbe;

impl SystemProbe for SysinfoProbe {
    fn available_ram_mb(&self) -> Result<u64, CapabilityError> {
        let mut sys = System::new();
        sys.refresh_memory();

        let bytes = match sys.available_memory() {
            0 => sys.total_memory(),
            available => available,
        };
        if bytes == 0 {
            return Err(CapabilityError::Probe("memory information unavailable".into()));
        }
        Ok(bytes / (1024 * 1024))
    }

    fn cpu_cores(&self) -> Result<u32, CapabilityError> {
        let mut sys = System::new();
        sys.refresh_cpu_all();

        match sys.cpus().len() {
            0 => Err(CapabilityError::Probe("no CPUs reported".into())),
            n => Ok(n as u32),
        }
    }

    fn has_gpu(&self) -> Result<bool, CapabilityError> {
        Ok(detect_gpu())
    }

    fn ml_framework_supported(&self) -> Result<bool, CapabilityError> {
        // Inference runtimes ship for 64-bit x86 and ARM.
        Ok(matches!(std::env::consts::ARCH, "x86_64" | "aarch64"))
    }
}

fn detect_gpu() -> bool {
    if cfg!(target_os = "macos") {
        return true;
    }
    if cfg!(target_os = "linux") {
        return Path::new("/dev/dri").exists() || Path::new("/proc/driver/nvidia").exists();
    }
    false
}
