//! Device capability assessment.
//!
//! Measures RAM, cores, GPU/ML runtime availability and a micro-benchmark,
//! classifies the device tier and caches the result.

pub mod assessor;
pub mod benchmark;
pub mod cache;
pub mod probe;
pub mod types;

pub use assessor::CapabilityAssessor;
pub use cache::{CapabilityCache, MemoryCapabilityCache};
pub use probe::{SysinfoProbe, SystemProbe};
pub use types::{
    classify_device_tier, CachedCapabilities, CapabilityError, DeviceCapabilities, DeviceTier,
};
