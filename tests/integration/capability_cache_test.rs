//! Integration tests for capability detection backed by SQLite.

use std::sync::Arc;

use chrono::{Duration, Utc};
use shotcoach::capability::{
    CachedCapabilities, CapabilityAssessor, DeviceCapabilities, DeviceTier,
};
use shotcoach::storage::{Database, SqliteCapabilityCache};
use tempfile::TempDir;

use super::fixtures::FixedProbe;

fn low_end_record(age: Duration) -> CachedCapabilities {
    CachedCapabilities::new(
        DeviceCapabilities::from_signals(2048, 2, false, false, 25),
        Utc::now() - age,
    )
}

#[tokio::test]
async fn test_first_run_detects_and_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shotcoach.db");
    let probe = Arc::new(FixedProbe::mid_range());

    {
        let db = Arc::new(Database::open(&path).unwrap());
        let cache = Arc::new(SqliteCapabilityCache::new(Arc::clone(&db)));
        let assessor = CapabilityAssessor::new(probe.clone(), cache);

        let caps = assessor.detect_device_capabilities(false).await;
        assert_eq!(caps.tier, DeviceTier::Mid);
        assert_eq!(probe.detections(), 1);
    }

    // A second launch reads the stored record
    let db = Arc::new(Database::open(&path).unwrap());
    let cache = SqliteCapabilityCache::new(Arc::clone(&db));
    let stored = cache.load_record().unwrap().unwrap();
    assert_eq!(stored.capabilities.tier, DeviceTier::Mid);
    assert_eq!(stored.capabilities.available_ram_mb, 4096);
    assert!(!stored.is_stale(Utc::now(), Duration::days(7)));

    let assessor = CapabilityAssessor::new(probe.clone(), Arc::new(cache));
    let caps = assessor.detect_device_capabilities(false).await;
    assert_eq!(caps.tier, DeviceTier::Mid);
    assert_eq!(probe.detections(), 1);
}

#[tokio::test]
async fn test_eight_day_old_record_is_redetected() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let cache = Arc::new(SqliteCapabilityCache::new(Arc::clone(&db)));
    cache.store_record(&low_end_record(Duration::days(8))).unwrap();

    let probe = Arc::new(FixedProbe::high_end());
    let assessor = CapabilityAssessor::new(probe.clone(), cache.clone());
    let caps = assessor.detect_device_capabilities(false).await;

    assert_eq!(caps.tier, DeviceTier::High);
    assert_eq!(probe.detections(), 1);

    let stored = cache.load_record().unwrap().unwrap();
    assert_eq!(stored.capabilities, caps);
    assert!(Utc::now() - stored.last_assessed < Duration::minutes(1));
}

#[tokio::test]
async fn test_fresh_record_skips_detection() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let cache = Arc::new(SqliteCapabilityCache::new(Arc::clone(&db)));
    let record = low_end_record(Duration::days(6));
    cache.store_record(&record).unwrap();

    let probe = Arc::new(FixedProbe::high_end());
    let assessor = CapabilityAssessor::new(probe.clone(), cache.clone());

    let caps = assessor.detect_device_capabilities(false).await;
    assert_eq!(caps, record.capabilities);
    assert_eq!(probe.detections(), 0);

    // Forced refresh ignores the fresh record and replaces it
    let refreshed = assessor.detect_device_capabilities(true).await;
    assert_eq!(refreshed.tier, DeviceTier::High);
    assert_eq!(probe.detections(), 1);
    assert_eq!(cache.load_record().unwrap().unwrap().capabilities.tier, DeviceTier::High);
}

#[tokio::test]
async fn test_custom_max_age() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let cache = Arc::new(SqliteCapabilityCache::new(Arc::clone(&db)));
    cache.store_record(&low_end_record(Duration::hours(2))).unwrap();

    let probe = Arc::new(FixedProbe::mid_range());
    let assessor = CapabilityAssessor::new(probe.clone(), cache).with_max_age(Duration::hours(1));

    assert_eq!(assessor.detect_device_capabilities(false).await.tier, DeviceTier::Mid);
    assert_eq!(probe.detections(), 1);
}
