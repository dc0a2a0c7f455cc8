//! Unit tests for tier selection, validation and the fallback chain.

use shotcoach::analysis::AnalysisTier;
use shotcoach::capability::{DeviceCapabilities, DeviceTier};
use shotcoach::connectivity::{ConnectionType, ConnectivityStatus};
use shotcoach::processing::{
    select_processing_tier, update_config_for_connectivity, validate_processing_tier,
    ProcessingConfig, UserConsent,
};

fn high_end() -> DeviceCapabilities {
    DeviceCapabilities::from_signals(8192, 8, true, true, 85)
}

fn mid_range() -> DeviceCapabilities {
    DeviceCapabilities::from_signals(4096, 4, false, true, 60)
}

fn low_end() -> DeviceCapabilities {
    DeviceCapabilities::from_signals(2048, 2, false, false, 30)
}

fn consenting() -> UserConsent {
    UserConsent {
        cloud_processing: true,
        data_sharing: false,
    }
}

#[test]
fn test_device_fixtures_classify_as_expected() {
    assert_eq!(high_end().tier, DeviceTier::High);
    assert_eq!(mid_range().tier, DeviceTier::Mid);
    assert_eq!(low_end().tier, DeviceTier::Low);
}

#[test]
fn test_cloud_needs_consent_and_unmetered_wifi() {
    let wifi = ConnectivityStatus::wifi();
    assert_eq!(
        select_processing_tier(&low_end(), &wifi, &consenting()),
        AnalysisTier::Cloud
    );

    // Each missing condition drops to on-device selection
    let metered_wifi = ConnectivityStatus::from_link(ConnectionType::Wifi, true);
    assert_eq!(
        select_processing_tier(&high_end(), &metered_wifi, &consenting()),
        AnalysisTier::FullMl
    );
    assert_eq!(
        select_processing_tier(&high_end(), &ConnectivityStatus::cellular(), &consenting()),
        AnalysisTier::FullMl
    );
    assert_eq!(
        select_processing_tier(&high_end(), &wifi, &UserConsent::default()),
        AnalysisTier::FullMl
    );
}

#[test]
fn test_on_device_selection_by_device_tier() {
    let offline = ConnectivityStatus::offline();
    let consent = UserConsent::default();

    assert_eq!(select_processing_tier(&high_end(), &offline, &consent), AnalysisTier::FullMl);
    assert_eq!(
        select_processing_tier(&mid_range(), &offline, &consent),
        AnalysisTier::LightweightMl
    );
    assert_eq!(select_processing_tier(&low_end(), &offline, &consent), AnalysisTier::Basic);
}

#[test]
fn test_ml_tiers_require_framework() {
    let no_framework = DeviceCapabilities::from_signals(8192, 8, true, false, 85);
    assert_eq!(no_framework.tier, DeviceTier::High);
    assert_eq!(
        select_processing_tier(&no_framework, &ConnectivityStatus::offline(), &UserConsent::default()),
        AnalysisTier::Basic
    );
}

#[test]
fn test_validation_rules() {
    let offline = ProcessingConfig::new(mid_range(), ConnectivityStatus::offline(), consenting());
    assert!(!validate_processing_tier(AnalysisTier::Cloud, &offline));
    assert!(validate_processing_tier(AnalysisTier::LightweightMl, &offline));
    assert!(validate_processing_tier(AnalysisTier::FullMl, &offline));
    assert!(validate_processing_tier(AnalysisTier::Basic, &offline));

    let no_consent = ProcessingConfig::new(low_end(), ConnectivityStatus::wifi(), UserConsent::default());
    assert!(!validate_processing_tier(AnalysisTier::Cloud, &no_consent));
    assert!(!validate_processing_tier(AnalysisTier::LightweightMl, &no_consent));
    assert!(validate_processing_tier(AnalysisTier::Basic, &no_consent));
}

#[test]
fn test_going_offline_reselects_on_device_tier() {
    let config = ProcessingConfig::new(high_end(), ConnectivityStatus::wifi(), consenting());
    assert_eq!(config.selected_tier, AnalysisTier::Cloud);

    let updated = update_config_for_connectivity(&config, ConnectivityStatus::offline());
    assert_eq!(updated.selected_tier, AnalysisTier::FullMl);
    assert_eq!(updated.device_capabilities, config.device_capabilities);
    assert_eq!(updated.user_consent, config.user_consent);
    assert!(!updated.has_connectivity());

    let back_online = update_config_for_connectivity(&updated, ConnectivityStatus::wifi());
    assert_eq!(back_online.selected_tier, AnalysisTier::Cloud);
}

#[test]
fn test_fallback_chain_ends_at_basic() {
    let mut chain = vec![AnalysisTier::Cloud];
    while let Some(next) = chain.last().and_then(|t| t.fallback()) {
        chain.push(next);
    }
    assert_eq!(
        chain,
        vec![
            AnalysisTier::Cloud,
            AnalysisTier::FullMl,
            AnalysisTier::LightweightMl,
            AnalysisTier::Basic,
        ]
    );
}

#[test]
fn test_tier_names_parse_back() {
    for &tier in AnalysisTier::ALL {
        assert_eq!(tier.as_str().parse::<AnalysisTier>().unwrap(), tier);
    }
    assert!("quantum".parse::<AnalysisTier>().is_err());
}
