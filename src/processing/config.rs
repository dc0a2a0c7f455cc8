//! Processing configuration for one analysis session.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisTier;
use crate::capability::DeviceCapabilities;
use crate::connectivity::ConnectivityStatus;

use super::router::select_processing_tier;

/// Consent supplied by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConsent {
    /// Allow videos to be analyzed off-device
    pub cloud_processing: bool,
    /// Allow anonymized results to be shared
    pub data_sharing: bool,
}

/// Inputs to tier selection plus the tier they select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub selected_tier: AnalysisTier,
    pub device_capabilities: DeviceCapabilities,
    pub connectivity: ConnectivityStatus,
    pub user_consent: UserConsent,
}

impl ProcessingConfig {
    /// Compose the probes with stored consent and select a tier.
    pub fn new(
        device_capabilities: DeviceCapabilities,
        connectivity: ConnectivityStatus,
        user_consent: UserConsent,
    ) -> Self {
        Self {
            selected_tier: select_processing_tier(&device_capabilities, &connectivity, &user_consent),
            device_capabilities,
            connectivity,
            user_consent,
        }
    }

    pub fn has_connectivity(&self) -> bool {
        self.connectivity.is_connected
    }

    /// Same inputs with a different selected tier.
    pub fn with_tier(mut self, tier: AnalysisTier) -> Self {
        self.selected_tier = tier;
        self
    }
}
