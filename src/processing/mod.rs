//! Adaptive processing: tier selection, validation and fallback routing.

pub mod config;
pub mod router;

pub use config::{ProcessingConfig, UserConsent};
pub use router::{
    select_processing_tier, update_config_for_connectivity, validate_processing_tier,
    AttemptOutcome, ProcessingError, ProcessingRouter, RoutedAnalysis, RouterSettings, TierAttempt,
};
