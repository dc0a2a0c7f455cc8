//! Analysis tier definitions.
//!
//! Tiers are ordered from cheapest to heaviest:
//!
//! - `Basic`: rule-based biomechanics from trajectory and body measurements
//! - `LightweightMl`: on-device pose estimation
//! - `FullMl`: full on-device model (resolved through lower tiers)
//! - `Cloud`: remote analysis (routing target only)

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Analysis strategy tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTier {
    /// Rule-based analysis. Always available.
    #[default]
    Basic,
    /// Pose-estimation based analysis.
    LightweightMl,
    /// Heavy on-device model.
    FullMl,
    /// Remote analysis service.
    Cloud,
}

impl AnalysisTier {
    /// All tiers, cheapest first.
    pub const ALL: &'static [AnalysisTier] = &[
        AnalysisTier::Basic,
        AnalysisTier::LightweightMl,
        AnalysisTier::FullMl,
        AnalysisTier::Cloud,
    ];

    /// Returns the tier name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisTier::Basic => "basic",
            AnalysisTier::LightweightMl => "lightweight_ml",
            AnalysisTier::FullMl => "full_ml",
            AnalysisTier::Cloud => "cloud",
        }
    }

    /// Returns a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            AnalysisTier::Basic => "Rule-based shot analysis",
            AnalysisTier::LightweightMl => "On-device pose analysis",
            AnalysisTier::FullMl => "Full on-device model analysis",
            AnalysisTier::Cloud => "Cloud analysis",
        }
    }

    /// Next tier to try when this one fails.
    ///
    /// The chain is fixed: cloud → full_ml → lightweight_ml → basic → none.
    pub fn fallback(&self) -> Option<AnalysisTier> {
        match self {
            AnalysisTier::Cloud => Some(AnalysisTier::FullMl),
            AnalysisTier::FullMl => Some(AnalysisTier::LightweightMl),
            AnalysisTier::LightweightMl => Some(AnalysisTier::Basic),
            AnalysisTier::Basic => None,
        }
    }

    /// Tiers a strategy layer delegates to when it has no body of its own
    /// for this tier, in the order they are tried.
    pub fn delegation_chain(&self) -> &'static [AnalysisTier] {
        match self {
            AnalysisTier::Cloud | AnalysisTier::FullMl => {
                &[AnalysisTier::LightweightMl, AnalysisTier::Basic]
            }
            AnalysisTier::LightweightMl | AnalysisTier::Basic => &[],
        }
    }

    /// Whether this tier needs an on-device ML framework.
    pub fn requires_ml_framework(&self) -> bool {
        matches!(self, AnalysisTier::LightweightMl | AnalysisTier::FullMl)
    }

    /// Whether this tier needs network access.
    pub fn requires_network(&self) -> bool {
        matches!(self, AnalysisTier::Cloud)
    }

    /// Soft execution budget. Exceeding it is logged, never fatal.
    pub fn soft_budget(&self) -> Duration {
        match self {
            AnalysisTier::Basic => Duration::from_millis(2000),
            AnalysisTier::LightweightMl | AnalysisTier::FullMl | AnalysisTier::Cloud => {
                Duration::from_millis(5000)
            }
        }
    }

    /// Maximum number of recommendations feedback may carry for this tier.
    pub fn recommendation_limit(&self) -> usize {
        match self {
            AnalysisTier::Basic => 2,
            AnalysisTier::LightweightMl | AnalysisTier::FullMl | AnalysisTier::Cloud => 3,
        }
    }
}

impl fmt::Display for AnalysisTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisTier {
    type Err = AnalysisTierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(AnalysisTier::Basic),
            "lightweight_ml" | "lightweight" => Ok(AnalysisTier::LightweightMl),
            "full_ml" | "full" => Ok(AnalysisTier::FullMl),
            "cloud" => Ok(AnalysisTier::Cloud),
            _ => Err(AnalysisTierParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown analysis tier: {0}")]
pub struct AnalysisTierParseError(String);
