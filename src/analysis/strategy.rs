//! Strategy plug-in interface and tier dispatch.

use async_trait::async_trait;

use super::basic::{BasicAnalyzer, VisionProvider};
use super::lightweight::LightweightAnalyzer;
use super::pose::PoseEstimator;
use super::tier::AnalysisTier;
use super::types::{AnalysisError, FormAnalysisResult, VideoRef};

/// Analysis implementation invoked by the router.
#[async_trait]
pub trait AnalysisStrategy: Send + Sync {
    /// Analyze `video` at `tier`.
    async fn analyze(
        &self,
        video: &VideoRef,
        tier: AnalysisTier,
    ) -> Result<FormAnalysisResult, AnalysisError>;

    /// Whether this strategy has its own implementation for `tier`.
    ///
    /// The router walks the fallback chain past unsupported tiers without
    /// invoking them.
    fn supports(&self, _tier: AnalysisTier) -> bool {
        true
    }
}

/// Dispatches each tier to its analyzer.
///
/// `basic` and `lightweight_ml` have real bodies. `full_ml` and `cloud`
/// are aliases: invoked directly they delegate to `lightweight_ml`, then
/// `basic`. They report themselves unsupported so a router resolves them
/// through its own fallback chain instead.
pub struct TieredStrategy<V, P> {
    basic: BasicAnalyzer<V>,
    lightweight: LightweightAnalyzer<P>,
}

impl<V: VisionProvider, P: PoseEstimator> TieredStrategy<V, P> {
    pub fn new(basic: BasicAnalyzer<V>, lightweight: LightweightAnalyzer<P>) -> Self {
        Self { basic, lightweight }
    }

    /// Run the analyzer that implements `tier` directly.
    async fn run_implemented(
        &self,
        video: &VideoRef,
        tier: AnalysisTier,
    ) -> Result<FormAnalysisResult, AnalysisError> {
        match tier {
            AnalysisTier::Basic => self.basic.analyze(video).await,
            AnalysisTier::LightweightMl => self.lightweight.analyze(video).await,
            AnalysisTier::FullMl | AnalysisTier::Cloud => Err(AnalysisError::TierUnavailable(tier)),
        }
    }

    /// Resolve an alias tier through its delegation chain.
    ///
    /// Returns the result together with the tier that produced it.
    pub async fn analyze_delegated(
        &self,
        video: &VideoRef,
        tier: AnalysisTier,
    ) -> Result<(FormAnalysisResult, AnalysisTier), AnalysisError> {
        let chain = tier.delegation_chain();
        if chain.is_empty() {
            return self.run_implemented(video, tier).await.map(|r| (r, tier));
        }

        let mut last_error = AnalysisError::TierUnavailable(tier);
        for &delegate in chain {
            match self.run_implemented(video, delegate).await {
                Ok(result) => {
                    tracing::info!("Tier {} resolved by {} analysis", tier, delegate);
                    return Ok((result, delegate));
                }
                Err(e) => {
                    tracing::warn!("Delegated {} analysis for {} failed: {}", delegate, tier, e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}

#[async_trait]
impl<V: VisionProvider, P: PoseEstimator> AnalysisStrategy for TieredStrategy<V, P> {
    async fn analyze(
        &self,
        video: &VideoRef,
        tier: AnalysisTier,
    ) -> Result<FormAnalysisResult, AnalysisError> {
        self.analyze_delegated(video, tier).await.map(|(result, _)| result)
    }

    fn supports(&self, tier: AnalysisTier) -> bool {
        tier.delegation_chain().is_empty()
    }
}
