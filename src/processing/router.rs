//! Tier selection and fallback routing.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::analysis::{AnalysisError, AnalysisStrategy, AnalysisTier, FormAnalysisResult, VideoRef};
use crate::capability::{DeviceCapabilities, DeviceTier};
use crate::connectivity::{ConnectionType, ConnectivityStatus};

use super::config::{ProcessingConfig, UserConsent};

/// Error types for routed analysis.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Every tier, including basic, failed
    #[error("Analysis unavailable after trying {}: {source}", tier_list(.attempted))]
    Exhausted {
        /// Tiers invoked, in order
        attempted: Vec<AnalysisTier>,
        /// Most recent failure
        #[source]
        source: AnalysisError,
    },
}

fn tier_list(tiers: &[AnalysisTier]) -> String {
    if tiers.is_empty() {
        return "no tiers".to_string();
    }
    tiers
        .iter()
        .map(AnalysisTier::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pick the analysis tier. First matching rule wins.
pub fn select_processing_tier(
    capabilities: &DeviceCapabilities,
    connectivity: &ConnectivityStatus,
    consent: &UserConsent,
) -> AnalysisTier {
    if connectivity.is_connected
        && consent.cloud_processing
        && connectivity.connection_type == ConnectionType::Wifi
        && !connectivity.is_metered
    {
        AnalysisTier::Cloud
    } else if capabilities.tier == DeviceTier::High && capabilities.ml_framework_supported {
        AnalysisTier::FullMl
    } else if capabilities.tier == DeviceTier::Mid && capabilities.ml_framework_supported {
        AnalysisTier::LightweightMl
    } else {
        AnalysisTier::Basic
    }
}

/// Whether `tier` is currently legal under `config`.
pub fn validate_processing_tier(tier: AnalysisTier, config: &ProcessingConfig) -> bool {
    match tier {
        AnalysisTier::Cloud => config.has_connectivity() && config.user_consent.cloud_processing,
        AnalysisTier::FullMl | AnalysisTier::LightweightMl => {
            config.device_capabilities.ml_framework_supported
        }
        AnalysisTier::Basic => true,
    }
}

/// New config for changed connectivity; device and consent are kept.
pub fn update_config_for_connectivity(
    config: &ProcessingConfig,
    connectivity: ConnectivityStatus,
) -> ProcessingConfig {
    ProcessingConfig::new(config.device_capabilities, connectivity, config.user_consent)
}

/// Router timing settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouterSettings {
    /// Hard limit per strategy invocation; `None` disables it
    pub strategy_timeout: Option<Duration>,
    /// Soft budget for the basic tier
    pub basic_budget: Duration,
    /// Soft budget for every other tier
    pub ml_budget: Duration,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            strategy_timeout: Some(Duration::from_secs(30)),
            basic_budget: AnalysisTier::Basic.soft_budget(),
            ml_budget: AnalysisTier::LightweightMl.soft_budget(),
        }
    }
}

impl RouterSettings {
    pub fn budget_for(&self, tier: AnalysisTier) -> Duration {
        match tier {
            AnalysisTier::Basic => self.basic_budget,
            _ => self.ml_budget,
        }
    }
}

/// Result of one tier in the attempt log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    Failed(String),
    /// Not implemented by the strategy; passed over without invoking
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierAttempt {
    pub tier: AnalysisTier,
    pub outcome: AttemptOutcome,
    pub elapsed_ms: u64,
}

/// Analysis result with routing diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedAnalysis {
    pub data: FormAnalysisResult,
    /// Tier whose strategy produced `data`
    pub tier: AnalysisTier,
    pub processing_time: Duration,
    pub fallback_used: bool,
    pub attempts: Vec<TierAttempt>,
}

/// Executes a strategy with validation and cascading fallback.
#[derive(Debug, Clone, Default)]
pub struct ProcessingRouter {
    settings: RouterSettings,
}

struct RouteState {
    started: Instant,
    fallback_used: bool,
    attempts: Vec<TierAttempt>,
}

impl RouteState {
    fn attempted(&self) -> Vec<AnalysisTier> {
        self.attempts
            .iter()
            .filter(|a| a.outcome != AttemptOutcome::Skipped)
            .map(|a| a.tier)
            .collect()
    }

    fn finish(self, data: FormAnalysisResult, tier: AnalysisTier) -> RoutedAnalysis {
        RoutedAnalysis {
            data,
            tier,
            processing_time: self.started.elapsed(),
            fallback_used: self.fallback_used,
            attempts: self.attempts,
        }
    }
}

impl ProcessingRouter {
    pub fn new(settings: RouterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Analyze `video` at the configured tier, falling back on failure.
    ///
    /// Attempts the tier, then its fallback, then `basic` once more if the
    /// fallback was not already `basic`. Tiers the strategy does not support
    /// are passed over along the chain.
    pub async fn route_video_analysis(
        &self,
        video: &VideoRef,
        config: &ProcessingConfig,
        strategy: &dyn AnalysisStrategy,
    ) -> Result<RoutedAnalysis, ProcessingError> {
        let mut state = RouteState {
            started: Instant::now(),
            fallback_used: false,
            attempts: Vec::new(),
        };

        let mut tier = config.selected_tier;
        if !validate_processing_tier(tier, config) {
            let reselected = select_processing_tier(
                &config.device_capabilities,
                &config.connectivity,
                &config.user_consent,
            );
            tracing::warn!("Tier {} is no longer valid, re-selected {}", tier, reselected);
            tier = reselected;
            state.fallback_used = true;
        }

        let primary = match self.resolve_supported(Some(tier), strategy, &mut state) {
            Some(primary) => primary,
            None => {
                let attempted = state.attempted();
                return Err(ProcessingError::Exhausted {
                    attempted,
                    source: AnalysisError::TierUnavailable(tier),
                });
            }
        };

        let mut last_error = match self.attempt(video, primary, strategy, &mut state).await {
            Ok(data) => return Ok(state.finish(data, primary)),
            Err(e) => e,
        };

        state.fallback_used = true;
        let fallback = self.resolve_supported(primary.fallback(), strategy, &mut state);
        if let Some(fallback) = fallback {
            match self.attempt(video, fallback, strategy, &mut state).await {
                Ok(data) => return Ok(state.finish(data, fallback)),
                Err(e) => last_error = e,
            }

            if fallback != AnalysisTier::Basic && strategy.supports(AnalysisTier::Basic) {
                tracing::warn!("Falling back to basic analysis as a last resort");
                match self.attempt(video, AnalysisTier::Basic, strategy, &mut state).await {
                    Ok(data) => return Ok(state.finish(data, AnalysisTier::Basic)),
                    Err(e) => last_error = e,
                }
            }
        }

        let attempted = state.attempted();
        tracing::warn!("Analysis exhausted after {}", tier_list(&attempted));
        Err(ProcessingError::Exhausted {
            attempted,
            source: last_error,
        })
    }

    /// Walk down the chain from `tier` to the first tier the strategy supports.
    fn resolve_supported(
        &self,
        mut tier: Option<AnalysisTier>,
        strategy: &dyn AnalysisStrategy,
        state: &mut RouteState,
    ) -> Option<AnalysisTier> {
        while let Some(t) = tier {
            if strategy.supports(t) {
                return Some(t);
            }
            tracing::debug!("Strategy does not implement {}, skipping", t);
            state.attempts.push(TierAttempt {
                tier: t,
                outcome: AttemptOutcome::Skipped,
                elapsed_ms: 0,
            });
            state.fallback_used = true;
            tier = t.fallback();
        }
        None
    }

    async fn attempt(
        &self,
        video: &VideoRef,
        tier: AnalysisTier,
        strategy: &dyn AnalysisStrategy,
        state: &mut RouteState,
    ) -> Result<FormAnalysisResult, AnalysisError> {
        tracing::debug!("Running {} analysis for {}", tier, video.location);
        let started = Instant::now();

        let result = match self.settings.strategy_timeout {
            Some(limit) => match tokio::time::timeout(limit, strategy.analyze(video, tier)).await {
                Ok(result) => result,
                Err(_) => Err(AnalysisError::Timeout { tier, after: limit }),
            },
            None => strategy.analyze(video, tier).await,
        };

        let elapsed = started.elapsed();
        let outcome = match &result {
            Ok(_) => {
                let budget = self.settings.budget_for(tier);
                if elapsed > budget {
                    tracing::warn!(
                        "{} analysis took {:?}, over its {:?} budget",
                        tier,
                        elapsed,
                        budget
                    );
                }
                AttemptOutcome::Succeeded
            }
            Err(e) => {
                tracing::warn!("{} analysis failed: {}", tier, e);
                AttemptOutcome::Failed(e.to_string())
            }
        };

        state.attempts.push(TierAttempt {
            tier,
            outcome,
            elapsed_ms: elapsed.as_millis() as u64,
        });
        result
    }
}
