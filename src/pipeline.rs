//! End-to-end coaching pipeline.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::{AnalysisStrategy, VideoRef};
use crate::capability::CapabilityAssessor;
use crate::connectivity::ConnectivityProbe;
use crate::feedback::{generate_feedback, SessionFeedback};
use crate::processing::{ProcessingConfig, ProcessingError, ProcessingRouter, RoutedAnalysis, UserConsent};
use crate::progress::{
    build_progress_summary, generate_progress_aware_feedback, ShootingSession, UserProgressSummary,
};

/// Everything produced for one analyzed video.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub config: ProcessingConfig,
    pub routed: RoutedAnalysis,
    pub feedback: SessionFeedback,
    /// Summary of prior sessions, when there were any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<UserProgressSummary>,
}

impl PipelineOutcome {
    /// Session record for the analyzed video.
    pub fn to_session(&self, user_id: Uuid, video: &VideoRef) -> ShootingSession {
        ShootingSession::from_analysis(user_id, Utc::now(), self.routed.data.clone(), video.metadata)
    }
}

/// Capability detection, tier selection, routing and feedback for a video.
pub struct CoachingPipeline {
    assessor: CapabilityAssessor,
    connectivity: Arc<dyn ConnectivityProbe>,
    strategy: Arc<dyn AnalysisStrategy>,
    router: ProcessingRouter,
    consent: UserConsent,
}

impl CoachingPipeline {
    pub fn new(
        assessor: CapabilityAssessor,
        connectivity: Arc<dyn ConnectivityProbe>,
        strategy: Arc<dyn AnalysisStrategy>,
    ) -> Self {
        Self {
            assessor,
            connectivity,
            strategy,
            router: ProcessingRouter::default(),
            consent: UserConsent::default(),
        }
    }

    pub fn with_router(mut self, router: ProcessingRouter) -> Self {
        self.router = router;
        self
    }

    pub fn with_consent(mut self, consent: UserConsent) -> Self {
        self.consent = consent;
        self
    }

    /// Build the processing config from current device and network state.
    pub async fn processing_config(&self, force_refresh: bool) -> ProcessingConfig {
        let capabilities = self.assessor.detect_device_capabilities(force_refresh).await;
        let connectivity = self.connectivity.current_status().await;
        let config = ProcessingConfig::new(capabilities, connectivity, self.consent);
        tracing::info!(
            "Selected {} analysis ({} device, {} network)",
            config.selected_tier,
            capabilities.tier,
            connectivity.connection_type
        );
        config
    }

    /// Analyze a video. `history` holds the user's earlier sessions, oldest
    /// first; when non-empty the feedback is adapted to it.
    pub async fn analyze(
        &self,
        video: &VideoRef,
        user_id: Uuid,
        history: &[ShootingSession],
        force_refresh: bool,
    ) -> Result<PipelineOutcome, ProcessingError> {
        let config = self.processing_config(force_refresh).await;
        let routed = self
            .router
            .route_video_analysis(video, &config, self.strategy.as_ref())
            .await?;

        if routed.fallback_used {
            tracing::info!("Analysis produced by {} after fallback", routed.tier);
        }

        let base = generate_feedback(&routed.data, routed.tier);
        let (feedback, progress) = if history.is_empty() {
            (base, None)
        } else {
            let summary = build_progress_summary(user_id, history);
            (generate_progress_aware_feedback(&base, &summary), Some(summary))
        };

        Ok(PipelineOutcome {
            config,
            routed,
            feedback,
            progress,
        })
    }
}
