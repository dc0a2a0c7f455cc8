//! Integration tests for the end-to-end coaching pipeline.

use std::sync::Arc;

use shotcoach::analysis::{AnalysisTier, VideoMetadata, VideoRef};
use shotcoach::capability::{CapabilityAssessor, MemoryCapabilityCache};
use shotcoach::connectivity::{ConnectivityStatus, StaticConnectivity};
use shotcoach::pipeline::CoachingPipeline;
use shotcoach::processing::UserConsent;
use shotcoach::storage::{Database, SessionStore};
use uuid::Uuid;

use super::fixtures::{broken_pose_strategy, simulated_strategy, FixedProbe};

fn pipeline(probe: FixedProbe, status: ConnectivityStatus) -> CoachingPipeline {
    let assessor = CapabilityAssessor::new(Arc::new(probe), Arc::new(MemoryCapabilityCache::new()));
    CoachingPipeline::new(
        assessor,
        Arc::new(StaticConnectivity(status)),
        Arc::new(simulated_strategy()),
    )
}

fn clip(name: &str) -> VideoRef {
    VideoRef::new(name).with_metadata(VideoMetadata {
        width: 1280,
        height: 720,
        frame_rate: 30.0,
        duration_secs: 4.5,
    })
}

#[tokio::test]
async fn test_first_session_has_no_progress_context() {
    let pipeline = pipeline(FixedProbe::mid_range(), ConnectivityStatus::offline());
    let outcome = pipeline
        .analyze(&clip("session-1.mp4"), Uuid::new_v4(), &[], false)
        .await
        .unwrap();

    assert_eq!(outcome.config.selected_tier, AnalysisTier::LightweightMl);
    assert_eq!(outcome.routed.tier, AnalysisTier::LightweightMl);
    assert_eq!(outcome.feedback.tier, AnalysisTier::LightweightMl);
    assert_eq!(outcome.feedback.form_score, outcome.routed.data.overall_score);
    assert!(outcome.feedback.recommendations.len() <= 3);
    assert!(outcome.progress.is_none());
    assert!(outcome
        .feedback
        .recommendations
        .iter()
        .all(|r| r.progress.is_none()));
}

#[tokio::test]
async fn test_same_clip_gives_same_feedback() {
    let pipeline = pipeline(FixedProbe::mid_range(), ConnectivityStatus::offline());
    let user = Uuid::new_v4();

    let first = pipeline.analyze(&clip("repeat.mp4"), user, &[], false).await.unwrap();
    let second = pipeline.analyze(&clip("repeat.mp4"), user, &[], false).await.unwrap();
    assert_eq!(first.feedback, second.feedback);
}

#[tokio::test]
async fn test_history_from_store_drives_progress_feedback() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let store = SessionStore::new(Arc::clone(&db));
    let pipeline = pipeline(FixedProbe::mid_range(), ConnectivityStatus::offline());
    let user = Uuid::new_v4();

    for i in 0..3 {
        let video = clip(&format!("practice-{}.mp4", i));
        let history = store.sessions_for_user(user).unwrap();
        let outcome = pipeline.analyze(&video, user, &history, false).await.unwrap();
        store.record_session(&outcome.to_session(user, &video)).unwrap();
    }

    let history = store.sessions_for_user(user).unwrap();
    assert_eq!(history.len(), 3);
    assert!(history.iter().all(|s| s.user_id == user));
    assert!(history.iter().all(|s| s.duration_secs == 4.5));
    assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let outcome = pipeline
        .analyze(&clip("practice-3.mp4"), user, &history, false)
        .await
        .unwrap();

    let progress = outcome.progress.as_ref().unwrap();
    assert_eq!(progress.total_sessions, 3);
    assert_eq!(progress.user_id, user);
    assert!(outcome
        .feedback
        .recommendations
        .iter()
        .all(|r| r.progress.as_ref().map_or(false, |p| p.adaptive_priority >= 1)));
    let priorities: Vec<_> = outcome.feedback.recommendations.iter().map(|r| r.priority).collect();
    assert_eq!(priorities, (1..=priorities.len() as u32).collect::<Vec<_>>());

    // Other users see none of it
    assert!(store.sessions_for_user(Uuid::new_v4()).unwrap().is_empty());
}

#[tokio::test]
async fn test_cloud_consent_on_wifi_routes_through_aliases() {
    let pipeline = pipeline(FixedProbe::high_end(), ConnectivityStatus::wifi()).with_consent(UserConsent {
        cloud_processing: true,
        data_sharing: true,
    });

    let outcome = pipeline
        .analyze(&clip("cloud.mp4"), Uuid::new_v4(), &[], false)
        .await
        .unwrap();

    assert_eq!(outcome.config.selected_tier, AnalysisTier::Cloud);
    assert_eq!(outcome.routed.tier, AnalysisTier::LightweightMl);
    assert!(outcome.routed.fallback_used);
    assert_eq!(outcome.feedback.tier, AnalysisTier::LightweightMl);
}

#[tokio::test]
async fn test_low_quality_clip_degrades_to_basic() {
    let pipeline = pipeline(FixedProbe::mid_range(), ConnectivityStatus::offline());
    let grainy = VideoRef::new("grainy.mp4").with_metadata(VideoMetadata {
        width: 320,
        height: 240,
        frame_rate: 15.0,
        duration_secs: 3.0,
    });

    let outcome = pipeline.analyze(&grainy, Uuid::new_v4(), &[], false).await.unwrap();
    assert_eq!(outcome.routed.tier, AnalysisTier::Basic);
    assert!(outcome.routed.fallback_used);
    assert!(outcome.feedback.recommendations.len() <= 2);
}

#[tokio::test]
async fn test_broken_model_still_produces_feedback() {
    let assessor = CapabilityAssessor::new(
        Arc::new(FixedProbe::mid_range()),
        Arc::new(MemoryCapabilityCache::new()),
    );
    let pipeline = CoachingPipeline::new(
        assessor,
        Arc::new(StaticConnectivity(ConnectivityStatus::offline())),
        Arc::new(broken_pose_strategy()),
    );

    let outcome = pipeline
        .analyze(&clip("session.mp4"), Uuid::new_v4(), &[], false)
        .await
        .unwrap();
    assert_eq!(outcome.feedback.tier, AnalysisTier::Basic);

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["routed"]["tier"], "basic");
    assert_eq!(json["config"]["selected_tier"], "lightweight_ml");
    assert!(json.get("progress").is_none());
}
