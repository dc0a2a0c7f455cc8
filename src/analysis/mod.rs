//! Shooting form analysis.
//!
//! Provides the tiered analysis strategies:
//! - Rule-based scoring from trajectory and body measurements
//! - Pose-keypoint scoring with shot phase segmentation
//! - Alias tiers that delegate to the implemented ones

pub mod basic;
pub mod drills;
pub mod lightweight;
pub mod pose;
pub mod simulated;
pub mod strategy;
pub mod tier;
pub mod types;

// Re-exports for convenience
pub use basic::{BasicAnalyzer, BodyPositioning, ShotMeasurements, ShotTrajectory, VisionProvider};
pub use lightweight::{LightweightAnalyzer, PoseAnalysisSettings, PoseScores, VideoRequirements};
pub use pose::{Joint, Keypoint, PoseEstimator, PoseFrame, ShootingHand};
pub use simulated::{SimulatedPoseEstimator, SimulatedVision};
pub use strategy::{AnalysisStrategy, TieredStrategy};
pub use tier::{AnalysisTier, AnalysisTierParseError};
pub use types::{
    AnalysisError, BiomechanicalMetrics, FormAnalysisResult, FormGrade, FormIssue, IssueType,
    Severity, VideoMetadata, VideoRef,
};
