//! Pose-based shot analysis.
//!
//! Scores the release frame and follow-through window of a pose sequence.
//! Every failure here is raised to the caller; degrading to a cheaper tier
//! is the router's job.

use serde::{Deserialize, Serialize};

use super::pose::{
    angle_at, angle_from_horizontal, angle_from_vertical, segment_phases, Joint, PoseEstimator,
    PoseFrame, ShootingHand, ShotPhases,
};
use super::types::{
    clamp_score, sort_by_severity, AnalysisError, BiomechanicalMetrics, FormAnalysisResult,
    FormGrade, FormIssue, IssueType, Severity, VideoMetadata, VideoRef,
};

/// Score used when a sub-score cannot be measured.
pub const NEUTRAL_SCORE: f64 = 50.0;
/// Maximum number of issues reported by pose analysis.
pub const MAX_POSE_ISSUES: usize = 3;
/// Follow-through frames that earn a full duration score.
const FULL_FOLLOW_THROUGH_FRAMES: f64 = 5.0;
/// Optimal ankle spacing in normalized image coordinates.
const OPTIMAL_STANCE_WIDTH: f64 = 0.3;

const ELBOW_WEIGHT: f64 = 0.25;
const WRIST_WEIGHT: f64 = 0.20;
const SHOULDER_WEIGHT: f64 = 0.20;
const FOLLOW_THROUGH_WEIGHT: f64 = 0.25;
const BALANCE_WEIGHT: f64 = 0.10;

/// Minimum video quality accepted by the ML tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoRequirements {
    pub min_frame_height: u32,
    pub min_frame_rate: f32,
    pub min_duration_secs: f32,
    pub max_duration_secs: f32,
}

impl Default for VideoRequirements {
    fn default() -> Self {
        Self {
            min_frame_height: 360,
            min_frame_rate: 24.0,
            min_duration_secs: 1.0,
            max_duration_secs: 30.0,
        }
    }
}

impl VideoRequirements {
    /// Check video metadata against the requirements.
    pub fn check(&self, metadata: &VideoMetadata) -> Result<(), AnalysisError> {
        if metadata.height.min(metadata.width) < self.min_frame_height {
            return Err(AnalysisError::InvalidInput(format!(
                "resolution {}x{} is below the {}p minimum",
                metadata.width, metadata.height, self.min_frame_height
            )));
        }
        if metadata.frame_rate < self.min_frame_rate {
            return Err(AnalysisError::InvalidInput(format!(
                "frame rate {:.1} fps is below the {:.0} fps minimum",
                metadata.frame_rate, self.min_frame_rate
            )));
        }
        if metadata.duration_secs < self.min_duration_secs
            || metadata.duration_secs > self.max_duration_secs
        {
            return Err(AnalysisError::InvalidInput(format!(
                "duration {:.1}s is outside {:.1}-{:.1}s",
                metadata.duration_secs, self.min_duration_secs, self.max_duration_secs
            )));
        }
        Ok(())
    }
}

/// Pose-analysis settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseAnalysisSettings {
    pub shooting_hand: ShootingHand,
    /// Keypoints below this confidence count as missing
    pub min_keypoint_confidence: f64,
    pub video_requirements: VideoRequirements,
}

impl Default for PoseAnalysisSettings {
    fn default() -> Self {
        Self {
            shooting_hand: ShootingHand::Right,
            min_keypoint_confidence: 0.3,
            video_requirements: VideoRequirements::default(),
        }
    }
}

/// Pose sub-scores, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseScores {
    pub elbow_alignment: f64,
    pub wrist_angle: f64,
    pub shoulder_square: f64,
    pub follow_through: f64,
    pub body_balance: f64,
}

impl PoseScores {
    /// Weighted overall score (0-100).
    pub fn overall(&self) -> f64 {
        clamp_score(
            self.elbow_alignment * ELBOW_WEIGHT
                + self.wrist_angle * WRIST_WEIGHT
                + self.shoulder_square * SHOULDER_WEIGHT
                + self.follow_through * FOLLOW_THROUGH_WEIGHT
                + self.body_balance * BALANCE_WEIGHT,
        )
    }

    pub fn grade(&self) -> FormGrade {
        FormGrade::from_score(self.overall())
    }

    pub fn metrics(&self) -> BiomechanicalMetrics {
        BiomechanicalMetrics::from_scores(
            self.elbow_alignment,
            self.wrist_angle,
            self.shoulder_square,
            self.follow_through,
        )
    }
}

/// Pose-based analyzer.
pub struct LightweightAnalyzer<P> {
    estimator: P,
    settings: PoseAnalysisSettings,
}

impl<P: PoseEstimator> LightweightAnalyzer<P> {
    pub fn new(estimator: P) -> Self {
        Self::with_settings(estimator, PoseAnalysisSettings::default())
    }

    pub fn with_settings(estimator: P, settings: PoseAnalysisSettings) -> Self {
        Self {
            estimator,
            settings,
        }
    }

    pub fn settings(&self) -> &PoseAnalysisSettings {
        &self.settings
    }

    /// Analyze a video from its pose sequence.
    pub async fn analyze(&self, video: &VideoRef) -> Result<FormAnalysisResult, AnalysisError> {
        if let Some(metadata) = &video.metadata {
            self.settings.video_requirements.check(metadata)?;
        }

        self.estimator.load_model().await?;
        let frames = self.estimator.estimate_poses(video).await?;
        tracing::debug!("Pose estimator returned {} frames", frames.len());

        let scores = score_pose_sequence(&frames, &self.settings)?;
        let issues = detect_form_issues_from_pose(&scores);

        Ok(FormAnalysisResult::new(scores.grade(), issues, scores.metrics()))
    }
}

/// Compute sub-scores from a pose sequence.
pub fn score_pose_sequence(
    frames: &[PoseFrame],
    settings: &PoseAnalysisSettings,
) -> Result<PoseScores, AnalysisError> {
    if frames.iter().all(PoseFrame::is_empty) {
        return Err(AnalysisError::NoPoseFrames);
    }

    let hand = settings.shooting_hand;
    let min_conf = settings.min_keypoint_confidence;

    let phases = segment_phases(frames, hand, min_conf).ok_or_else(|| {
        AnalysisError::MissingKeypoints(format!("{:?} not detected in any frame", hand.wrist()))
    })?;
    let release = &frames[phases.release_frame];

    let (shoulder, elbow, wrist) = match (
        release.confident(hand.shoulder(), min_conf),
        release.confident(hand.elbow(), min_conf),
        release.confident(hand.wrist(), min_conf),
    ) {
        (Some(s), Some(e), Some(w)) => (s, e, w),
        _ => {
            return Err(AnalysisError::MissingKeypoints(format!(
                "shoulder, elbow and wrist of the {:?} arm are required at release",
                hand
            )))
        }
    };

    let elbow_alignment = angle_at(elbow, shoulder, wrist)
        .map(|angle| clamp_score(100.0 - (angle - 90.0).abs() * 3.33))
        .unwrap_or(NEUTRAL_SCORE);

    let wrist_angle = angle_from_vertical(elbow, wrist)
        .map(|angle| clamp_score(100.0 - angle * 5.0))
        .unwrap_or(NEUTRAL_SCORE);

    let shoulder_square = match (
        release.confident(Joint::LeftShoulder, min_conf),
        release.confident(Joint::RightShoulder, min_conf),
    ) {
        (Some(l), Some(r)) => clamp_score(100.0 - angle_from_horizontal(l, r) * 5.0),
        _ => NEUTRAL_SCORE,
    };

    let follow_through = follow_through_score(frames, &phases, hand, min_conf);
    let body_balance = body_balance_score(release, min_conf);

    Ok(PoseScores {
        elbow_alignment,
        wrist_angle,
        shoulder_square,
        follow_through,
        body_balance,
    })
}

fn follow_through_score(
    frames: &[PoseFrame],
    phases: &ShotPhases,
    hand: ShootingHand,
    min_conf: f64,
) -> f64 {
    let wrist_ys: Vec<f64> = frames[phases.follow_through.clone()]
        .iter()
        .filter_map(|f| f.confident(hand.wrist(), min_conf).map(|k| k.y))
        .collect();

    if wrist_ys.len() < 2 {
        return NEUTRAL_SCORE;
    }

    let duration = (wrist_ys.len() as f64 / FULL_FOLLOW_THROUGH_FRAMES * 100.0).min(100.0);

    let n = wrist_ys.len() as f64;
    let mean = wrist_ys.iter().sum::<f64>() / n;
    let variance = wrist_ys.iter().map(|y| (y - mean).powi(2)).sum::<f64>() / n;
    let consistency = clamp_score(100.0 - 500.0 * variance);

    clamp_score(duration * 0.6 + consistency * 0.4)
}

fn body_balance_score(frame: &PoseFrame, min_conf: f64) -> f64 {
    let hip_level = match (
        frame.confident(Joint::LeftHip, min_conf),
        frame.confident(Joint::RightHip, min_conf),
    ) {
        (Some(l), Some(r)) => clamp_score(100.0 - angle_from_horizontal(l, r) * 5.0),
        _ => NEUTRAL_SCORE,
    };

    let stance = match (
        frame.confident(Joint::LeftAnkle, min_conf),
        frame.confident(Joint::RightAnkle, min_conf),
    ) {
        (Some(l), Some(r)) => {
            let width = (l.x - r.x).abs();
            clamp_score(100.0 - (width - OPTIMAL_STANCE_WIDTH).abs() * 250.0)
        }
        _ => NEUTRAL_SCORE,
    };

    hip_level * 0.5 + stance * 0.5
}

/// Turn pose sub-scores into at most three issues, most severe first.
pub fn detect_form_issues_from_pose(scores: &PoseScores) -> Vec<FormIssue> {
    let mut issues = Vec::new();

    if scores.elbow_alignment < 75.0 {
        let severity = if scores.elbow_alignment < 60.0 {
            Severity::Major
        } else {
            Severity::Moderate
        };
        issues.push(FormIssue::new(
            IssueType::ElbowFlare,
            severity,
            "Your shooting elbow drifts away from a 90° set. Keep it tucked under the ball.",
        ));
    }

    if scores.wrist_angle < 80.0 {
        let severity = if scores.wrist_angle < 65.0 {
            Severity::Moderate
        } else {
            Severity::Minor
        };
        issues.push(FormIssue::new(
            IssueType::WristAngle,
            severity,
            "Your forearm tilts off vertical at release. Stack your wrist over your elbow.",
        ));
    }

    if scores.shoulder_square < 70.0 {
        issues.push(FormIssue::new(
            IssueType::Stance,
            Severity::Moderate,
            "Your shoulders are not square to the basket at release.",
        ));
    }

    if scores.follow_through < 75.0 {
        let severity = if scores.follow_through < 60.0 {
            Severity::Major
        } else {
            Severity::Moderate
        };
        issues.push(FormIssue::new(
            IssueType::FollowThrough,
            severity,
            "Your follow-through is short or unsteady. Hold your wrist high until the ball lands.",
        ));
    }

    sort_by_severity(&mut issues);
    issues.truncate(MAX_POSE_ISSUES);
    issues
}
