//! Rule-based shot analysis.
//!
//! Scores a shot from trajectory and body measurements supplied by a vision
//! collaborator. The overall grade uses fixed two-level penalties per
//! measurement; the biomechanical metrics use continuous linear falloff.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{
    clamp_score, AnalysisError, BiomechanicalMetrics, FormAnalysisResult, FormGrade, FormIssue,
    IssueType, Severity, VideoRef,
};

/// Optimal release angle in degrees.
pub const OPTIMAL_RELEASE_ANGLE: f64 = 48.0;
/// Optimal elbow angle at the set point in degrees.
pub const OPTIMAL_ELBOW_ANGLE: f64 = 90.0;
/// Minimum follow-through hold in milliseconds.
pub const MIN_FOLLOW_THROUGH_MS: f64 = 300.0;
/// Optimal normalized arc height.
pub const OPTIMAL_ARC_HEIGHT: f64 = 0.75;
/// Optimal normalized stance width.
pub const OPTIMAL_STANCE_WIDTH: f64 = 0.3;

/// Ball flight measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotTrajectory {
    /// Launch angle in degrees
    pub release_angle_deg: f64,
    /// Release height in meters
    pub release_height_m: f64,
    /// Peak height normalized to the shooter-to-rim geometry (0-1)
    pub arc_height: f64,
    /// Release speed in m/s
    pub release_speed_mps: f64,
    /// How long the shooting arm holds the finish, in milliseconds
    pub follow_through_ms: f64,
}

/// Shooter body measurements at the set point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPositioning {
    /// Shoulder line deviation from square to the rim, in degrees
    pub shoulder_alignment_deg: f64,
    /// Elbow angle in degrees
    pub elbow_angle_deg: f64,
    /// Wrist deviation from a straight set, in degrees
    pub wrist_angle_deg: f64,
    /// Foot spacing normalized to body height
    pub stance_width: f64,
    /// Knee bend in degrees
    pub knee_flexion_deg: f64,
}

/// Everything the vision collaborator measures for one shot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotMeasurements {
    pub trajectory: ShotTrajectory,
    pub positioning: BodyPositioning,
}

/// Source of shot measurements.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Measure the shot recorded in `video`.
    async fn measure_shot(&self, video: &VideoRef) -> Result<ShotMeasurements, AnalysisError>;
}

/// Two-level fixed penalty for a deviation from optimum.
#[derive(Debug, Clone, Copy)]
struct PenaltyBand {
    moderate_at: f64,
    major_at: f64,
    moderate_penalty: f64,
    major_penalty: f64,
}

impl PenaltyBand {
    fn penalty(&self, deviation: f64) -> f64 {
        if deviation > self.major_at {
            self.major_penalty
        } else if deviation > self.moderate_at {
            self.moderate_penalty
        } else {
            0.0
        }
    }
}

const RELEASE_ANGLE_BAND: PenaltyBand = PenaltyBand {
    moderate_at: 5.0,
    major_at: 10.0,
    moderate_penalty: 8.0,
    major_penalty: 15.0,
};

const ELBOW_BAND: PenaltyBand = PenaltyBand {
    moderate_at: 8.0,
    major_at: 15.0,
    moderate_penalty: 8.0,
    major_penalty: 15.0,
};

const SHOULDER_BAND: PenaltyBand = PenaltyBand {
    moderate_at: 8.0,
    major_at: 15.0,
    moderate_penalty: 6.0,
    major_penalty: 12.0,
};

// Measured as shortfall below the minimum hold.
const FOLLOW_THROUGH_BAND: PenaltyBand = PenaltyBand {
    moderate_at: 0.0,
    major_at: 150.0,
    moderate_penalty: 8.0,
    major_penalty: 15.0,
};

const ARC_BAND: PenaltyBand = PenaltyBand {
    moderate_at: 0.1,
    major_at: 0.2,
    moderate_penalty: 5.0,
    major_penalty: 10.0,
};

/// Rule-based analyzer.
pub struct BasicAnalyzer<V> {
    vision: V,
}

impl<V: VisionProvider> BasicAnalyzer<V> {
    pub fn new(vision: V) -> Self {
        Self { vision }
    }

    /// Analyze a video with the rule-based model.
    pub async fn analyze(&self, video: &VideoRef) -> Result<FormAnalysisResult, AnalysisError> {
        let measurements = self.vision.measure_shot(video).await?;
        validate_measurements(&measurements)?;
        Ok(analyze_measurements(&measurements))
    }
}

fn validate_measurements(m: &ShotMeasurements) -> Result<(), AnalysisError> {
    let t = &m.trajectory;
    let p = &m.positioning;
    let values = [
        t.release_angle_deg,
        t.release_height_m,
        t.arc_height,
        t.release_speed_mps,
        t.follow_through_ms,
        p.shoulder_alignment_deg,
        p.elbow_angle_deg,
        p.wrist_angle_deg,
        p.stance_width,
        p.knee_flexion_deg,
    ];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::InvalidInput(
            "shot measurements contain non-finite values".into(),
        ));
    }
    if t.follow_through_ms < 0.0 || p.stance_width < 0.0 {
        return Err(AnalysisError::InvalidInput(
            "shot measurements contain negative durations or widths".into(),
        ));
    }
    Ok(())
}

/// Score measurements into a full analysis result.
pub fn analyze_measurements(m: &ShotMeasurements) -> FormAnalysisResult {
    let score = rule_score(m);
    let metrics = biomechanical_metrics(m);
    let issues = detect_issues(m, &metrics);

    tracing::debug!("Rule-based score {:.1} ({} issues)", score, issues.len());

    FormAnalysisResult::new(FormGrade::from_score(score), issues, metrics)
}

/// Numeric 0-100 score from fixed penalties.
pub fn rule_score(m: &ShotMeasurements) -> f64 {
    let t = &m.trajectory;
    let p = &m.positioning;

    let mut score = 100.0;
    score -= RELEASE_ANGLE_BAND.penalty((t.release_angle_deg - OPTIMAL_RELEASE_ANGLE).abs());
    score -= ELBOW_BAND.penalty((p.elbow_angle_deg - OPTIMAL_ELBOW_ANGLE).abs());
    score -= SHOULDER_BAND.penalty(p.shoulder_alignment_deg.abs());
    score -= FOLLOW_THROUGH_BAND.penalty(follow_through_shortfall(t.follow_through_ms));
    score -= ARC_BAND.penalty((t.arc_height - OPTIMAL_ARC_HEIGHT).abs());

    clamp_score(score)
}

fn follow_through_shortfall(follow_through_ms: f64) -> f64 {
    (MIN_FOLLOW_THROUGH_MS - follow_through_ms).max(0.0)
}

/// Continuous sub-scores from the same measurements.
pub fn biomechanical_metrics(m: &ShotMeasurements) -> BiomechanicalMetrics {
    let t = &m.trajectory;
    let p = &m.positioning;

    let elbow = 100.0 - (p.elbow_angle_deg - OPTIMAL_ELBOW_ANGLE).abs() * 3.33;
    let wrist = 100.0 - p.wrist_angle_deg.abs() * 5.0;
    let shoulder = 100.0 - p.shoulder_alignment_deg.abs() * 5.0;
    // One point per 3ms short of the minimum hold.
    let follow_through = 100.0 - follow_through_shortfall(t.follow_through_ms) / 3.0;

    BiomechanicalMetrics::from_scores(elbow, wrist, shoulder, follow_through)
}

fn detect_issues(m: &ShotMeasurements, metrics: &BiomechanicalMetrics) -> Vec<FormIssue> {
    let t = &m.trajectory;
    let p = &m.positioning;
    let mut issues = Vec::new();

    let elbow_dev = (p.elbow_angle_deg - OPTIMAL_ELBOW_ANGLE).abs();
    if elbow_dev > ELBOW_BAND.moderate_at {
        let severity = if elbow_dev > ELBOW_BAND.major_at {
            Severity::Major
        } else {
            Severity::Moderate
        };
        issues.push(FormIssue::new(
            IssueType::ElbowFlare,
            severity,
            format!(
                "Your elbow sits at {:.0}° at the set point. Keep it near 90° and directly under the ball.",
                p.elbow_angle_deg
            ),
        ));
    }

    if metrics.wrist_angle < 80 {
        let severity = if metrics.wrist_angle < 65 {
            Severity::Moderate
        } else {
            Severity::Minor
        };
        issues.push(FormIssue::new(
            IssueType::WristAngle,
            severity,
            format!(
                "Your wrist is {:.0}° off a straight set. Cock it back evenly so the ball rolls off your fingertips.",
                p.wrist_angle_deg.abs()
            ),
        ));
    }

    let stance_dev = (p.stance_width - OPTIMAL_STANCE_WIDTH).abs();
    let shoulder_dev = p.shoulder_alignment_deg.abs();
    let stance_severity = if stance_dev > 0.1 || shoulder_dev > SHOULDER_BAND.major_at {
        Some(Severity::Moderate)
    } else if stance_dev > 0.05 || shoulder_dev > SHOULDER_BAND.moderate_at {
        Some(Severity::Minor)
    } else {
        None
    };
    if let Some(severity) = stance_severity {
        issues.push(FormIssue::new(
            IssueType::Stance,
            severity,
            "Your base is off balance. Set your feet shoulder-width apart and square your shoulders to the rim.",
        ));
    }

    let shortfall = follow_through_shortfall(t.follow_through_ms);
    if shortfall > FOLLOW_THROUGH_BAND.moderate_at {
        let severity = if shortfall > FOLLOW_THROUGH_BAND.major_at {
            Severity::Major
        } else {
            Severity::Moderate
        };
        issues.push(FormIssue::new(
            IssueType::FollowThrough,
            severity,
            format!(
                "You held your follow-through for {:.0}ms. Hold the finish until the ball reaches the rim.",
                t.follow_through_ms
            ),
        ));
    }

    issues
}
