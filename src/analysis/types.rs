//! Shared analysis types and error definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tier::AnalysisTier;

/// Error types for analysis strategies.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Pose model could not be loaded
    #[error("Pose model failed to load: {0}")]
    ModelLoad(String),

    /// Pose estimation returned no usable frames
    #[error("No pose keypoints detected in video")]
    NoPoseFrames,

    /// Shooting arm keypoints could not be located
    #[error("Could not locate shooting arm keypoints: {0}")]
    MissingKeypoints(String),

    /// Video does not meet the input requirements of the tier
    #[error("Invalid video input: {0}")]
    InvalidInput(String),

    /// Vision collaborator failure
    #[error("Vision processing failed: {0}")]
    Vision(String),

    /// No implementation for the requested tier
    #[error("Analysis tier {0} is not available")]
    TierUnavailable(AnalysisTier),

    /// Strategy exceeded the invocation timeout
    #[error("Analysis on tier {tier} timed out after {after:?}")]
    Timeout {
        /// Tier that timed out
        tier: AnalysisTier,
        /// Configured timeout
        after: Duration,
    },
}

/// Basic video properties reported by the capture layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Frames per second
    pub frame_rate: f32,
    /// Clip duration in seconds
    pub duration_secs: f32,
}

/// Opaque reference to a recorded video.
///
/// The core never interprets `location`; it is handed to the vision and
/// pose collaborators as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    /// Path or identifier understood by the collaborators
    pub location: String,
    /// Properties, when the capture layer provides them
    pub metadata: Option<VideoMetadata>,
}

impl VideoRef {
    /// Create a reference without metadata.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            metadata: None,
        }
    }

    /// Attach video metadata.
    pub fn with_metadata(mut self, metadata: VideoMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Letter grade for overall shooting form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormGrade {
    A,
    B,
    C,
    D,
    F,
}

impl FormGrade {
    /// Map a 0-100 numeric score to a grade.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            FormGrade::A
        } else if score >= 80.0 {
            FormGrade::B
        } else if score >= 70.0 {
            FormGrade::C
        } else if score >= 60.0 {
            FormGrade::D
        } else {
            FormGrade::F
        }
    }

    /// Representative numeric value used for progress averages.
    pub fn numeric_value(&self) -> f64 {
        match self {
            FormGrade::A => 95.0,
            FormGrade::B => 85.0,
            FormGrade::C => 75.0,
            FormGrade::D => 65.0,
            FormGrade::F => 50.0,
        }
    }

    /// Grades A and B count as good form.
    pub fn is_strong(&self) -> bool {
        matches!(self, FormGrade::A | FormGrade::B)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormGrade::A => "A",
            FormGrade::B => "B",
            FormGrade::C => "C",
            FormGrade::D => "D",
            FormGrade::F => "F",
        }
    }
}

impl std::fmt::Display for FormGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of shooting-form issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    ElbowFlare,
    WristAngle,
    Stance,
    FollowThrough,
}

impl IssueType {
    /// All issue types.
    pub const ALL: &'static [IssueType] = &[
        IssueType::ElbowFlare,
        IssueType::WristAngle,
        IssueType::Stance,
        IssueType::FollowThrough,
    ];

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            IssueType::ElbowFlare => "Elbow Flare",
            IssueType::WristAngle => "Wrist Angle",
            IssueType::Stance => "Stance",
            IssueType::FollowThrough => "Follow-Through",
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Severity of a detected issue.
///
/// Ordering follows urgency: `Major < Moderate < Minor`, so an ascending
/// sort puts the most severe issue first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Major,
    Moderate,
    Minor,
}

impl Severity {
    /// Sort rank, 0 being most severe.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Major => 0,
            Severity::Moderate => 1,
            Severity::Minor => 2,
        }
    }

    /// Score used for progress trends. Higher is better.
    pub fn progress_score(&self) -> f64 {
        match self {
            Severity::Major => 0.0,
            Severity::Moderate => 50.0,
            Severity::Minor => 75.0,
        }
    }

    /// Base weight for adaptive prioritization. Higher is more urgent.
    pub fn base_priority(&self) -> u32 {
        match self {
            Severity::Major => 3,
            Severity::Moderate => 2,
            Severity::Minor => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Major => "Major",
            Severity::Moderate => "Moderate",
            Severity::Minor => "Minor",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A detected shooting-form issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormIssue {
    /// Issue category
    pub issue_type: IssueType,
    /// How severe the issue is
    pub severity: Severity,
    /// What was observed
    pub description: String,
    /// Drills that address the issue, best first
    pub recommended_drills: Vec<String>,
}

impl FormIssue {
    /// Create an issue with the catalog drills for its type.
    pub fn new(issue_type: IssueType, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            issue_type,
            severity,
            description: description.into(),
            recommended_drills: super::drills::primary_drills(issue_type)
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

/// Sort issues most severe first. Stable, so equal severities keep their
/// detection order.
pub fn sort_by_severity(issues: &mut [FormIssue]) {
    issues.sort_by_key(|issue| issue.severity.rank());
}

/// The four biomechanical sub-scores, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomechanicalMetrics {
    pub elbow_alignment: u8,
    pub wrist_angle: u8,
    pub shoulder_square: u8,
    pub follow_through: u8,
}

impl BiomechanicalMetrics {
    /// Build metrics from raw scores, clamping each into 0-100.
    pub fn from_scores(
        elbow_alignment: f64,
        wrist_angle: f64,
        shoulder_square: f64,
        follow_through: f64,
    ) -> Self {
        Self {
            elbow_alignment: to_metric(elbow_alignment),
            wrist_angle: to_metric(wrist_angle),
            shoulder_square: to_metric(shoulder_square),
            follow_through: to_metric(follow_through),
        }
    }
}

/// Round and clamp a score into the 0-100 metric range.
pub fn to_metric(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

/// Clamp a raw score into 0-100 without rounding.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Result of analyzing one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormAnalysisResult {
    /// Overall letter grade
    pub overall_score: FormGrade,
    /// Detected issues, most severe first
    pub detected_issues: Vec<FormIssue>,
    /// Biomechanical sub-scores
    pub biomechanical_metrics: BiomechanicalMetrics,
}

impl FormAnalysisResult {
    /// Build a result, sorting issues most severe first.
    pub fn new(
        overall_score: FormGrade,
        mut detected_issues: Vec<FormIssue>,
        biomechanical_metrics: BiomechanicalMetrics,
    ) -> Self {
        sort_by_severity(&mut detected_issues);
        Self {
            overall_score,
            detected_issues,
            biomechanical_metrics,
        }
    }

    /// Whether an issue of the given type was detected.
    pub fn has_issue(&self, issue_type: IssueType) -> bool {
        self.detected_issues.iter().any(|i| i.issue_type == issue_type)
    }
}
