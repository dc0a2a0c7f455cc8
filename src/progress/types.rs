//! Session history and progress types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{FormAnalysisResult, FormGrade, FormIssue, IssueType, Severity, VideoMetadata};

/// Upload state of a recorded session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
            SyncStatus::Failed => "failed",
        }
    }

    /// Parse the stored string form. Unknown values read as `Pending`.
    pub fn from_stored(s: &str) -> Self {
        match s {
            "synced" => SyncStatus::Synced,
            "failed" => SyncStatus::Failed,
            _ => SyncStatus::Pending,
        }
    }
}

/// One recorded and analyzed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootingSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Video duration in seconds
    pub duration_secs: f32,
    pub form_score: FormGrade,
    pub detected_issues: Vec<FormIssue>,
    pub form_analysis: FormAnalysisResult,
    pub video_metadata: Option<VideoMetadata>,
    pub sync_status: SyncStatus,
}

impl ShootingSession {
    /// New pending session for an analysis result.
    pub fn from_analysis(
        user_id: Uuid,
        timestamp: DateTime<Utc>,
        analysis: FormAnalysisResult,
        video_metadata: Option<VideoMetadata>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            timestamp,
            duration_secs: video_metadata.map(|m| m.duration_secs).unwrap_or(0.0),
            form_score: analysis.overall_score,
            detected_issues: analysis.detected_issues.clone(),
            form_analysis: analysis,
            video_metadata,
            sync_status: SyncStatus::Pending,
        }
    }

    /// Most severe occurrence of an issue type in this session.
    pub fn worst_severity(&self, issue_type: IssueType) -> Option<Severity> {
        self.detected_issues
            .iter()
            .filter(|i| i.issue_type == issue_type)
            .map(|i| i.severity)
            .min()
    }
}

/// Direction an issue's severity is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTrend {
    Improving,
    Stable,
    Worsening,
}

impl SeverityTrend {
    pub fn label(&self) -> &'static str {
        match self {
            SeverityTrend::Improving => "Improving",
            SeverityTrend::Stable => "Stable",
            SeverityTrend::Worsening => "Worsening",
        }
    }
}

impl std::fmt::Display for SeverityTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// History of one issue type across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueProgressPattern {
    pub issue_type: IssueType,
    pub first_detected: DateTime<Utc>,
    pub last_detected: DateTime<Utc>,
    /// Sessions the issue appeared in
    pub occurrence_count: u32,
    pub severity_trend: SeverityTrend,
    /// Mean severity score (major 0, moderate 50, minor 75)
    pub average_severity_score: f64,
    /// Absent from the two most recent sessions
    pub resolved: bool,
}

impl IssueProgressPattern {
    pub fn is_persistent(&self) -> bool {
        !self.resolved && self.occurrence_count >= 3
    }

    pub fn is_new(&self) -> bool {
        !self.resolved && self.occurrence_count <= 2
    }
}

/// Aggregate progress over a user's sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgressSummary {
    pub user_id: Uuid,
    pub total_sessions: usize,
    /// Mean grade value (A 95 ... F 50)
    pub average_score: f64,
    /// Recent window mean minus earlier mean
    pub score_improvement: f64,
    pub persistent_issues: Vec<IssueProgressPattern>,
    pub resolved_issues: Vec<IssueProgressPattern>,
    pub new_issues: Vec<IssueProgressPattern>,
}

impl UserProgressSummary {
    /// Pattern for an issue type in any classification.
    pub fn pattern_for(&self, issue_type: IssueType) -> Option<&IssueProgressPattern> {
        self.persistent_issues
            .iter()
            .chain(&self.resolved_issues)
            .chain(&self.new_issues)
            .find(|p| p.issue_type == issue_type)
    }
}
