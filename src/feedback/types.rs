//! Session feedback types.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisTier, FormGrade, IssueType, Severity};

/// Progress context attached to a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressAnnotation {
    /// First time (or first in a while) this issue shows up
    pub is_new: bool,
    /// Issue has recurred across three or more sessions
    pub is_persistent: bool,
    /// Human-readable progress note
    pub note: Option<String>,
    /// Priority weight from severity and trend, at least 1
    pub adaptive_priority: u32,
}

/// A prioritized coaching recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Display order, 1 first
    pub priority: u32,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub title: String,
    pub explanation: String,
    pub why_it_matters: String,
    pub drills: Vec<String>,
    /// Set by progress-aware feedback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressAnnotation>,
}

/// Feedback for one analyzed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFeedback {
    pub overall_message: String,
    pub form_score: FormGrade,
    pub recommendations: Vec<Recommendation>,
    pub encouragement: String,
    pub next_steps: Vec<String>,
    /// Tier that produced the analysis
    pub tier: AnalysisTier,
}
