//! Adaptive recommendations from session history.
//!
//! Tracks each issue type across a user's sessions, classifies its trend
//! and adapts the current session's recommendations accordingly.

pub mod adaptive;
pub mod summary;
pub mod types;

pub use adaptive::{calculate_adaptive_priority, generate_progress_aware_feedback};
pub use summary::{build_progress_summary, issue_progress_pattern, severity_trend};
pub use types::{
    IssueProgressPattern, SeverityTrend, ShootingSession, SyncStatus, UserProgressSummary,
};
