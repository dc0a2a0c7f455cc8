//! Progress summary over session history.

use uuid::Uuid;

use crate::analysis::IssueType;

use super::types::{IssueProgressPattern, SeverityTrend, ShootingSession, UserProgressSummary};

/// Sessions in the recent window for score improvement.
pub const RECENT_WINDOW: usize = 5;
/// Most recent sessions an issue must be absent from to count as resolved.
pub const RESOLUTION_WINDOW: usize = 2;
/// Severity score change that counts as a trend.
pub const TREND_THRESHOLD: f64 = 15.0;

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Classify the trend of severity scores in occurrence order.
///
/// Compares the mean of the first half against the second half; the
/// second half takes the extra element when the count is odd.
pub fn severity_trend(scores: &[f64]) -> SeverityTrend {
    if scores.len() < 2 {
        return SeverityTrend::Stable;
    }
    let half = scores.len() / 2;
    let diff = mean(&scores[half..]) - mean(&scores[..half]);
    if diff > TREND_THRESHOLD {
        SeverityTrend::Improving
    } else if diff < -TREND_THRESHOLD {
        SeverityTrend::Worsening
    } else {
        SeverityTrend::Stable
    }
}

/// Pattern for one issue type, or `None` if it never occurred.
///
/// `sessions` must be ordered oldest first.
pub fn issue_progress_pattern(
    issue_type: IssueType,
    sessions: &[ShootingSession],
) -> Option<IssueProgressPattern> {
    let occurrences: Vec<_> = sessions
        .iter()
        .filter_map(|s| s.worst_severity(issue_type).map(|sev| (s.timestamp, sev)))
        .collect();
    let (first, last) = (occurrences.first()?, occurrences.last()?);

    let scores: Vec<f64> = occurrences.iter().map(|(_, sev)| sev.progress_score()).collect();
    let recent = &sessions[sessions.len().saturating_sub(RESOLUTION_WINDOW)..];
    let resolved = recent.iter().all(|s| s.worst_severity(issue_type).is_none());

    Some(IssueProgressPattern {
        issue_type,
        first_detected: first.0,
        last_detected: last.0,
        occurrence_count: occurrences.len() as u32,
        severity_trend: severity_trend(&scores),
        average_severity_score: mean(&scores),
        resolved,
    })
}

/// Summarize a user's sessions, ordered oldest first.
pub fn build_progress_summary(user_id: Uuid, sessions: &[ShootingSession]) -> UserProgressSummary {
    let scores: Vec<f64> = sessions.iter().map(|s| s.form_score.numeric_value()).collect();

    let split = scores.len().saturating_sub(RECENT_WINDOW);
    let (earlier, recent) = scores.split_at(split);
    let score_improvement = if earlier.is_empty() {
        0.0
    } else {
        mean(recent) - mean(earlier)
    };

    let mut summary = UserProgressSummary {
        user_id,
        total_sessions: sessions.len(),
        average_score: mean(&scores),
        score_improvement,
        persistent_issues: Vec::new(),
        resolved_issues: Vec::new(),
        new_issues: Vec::new(),
    };

    for &issue_type in IssueType::ALL {
        let Some(pattern) = issue_progress_pattern(issue_type, sessions) else {
            continue;
        };
        if pattern.resolved {
            summary.resolved_issues.push(pattern);
        } else if pattern.is_persistent() {
            summary.persistent_issues.push(pattern);
        } else {
            summary.new_issues.push(pattern);
        }
    }

    summary
}
