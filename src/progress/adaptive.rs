//! Progress-aware recommendation adaptation.

use crate::analysis::drills::alternative_drills;
use crate::analysis::Severity;
use crate::feedback::{ProgressAnnotation, Recommendation, SessionFeedback};

use super::types::{IssueProgressPattern, SeverityTrend, UserProgressSummary};

/// History needed before trend sentences are added to the overall message.
pub const MIN_SESSIONS_FOR_TREND: usize = 3;
/// Score change treated as a real trend.
pub const SCORE_TREND_THRESHOLD: f64 = 5.0;

/// Priority weight for an issue given its history. Never below 1.
pub fn calculate_adaptive_priority(
    severity: Severity,
    pattern: Option<&IssueProgressPattern>,
) -> u32 {
    let mut priority = severity.base_priority() as i64;
    if let Some(pattern) = pattern {
        match pattern.severity_trend {
            SeverityTrend::Worsening => priority += 2,
            SeverityTrend::Improving => priority -= 1,
            SeverityTrend::Stable => {}
        }
        if pattern.occurrence_count >= 5 {
            priority += 1;
        }
    }
    priority.max(1) as u32
}

fn progress_note(pattern: &IssueProgressPattern) -> Option<String> {
    if pattern.resolved {
        return Some(
            "This issue was resolved but has come back. Go back to the drills that fixed it."
                .to_string(),
        );
    }
    if pattern.is_persistent() {
        let note = match pattern.severity_trend {
            SeverityTrend::Improving => {
                "You're improving here. Keep working these drills and it will disappear.".to_string()
            }
            SeverityTrend::Worsening => {
                "This issue is getting worse. Slow down and try the alternative drill below."
                    .to_string()
            }
            SeverityTrend::Stable => format!(
                "This has shown up in {} sessions. Try a different drill to break through.",
                pattern.occurrence_count
            ),
        };
        return Some(note);
    }
    if pattern.is_new() {
        return Some(new_issue_note());
    }
    None
}

fn new_issue_note() -> String {
    "New focus area. Catching it early makes it easy to fix.".to_string()
}

fn annotate(mut rec: Recommendation, summary: &UserProgressSummary) -> Recommendation {
    let pattern = summary.pattern_for(rec.issue_type);

    let annotation = match pattern {
        Some(pattern) => {
            let is_persistent = pattern.is_persistent();
            if is_persistent && pattern.severity_trend != SeverityTrend::Improving {
                let alternative = alternative_drills(rec.issue_type)
                    .iter()
                    .copied()
                    .find(|d| !rec.drills.iter().any(|existing| existing == d));
                if let Some(alt) = alternative {
                    rec.drills.push(alt.to_string());
                }
            }
            ProgressAnnotation {
                is_new: pattern.is_new(),
                is_persistent,
                note: progress_note(pattern),
                adaptive_priority: calculate_adaptive_priority(rec.severity, Some(pattern)),
            }
        }
        None => ProgressAnnotation {
            is_new: true,
            is_persistent: false,
            note: Some(new_issue_note()),
            adaptive_priority: calculate_adaptive_priority(rec.severity, None),
        },
    };

    rec.progress = Some(annotation);
    rec
}

fn trend_sentences(summary: &UserProgressSummary) -> Vec<String> {
    let mut sentences = Vec::new();
    if summary.total_sessions < MIN_SESSIONS_FOR_TREND {
        return sentences;
    }

    if summary.score_improvement > SCORE_TREND_THRESHOLD {
        sentences.push(format!(
            "Your scores are up {:.0} points over your recent sessions.",
            summary.score_improvement
        ));
    } else if summary.score_improvement < -SCORE_TREND_THRESHOLD {
        sentences.push(
            "Your scores have dipped recently. Focus on the fundamentals to get back on track."
                .to_string(),
        );
    } else {
        sentences.push("Your form has been consistent across your sessions.".to_string());
    }

    if !summary.resolved_issues.is_empty() {
        let fixed: Vec<String> = summary
            .resolved_issues
            .iter()
            .map(|p| p.issue_type.label().to_lowercase())
            .collect();
        sentences.push(format!("You've fixed your {}. Great progress!", fixed.join(" and ")));
    }

    sentences
}

/// Annotate and reprioritize feedback using the user's history.
///
/// `summary` should describe sessions before the one `base` was generated
/// for.
pub fn generate_progress_aware_feedback(
    base: &SessionFeedback,
    summary: &UserProgressSummary,
) -> SessionFeedback {
    let mut recommendations: Vec<Recommendation> = base
        .recommendations
        .iter()
        .cloned()
        .map(|rec| annotate(rec, summary))
        .collect();

    // Stable, so equal priorities keep severity order.
    recommendations.sort_by_key(|rec| {
        std::cmp::Reverse(rec.progress.as_ref().map_or(0, |p| p.adaptive_priority))
    });
    for (i, rec) in recommendations.iter_mut().enumerate() {
        rec.priority = i as u32 + 1;
    }

    let mut overall_message = base.overall_message.clone();
    for sentence in trend_sentences(summary) {
        overall_message.push(' ');
        overall_message.push_str(&sentence);
    }

    SessionFeedback {
        overall_message,
        recommendations,
        ..base.clone()
    }
}
