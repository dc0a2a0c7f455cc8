//! Feedback generation from a single analysis.

use crate::analysis::{AnalysisTier, FormAnalysisResult, FormIssue};

use super::templates;
use super::types::{Recommendation, SessionFeedback};

/// Turn an analysis result into prioritized recommendations.
///
/// Basic tier feedback carries at most two recommendations, other tiers
/// three.
pub fn generate_feedback(result: &FormAnalysisResult, tier: AnalysisTier) -> SessionFeedback {
    let recommendations: Vec<Recommendation> = result
        .detected_issues
        .iter()
        .take(tier.recommendation_limit())
        .enumerate()
        .map(|(i, issue)| build_recommendation(issue, i as u32 + 1, tier))
        .collect();

    let encouragement = templates::grade_encouragement(result.overall_score)
        .unwrap_or_else(|| templates::issue_count_encouragement(result.detected_issues.len()));

    let mut next_steps: Vec<String> = recommendations
        .iter()
        .take(2)
        .filter_map(|rec| {
            rec.drills
                .first()
                .map(|drill| format!("Practice the {} to work on your {}.", drill, rec.issue_type.label().to_lowercase()))
        })
        .collect();
    next_steps.push(templates::closing_step(result.overall_score).to_string());

    SessionFeedback {
        overall_message: templates::overall_message(result.overall_score).to_string(),
        form_score: result.overall_score,
        recommendations,
        encouragement: encouragement.to_string(),
        next_steps,
        tier,
    }
}

fn build_recommendation(issue: &FormIssue, priority: u32, tier: AnalysisTier) -> Recommendation {
    let explanation = match tier {
        AnalysisTier::Basic => issue.description.clone(),
        AnalysisTier::LightweightMl | AnalysisTier::FullMl | AnalysisTier::Cloud => format!(
            "{} {}",
            issue.description,
            templates::elaboration(issue.issue_type, issue.severity)
        ),
    };

    Recommendation {
        priority,
        issue_type: issue.issue_type,
        severity: issue.severity,
        title: format!("{} ({})", issue.issue_type.label(), issue.severity.label()),
        explanation,
        why_it_matters: templates::why_it_matters(issue.issue_type).to_string(),
        drills: issue.recommended_drills.clone(),
        progress: None,
    }
}
