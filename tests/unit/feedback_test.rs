//! Unit tests for session feedback generation.

use shotcoach::analysis::drills::primary_drills;
use shotcoach::analysis::{
    AnalysisTier, BiomechanicalMetrics, FormAnalysisResult, FormGrade, FormIssue, IssueType,
    Severity,
};
use shotcoach::feedback::{generate_feedback, templates};

fn analysis(grade: FormGrade, issues: Vec<FormIssue>) -> FormAnalysisResult {
    FormAnalysisResult::new(grade, issues, BiomechanicalMetrics::from_scores(65.0, 80.0, 72.0, 58.0))
}

fn typical_issues() -> Vec<FormIssue> {
    vec![
        FormIssue::new(IssueType::WristAngle, Severity::Minor, "Wrist slightly bent."),
        FormIssue::new(IssueType::FollowThrough, Severity::Major, "Finish dropped early."),
        FormIssue::new(IssueType::ElbowFlare, Severity::Moderate, "Elbow out wide."),
    ]
}

#[test]
fn test_recommendations_follow_severity_order() {
    let feedback = generate_feedback(&analysis(FormGrade::D, typical_issues()), AnalysisTier::LightweightMl);

    let order: Vec<_> = feedback.recommendations.iter().map(|r| r.issue_type).collect();
    assert_eq!(
        order,
        vec![IssueType::FollowThrough, IssueType::ElbowFlare, IssueType::WristAngle]
    );
    let priorities: Vec<_> = feedback.recommendations.iter().map(|r| r.priority).collect();
    assert_eq!(priorities, vec![1, 2, 3]);
    assert!(feedback.recommendations.iter().all(|r| r.progress.is_none()));
}

#[test]
fn test_recommendation_content() {
    let feedback = generate_feedback(&analysis(FormGrade::D, typical_issues()), AnalysisTier::Basic);
    let first = &feedback.recommendations[0];

    assert_eq!(first.title, "Follow-Through (Major)");
    assert_eq!(first.explanation, "Finish dropped early.");
    assert_eq!(first.why_it_matters, templates::why_it_matters(IssueType::FollowThrough));
    assert_eq!(first.drills[0], primary_drills(IssueType::FollowThrough)[0]);
}

#[test]
fn test_tier_limits_recommendation_count() {
    let basic = generate_feedback(&analysis(FormGrade::D, typical_issues()), AnalysisTier::Basic);
    assert_eq!(basic.recommendations.len(), 2);
    assert_eq!(basic.tier, AnalysisTier::Basic);

    let cloud = generate_feedback(&analysis(FormGrade::D, typical_issues()), AnalysisTier::Cloud);
    assert_eq!(cloud.recommendations.len(), 3);
    assert!(cloud.recommendations[0]
        .explanation
        .ends_with(templates::elaboration(IssueType::FollowThrough, Severity::Major)));
}

#[test]
fn test_next_steps_name_top_drills() {
    let feedback = generate_feedback(&analysis(FormGrade::C, typical_issues()), AnalysisTier::LightweightMl);

    assert_eq!(feedback.next_steps.len(), 3);
    assert_eq!(
        feedback.next_steps[0],
        format!(
            "Practice the {} to work on your follow-through.",
            primary_drills(IssueType::FollowThrough)[0]
        )
    );
    assert_eq!(
        feedback.next_steps[1],
        format!(
            "Practice the {} to work on your elbow flare.",
            primary_drills(IssueType::ElbowFlare)[0]
        )
    );
    assert_eq!(feedback.next_steps[2], templates::closing_step(FormGrade::C));
}

#[test]
fn test_clean_shot_feedback() {
    let feedback = generate_feedback(&analysis(FormGrade::A, Vec::new()), AnalysisTier::LightweightMl);

    assert!(feedback.recommendations.is_empty());
    assert_eq!(feedback.form_score, FormGrade::A);
    assert_eq!(feedback.overall_message, templates::overall_message(FormGrade::A));
    assert_eq!(feedback.encouragement, templates::grade_encouragement(FormGrade::A).unwrap());
    assert_eq!(feedback.next_steps, vec![templates::closing_step(FormGrade::A).to_string()]);
}

#[test]
fn test_weak_grade_encouragement_depends_on_issue_count() {
    let many = generate_feedback(&analysis(FormGrade::F, typical_issues()), AnalysisTier::Basic);
    assert_eq!(many.encouragement, templates::issue_count_encouragement(3));

    let few = generate_feedback(
        &analysis(FormGrade::C, typical_issues().into_iter().take(1).collect()),
        AnalysisTier::Basic,
    );
    assert_eq!(few.encouragement, templates::issue_count_encouragement(1));
    assert_ne!(many.encouragement, few.encouragement);
}
