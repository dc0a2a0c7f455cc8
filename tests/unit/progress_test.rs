//! Unit tests for progress summaries and progress-aware feedback.

use chrono::{DateTime, Duration, TimeZone, Utc};
use shotcoach::analysis::drills::{alternative_drills, primary_drills};
use shotcoach::analysis::{
    AnalysisTier, BiomechanicalMetrics, FormAnalysisResult, FormGrade, FormIssue, IssueType,
    Severity,
};
use shotcoach::feedback::generate_feedback;
use shotcoach::progress::{
    build_progress_summary, generate_progress_aware_feedback, SeverityTrend, ShootingSession,
    SyncStatus,
};
use uuid::Uuid;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 17, 30, 0).unwrap()
}

fn analysis(grade: FormGrade, issues: Vec<FormIssue>) -> FormAnalysisResult {
    FormAnalysisResult::new(grade, issues, BiomechanicalMetrics::from_scores(70.0, 75.0, 80.0, 65.0))
}

fn session(user_id: Uuid, day: i64, grade: FormGrade, issues: Vec<FormIssue>) -> ShootingSession {
    ShootingSession::from_analysis(user_id, start() + Duration::days(day), analysis(grade, issues), None)
}

fn issue(issue_type: IssueType, severity: Severity) -> FormIssue {
    FormIssue::new(issue_type, severity, "observed")
}

#[test]
fn test_new_session_is_pending() {
    let s = session(Uuid::new_v4(), 0, FormGrade::B, Vec::new());
    assert_eq!(s.sync_status, SyncStatus::Pending);
    assert_eq!(s.form_score, FormGrade::B);
    assert_eq!(s.duration_secs, 0.0);
}

#[test]
fn test_summary_classifies_issues() {
    let user = Uuid::new_v4();
    let history = vec![
        session(user, 0, FormGrade::D, vec![issue(IssueType::Stance, Severity::Moderate)]),
        session(
            user,
            1,
            FormGrade::C,
            vec![
                issue(IssueType::Stance, Severity::Moderate),
                issue(IssueType::ElbowFlare, Severity::Major),
            ],
        ),
        session(user, 2, FormGrade::C, vec![issue(IssueType::ElbowFlare, Severity::Moderate)]),
        session(user, 3, FormGrade::B, vec![issue(IssueType::ElbowFlare, Severity::Minor)]),
        session(
            user,
            4,
            FormGrade::B,
            vec![
                issue(IssueType::ElbowFlare, Severity::Minor),
                issue(IssueType::WristAngle, Severity::Minor),
            ],
        ),
    ];

    let summary = build_progress_summary(user, &history);
    assert_eq!(summary.user_id, user);
    assert_eq!(summary.total_sessions, 5);
    assert!((summary.average_score - 77.0).abs() < 1e-9);
    // No sessions before the recent window
    assert_eq!(summary.score_improvement, 0.0);

    let stance = summary.pattern_for(IssueType::Stance).unwrap();
    assert!(stance.resolved);
    assert_eq!(stance.occurrence_count, 2);
    assert_eq!(summary.resolved_issues.len(), 1);

    let elbow = summary.pattern_for(IssueType::ElbowFlare).unwrap();
    assert!(elbow.is_persistent());
    assert_eq!(elbow.occurrence_count, 4);
    assert_eq!(elbow.first_detected, start() + Duration::days(1));
    assert_eq!(elbow.last_detected, start() + Duration::days(4));
    // Major, Moderate then Minor, Minor: 25 to 75
    assert_eq!(elbow.severity_trend, SeverityTrend::Improving);

    let wrist = summary.pattern_for(IssueType::WristAngle).unwrap();
    assert!(wrist.is_new());
    assert_eq!(summary.new_issues.len(), 1);

    assert!(summary.pattern_for(IssueType::FollowThrough).is_none());
}

#[test]
fn test_score_improvement_over_recent_window() {
    let user = Uuid::new_v4();
    let grades = [
        FormGrade::F,
        FormGrade::F,
        FormGrade::A,
        FormGrade::A,
        FormGrade::A,
        FormGrade::A,
        FormGrade::A,
    ];
    let history: Vec<_> = grades
        .iter()
        .enumerate()
        .map(|(day, &grade)| session(user, day as i64, grade, Vec::new()))
        .collect();

    let summary = build_progress_summary(user, &history);
    assert!((summary.score_improvement - 45.0).abs() < 1e-9);

    let base = generate_feedback(&analysis(FormGrade::A, Vec::new()), AnalysisTier::Basic);
    let feedback = generate_progress_aware_feedback(&base, &summary);
    assert!(feedback.overall_message.starts_with(&base.overall_message));
    assert!(feedback.overall_message.contains("up 45 points"));
}

#[test]
fn test_short_history_adds_no_trend_sentences() {
    let user = Uuid::new_v4();
    let history = vec![
        session(user, 0, FormGrade::F, Vec::new()),
        session(user, 1, FormGrade::A, Vec::new()),
    ];
    let summary = build_progress_summary(user, &history);

    let base = generate_feedback(&analysis(FormGrade::B, Vec::new()), AnalysisTier::Basic);
    let feedback = generate_progress_aware_feedback(&base, &summary);
    assert_eq!(feedback.overall_message, base.overall_message);
}

#[test]
fn test_stuck_issue_gets_alternative_drill_and_note() {
    let user = Uuid::new_v4();
    let history: Vec<_> = (0..3)
        .map(|day| {
            session(user, day, FormGrade::C, vec![issue(IssueType::ElbowFlare, Severity::Moderate)])
        })
        .collect();
    let summary = build_progress_summary(user, &history);
    assert_eq!(summary.persistent_issues.len(), 1);

    let current = analysis(
        FormGrade::C,
        vec![
            issue(IssueType::ElbowFlare, Severity::Moderate),
            issue(IssueType::WristAngle, Severity::Minor),
        ],
    );
    let base = generate_feedback(&current, AnalysisTier::LightweightMl);
    let feedback = generate_progress_aware_feedback(&base, &summary);

    let elbow = &feedback.recommendations[0];
    assert_eq!(elbow.issue_type, IssueType::ElbowFlare);
    assert_eq!(elbow.drills.len(), primary_drills(IssueType::ElbowFlare).len() + 1);
    assert_eq!(
        elbow.drills.last().map(String::as_str),
        alternative_drills(IssueType::ElbowFlare).first().copied()
    );

    let progress = elbow.progress.as_ref().unwrap();
    assert!(progress.is_persistent);
    assert!(!progress.is_new);
    assert_eq!(progress.adaptive_priority, 2);
    assert!(progress.note.as_deref().unwrap().contains("3 sessions"));

    let wrist = feedback.recommendations[1].progress.as_ref().unwrap();
    assert!(wrist.is_new);
    assert_eq!(wrist.adaptive_priority, 1);

    // Three like sessions: stable scores
    assert!(feedback.overall_message.contains("consistent"));
}

#[test]
fn test_worsening_issue_outranks_more_severe_one() {
    let user = Uuid::new_v4();
    let history: Vec<_> = [Severity::Minor, Severity::Minor, Severity::Major, Severity::Major]
        .iter()
        .enumerate()
        .map(|(day, &sev)| session(user, day as i64, FormGrade::D, vec![issue(IssueType::Stance, sev)]))
        .collect();
    let summary = build_progress_summary(user, &history);
    assert_eq!(
        summary.pattern_for(IssueType::Stance).unwrap().severity_trend,
        SeverityTrend::Worsening
    );

    let current = analysis(
        FormGrade::D,
        vec![
            issue(IssueType::FollowThrough, Severity::Major),
            issue(IssueType::Stance, Severity::Moderate),
        ],
    );
    let base = generate_feedback(&current, AnalysisTier::LightweightMl);
    assert_eq!(base.recommendations[0].issue_type, IssueType::FollowThrough);

    let feedback = generate_progress_aware_feedback(&base, &summary);
    // Moderate (2) + worsening (2) beats a new major (3)
    assert_eq!(feedback.recommendations[0].issue_type, IssueType::Stance);
    assert_eq!(feedback.recommendations[0].priority, 1);
    assert_eq!(feedback.recommendations[1].issue_type, IssueType::FollowThrough);
    assert_eq!(feedback.recommendations[1].priority, 2);
    assert!(feedback.recommendations[0]
        .progress
        .as_ref()
        .and_then(|p| p.note.as_deref())
        .unwrap()
        .contains("worse"));
}

#[test]
fn test_returning_issue_is_flagged() {
    let user = Uuid::new_v4();
    let history = vec![
        session(user, 0, FormGrade::C, vec![issue(IssueType::Stance, Severity::Moderate)]),
        session(user, 1, FormGrade::C, vec![issue(IssueType::Stance, Severity::Minor)]),
        session(user, 2, FormGrade::B, Vec::new()),
        session(user, 3, FormGrade::B, Vec::new()),
    ];
    let summary = build_progress_summary(user, &history);
    assert_eq!(summary.resolved_issues.len(), 1);

    let current = analysis(FormGrade::C, vec![issue(IssueType::Stance, Severity::Minor)]);
    let base = generate_feedback(&current, AnalysisTier::Basic);
    let feedback = generate_progress_aware_feedback(&base, &summary);

    let note = feedback.recommendations[0]
        .progress
        .as_ref()
        .and_then(|p| p.note.clone())
        .unwrap();
    assert!(note.contains("come back"));
    assert!(feedback
        .overall_message
        .contains("You've fixed your stance. Great progress!"));
}
