//! Unit tests for rule-based shot scoring.

use shotcoach::analysis::basic::{analyze_measurements, rule_score};
use shotcoach::analysis::{
    BodyPositioning, FormGrade, IssueType, Severity, ShotMeasurements, ShotTrajectory,
};

fn shot(elbow_angle_deg: f64, wrist_angle_deg: f64, follow_through_ms: f64) -> ShotMeasurements {
    ShotMeasurements {
        trajectory: ShotTrajectory {
            release_angle_deg: 48.0,
            release_height_m: 2.2,
            arc_height: 0.75,
            release_speed_mps: 7.2,
            follow_through_ms,
        },
        positioning: BodyPositioning {
            shoulder_alignment_deg: 0.0,
            elbow_angle_deg,
            wrist_angle_deg,
            stance_width: 0.3,
            knee_flexion_deg: 40.0,
        },
    }
}

#[test]
fn test_clean_shot_has_no_issues() {
    let result = analyze_measurements(&shot(90.0, 0.0, 400.0));
    assert_eq!(result.overall_score, FormGrade::A);
    assert!(result.detected_issues.is_empty());
    assert_eq!(result.biomechanical_metrics.wrist_angle, 100);
}

#[test]
fn test_major_elbow_and_follow_through_faults() {
    let m = shot(110.0, 0.0, 100.0);
    assert!((rule_score(&m) - 70.0).abs() < 1e-9);

    let result = analyze_measurements(&m);
    assert_eq!(result.overall_score, FormGrade::C);

    let kinds: Vec<_> = result
        .detected_issues
        .iter()
        .map(|i| (i.issue_type, i.severity))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (IssueType::ElbowFlare, Severity::Major),
            (IssueType::FollowThrough, Severity::Major),
        ]
    );

    // 20° off optimum at 3.33 points per degree, 200ms short at 1 point per 3ms
    assert_eq!(result.biomechanical_metrics.elbow_alignment, 33);
    assert_eq!(result.biomechanical_metrics.follow_through, 33);
}

#[test]
fn test_wrist_issue_severity_tracks_metric() {
    let minor = analyze_measurements(&shot(90.0, 5.0, 400.0));
    assert_eq!(minor.biomechanical_metrics.wrist_angle, 75);
    assert_eq!(minor.detected_issues.len(), 1);
    assert_eq!(minor.detected_issues[0].issue_type, IssueType::WristAngle);
    assert_eq!(minor.detected_issues[0].severity, Severity::Minor);

    let moderate = analyze_measurements(&shot(90.0, -8.0, 400.0));
    assert_eq!(moderate.biomechanical_metrics.wrist_angle, 60);
    assert_eq!(moderate.detected_issues[0].severity, Severity::Moderate);

    // Wrist deviation lowers the metric, not the grade
    assert_eq!(moderate.overall_score, FormGrade::A);
}

#[test]
fn test_issues_are_ordered_most_severe_first() {
    // Moderate elbow, major follow-through, minor wrist
    let result = analyze_measurements(&shot(100.0, 5.0, 100.0));
    let severities: Vec<_> = result.detected_issues.iter().map(|i| i.severity).collect();
    let mut sorted = severities.clone();
    sorted.sort();
    assert_eq!(severities, sorted);
    assert_eq!(result.detected_issues[0].issue_type, IssueType::FollowThrough);
}

#[test]
fn test_issues_carry_catalog_drills() {
    let result = analyze_measurements(&shot(110.0, 0.0, 400.0));
    let elbow = &result.detected_issues[0];
    assert_eq!(elbow.issue_type, IssueType::ElbowFlare);
    assert_eq!(
        elbow.recommended_drills,
        shotcoach::analysis::drills::primary_drills(IssueType::ElbowFlare)
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
    );
}
