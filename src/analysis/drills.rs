//! Drill catalog keyed by issue type.

use super::types::IssueType;

/// Drills recommended first for an issue type.
pub fn primary_drills(issue_type: IssueType) -> &'static [&'static str] {
    match issue_type {
        IssueType::ElbowFlare => &["Wall Shooting Drill", "One-Hand Form Shooting"],
        IssueType::WristAngle => &["Wrist Flick Drill", "Lying Down Shooting"],
        IssueType::Stance => &["Mirror Stance Drill", "Line Foot Alignment"],
        IssueType::FollowThrough => &["Hold the Finish", "Cookie Jar Reach"],
    }
}

/// Alternative drills for when the primary ones have not moved the needle.
pub fn alternative_drills(issue_type: IssueType) -> &'static [&'static str] {
    match issue_type {
        IssueType::ElbowFlare => &["Towel Under Arm Drill", "Elbow Tuck Close-Range Shots"],
        IssueType::WristAngle => &["Ball Spin Drill", "Chair Shooting"],
        IssueType::Stance => &["Balance Pad Shooting", "Jump Stop Into Shot"],
        IssueType::FollowThrough => &["Freeze Frame Free Throws", "Goose Neck Holds"],
    }
}
