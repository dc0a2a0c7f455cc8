//! Canned coaching text.

use crate::analysis::{FormGrade, IssueType, Severity};

/// Headline for a grade.
pub fn overall_message(grade: FormGrade) -> &'static str {
    match grade {
        FormGrade::A => "Excellent shooting form! Your mechanics are consistent and efficient.",
        FormGrade::B => "Good shooting form with a few details left to refine.",
        FormGrade::C => "Solid foundation. A few mechanics need focused attention.",
        FormGrade::D => "Your shot has potential, but some key mechanics need work.",
        FormGrade::F => "Let's rebuild your shot from the fundamentals, one piece at a time.",
    }
}

/// Longer explanation used by the ML tiers.
pub fn elaboration(issue_type: IssueType, severity: Severity) -> &'static str {
    match (issue_type, severity) {
        (IssueType::ElbowFlare, Severity::Major) => {
            "Your shooting elbow is pushing well outside the line of the shot, which sends the ball sideways. Focus on keeping the elbow stacked under the ball from set point to release."
        }
        (IssueType::ElbowFlare, Severity::Moderate) => {
            "Your elbow drifts away from your body during the lift. Tucking it slightly will straighten your shot line."
        }
        (IssueType::ElbowFlare, Severity::Minor) => {
            "Your elbow alignment is close. A small tuck at the set point will make it automatic."
        }
        (IssueType::WristAngle, Severity::Major) => {
            "Your wrist is not cocked back under the ball, so the release pushes rather than flicks. Set the wrist before you rise."
        }
        (IssueType::WristAngle, Severity::Moderate) => {
            "Your forearm tilts off vertical at release. Keep the wrist under the ball so the snap drives straight through."
        }
        (IssueType::WristAngle, Severity::Minor) => {
            "Your wrist angle is nearly there. Think about a relaxed, full snap at release."
        }
        (IssueType::Stance, Severity::Major) => {
            "Your base is unbalanced, which forces your upper body to compensate. Set your feet shoulder-width apart and square to the rim."
        }
        (IssueType::Stance, Severity::Moderate) => {
            "Your shoulders or feet are turned away from the basket. Square up before the catch so your shot starts on line."
        }
        (IssueType::Stance, Severity::Minor) => {
            "Your stance is slightly off. Check your foot width and shoulder line before each shot."
        }
        (IssueType::FollowThrough, Severity::Major) => {
            "You are pulling your hand back right after release, which kills your arc and backspin. Hold your finish until the ball reaches the rim."
        }
        (IssueType::FollowThrough, Severity::Moderate) => {
            "Your follow-through is short or unsteady. Extend fully and freeze your wrist in the goose-neck position."
        }
        (IssueType::FollowThrough, Severity::Minor) => {
            "Your follow-through is good. Holding it a beat longer will add consistency."
        }
    }
}

/// Why an issue type matters.
pub fn why_it_matters(issue_type: IssueType) -> &'static str {
    match issue_type {
        IssueType::ElbowFlare => {
            "A straight elbow line keeps the ball on target. Flared elbows are the most common cause of left-right misses."
        }
        IssueType::WristAngle => {
            "The wrist snap creates backspin and a soft touch, giving the ball a better chance on the rim."
        }
        IssueType::Stance => {
            "A balanced, square base transfers power from your legs and keeps your shot repeatable."
        }
        IssueType::FollowThrough => {
            "A full follow-through keeps your release consistent and produces arc and backspin."
        }
    }
}

/// Encouragement for a strong grade, if any.
pub fn grade_encouragement(grade: FormGrade) -> Option<&'static str> {
    match grade {
        FormGrade::A => Some("Outstanding work! Keep shooting like this and it will hold up under pressure."),
        FormGrade::B => Some("Great job! You are close to elite form. Keep refining the details."),
        FormGrade::C | FormGrade::D | FormGrade::F => None,
    }
}

/// Encouragement keyed by how many issues remain.
pub fn issue_count_encouragement(issue_count: usize) -> &'static str {
    if issue_count <= 2 {
        "You're on the right track. Focus on one fix at a time and you'll see quick progress."
    } else {
        "Every great shooter built their form through repetition. Consistent practice will turn these fixes into muscle memory."
    }
}

/// Closing guidance for the next steps list.
pub fn closing_step(grade: FormGrade) -> &'static str {
    if grade.is_strong() {
        "Record another session to confirm your consistency."
    } else {
        "Practice these drills daily and re-record in 2-3 days to track your improvement."
    }
}
