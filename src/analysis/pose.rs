//! Pose keypoint model and shot phase segmentation.

use std::ops::Range;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{AnalysisError, VideoRef};

/// Tracked body joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    /// Number of tracked joints.
    pub const COUNT: usize = 13;

    /// All joints in index order.
    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::Nose,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    fn index(&self) -> usize {
        match self {
            Joint::Nose => 0,
            Joint::LeftShoulder => 1,
            Joint::RightShoulder => 2,
            Joint::LeftElbow => 3,
            Joint::RightElbow => 4,
            Joint::LeftWrist => 5,
            Joint::RightWrist => 6,
            Joint::LeftHip => 7,
            Joint::RightHip => 8,
            Joint::LeftKnee => 9,
            Joint::RightKnee => 10,
            Joint::LeftAnkle => 11,
            Joint::RightAnkle => 12,
        }
    }
}

/// A 2D keypoint in normalized image coordinates.
///
/// `y` grows downward, so a smaller `y` is higher on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    /// Detection confidence (0.0 - 1.0)
    pub confidence: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self { x, y, confidence }
    }
}

/// Keypoints detected in one video frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Frame timestamp in milliseconds
    pub timestamp_ms: u64,
    keypoints: [Option<Keypoint>; Joint::COUNT],
}

impl PoseFrame {
    pub fn new(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            keypoints: [None; Joint::COUNT],
        }
    }

    /// Builder-style keypoint assignment.
    pub fn with(mut self, joint: Joint, keypoint: Keypoint) -> Self {
        self.set(joint, keypoint);
        self
    }

    pub fn set(&mut self, joint: Joint, keypoint: Keypoint) {
        self.keypoints[joint.index()] = Some(keypoint);
    }

    /// Raw keypoint regardless of confidence.
    pub fn get(&self, joint: Joint) -> Option<&Keypoint> {
        self.keypoints[joint.index()].as_ref()
    }

    /// Keypoint if detected with at least `min_confidence`.
    pub fn confident(&self, joint: Joint, min_confidence: f64) -> Option<&Keypoint> {
        self.get(joint).filter(|k| k.confidence >= min_confidence)
    }

    /// Whether the frame carries any keypoint at all.
    pub fn is_empty(&self) -> bool {
        self.keypoints.iter().all(Option::is_none)
    }
}

/// Which hand takes the shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShootingHand {
    #[default]
    Right,
    Left,
}

impl ShootingHand {
    pub fn shoulder(&self) -> Joint {
        match self {
            ShootingHand::Right => Joint::RightShoulder,
            ShootingHand::Left => Joint::LeftShoulder,
        }
    }

    pub fn elbow(&self) -> Joint {
        match self {
            ShootingHand::Right => Joint::RightElbow,
            ShootingHand::Left => Joint::LeftElbow,
        }
    }

    pub fn wrist(&self) -> Joint {
        match self {
            ShootingHand::Right => Joint::RightWrist,
            ShootingHand::Left => Joint::LeftWrist,
        }
    }
}

/// Pose-estimation collaborator.
#[async_trait]
pub trait PoseEstimator: Send + Sync {
    /// Load the pose model. Called before every estimation; implementations
    /// should make repeated calls cheap.
    async fn load_model(&self) -> Result<(), AnalysisError>;

    /// Per-frame keypoints for the video, in frame order.
    async fn estimate_poses(&self, video: &VideoRef) -> Result<Vec<PoseFrame>, AnalysisError>;
}

/// Frame ranges of the three shot phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotPhases {
    /// Frames before the release window
    pub preparation: Range<usize>,
    /// Release window around the peak wrist frame
    pub release: Range<usize>,
    /// Frames after the release window
    pub follow_through: Range<usize>,
    /// Frame where the shooting wrist is highest
    pub release_frame: usize,
}

/// Frames on either side of the peak included in the release window.
pub const RELEASE_WINDOW: usize = 2;

/// Split a frame sequence into preparation, release and follow-through.
///
/// The release frame is where the shooting wrist is highest on screen.
/// Returns `None` if no frame has a confident shooting-wrist keypoint.
pub fn segment_phases(
    frames: &[PoseFrame],
    hand: ShootingHand,
    min_confidence: f64,
) -> Option<ShotPhases> {
    let wrist = hand.wrist();
    let (release_frame, _) = frames
        .iter()
        .enumerate()
        .filter_map(|(i, f)| f.confident(wrist, min_confidence).map(|k| (i, k.y)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))?;

    let start = release_frame.saturating_sub(RELEASE_WINDOW);
    let end = (release_frame + RELEASE_WINDOW + 1).min(frames.len());

    Some(ShotPhases {
        preparation: 0..start,
        release: start..end,
        follow_through: end..frames.len(),
        release_frame,
    })
}

/// Angle in degrees at `vertex` between the rays to `a` and `b`.
pub fn angle_at(vertex: &Keypoint, a: &Keypoint, b: &Keypoint) -> Option<f64> {
    let (ax, ay) = (a.x - vertex.x, a.y - vertex.y);
    let (bx, by) = (b.x - vertex.x, b.y - vertex.y);
    let norms = (ax * ax + ay * ay).sqrt() * (bx * bx + by * by).sqrt();
    if norms <= f64::EPSILON {
        return None;
    }
    let cos = ((ax * bx + ay * by) / norms).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Angle in degrees of the `from → to` vector away from straight up.
pub fn angle_from_vertical(from: &Keypoint, to: &Keypoint) -> Option<f64> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f64::EPSILON {
        return None;
    }
    // Screen y grows downward, so "up" is -y.
    Some((-dy / len).clamp(-1.0, 1.0).acos().to_degrees())
}

/// Angle in degrees of the line through two points away from horizontal.
pub fn angle_from_horizontal(a: &Keypoint, b: &Keypoint) -> f64 {
    let dx = (b.x - a.x).abs();
    let dy = (b.y - a.y).abs();
    dy.atan2(dx).to_degrees()
}
