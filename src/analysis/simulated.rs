//! Seeded stand-ins for the vision and pose-estimation collaborators.
//!
//! Measurements are derived from a seed hashed from the video location, so
//! the same clip always produces the same analysis. Real inference plugs in
//! behind the same traits.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::basic::{BodyPositioning, ShotMeasurements, ShotTrajectory, VisionProvider};
use super::pose::{Joint, Keypoint, PoseEstimator, PoseFrame, ShootingHand};
use super::types::{AnalysisError, VideoRef};

fn seeded_rng(video: &VideoRef, salt: u64) -> StdRng {
    let mut hasher = DefaultHasher::new();
    video.location.hash(&mut hasher);
    salt.hash(&mut hasher);
    StdRng::seed_from_u64(hasher.finish())
}

fn require_location(video: &VideoRef) -> Result<(), AnalysisError> {
    if video.location.trim().is_empty() {
        return Err(AnalysisError::Vision("empty video reference".into()));
    }
    Ok(())
}

/// Simulated trajectory and body measurements.
#[derive(Debug, Clone, Default)]
pub struct SimulatedVision;

#[async_trait]
impl VisionProvider for SimulatedVision {
    async fn measure_shot(&self, video: &VideoRef) -> Result<ShotMeasurements, AnalysisError> {
        require_location(video)?;
        let mut rng = seeded_rng(video, 0);

        Ok(ShotMeasurements {
            trajectory: ShotTrajectory {
                release_angle_deg: rng.random_range(38.0..58.0),
                release_height_m: rng.random_range(1.9..2.6),
                arc_height: rng.random_range(0.55..0.95),
                release_speed_mps: rng.random_range(6.0..8.5),
                follow_through_ms: rng.random_range(120.0..520.0),
            },
            positioning: BodyPositioning {
                shoulder_alignment_deg: rng.random_range(-18.0..18.0),
                elbow_angle_deg: rng.random_range(72.0..112.0),
                wrist_angle_deg: rng.random_range(-8.0..8.0),
                stance_width: rng.random_range(0.18..0.42),
                knee_flexion_deg: rng.random_range(15.0..55.0),
            },
        })
    }
}

/// Simulated pose sequence for a single jump shot.
#[derive(Debug, Clone)]
pub struct SimulatedPoseEstimator {
    hand: ShootingHand,
    frame_count: usize,
    frame_interval_ms: u64,
}

impl Default for SimulatedPoseEstimator {
    fn default() -> Self {
        Self {
            hand: ShootingHand::Right,
            frame_count: 30,
            frame_interval_ms: 33,
        }
    }
}

impl SimulatedPoseEstimator {
    pub fn new(hand: ShootingHand) -> Self {
        Self {
            hand,
            ..Default::default()
        }
    }
}

#[async_trait]
impl PoseEstimator for SimulatedPoseEstimator {
    async fn load_model(&self) -> Result<(), AnalysisError> {
        Ok(())
    }

    async fn estimate_poses(&self, video: &VideoRef) -> Result<Vec<PoseFrame>, AnalysisError> {
        require_location(video)?;
        let mut rng = seeded_rng(video, 1);

        // Per-shot form characteristics.
        let elbow_flare: f64 = rng.random_range(-0.06..0.06);
        let forearm_tilt: f64 = rng.random_range(-0.05..0.05);
        let shoulder_tilt: f64 = rng.random_range(-0.04..0.04);
        let stance_width: f64 = rng.random_range(0.2..0.4);
        let wobble: f64 = rng.random_range(0.0..0.05);
        let peak = self.frame_count * 2 / 3;

        let side = match self.hand {
            ShootingHand::Right => 1.0,
            ShootingHand::Left => -1.0,
        };

        let frames = (0..self.frame_count)
            .map(|i| {
                // Wrist rises to the peak, then holds with some wobble.
                let progress = (i.min(peak) as f64) / peak.max(1) as f64;
                let hold = if i > peak {
                    rng.random_range(-wobble..=wobble)
                } else {
                    0.0
                };
                let wrist_y = 0.55 - 0.35 * progress + hold;

                let shoulder = Keypoint::new(0.5 + side * 0.07, 0.4 + shoulder_tilt / 2.0, 0.9);
                let off_shoulder = Keypoint::new(0.5 - side * 0.07, 0.4 - shoulder_tilt / 2.0, 0.9);
                let elbow = Keypoint::new(shoulder.x + side * (0.1 + elbow_flare), 0.4, 0.85);
                let wrist = Keypoint::new(elbow.x + forearm_tilt, wrist_y, 0.85);

                PoseFrame::new(i as u64 * self.frame_interval_ms)
                    .with(Joint::Nose, Keypoint::new(0.5, 0.3, 0.9))
                    .with(self.hand.shoulder(), shoulder)
                    .with(opposite(self.hand.shoulder()), off_shoulder)
                    .with(self.hand.elbow(), elbow)
                    .with(self.hand.wrist(), wrist)
                    .with(Joint::LeftHip, Keypoint::new(0.45, 0.62, 0.8))
                    .with(Joint::RightHip, Keypoint::new(0.55, 0.62, 0.8))
                    .with(Joint::LeftKnee, Keypoint::new(0.45, 0.8, 0.8))
                    .with(Joint::RightKnee, Keypoint::new(0.55, 0.8, 0.8))
                    .with(Joint::LeftAnkle, Keypoint::new(0.5 - stance_width / 2.0, 0.95, 0.8))
                    .with(Joint::RightAnkle, Keypoint::new(0.5 + stance_width / 2.0, 0.95, 0.8))
            })
            .collect();

        Ok(frames)
    }
}

fn opposite(joint: Joint) -> Joint {
    match joint {
        Joint::LeftShoulder => Joint::RightShoulder,
        Joint::RightShoulder => Joint::LeftShoulder,
        other => other,
    }
}
