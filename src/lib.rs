//! ShotCoach - Adaptive Basketball Shooting-Form Coaching
//!
//! Grades a recorded jump shot (A-F) and turns the result into prioritized
//! coaching feedback. Analysis runs on the richest tier the device, network
//! and user consent allow, falling back tier by tier when a strategy fails,
//! and recommendations adapt to the user's session history.

pub mod analysis;
pub mod capability;
pub mod connectivity;
pub mod feedback;
pub mod pipeline;
pub mod processing;
pub mod progress;
pub mod storage;

// Re-export commonly used types
pub use analysis::tier::AnalysisTier;
pub use analysis::types::{FormAnalysisResult, VideoRef};
pub use capability::assessor::CapabilityAssessor;
pub use feedback::types::SessionFeedback;
pub use pipeline::{CoachingPipeline, PipelineOutcome};
pub use processing::router::ProcessingRouter;
