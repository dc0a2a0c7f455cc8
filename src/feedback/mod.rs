//! Coaching feedback generation.

pub mod generator;
pub mod templates;
pub mod types;

pub use generator::generate_feedback;
pub use types::{ProgressAnnotation, Recommendation, SessionFeedback};
