//! Configuration errors
//!
//! The simulation itself never fails: numeric edge cases are floored locally
//! and misuse (jumping mid-air, ticking while dead) is a no-op. Only building
//! a world from bad parameters is an error.

use thiserror::Error;

/// Errors raised while validating tuning or level data.
#[derive(Debug, Error)]
pub enum TuningError {
    /// A parameter is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// An obstacle in a level has a non-positive extent.
    #[error("obstacle {index} has non-positive size {width}x{height}")]
    InvalidObstacle { index: usize, width: f32, height: f32 },
    /// Tuning or level JSON could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
