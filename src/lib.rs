//! Void Hop - a single-screen platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor physics, hazards, game state)
//! - `tuning`: Data-driven simulation parameters
//! - `level`: Obstacle layouts
//! - `error`: Configuration errors
//!
//! Rendering, input polling and the window loop live outside this crate: they
//! feed [`sim::TickInput`] snapshots in and read [`sim::Snapshot`]s out.

pub mod error;
pub mod level;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use level::Level;
pub use tuning::Tuning;

use glam::Vec2;

/// Simulation constants that are not exposed as tuning
pub mod consts {
    /// Fixed step used by the headless driver (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Smallest size an entity shrinks to before it is finalized
    pub const MIN_ENTITY_SIZE: f32 = 1.0;
    /// Shrink scale at or below which a consumed entity is finalized
    pub const CONSUME_FINAL_SCALE: f32 = 0.1;
    /// Distances below this are treated as this (avoids division by zero)
    pub const MIN_FORCE_DISTANCE: f32 = 1.0;
    /// Lower bound of the well's distance falloff ratio (flat force up close)
    pub const MIN_FALLOFF_RATIO: f32 = 0.5;

    /// Black hole pulse animation
    pub const WELL_PULSE_SPEED: f32 = 5.0;
    pub const WELL_PULSE_MAX: f32 = 20.0;
    /// Vertical band the well spawns in when not placed explicitly
    pub const WELL_SPAWN_MIN_Y: f32 = 100.0;
    pub const WELL_SPAWN_MAX_Y: f32 = 200.0;

    /// Lightning bolt shape
    pub const STRIKE_SEGMENTS: usize = 10;
    pub const STRIKE_MAX_DISPLACEMENT: f32 = 40.0;
    /// Warning ring size at the moment of the strike
    pub const STRIKE_MAX_WARNING_SIZE: f32 = 50.0;
    /// Impact flash radius at the start of the flash
    pub const STRIKE_FLASH_RADIUS: f32 = 80.0;
}

/// Direction from `from` toward `to` and the distance between them.
///
/// The distance is floored at [`consts::MIN_FORCE_DISTANCE`]; coincident points
/// yield a zero direction.
#[inline]
pub fn direction_and_distance(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    (delta.normalize_or_zero(), delta.length().max(consts::MIN_FORCE_DISTANCE))
}
