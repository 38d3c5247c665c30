//! Simulation tuning
//!
//! Every number that shapes the feel of a run. Fixed at construction time and
//! validated once; the simulation never clamps bad values on the fly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Playfield width (pixels)
    pub world_width: f32,
    /// Playfield height (pixels, y grows downward)
    pub world_height: f32,

    // === Actor ===
    /// Horizontal speed while a direction is held (pixels/s)
    pub player_speed: f32,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_power: f32,
    /// Half-size of the actor
    pub player_radius: f32,
    /// Spawn point; defaults to (width/4, height/2)
    pub player_start: Option<Vec2>,

    // === Gravity well ===
    /// Elapsed play time before the well appears (s)
    pub well_spawn_time: f32,
    /// Fixed well position; random inside the upper band when absent
    pub well_position: Option<Vec2>,
    pub well_initial_radius: f32,
    pub well_max_radius: f32,
    /// Radius growth (pixels/s)
    pub well_radius_growth: f32,
    pub well_initial_attraction: f32,
    pub well_max_attraction: f32,
    /// Attraction growth (per second)
    pub well_attraction_growth: f32,
    /// Distance at which the pull starts falling off
    pub well_reference_distance: f32,
    /// Obstacles drift this fraction of the actor's pull
    pub obstacle_damping: f32,
    /// Consumption shrink speed (scale units/s)
    pub shrink_rate: f32,

    // === Lightning ===
    /// Warning time between spawn and strike (s)
    pub strike_lead_time: f32,
    /// How long a strike can hit (s)
    pub strike_flash_duration: f32,
    pub strike_hit_radius: f32,
    /// Chance that a fresh key press calls down a strike
    pub strike_spawn_chance: f32,

    // === Lifecycle ===
    /// Delay between death and respawn (s)
    pub respawn_delay: f32,
    /// Actor above this height has been flung out through the top
    pub ejection_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: 1280.0,
            world_height: 720.0,

            player_speed: 300.0,
            gravity: 1200.0,
            jump_power: -600.0,
            player_radius: 40.0,
            player_start: None,

            well_spawn_time: 30.0,
            well_position: None,
            well_initial_radius: 30.0,
            well_max_radius: 80.0,
            well_radius_growth: 2.0,
            well_initial_attraction: 100.0,
            well_max_attraction: 300.0,
            well_attraction_growth: 20.0,
            well_reference_distance: 300.0,
            obstacle_damping: 0.3,
            shrink_rate: 0.5,

            strike_lead_time: 2.0,
            strike_flash_duration: 0.2,
            strike_hit_radius: 60.0,
            strike_spawn_chance: 1.0 / 8.0,

            respawn_delay: 2.0,
            ejection_height: 1.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Actor spawn point
    pub fn start_position(&self) -> Vec2 {
        self.player_start
            .unwrap_or(Vec2::new(self.world_width / 4.0, self.world_height / 2.0))
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return Err(TuningError::InvalidConfig("world dimensions must be positive"));
        }
        if !(self.player_speed > 0.0) {
            return Err(TuningError::InvalidConfig("player_speed must be positive"));
        }
        if !(self.player_radius > 0.0) {
            return Err(TuningError::InvalidConfig("player_radius must be positive"));
        }
        if !(self.gravity > 0.0) {
            return Err(TuningError::InvalidConfig("gravity must be positive"));
        }
        if !(self.jump_power < 0.0) {
            return Err(TuningError::InvalidConfig("jump_power must be negative (upward)"));
        }
        if let Some(start) = self.player_start {
            if !(0.0..=self.world_width).contains(&start.x)
                || !(0.0..=self.world_height).contains(&start.y)
            {
                return Err(TuningError::InvalidConfig("player_start must lie inside the world"));
            }
        }
        if !(self.well_spawn_time >= 0.0) {
            return Err(TuningError::InvalidConfig("well_spawn_time must not be negative"));
        }
        if !(self.well_initial_radius > 0.0 && self.well_max_radius >= self.well_initial_radius) {
            return Err(TuningError::InvalidConfig(
                "well radii must be positive with max >= initial",
            ));
        }
        if !(self.well_initial_attraction >= 0.0
            && self.well_max_attraction >= self.well_initial_attraction)
        {
            return Err(TuningError::InvalidConfig(
                "well attraction must be non-negative with max >= initial",
            ));
        }
        if !(self.well_radius_growth >= 0.0 && self.well_attraction_growth >= 0.0) {
            return Err(TuningError::InvalidConfig("well growth rates must not be negative"));
        }
        if !(self.well_reference_distance > 0.0) {
            return Err(TuningError::InvalidConfig("well_reference_distance must be positive"));
        }
        if !(0.0..=1.0).contains(&self.obstacle_damping) {
            return Err(TuningError::InvalidConfig("obstacle_damping must be between 0 and 1"));
        }
        if !(self.shrink_rate > 0.0) {
            return Err(TuningError::InvalidConfig("shrink_rate must be positive"));
        }
        if !(self.strike_lead_time > 0.0 && self.strike_flash_duration > 0.0) {
            return Err(TuningError::InvalidConfig("strike timings must be positive"));
        }
        if !(self.strike_hit_radius > 0.0) {
            return Err(TuningError::InvalidConfig("strike_hit_radius must be positive"));
        }
        if !(0.0..=1.0).contains(&self.strike_spawn_chance) {
            return Err(TuningError::InvalidConfig("strike_spawn_chance must be between 0 and 1"));
        }
        if !(self.respawn_delay >= 0.0) {
            return Err(TuningError::InvalidConfig("respawn_delay must not be negative"));
        }
        Ok(())
    }
}
