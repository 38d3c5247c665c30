//! Read-only views for the renderer
//!
//! The draw layer never touches [`SimState`]; it asks for a [`Snapshot`] each
//! frame and turns it into pixels.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::collision::Rect;
use super::state::{ObstacleId, ObstacleKind, SimState};
use super::strike::{Segment, StrikePhase};
use super::well::Consumption;
use crate::consts::STRIKE_FLASH_RADIUS;

#[derive(Debug, Clone, Serialize)]
pub struct ActorView {
    pub pos: Vec2,
    pub radius: f32,
    pub grounded: bool,
    /// False once consumed or while dead
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObstacleView {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub bounds: Rect,
    pub active: bool,
    /// Remaining size fraction while the well is eating it
    pub consume_scale: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WellView {
    pub pos: Vec2,
    pub radius: f32,
    /// Radius of the pulsing glow
    pub glow_radius: f32,
    pub attraction: f32,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrikeView {
    pub target: Vec2,
    pub phase: StrikePhase,
    pub warning_progress: f32,
    pub warning_size: f32,
    pub flash_progress: f32,
    pub flash_radius: f32,
    pub path: Vec<Segment>,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub now: f32,
    pub elapsed: f32,
    pub game_over: bool,
    /// Seconds until respawn while dead
    pub respawn_in: Option<f32>,
    pub movement_counter: u32,
    /// Obstacles the well has eaten so far
    pub obstacles_consumed: u32,
    pub actor: ActorView,
    pub obstacles: Vec<ObstacleView>,
    pub well: WellView,
    pub strikes: Vec<StrikeView>,
}

impl<R: Rng> SimState<R> {
    /// Capture a read-only view of the world at clock time `now`
    pub fn snapshot(&self, now: f32) -> Snapshot {
        let actor = ActorView {
            pos: self.actor.pos,
            radius: self.actor.radius,
            grounded: self.actor.grounded,
            visible: !self.game_over && !self.actor.is_consumed(),
        };

        let obstacles = self
            .obstacles
            .iter()
            .map(|o| ObstacleView {
                id: o.id,
                kind: o.kind,
                bounds: o.bounds,
                active: o.active,
                consume_scale: self.well.consuming.iter().find_map(|c| match *c {
                    Consumption::Obstacle { id, scale, .. } if id == o.id => Some(scale),
                    _ => None,
                }),
            })
            .collect();

        let well = WellView {
            pos: self.well.pos,
            radius: self.well.radius,
            glow_radius: (self.well.radius + self.well.pulse) * 1.5,
            attraction: self.well.attraction,
            active: self.well.active,
        };

        let strikes = self
            .strikes
            .iter()
            .map(|s| {
                let flash_progress = if s.phase == StrikePhase::Active {
                    s.flash_progress(now)
                } else {
                    0.0
                };
                StrikeView {
                    target: s.target,
                    phase: s.phase,
                    warning_progress: s.warning_progress(now),
                    warning_size: s.warning_size(now),
                    flash_progress,
                    flash_radius: STRIKE_FLASH_RADIUS * flash_progress,
                    path: s.path.clone(),
                }
            })
            .collect();

        Snapshot {
            now,
            elapsed: self.elapsed,
            game_over: self.game_over,
            respawn_in: self
                .game_over
                .then(|| (self.respawn_deadline - now).max(0.0)),
            movement_counter: self.movement_counter,
            obstacles_consumed: self.obstacles_consumed,
            actor,
            obstacles,
            well,
            strikes,
        }
    }
}
