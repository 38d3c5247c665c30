//! Player-controlled kinematic body
//!
//! Motion is resolved one axis at a time, horizontal first, against every
//! solid obstacle. The resolver is deliberately crude: each overlapping
//! obstacle snaps the actor to one of its edges, in collection order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, actor_rect_overlap};
use super::state::Obstacle;
use crate::tuning::Tuning;

/// Requested horizontal direction for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalIntent {
    Left,
    #[default]
    Idle,
    Right,
}

impl HorizontalIntent {
    /// Combine held keys; right wins when both are held
    pub fn from_keys(left: bool, right: bool) -> Self {
        match (left, right) {
            (_, true) => HorizontalIntent::Right,
            (true, false) => HorizontalIntent::Left,
            (false, false) => HorizontalIntent::Idle,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            HorizontalIntent::Left => -1.0,
            HorizontalIntent::Idle => 0.0,
            HorizontalIntent::Right => 1.0,
        }
    }
}

/// Movement constants copied out of [`Tuning`] at construction
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Motion {
    pub speed: f32,
    pub gravity: f32,
    pub jump_power: f32,
}

impl From<&Tuning> for Motion {
    fn from(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.player_speed,
            gravity: tuning.gravity,
            jump_power: tuning.jump_power,
        }
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision half-size; shrunk by the well, 0 once consumed
    pub radius: f32,
    /// Radius restored on reset
    pub base_radius: f32,
    /// Respawn point
    pub start: Vec2,
    pub grounded: bool,
    pub can_jump: bool,
    /// Vertical position reached this tick before the world clamp.
    /// Below the top edge when something flung the actor out of the world.
    pub unclamped_y: f32,
    pub motion: Motion,
}

impl Actor {
    pub fn new(start: Vec2, radius: f32, motion: Motion) -> Self {
        Self {
            pos: start,
            vel: Vec2::ZERO,
            radius,
            base_radius: radius,
            start,
            grounded: false,
            can_jump: false,
            unclamped_y: start.y,
            motion,
        }
    }

    /// Jump if landed since the last jump. Otherwise a no-op.
    pub fn jump(&mut self) {
        if self.can_jump {
            self.vel.y = self.motion.jump_power;
            self.can_jump = false;
        }
    }

    /// Bounding square used for every collision test
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.radius)
    }

    /// Fully eaten by the well
    pub fn is_consumed(&self) -> bool {
        self.radius <= 0.0
    }

    /// Back to the spawn point at full size
    pub fn reset(&mut self) {
        self.pos = self.start;
        self.vel = Vec2::ZERO;
        self.radius = self.base_radius;
        self.grounded = false;
        self.can_jump = false;
        self.unclamped_y = self.start.y;
    }

    /// Advance one tick.
    ///
    /// Only active platforms are solid; hazard pits are left to the caller's
    /// hazard check. Horizontal pushes never touch `vel.x`, vertical ones zero
    /// `vel.y`.
    pub fn advance(
        &mut self,
        dt: f32,
        intent: HorizontalIntent,
        jump_requested: bool,
        obstacles: &[Obstacle],
        bounds: Vec2,
    ) {
        if jump_requested {
            self.jump();
        }

        self.vel.x = intent.sign() * self.motion.speed;
        self.vel.y += self.motion.gravity * dt;

        // Horizontal pass
        self.pos.x += self.vel.x * dt;
        let half = self.radius.max(0.0);
        let rect = self.rect();
        for obstacle in obstacles.iter().filter(|o| o.is_solid()) {
            if !rect.overlaps(&obstacle.bounds) {
                continue;
            }
            if self.vel.x > 0.0 {
                self.pos.x = obstacle.bounds.left() - half;
            } else if self.vel.x < 0.0 {
                self.pos.x = obstacle.bounds.right() + half;
            }
        }

        // Vertical pass
        self.grounded = false;
        self.pos.y += self.vel.y * dt;
        let (pos, radius) = (self.pos, self.radius);
        for obstacle in obstacles.iter().filter(|o| o.is_solid()) {
            if !actor_rect_overlap(pos, radius, &obstacle.bounds) {
                continue;
            }
            if self.vel.y > 0.0 {
                self.pos.y = obstacle.bounds.top() - half;
                self.vel.y = 0.0;
                self.grounded = true;
                self.can_jump = true;
            } else if self.vel.y < 0.0 {
                self.pos.y = obstacle.bounds.bottom() + half;
                self.vel.y = 0.0;
            }
        }

        self.unclamped_y = self.pos.y;
        self.clamp_to_bounds(bounds);
    }

    fn clamp_to_bounds(&mut self, bounds: Vec2) {
        let half = self.radius.max(0.0);
        if self.pos.x < half {
            self.pos.x = half;
        }
        if self.pos.x > bounds.x - half {
            self.pos.x = bounds.x - half;
        }
        if self.pos.y < half {
            self.pos.y = half;
            self.vel.y = 0.0;
        }
        if self.pos.y > bounds.y - half {
            self.pos.y = bounds.y - half;
            self.vel.y = 0.0;
            self.grounded = true;
            self.can_jump = true;
        }
    }
}
