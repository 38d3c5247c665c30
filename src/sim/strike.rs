//! Lightning strikes
//!
//! A strike warns for a fixed lead time, flashes for a short window during
//! which it can hit, then reports itself finished. The bolt geometry is rolled
//! once, on the tick the flash starts.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::point_in_circle;
use crate::consts::*;
use crate::tuning::Tuning;

/// Strike lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrikePhase {
    /// Counting down; warning ring grows
    Warning,
    /// Bolt visible and able to hit
    Active,
    /// Done; the owner drops it
    Expired,
}

/// One line of the bolt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

/// A scheduled lightning strike
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strike {
    pub target: Vec2,
    /// Absolute clock time the bolt lands
    pub strike_time: f32,
    pub lead_time: f32,
    pub flash_duration: f32,
    pub hit_radius: f32,
    pub phase: StrikePhase,
    /// Empty until the strike goes active
    pub path: Vec<Segment>,
}

impl Strike {
    /// Schedule a strike on `target`, landing `lead_time` after `now`
    pub fn new(target: Vec2, now: f32, tuning: &Tuning) -> Self {
        Self {
            target,
            strike_time: now + tuning.strike_lead_time,
            lead_time: tuning.strike_lead_time,
            flash_duration: tuning.strike_flash_duration,
            hit_radius: tuning.strike_hit_radius,
            phase: StrikePhase::Warning,
            path: Vec::new(),
        }
    }

    /// End of the hit window
    pub fn end_time(&self) -> f32 {
        self.strike_time + self.flash_duration
    }

    /// Advance the phase machine. Returns `false` once the strike is finished.
    pub fn update<R: Rng>(&mut self, now: f32, rng: &mut R) -> bool {
        if self.phase == StrikePhase::Warning && now >= self.strike_time {
            self.phase = StrikePhase::Active;
            self.path = generate_bolt(Vec2::new(self.target.x, 0.0), self.target, rng);
        }
        if self.phase == StrikePhase::Active && now > self.end_time() {
            self.phase = StrikePhase::Expired;
        }
        self.phase != StrikePhase::Expired
    }

    /// Whether `point` is hit at `now`. Only true inside the flash window.
    pub fn hits(&self, point: Vec2, now: f32) -> bool {
        if self.phase == StrikePhase::Expired {
            return false;
        }
        if now < self.strike_time || now > self.end_time() {
            return false;
        }
        point_in_circle(point, self.target, self.hit_radius)
    }

    /// Warning ring growth, 0 at spawn to 1 at the strike
    pub fn warning_progress(&self, now: f32) -> f32 {
        ((now - (self.strike_time - self.lead_time)) / self.lead_time).clamp(0.0, 1.0)
    }

    /// Warning ring radius
    pub fn warning_size(&self, now: f32) -> f32 {
        self.warning_progress(now) * STRIKE_MAX_WARNING_SIZE
    }

    /// Remaining fraction of the flash, 1 when it lands to 0 at the end
    pub fn flash_progress(&self, now: f32) -> f32 {
        ((self.end_time() - now) / self.flash_duration).clamp(0.0, 1.0)
    }
}

/// Zig-zag from `origin` down to `target`.
///
/// Interior vertices wander horizontally from the previous one; the last
/// vertex lands exactly on the target.
pub fn generate_bolt<R: Rng>(origin: Vec2, target: Vec2, rng: &mut R) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(STRIKE_SEGMENTS);
    let mut current = origin;

    for i in 0..STRIKE_SEGMENTS {
        let t = (i + 1) as f32 / STRIKE_SEGMENTS as f32;
        let next_y = origin.y + (target.y - origin.y) * t;
        let next_x = if i == STRIKE_SEGMENTS - 1 {
            target.x
        } else {
            current.x + rng.random_range(-STRIKE_MAX_DISPLACEMENT..=STRIKE_MAX_DISPLACEMENT)
        };
        let next = Vec2::new(next_x, next_y);
        segments.push(Segment { start: current, end: next });
        current = next;
    }

    segments
}
