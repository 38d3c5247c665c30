//! Game state and core simulation types
//!
//! Everything a run needs lives in [`SimState`], owned by the caller and
//! threaded through [`super::tick`]. There is no global state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, Motion};
use super::collision::{Rect, actor_rect_overlap};
use super::strike::Strike;
use super::tick::TickInput;
use super::well::GravityWell;
use crate::error::TuningError;
use crate::level::Level;
use crate::tuning::Tuning;

/// Stable obstacle handle
pub type ObstacleId = u32;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Solid; the actor can stand on it
    Platform,
    /// Not solid; touching it is fatal
    HazardPit,
}

/// A rectangle in the world. Only the gravity well moves or resizes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub bounds: Rect,
    pub kind: ObstacleKind,
    pub active: bool,
}

impl Obstacle {
    pub fn new(id: ObstacleId, bounds: Rect, kind: ObstacleKind) -> Self {
        Self {
            id,
            bounds,
            kind,
            active: true,
        }
    }

    /// Blocks actor movement
    pub fn is_solid(&self) -> bool {
        self.active && self.kind == ObstacleKind::Platform
    }

    pub fn is_hazard(&self) -> bool {
        self.active && self.kind == ObstacleKind::HazardPit
    }
}

/// Why the actor died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Touched a hazard pit
    HazardPit,
    /// Caught in a lightning strike
    Lightning,
    /// Flung out through the top of the world
    Ejected,
    /// Shrunk away by the gravity well
    Consumed,
}

/// Held state of the keys that can call down lightning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl KeyState {
    /// Keys down now that were up last tick, in (left, right, jump) order
    pub fn fresh_presses(&self, now: &KeyState) -> [bool; 3] {
        [
            now.left && !self.left,
            now.right && !self.right,
            now.jump && !self.jump,
        ]
    }
}

impl From<&TickInput> for KeyState {
    fn from(input: &TickInput) -> Self {
        Self {
            left: input.left,
            right: input.right,
            jump: input.jump,
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState<R = Pcg32> {
    pub tuning: Tuning,
    pub actor: Actor,
    /// Live obstacles (sorted by id)
    pub obstacles: Vec<Obstacle>,
    pub well: GravityWell,
    /// Live lightning strikes, oldest first
    pub strikes: Vec<Strike>,
    /// Actor is dead and waiting to respawn
    pub game_over: bool,
    /// Clock time after which the actor respawns
    pub respawn_deadline: f32,
    pub last_death: Option<DeathCause>,
    /// Play time accumulated while alive (s)
    pub elapsed: f32,
    /// Key presses that called down lightning
    pub movement_counter: u32,
    /// Obstacles the gravity well has eaten this run
    pub obstacles_consumed: u32,
    /// Keys held on the previous tick
    pub prev_keys: KeyState,
    /// Source of every random draw
    pub rng: R,
    next_id: ObstacleId,
}

impl SimState<Pcg32> {
    /// Create a new run with a seeded PCG generator
    pub fn new(tuning: Tuning, level: &Level, seed: u64) -> Result<Self, TuningError> {
        Self::with_rng(tuning, level, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> SimState<R> {
    /// Create a new run drawing randomness from `rng`
    pub fn with_rng(tuning: Tuning, level: &Level, mut rng: R) -> Result<Self, TuningError> {
        tuning.validate()?;
        level.validate()?;

        let actor = Actor::new(tuning.start_position(), tuning.player_radius, Motion::from(&tuning));
        let well = GravityWell::spawn(&tuning, &mut rng);

        let mut state = Self {
            tuning,
            actor,
            obstacles: Vec::with_capacity(level.obstacles.len()),
            well,
            strikes: Vec::new(),
            game_over: false,
            respawn_deadline: 0.0,
            last_death: None,
            elapsed: 0.0,
            movement_counter: 0,
            obstacles_consumed: 0,
            prev_keys: KeyState::default(),
            rng,
            next_id: 1,
        };

        for spec in &level.obstacles {
            let id = state.next_entity_id();
            state.obstacles.push(Obstacle::new(id, spec.bounds, spec.kind));
        }

        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> ObstacleId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.tuning.world_width, self.tuning.world_height)
    }

    /// Roll the spawn chance for one fresh key press. On success the counter
    /// goes up and a strike is aimed at the actor.
    pub fn roll_strike(&mut self, now: f32) -> bool {
        let roll: f32 = self.rng.random();
        if roll >= self.tuning.strike_spawn_chance {
            return false;
        }
        self.movement_counter += 1;
        self.strikes.push(Strike::new(self.actor.pos, now, &self.tuning));
        log::debug!(
            "Lightning called at ({:.0}, {:.0}), strikes at {:.2}s (moves: {})",
            self.actor.pos.x,
            self.actor.pos.y,
            now + self.tuning.strike_lead_time,
            self.movement_counter
        );
        true
    }

    /// First fatal condition the actor is in, if any
    pub fn detect_hazard(&self, now: f32) -> Option<DeathCause> {
        let actor = &self.actor;
        if self
            .obstacles
            .iter()
            .any(|o| o.is_hazard() && actor_rect_overlap(actor.pos, actor.radius, &o.bounds))
        {
            return Some(DeathCause::HazardPit);
        }
        if self.strikes.iter().any(|s| s.hits(actor.pos, now)) {
            return Some(DeathCause::Lightning);
        }
        if actor.unclamped_y < self.tuning.ejection_height {
            return Some(DeathCause::Ejected);
        }
        if actor.is_consumed() {
            return Some(DeathCause::Consumed);
        }
        None
    }

    /// Enter the death state. Ignored while already dead.
    pub fn handle_death(&mut self, now: f32, cause: DeathCause) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.respawn_deadline = now + self.tuning.respawn_delay;
        self.last_death = Some(cause);
        log::info!("Actor died ({:?}), respawning at {:.2}s", cause, self.respawn_deadline);
    }

    /// Respawn once the deadline has passed. Returns true if it respawned.
    pub fn check_respawn(&mut self, now: f32) -> bool {
        if self.game_over && now > self.respawn_deadline {
            self.restart();
            return true;
        }
        false
    }

    /// Put the actor back at the start and drop pending strikes
    pub fn restart(&mut self) {
        self.actor.reset();
        self.well.release_actor();
        self.game_over = false;
        self.strikes.clear();
        log::info!("Actor respawned at ({:.0}, {:.0})", self.actor.pos.x, self.actor.pos.y);
    }

    /// Advance strikes, dropping the ones that report finished
    pub fn update_strikes(&mut self, now: f32) {
        let rng = &mut self.rng;
        let before = self.strikes.len();
        self.strikes.retain_mut(|strike| strike.update(now, &mut *rng));
        let expired = before - self.strikes.len();
        if expired > 0 {
            log::debug!("{} strike(s) expired", expired);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::ObstacleSpec;

    fn state_with(level: Level) -> SimState {
        let tuning = Tuning {
            well_position: Some(Vec2::new(640.0, 150.0)),
            ..Default::default()
        };
        SimState::new(tuning, &level, 12345).unwrap()
    }

    #[test]
    fn test_new_assigns_ids_in_order() {
        let state = state_with(Level::default());
        let ids: Vec<_> = state.obstacles.iter().map(|o| o.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        assert_eq!(state.actor.pos, Vec2::new(320.0, 360.0));
        assert!(!state.game_over);
    }

    #[test]
    fn test_new_rejects_bad_tuning() {
        let tuning = Tuning {
            world_height: -1.0,
            ..Default::default()
        };
        assert!(SimState::new(tuning, &Level::default(), 1).is_err());
    }

    #[test]
    fn test_new_rejects_bad_level() {
        let level = Level {
            obstacles: vec![ObstacleSpec::platform(0.0, 0.0, -5.0, 10.0)],
        };
        assert!(SimState::new(Tuning::default(), &level, 1).is_err());
    }

    #[test]
    fn test_key_edges() {
        let prev = KeyState {
            left: true,
            right: false,
            jump: false,
        };
        let now = KeyState {
            left: true,
            right: true,
            jump: true,
        };
        assert_eq!(prev.fresh_presses(&now), [false, true, true]);
        assert_eq!(now.fresh_presses(&now), [false, false, false]);
    }

    #[test]
    fn test_detect_hazard_pit() {
        let level = Level {
            obstacles: vec![ObstacleSpec::hazard_pit(300.0, 380.0, 100.0, 40.0)],
        };
        let state = state_with(level);
        assert_eq!(state.detect_hazard(0.0), Some(DeathCause::HazardPit));
    }

    #[test]
    fn test_detect_ejection_and_consumption() {
        let mut state = state_with(Level::empty());
        assert_eq!(state.detect_hazard(0.0), None);

        // Clamped back inside the world, but it was flung past the top
        state.actor.pos.y = 40.0;
        state.actor.unclamped_y = 0.5;
        assert_eq!(state.detect_hazard(0.0), Some(DeathCause::Ejected));

        state.actor.pos.y = 360.0;
        state.actor.unclamped_y = 360.0;
        state.actor.radius = 0.0;
        assert_eq!(state.detect_hazard(0.0), Some(DeathCause::Consumed));
    }

    #[test]
    fn test_death_and_respawn() {
        let mut state = state_with(Level::empty());
        state.actor.pos = Vec2::new(900.0, 100.0);
        state.strikes.push(Strike::new(Vec2::ZERO, 0.0, &state.tuning));

        state.handle_death(5.0, DeathCause::Lightning);
        assert!(state.game_over);
        assert_eq!(state.respawn_deadline, 7.0);

        // A second death does not push the deadline
        state.handle_death(6.0, DeathCause::HazardPit);
        assert_eq!(state.respawn_deadline, 7.0);
        assert_eq!(state.last_death, Some(DeathCause::Lightning));

        assert!(!state.check_respawn(7.0));
        assert!(state.check_respawn(7.01));
        assert!(!state.game_over);
        assert_eq!(state.actor.pos, Vec2::new(320.0, 360.0));
        assert!(state.strikes.is_empty());
    }

    #[test]
    fn test_roll_strike_certain_and_never() {
        let mut state = state_with(Level::empty());
        state.tuning.strike_spawn_chance = 1.0;
        assert!(state.roll_strike(3.0));
        assert_eq!(state.movement_counter, 1);
        assert_eq!(state.strikes.len(), 1);
        assert_eq!(state.strikes[0].target, state.actor.pos);
        assert_eq!(state.strikes[0].strike_time, 5.0);

        state.tuning.strike_spawn_chance = 0.0;
        assert!(!state.roll_strike(3.0));
        assert_eq!(state.movement_counter, 1);
    }
}
