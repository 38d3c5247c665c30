//! Per-frame simulation step
//!
//! One call per frame with the caller's clock and frame delta. Order:
//! lightning rolls, gravity well, actor, hazard checks, strike expiry.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::HorizontalIntent;
use super::state::{KeyState, SimState};
use super::well::Consumed;

/// Input snapshot for a single tick. Anything the platform layer could not
/// read is simply `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Jump (held; jumps on the press edge)
    pub jump: bool,
    /// Respawn immediately
    pub restart: bool,
}

/// Advance the simulation by one frame.
///
/// `now` is a monotonic clock in seconds and `dt` the time since the last
/// tick; neither is read from the system. While the actor is dead nothing
/// moves: the tick only waits for the respawn deadline.
pub fn tick<R: Rng>(state: &mut SimState<R>, input: &TickInput, now: f32, dt: f32) {
    let keys = KeyState::from(input);
    let fresh = state.prev_keys.fresh_presses(&keys);
    state.prev_keys = keys;

    if input.restart {
        log::info!("Restart requested");
        state.restart();
    }

    if state.game_over {
        state.check_respawn(now);
        return;
    }

    for _ in fresh.iter().filter(|&&pressed| pressed) {
        state.roll_strike(now);
    }

    state.elapsed += dt;
    let consumed = state
        .well
        .update(dt, state.elapsed, &mut state.actor, &mut state.obstacles);
    state.obstacles_consumed += consumed
        .iter()
        .filter(|c| matches!(c, Consumed::Obstacle(_)))
        .count() as u32;

    let bounds = state.bounds();
    let intent = HorizontalIntent::from_keys(input.left, input.right);
    let [_, _, jump_pressed] = fresh;
    state
        .actor
        .advance(dt, intent, jump_pressed, &state.obstacles, bounds);

    if let Some(cause) = state.detect_hazard(now) {
        state.handle_death(now, cause);
    }

    state.update_strikes(now);
}
