//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clock and frame delta supplied by the caller
//! - Injected, seedable RNG only
//! - Stable iteration order (by obstacle ID)
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod state;
pub mod strike;
pub mod tick;
pub mod view;
pub mod well;

pub use actor::{Actor, HorizontalIntent, Motion};
pub use collision::{Rect, actor_rect_overlap, point_in_circle};
pub use state::{DeathCause, KeyState, Obstacle, ObstacleId, ObstacleKind, SimState};
pub use strike::{Segment, Strike, StrikePhase, generate_bolt};
pub use tick::{TickInput, tick};
pub use view::{ActorView, ObstacleView, Snapshot, StrikeView, WellView};
pub use well::{Consumed, Consumption, GravityWell, WellParams};
