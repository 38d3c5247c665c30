//! The black hole
//!
//! Dormant until enough play time has passed, then grows toward its caps,
//! pulls the actor and every obstacle toward its center, and eats whatever
//! drifts inside its radius.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::state::{Obstacle, ObstacleId};
use crate::consts::*;
use crate::direction_and_distance;
use crate::tuning::Tuning;

/// An entity being shrunk by the well
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Consumption {
    Actor { scale: f32, original_radius: f32 },
    Obstacle { id: ObstacleId, scale: f32, original_size: Vec2 },
}

impl Consumption {
    pub fn scale(&self) -> f32 {
        match *self {
            Consumption::Actor { scale, .. } | Consumption::Obstacle { scale, .. } => scale,
        }
    }

    fn scale_mut(&mut self) -> &mut f32 {
        match self {
            Consumption::Actor { scale, .. } | Consumption::Obstacle { scale, .. } => scale,
        }
    }

    fn is_actor(&self) -> bool {
        matches!(self, Consumption::Actor { .. })
    }

    fn obstacle_id(&self) -> Option<ObstacleId> {
        match *self {
            Consumption::Obstacle { id, .. } => Some(id),
            Consumption::Actor { .. } => None,
        }
    }
}

/// Something the well finished eating this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumed {
    Actor,
    Obstacle(ObstacleId),
}

/// Growth and pull parameters, copied out of [`Tuning`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellParams {
    pub spawn_time: f32,
    pub max_radius: f32,
    pub radius_growth: f32,
    pub max_attraction: f32,
    pub attraction_growth: f32,
    pub reference_distance: f32,
    pub obstacle_damping: f32,
    pub shrink_rate: f32,
}

impl From<&Tuning> for WellParams {
    fn from(tuning: &Tuning) -> Self {
        Self {
            spawn_time: tuning.well_spawn_time,
            max_radius: tuning.well_max_radius,
            radius_growth: tuning.well_radius_growth,
            max_attraction: tuning.well_max_attraction,
            attraction_growth: tuning.well_attraction_growth,
            reference_distance: tuning.well_reference_distance,
            obstacle_damping: tuning.obstacle_damping,
            shrink_rate: tuning.shrink_rate,
        }
    }
}

/// The gravitational anomaly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravityWell {
    pub pos: Vec2,
    pub radius: f32,
    pub attraction: f32,
    /// Once true, stays true
    pub active: bool,
    /// Visual pulse offset (0..WELL_PULSE_MAX)
    pub pulse: f32,
    pulse_growing: bool,
    /// Entities currently shrinking, at most one entry each
    pub consuming: Vec<Consumption>,
    pub params: WellParams,
}

impl GravityWell {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            radius: tuning.well_initial_radius,
            attraction: tuning.well_initial_attraction,
            active: false,
            pulse: 0.0,
            pulse_growing: true,
            consuming: Vec::new(),
            params: WellParams::from(tuning),
        }
    }

    /// Place the well from tuning, or somewhere in the upper band of the world
    pub fn spawn<R: Rng>(tuning: &Tuning, rng: &mut R) -> Self {
        let pos = tuning.well_position.unwrap_or_else(|| {
            let (w, h) = (tuning.world_width, tuning.world_height);
            let x = rng.random_range(w / 4.0..=w * 3.0 / 4.0);
            let y = rng.random_range(WELL_SPAWN_MIN_Y..=WELL_SPAWN_MAX_Y).min(h);
            Vec2::new(x, y)
        });
        Self::new(pos, tuning)
    }

    /// Pull magnitude at `distance` from the center (before damping)
    pub fn force_at(&self, distance: f32) -> f32 {
        let ratio = (distance / self.params.reference_distance).max(MIN_FALLOFF_RATIO);
        self.attraction / ratio
    }

    /// Advance one tick. Returns what was fully consumed during this tick.
    ///
    /// A consumed actor is only shrunk to zero radius; reacting to that is the
    /// caller's job.
    pub fn update(
        &mut self,
        dt: f32,
        elapsed: f32,
        actor: &mut Actor,
        obstacles: &mut Vec<Obstacle>,
    ) -> Vec<Consumed> {
        if !self.active && elapsed >= self.params.spawn_time {
            self.active = true;
            log::info!(
                "Gravity well active at ({:.0}, {:.0}) after {:.1}s",
                self.pos.x,
                self.pos.y,
                elapsed
            );
        }
        if !self.active {
            return Vec::new();
        }

        self.grow(dt);
        self.animate_pulse(dt);
        self.pull(dt, actor, obstacles);
        self.enroll(actor, obstacles);
        self.shrink(dt, actor, obstacles)
    }

    /// Forget any actor entry (the actor respawned)
    pub fn release_actor(&mut self) {
        self.consuming.retain(|c| !c.is_actor());
    }

    pub fn is_consuming_actor(&self) -> bool {
        self.consuming.iter().any(Consumption::is_actor)
    }

    pub fn is_consuming_obstacle(&self, id: ObstacleId) -> bool {
        self.consuming.iter().any(|c| c.obstacle_id() == Some(id))
    }

    fn grow(&mut self, dt: f32) {
        self.radius = (self.radius + self.params.radius_growth * dt).min(self.params.max_radius);
        self.attraction =
            (self.attraction + self.params.attraction_growth * dt).min(self.params.max_attraction);
    }

    fn animate_pulse(&mut self, dt: f32) {
        if self.pulse_growing {
            self.pulse += WELL_PULSE_SPEED * dt;
            if self.pulse >= WELL_PULSE_MAX {
                self.pulse = WELL_PULSE_MAX;
                self.pulse_growing = false;
            }
        } else {
            self.pulse -= WELL_PULSE_SPEED * dt;
            if self.pulse <= 0.0 {
                self.pulse = 0.0;
                self.pulse_growing = true;
            }
        }
    }

    fn pull(&self, dt: f32, actor: &mut Actor, obstacles: &mut [Obstacle]) {
        let (dir, dist) = direction_and_distance(actor.pos, self.pos);
        actor.vel += dir * self.force_at(dist) * dt;

        // Obstacles have no velocity, so the pull moves them directly
        for obstacle in obstacles.iter_mut().filter(|o| o.active) {
            let (dir, dist) = direction_and_distance(obstacle.bounds.center(), self.pos);
            let step = dir * self.force_at(dist) * self.params.obstacle_damping * dt;
            obstacle.bounds.translate(step);
        }
    }

    /// Start shrinking anything that crossed inside the radius
    fn enroll(&mut self, actor: &Actor, obstacles: &[Obstacle]) {
        if !actor.is_consumed() && !self.is_consuming_actor() && self.is_inside(actor.pos, actor.radius) {
            log::debug!("Gravity well started consuming the actor");
            self.consuming.push(Consumption::Actor {
                scale: 1.0,
                original_radius: actor.radius,
            });
        }

        for obstacle in obstacles.iter().filter(|o| o.active) {
            let size = obstacle.bounds.size();
            let half = size.max_element() / 2.0;
            if !self.is_consuming_obstacle(obstacle.id) && self.is_inside(obstacle.bounds.center(), half) {
                log::debug!("Gravity well started consuming obstacle {}", obstacle.id);
                self.consuming.push(Consumption::Obstacle {
                    id: obstacle.id,
                    scale: 1.0,
                    original_size: size,
                });
            }
        }
    }

    fn is_inside(&self, center: Vec2, half_size: f32) -> bool {
        center.distance(self.pos) < self.radius - half_size / 2.0
    }

    fn shrink(&mut self, dt: f32, actor: &mut Actor, obstacles: &mut Vec<Obstacle>) -> Vec<Consumed> {
        let mut finished = Vec::new();

        for entry in &mut self.consuming {
            let scale = entry.scale_mut();
            *scale -= self.params.shrink_rate * dt;
            let scale = *scale;
            let done = scale <= CONSUME_FINAL_SCALE;

            match *entry {
                Consumption::Actor { original_radius, .. } => {
                    if done {
                        actor.radius = 0.0;
                        finished.push(Consumed::Actor);
                    } else {
                        actor.radius = (original_radius * scale).max(MIN_ENTITY_SIZE);
                    }
                }
                Consumption::Obstacle { id, original_size, .. } => {
                    let Some(obstacle) = obstacles.iter_mut().find(|o| o.id == id) else {
                        // Already gone; drop the entry
                        finished.push(Consumed::Obstacle(id));
                        continue;
                    };
                    if done {
                        obstacle.active = false;
                        finished.push(Consumed::Obstacle(id));
                    } else {
                        let size = (original_size * scale).max(Vec2::splat(MIN_ENTITY_SIZE));
                        obstacle.bounds.resize_centered(size);
                    }
                }
            }
        }

        if finished.is_empty() {
            return finished;
        }

        self.consuming.retain(|c| {
            let gone = match c.obstacle_id() {
                Some(id) => finished.contains(&Consumed::Obstacle(id)),
                None => finished.contains(&Consumed::Actor),
            };
            !gone
        });
        obstacles.retain(|o| o.active || !finished.contains(&Consumed::Obstacle(o.id)));

        for consumed in &finished {
            match consumed {
                Consumed::Actor => log::info!("Actor consumed by the gravity well"),
                Consumed::Obstacle(id) => log::info!("Obstacle {} consumed by the gravity well", id),
            }
        }

        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::Motion;
    use crate::sim::collision::Rect;
    use crate::sim::state::ObstacleKind;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn tuning() -> Tuning {
        Tuning {
            well_spawn_time: 1.0,
            well_position: Some(Vec2::new(640.0, 150.0)),
            ..Default::default()
        }
    }

    fn actor_at(x: f32, y: f32) -> Actor {
        Actor::new(Vec2::new(x, y), 40.0, Motion::from(&Tuning::default()))
    }

    #[test]
    fn test_dormant_before_threshold() {
        let tuning = tuning();
        let mut well = GravityWell::new(Vec2::new(640.0, 150.0), &tuning);
        let mut actor = actor_at(320.0, 360.0);
        let mut obstacles = vec![Obstacle::new(1, Rect::new(600.0, 300.0, 100.0, 20.0), ObstacleKind::Platform)];

        let consumed = well.update(DT, 0.5, &mut actor, &mut obstacles);
        assert!(consumed.is_empty());
        assert!(!well.active);
        assert_eq!(actor.vel, Vec2::ZERO);
        assert_eq!(obstacles[0].bounds, Rect::new(600.0, 300.0, 100.0, 20.0));
        assert_eq!(well.radius, 30.0);
    }

    #[test]
    fn test_activates_and_stays_active() {
        let tuning = tuning();
        let mut well = GravityWell::new(Vec2::new(640.0, 150.0), &tuning);
        let mut actor = actor_at(320.0, 360.0);
        let mut obstacles = Vec::new();
        well.update(DT, 1.0, &mut actor, &mut obstacles);
        assert!(well.active);
        // Elapsed going "backwards" (e.g. a caller bug) does not deactivate it
        well.update(DT, 0.0, &mut actor, &mut obstacles);
        assert!(well.active);
    }

    #[test]
    fn test_pulls_actor_toward_center() {
        let tuning = tuning();
        let mut well = GravityWell::new(Vec2::new(640.0, 150.0), &tuning);
        let mut actor = actor_at(320.0, 150.0);
        well.update(DT, 2.0, &mut actor, &mut Vec::new());
        assert!(actor.vel.x > 0.0);
        assert!(actor.vel.y.abs() < 0.0001);
    }

    #[test]
    fn test_force_falloff() {
        let tuning = tuning();
        let well = GravityWell::new(Vec2::ZERO, &tuning);
        // Flat up close
        assert_eq!(well.force_at(10.0), well.force_at(150.0));
        assert_eq!(well.force_at(10.0), 200.0);
        // 1/d beyond the reference distance
        assert!((well.force_at(600.0) - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_obstacles_drift_slower_than_actor() {
        let tuning = tuning();
        let mut well = GravityWell::new(Vec2::new(640.0, 150.0), &tuning);
        let mut actor = actor_at(320.0, 150.0);
        let mut obstacles = vec![Obstacle::new(1, Rect::new(270.0, 140.0, 100.0, 20.0), ObstacleKind::Platform)];
        well.update(DT, 2.0, &mut actor, &mut obstacles);

        // Same distance, so the obstacle moves by 0.3x the actor's velocity change
        let obstacle_step = obstacles[0].bounds.x - 270.0;
        assert!(obstacle_step > 0.0);
        assert!((obstacle_step - actor.vel.x * 0.3).abs() < 0.0001);
    }

    #[test]
    fn test_consumes_obstacle_and_removes_it() {
        let tuning = tuning();
        let mut well = GravityWell::new(Vec2::new(640.0, 150.0), &tuning);
        let mut actor = actor_at(100.0, 680.0);
        let mut obstacles = vec![
            Obstacle::new(7, Rect::new(630.0, 140.0, 20.0, 20.0), ObstacleKind::Platform),
            Obstacle::new(8, Rect::new(0.0, 650.0, 400.0, 70.0), ObstacleKind::Platform),
        ];

        well.update(DT, 2.0, &mut actor, &mut obstacles);
        assert!(well.is_consuming_obstacle(7));
        assert_eq!(well.consuming.len(), 1);

        // Never enrolled twice
        well.update(DT, 2.0, &mut actor, &mut obstacles);
        assert_eq!(well.consuming.len(), 1);
        assert!(obstacles[0].bounds.w < 20.0);
        assert!(obstacles[0].bounds.w >= MIN_ENTITY_SIZE);

        let mut removed = false;
        for _ in 0..200 {
            let consumed = well.update(DT, 2.0, &mut actor, &mut obstacles);
            if consumed.contains(&Consumed::Obstacle(7)) {
                removed = true;
                break;
            }
        }
        assert!(removed);
        assert!(obstacles.iter().all(|o| o.id != 7));
        assert!(!well.is_consuming_obstacle(7));

        // Later ticks never bring it back
        for _ in 0..10 {
            well.update(DT, 2.0, &mut actor, &mut obstacles);
        }
        assert!(obstacles.iter().all(|o| o.id != 7));
        assert_eq!(obstacles.len(), 1);
    }

    #[test]
    fn test_consumes_actor_to_zero_radius() {
        let tuning = tuning();
        let mut well = GravityWell::new(Vec2::new(640.0, 150.0), &tuning);
        let mut actor = actor_at(640.0, 150.0);
        actor.radius = 10.0;

        let mut consumed_actor = false;
        for _ in 0..200 {
            let consumed = well.update(DT, 2.0, &mut actor, &mut Vec::new());
            if consumed.contains(&Consumed::Actor) {
                consumed_actor = true;
                break;
            }
            assert!(actor.radius >= MIN_ENTITY_SIZE);
        }
        assert!(consumed_actor);
        assert_eq!(actor.radius, 0.0);
        assert!(actor.is_consumed());
        assert!(!well.is_consuming_actor());

        // A hidden actor is not enrolled again
        well.update(DT, 2.0, &mut actor, &mut Vec::new());
        assert!(!well.is_consuming_actor());
        assert_eq!(actor.radius, 0.0);
    }

    #[test]
    fn test_release_actor() {
        let tuning = tuning();
        let mut well = GravityWell::new(Vec2::new(640.0, 150.0), &tuning);
        let mut actor = actor_at(640.0, 150.0);
        actor.radius = 10.0;
        well.update(DT, 2.0, &mut actor, &mut Vec::new());
        assert!(well.is_consuming_actor());
        well.release_actor();
        assert!(!well.is_consuming_actor());
    }

    #[test]
    fn test_pulse_stays_in_range() {
        let tuning = tuning();
        let mut well = GravityWell::new(Vec2::new(640.0, 150.0), &tuning);
        let mut actor = actor_at(100.0, 680.0);
        for _ in 0..2000 {
            well.update(DT, 2.0, &mut actor, &mut Vec::new());
            assert!((0.0..=WELL_PULSE_MAX).contains(&well.pulse));
        }
    }

    #[test]
    fn test_spawn_uses_upper_band() {
        let tuning = Tuning::default();
        let mut rng = rand_pcg::Pcg32::new(0xcafef00dd15ea5e5, 0xa02bdbf7bb3c0a7);
        for _ in 0..50 {
            let well = GravityWell::spawn(&tuning, &mut rng);
            assert!((320.0..=960.0).contains(&well.pos.x));
            assert!((100.0..=200.0).contains(&well.pos.y));
        }
    }

    proptest! {
        #[test]
        fn prop_growth_monotone_and_capped(dts in prop::collection::vec(0.0f32..0.5, 1..200)) {
            let tuning = tuning();
            let mut well = GravityWell::new(Vec2::new(640.0, 150.0), &tuning);
            let mut actor = actor_at(100.0, 680.0);
            let mut obstacles = Vec::new();
            let mut elapsed = 1.0;
            let (mut radius, mut attraction) = (well.radius, well.attraction);
            for dt in dts {
                elapsed += dt;
                well.update(dt, elapsed, &mut actor, &mut obstacles);
                prop_assert!(well.radius >= radius);
                prop_assert!(well.attraction >= attraction);
                prop_assert!(well.radius <= tuning.well_max_radius);
                prop_assert!(well.attraction <= tuning.well_max_attraction);
                radius = well.radius;
                attraction = well.attraction;
            }
        }
    }
}
