//! Obstacle layouts

use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::sim::collision::Rect;
use crate::sim::state::ObstacleKind;

/// One obstacle in a layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub kind: ObstacleKind,
    pub bounds: Rect,
}

impl ObstacleSpec {
    pub fn platform(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            kind: ObstacleKind::Platform,
            bounds: Rect::new(x, y, w, h),
        }
    }

    pub fn hazard_pit(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            kind: ObstacleKind::HazardPit,
            bounds: Rect::new(x, y, w, h),
        }
    }
}

/// A level: the obstacles placed at the start of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub obstacles: Vec<ObstacleSpec>,
}

impl Default for Level {
    /// Split ground with a fire pit in the gap and a staircase of ledges
    fn default() -> Self {
        Self {
            obstacles: vec![
                ObstacleSpec::platform(0.0, 650.0, 400.0, 70.0),
                ObstacleSpec::platform(650.0, 650.0, 630.0, 70.0),
                ObstacleSpec::platform(200.0, 550.0, 300.0, 20.0),
                ObstacleSpec::platform(600.0, 450.0, 300.0, 20.0),
                ObstacleSpec::platform(300.0, 350.0, 200.0, 20.0),
                ObstacleSpec::platform(700.0, 250.0, 300.0, 20.0),
                ObstacleSpec::platform(100.0, 150.0, 200.0, 20.0),
                ObstacleSpec::hazard_pit(400.0, 650.0, 250.0, 70.0),
            ],
        }
    }
}

impl Level {
    pub fn empty() -> Self {
        Self { obstacles: Vec::new() }
    }

    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Every obstacle needs a positive size
    pub fn validate(&self) -> Result<(), TuningError> {
        for (index, spec) in self.obstacles.iter().enumerate() {
            let Rect { w, h, .. } = spec.bounds;
            if !(w > 0.0 && h > 0.0) {
                return Err(TuningError::InvalidObstacle {
                    index,
                    width: w,
                    height: h,
                });
            }
        }
        Ok(())
    }
}
