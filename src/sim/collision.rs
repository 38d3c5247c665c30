//! Axis-aligned rectangle geometry and overlap tests
//!
//! Everything solid in the world is a rectangle; the actor collides as the
//! square that bounds its circle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `2 * half` centered on `center`. Negative sizes collapse to a point.
    pub fn centered(center: Vec2, half: f32) -> Self {
        let half = half.max(0.0);
        Self::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Resize in place, keeping the center fixed
    pub fn resize_centered(&mut self, size: Vec2) {
        let center = self.center();
        self.w = size.x.max(0.0);
        self.h = size.y.max(0.0);
        self.x = center.x - self.w / 2.0;
        self.y = center.y - self.h / 2.0;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    ///
    /// A zero-size rectangle is a point and overlaps anything it lies strictly inside.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_left, a_right) = span(self.x, self.w);
        let (a_top, a_bottom) = span(self.y, self.h);
        let (b_left, b_right) = span(other.x, other.w);
        let (b_top, b_bottom) = span(other.y, other.h);

        overlap_1d(a_left, a_right, b_left, b_right) && overlap_1d(a_top, a_bottom, b_top, b_bottom)
    }
}

#[inline]
fn span(origin: f32, extent: f32) -> (f32, f32) {
    (origin, origin + extent.max(0.0))
}

/// Open-interval overlap that still lets a degenerate (point) interval hit
/// the interior of the other one
#[inline]
fn overlap_1d(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    if a_min == a_max {
        return a_min > b_min && a_min < b_max;
    }
    if b_min == b_max {
        return b_min > a_min && b_min < a_max;
    }
    a_min < b_max && b_min < a_max
}

/// Check whether a circle-bounded actor overlaps a rectangle
#[inline]
pub fn actor_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    Rect::centered(center, radius).overlaps(rect)
}

/// Check whether a point lies within `radius` of `center` (strict)
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}
