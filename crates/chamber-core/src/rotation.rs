//! Presentation rotation for mathematical shapes.
//!
//! Spins the shape's particles two full turns with quadratic easing, then
//! puts every target back exactly where it was. Helical shapes drill around
//! the vertical axis; everything else turns like a ferris wheel around the
//! horizontal axis so depth (and perspective size) changes as it goes.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::math::{ease_in_out_quad, rotate_about, Axis};

/// Total presentation angle: 720 degrees.
pub const TOTAL_ANGLE: f32 = 2.0 * TAU;

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeRotation {
    pub started_ms: f64,
    pub duration_ms: f64,
    pub axis: Axis,
    pub center: Vec2,
    /// `(particle index, original target)` for every rotating particle.
    pub originals: Vec<(usize, Vec3)>,
}

impl ShapeRotation {
    pub fn new(started_ms: f64, duration_ms: f64, axis: Axis, center: Vec2, originals: Vec<(usize, Vec3)>) -> Self {
        Self {
            started_ms,
            duration_ms: duration_ms.max(1.0),
            axis,
            center,
            originals,
        }
    }

    pub fn progress(&self, now_ms: f64) -> f32 {
        ((now_ms - self.started_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn angle_at(&self, now_ms: f64) -> f32 {
        ease_in_out_quad(self.progress(now_ms)) * TOTAL_ANGLE
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms - self.started_ms >= self.duration_ms
    }

    /// Rotated targets at `now_ms`, or the originals once finished.
    pub fn targets_at(&self, now_ms: f64) -> impl Iterator<Item = (usize, Vec3)> + '_ {
        let finished = self.is_finished(now_ms);
        let angle = self.angle_at(now_ms);
        self.originals.iter().map(move |&(i, orig)| {
            if finished {
                (i, orig)
            } else {
                (i, rotate_about(orig, self.center, self.axis, angle))
            }
        })
    }

    pub fn rescale(&mut self, scale: Vec3) {
        self.center *= scale.truncate();
        for (_, p) in self.originals.iter_mut() {
            *p *= scale;
        }
    }
}
