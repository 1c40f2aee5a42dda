//! Fractal formation.
//!
//! Not a true recursive subdivision: particles walk the perimeter of a base
//! triangle and each edge segment is displaced by bounded hash noise whose
//! amplitude shrinks as the requested iteration depth grows. Higher depth
//! reads as a finer, tighter outline.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::math::hash11;
use crate::shapes::{FormationPoint, PointTag};

/// Depth is clamped to this range; beyond it the outline is visually flat.
pub const MAX_ITERATIONS: u32 = 8;

/// Noise amplitude, as a fraction of `r`, at iteration depth 1.
const BASE_ROUGHNESS: f32 = 0.25;

fn triangle(r: f32) -> [Vec3; 3] {
    let mut corners = [Vec3::ZERO; 3];
    for (i, c) in corners.iter_mut().enumerate() {
        let a = TAU * i as f32 / 3.0 - PI / 2.0;
        *c = Vec3::new(r * a.cos(), r * a.sin(), 0.0);
    }
    corners
}

/// `n` points along a noisy triangle outline of radius `r`.
pub fn fractal(n: usize, r: f32, iterations: u32) -> Vec<FormationPoint> {
    let depth = iterations.clamp(1, MAX_ITERATIONS);
    let amplitude = r * BASE_ROUGHNESS / depth as f32;
    // segments per edge double with depth, like a Koch-style refinement
    let segments = 1usize << depth;
    let corners = triangle(r);

    (0..n)
        .map(|i| {
            let s = i as f32 / n.max(1) as f32 * 3.0;
            let edge = (s.floor() as usize).min(2);
            let t = s - edge as f32;
            let a = corners[edge];
            let b = corners[(edge + 1) % 3];

            let seg = ((t * segments as f32).floor() as usize).min(segments - 1);
            let local = t * segments as f32 - seg as f32;
            // tent profile: zero at segment ends, peak mid-segment
            let tent = 1.0 - (2.0 * local - 1.0).abs();
            let h = hash11((edge * 131 + seg) as f32 + 0.5) * 2.0 - 1.0;

            let dir = b - a;
            let normal = Vec3::new(-dir.y, dir.x, 0.0).normalize_or_zero();
            let offset = normal * h * tent * amplitude;
            let z = (hash11(i as f32 * 1.7 + 3.1) - 0.5) * amplitude;

            FormationPoint {
                position: a.lerp(b, t) + offset + Vec3::Z * z,
                tag: PointTag::Edge,
                vertex: i,
            }
        })
        .collect()
}
