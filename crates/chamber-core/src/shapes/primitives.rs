//! Analytic formation generators.
//!
//! Every generator works in local coordinates centred on the origin with
//! characteristic radius `r`; the dispatcher moves the result onto the canvas.
//! Canvas convention: x right, y down, z away from the viewer.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;

use crate::math::spherical;
use crate::shapes::{FormationPoint, PointTag, SpiralType};

/// Golden-ratio conjugate used for low-discrepancy sequences.
const PHI_CONJ: f32 = 0.618_034;
/// Second additive-recurrence constant (plastic number conjugate).
const PLASTIC_CONJ: f32 = 0.754_877_7;

/// Every k-th DNA step carries a base-pair rung.
pub const BASE_PAIR_EVERY: usize = 4;
/// Interior points per base-pair rung.
pub const RUNG_POINTS: usize = 3;

fn tagged(points: impl Iterator<Item = Vec3>, tag: PointTag) -> Vec<FormationPoint> {
    points
        .enumerate()
        .map(|(i, position)| FormationPoint {
            position,
            tag,
            vertex: i,
        })
        .collect()
}

/// Fibonacci (golden-angle) sphere: even coverage without polar clustering.
pub fn sphere(n: usize, r: f32) -> Vec<FormationPoint> {
    let nf = n as f32;
    let golden = PI * (1.0 + 5.0_f32.sqrt());
    tagged(
        (0..n).map(|i| {
            let k = i as f32 + 0.5;
            let phi = (1.0 - 2.0 * k / nf).clamp(-1.0, 1.0).acos();
            let theta = golden * k;
            spherical(phi, theta) * r
        }),
        PointTag::Surface,
    )
}

/// Points spread across the six faces of an axis-aligned cube of half-size `half`.
pub fn cube_surface(n: usize, half: f32) -> Vec<FormationPoint> {
    tagged(
        (0..n).map(|i| {
            let face = i % 6;
            let k = (i / 6) as f32 + 0.5;
            let u = (k * PHI_CONJ).fract() * 2.0 - 1.0;
            let v = (k * PLASTIC_CONJ).fract() * 2.0 - 1.0;
            let (u, v) = (u * half, v * half);
            match face {
                0 => Vec3::new(u, v, half),
                1 => Vec3::new(u, v, -half),
                2 => Vec3::new(half, u, v),
                3 => Vec3::new(-half, u, v),
                4 => Vec3::new(u, half, v),
                _ => Vec3::new(u, -half, v),
            }
        }),
        PointTag::Surface,
    )
}

const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 3), (3, 2), (2, 0),
    (4, 5), (5, 7), (7, 6), (6, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Wireframe cube: 8 corners followed by `per_edge` samples along each of the 12 edges.
pub fn cube_wireframe(half: f32, per_edge: usize) -> Vec<FormationPoint> {
    let corners: Vec<Vec3> = (0..8)
        .map(|c| {
            Vec3::new(
                if c & 1 == 0 { -half } else { half },
                if c & 2 == 0 { -half } else { half },
                if c & 4 == 0 { -half } else { half },
            )
        })
        .collect();

    let mut out = tagged(corners.iter().copied(), PointTag::Vertex);
    for &(a, b) in CUBE_EDGES.iter() {
        for k in 1..=per_edge {
            let t = k as f32 / (per_edge + 1) as f32;
            out.push(FormationPoint {
                position: corners[a].lerp(corners[b], t),
                tag: PointTag::Edge,
                vertex: out.len(),
            });
        }
    }
    out
}

/// Torus in the canvas plane with major radius `big_r` and minor radius `small_r`.
pub fn torus(n: usize, big_r: f32, small_r: f32) -> Vec<FormationPoint> {
    let nf = n as f32;
    tagged(
        (0..n).map(|i| {
            let u = TAU * i as f32 / nf;
            let v = TAU * (i as f32 * PHI_CONJ * 7.0).fract();
            let ring = big_r + small_r * v.cos();
            Vec3::new(ring * u.cos(), ring * u.sin(), small_r * v.sin())
        }),
        PointTag::Surface,
    )
}

/// Parameter in [0,1] of sample `i` out of `n`, endpoints included.
fn along(i: usize, n: usize) -> f32 {
    if n > 1 {
        i as f32 / (n - 1) as f32
    } else {
        0.5
    }
}

/// Single helical strand climbing the vertical axis.
pub fn helix(n: usize, r: f32, turns: f32) -> Vec<FormationPoint> {
    let radius = r * 0.55;
    let height = r * 2.0;
    tagged(
        (0..n).map(|i| {
            let t = along(i, n);
            let a = t * turns * TAU;
            Vec3::new(radius * a.cos(), (t - 0.5) * height, radius * a.sin())
        }),
        PointTag::Vertex,
    )
}

/// DNA double helix: two interleaved strands plus base-pair rungs.
///
/// Returns `2 * steps` backbone points and `RUNG_POINTS` interior points for
/// every `BASE_PAIR_EVERY`-th step.
pub fn dna(steps: usize, r: f32, turns: f32) -> Vec<FormationPoint> {
    let radius = r * 0.5;
    let height = r * 2.0;
    let mut out = Vec::with_capacity(steps * 3);
    for i in 0..steps {
        let t = along(i, steps);
        let a = t * turns * TAU;
        let y = (t - 0.5) * height;
        let b1 = Vec3::new(radius * a.cos(), y, radius * a.sin());
        let b2 = Vec3::new(radius * (a + PI).cos(), y, radius * (a + PI).sin());

        out.push(FormationPoint {
            position: b1,
            tag: PointTag::Backbone1,
            vertex: out.len(),
        });
        out.push(FormationPoint {
            position: b2,
            tag: PointTag::Backbone2,
            vertex: out.len(),
        });

        if i % BASE_PAIR_EVERY == 0 {
            for k in 1..=RUNG_POINTS {
                let s = k as f32 / (RUNG_POINTS + 1) as f32;
                out.push(FormationPoint {
                    position: b1.lerp(b2, s),
                    tag: PointTag::BasePair,
                    vertex: out.len(),
                });
            }
        }
    }
    out
}

/// Flat spiral in the canvas plane with a gentle depth wave.
pub fn spiral(n: usize, r: f32, turns: f32, kind: SpiralType) -> Vec<FormationPoint> {
    let theta_max = turns * TAU;
    tagged(
        (0..n).map(|i| {
            let t = along(i, n);
            let theta = t * theta_max;
            let rho = match kind {
                SpiralType::Archimedean => r * t,
                // r = a * e^(b*theta), normalised so the outer end sits at r
                SpiralType::Logarithmic => r * (((theta / theta_max.max(1e-3)) * 3.0).exp() - 1.0)
                    / (3.0_f32.exp() - 1.0),
                SpiralType::Fermat => r * t.sqrt(),
            };
            Vec3::new(rho * theta.cos(), rho * theta.sin(), (theta * 0.5).sin() * r * 0.1)
        }),
        PointTag::Vertex,
    )
}

/// Closed outline through `corners`, with `per_edge` samples between neighbours.
fn outline(corners: &[Vec3], per_edge: usize) -> Vec<FormationPoint> {
    let mut out = tagged(corners.iter().copied(), PointTag::Vertex);
    let n = corners.len();
    for i in 0..n {
        let a = corners[i];
        let b = corners[(i + 1) % n];
        for k in 1..=per_edge {
            let t = k as f32 / (per_edge + 1) as f32;
            out.push(FormationPoint {
                position: a.lerp(b, t),
                tag: PointTag::Edge,
                vertex: out.len(),
            });
        }
    }
    out
}

/// Regular polygon vertices at `angle = 2πi/sides - π/2`, plus edge samples.
pub fn polygon(sides: usize, r: f32, per_edge: usize) -> Vec<FormationPoint> {
    let corners: Vec<Vec3> = (0..sides)
        .map(|i| {
            let a = TAU * i as f32 / sides as f32 - PI / 2.0;
            Vec3::new(r * a.cos(), r * a.sin(), 0.0)
        })
        .collect();
    outline(&corners, per_edge)
}

/// Star with `points` tips: alternating outer/inner radius vertices.
pub fn star(points: usize, r: f32, per_edge: usize) -> Vec<FormationPoint> {
    let inner = r * 0.45;
    let n = points * 2;
    let corners: Vec<Vec3> = (0..n)
        .map(|i| {
            let a = TAU * i as f32 / n as f32 - PI / 2.0;
            let rho = if i % 2 == 0 { r } else { inner };
            Vec3::new(rho * a.cos(), rho * a.sin(), 0.0)
        })
        .collect();
    outline(&corners, per_edge)
}

/// Ambient home points: a seeded disc with shallow depth.
pub fn scatter<R: Rng>(n: usize, r: f32, rng: &mut R) -> Vec<FormationPoint> {
    tagged(
        (0..n).map(|_| {
            let rho = rng.gen::<f32>().sqrt() * r * 1.4;
            let a = rng.gen::<f32>() * TAU;
            let z = (rng.gen::<f32>() - 0.5) * r;
            Vec3::new(rho * a.cos(), rho * a.sin(), z)
        }),
        PointTag::Ambient,
    )
}
