//! Shape dispatcher.
//!
//! Selects the generator for a [`ShapeKind`] and moves its local-space output
//! onto the canvas, centred at `(width / 2, height / 2, 0)`.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{check_dimensions, ChamberError, Result};
use crate::shapes::fractal::fractal;
use crate::shapes::primitives::*;
use crate::shapes::{FormationPoint, ShapeKind};

/// Samples placed between neighbouring corners of outline shapes.
const OUTLINE_SAMPLES: usize = 4;
/// Samples per edge of the wireframe cube.
const CUBE_EDGE_SAMPLES: usize = 5;

/// Characteristic formation radius for a canvas.
pub fn formation_radius(width: f32, height: f32, radius_ratio: f32) -> f32 {
    width.min(height) * radius_ratio
}

/// Half-size of the cube formation relative to the formation radius.
pub fn cube_half(r: f32) -> f32 {
    r * 0.75
}

/// Major and minor radius of the torus formation.
pub fn torus_radii(r: f32) -> (f32, f32) {
    (r * 0.75, r * 0.3)
}

fn to_canvas(points: &mut [FormationPoint], width: f32, height: f32) {
    let center = Vec3::new(width * 0.5, height * 0.5, 0.0);
    for p in points.iter_mut() {
        p.position += center;
    }
}

/// Exactly `count` target points for `kind`, centred on the canvas.
///
/// Continuous shapes are sampled directly; vertex-based shapes have their
/// vertex list spread over the particles by [`distribute`]. A zero-size
/// canvas is rejected so callers can keep their previous targets.
pub fn generate(
    kind: &ShapeKind,
    count: usize,
    width: f32,
    height: f32,
    radius_ratio: f32,
    seed: u64,
) -> Result<Vec<FormationPoint>> {
    check_dimensions(width, height)?;
    let r = formation_radius(width, height, radius_ratio);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut points = match kind {
        ShapeKind::Sphere => sphere(count, r),
        ShapeKind::Cube => cube_surface(count, cube_half(r)),
        ShapeKind::Torus => {
            let (big, small) = torus_radii(r);
            torus(count, big, small)
        }
        ShapeKind::Helix { turns, .. } => helix(count, r, *turns),
        ShapeKind::Spiral {
            turns, spiral_type, ..
        } => spiral(count, r, *turns, *spiral_type),
        ShapeKind::Fractal { iterations } => fractal(count, r, *iterations),
        ShapeKind::Scatter => scatter(count, r, &mut rng),
        ShapeKind::Dna { .. } | ShapeKind::Star { .. } | ShapeKind::Polygon { .. } => {
            let verts = local_vertices(kind, r);
            distribute(&verts, count, r * 0.02, &mut rng)?
        }
    };
    to_canvas(&mut points, width, height);
    Ok(points)
}

fn local_vertices(kind: &ShapeKind, r: f32) -> Vec<FormationPoint> {
    match kind {
        ShapeKind::Sphere => sphere(80, r),
        ShapeKind::Cube => cube_wireframe(cube_half(r), CUBE_EDGE_SAMPLES),
        ShapeKind::Torus => {
            let (big, small) = torus_radii(r);
            torus(96, big, small)
        }
        ShapeKind::Helix { turns, point_count } => helix(*point_count, r, *turns),
        ShapeKind::Dna { turns, point_count } => dna(*point_count, r, *turns),
        ShapeKind::Spiral {
            turns,
            point_count,
            spiral_type,
        } => spiral(*point_count, r, *turns, *spiral_type),
        ShapeKind::Star { points } => star(*points, r, OUTLINE_SAMPLES),
        ShapeKind::Polygon { sides } => polygon(*sides, r, OUTLINE_SAMPLES),
        ShapeKind::Fractal { iterations } => fractal(90, r, *iterations),
        ShapeKind::Scatter => Vec::new(),
    }
}

/// The vertex list of a mathematical shape, centred on the canvas.
pub fn vertices(
    kind: &ShapeKind,
    width: f32,
    height: f32,
    radius_ratio: f32,
) -> Result<Vec<FormationPoint>> {
    check_dimensions(width, height)?;
    let r = formation_radius(width, height, radius_ratio);
    let mut points = local_vertices(kind, r);
    if points.is_empty() {
        return Err(ChamberError::MalformedShape(format!(
            "{} has no vertices",
            kind.formation()
        )));
    }
    to_canvas(&mut points, width, height);
    Ok(points)
}

/// Assign `count` particles to `vertices` round-robin.
///
/// The first lap lands exactly on the vertices; later laps reuse vertices
/// with up to `jitter` of random offset so shapes whose vertex count does not
/// divide the particle count still look evenly populated. With fewer
/// particles than vertices only the first `count` vertices are used.
pub fn distribute<R: Rng>(
    vertices: &[FormationPoint],
    count: usize,
    jitter: f32,
    rng: &mut R,
) -> Result<Vec<FormationPoint>> {
    if vertices.is_empty() {
        return Err(ChamberError::MalformedShape("zero-length vertex list".into()));
    }
    let n = vertices.len();
    Ok((0..count)
        .map(|i| {
            let mut p = vertices[i % n];
            if i >= n && jitter > 0.0 {
                p.position += Vec3::new(
                    rng.gen_range(-jitter..=jitter),
                    rng.gen_range(-jitter..=jitter),
                    rng.gen_range(-jitter..=jitter),
                );
            }
            p
        })
        .collect())
}
