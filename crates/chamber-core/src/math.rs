use glam::{Mat3, Vec2, Vec3};

/// Hash float to [0,1).
pub fn hash11(p: f32) -> f32 {
    let mut p = (p * 0.1031).fract();
    p *= p + 33.33;
    p *= p + p;
    p.fract().abs()
}

/// Smooth interpolation, GLSL `smoothstep`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Quadratic ease-in/ease-out on `t` in [0,1].
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Low-frequency organic drift: three phase-shifted sines per axis.
///
/// Output components lie in [-1, 1].
pub fn drift(phase: f32, speed: f32, time: f32) -> Vec3 {
    let a = phase + time * speed;
    Vec3::new(
        (a.sin() + (a * 0.37 + 1.3).sin()) * 0.5,
        ((a * 1.3 + 2.1).cos() + (a * 0.53).sin()) * 0.5,
        (a * 0.7 + 4.2).sin(),
    )
}

/// Point on a unit sphere from polar angle `phi` and azimuth `theta`.
#[inline]
pub fn spherical(phi: f32, theta: f32) -> Vec3 {
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Result of a perspective projection onto the canvas plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Screen position in canvas pixels.
    pub screen: Vec2,
    /// Size multiplier: >1 in front of the canvas plane, <1 behind it.
    pub scale: f32,
    /// Depth used for the projection (positive is away from the viewer).
    pub depth: f32,
}

/// Project a canvas-space 3D point around `center` with focal length `focal`.
///
/// Returns `None` for non-finite input so callers never hand NaN to a
/// rendering API.
pub fn project(point: Vec3, center: Vec2, focal: f32) -> Option<Projection> {
    if !point.is_finite() {
        return None;
    }
    let denom = (focal + point.z).max(focal * 0.1).max(1.0);
    let scale = focal / denom;
    let screen = center + (point.truncate() - center) * scale;
    if !screen.is_finite() || !scale.is_finite() {
        return None;
    }
    Some(Projection {
        screen,
        scale,
        depth: point.z,
    })
}

/// Rotation axis used to present a formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Screen-vertical axis: drill/screw motion for helical shapes.
    Vertical,
    /// Screen-horizontal axis: ferris-wheel motion, depth changes with angle.
    Horizontal,
}

impl Axis {
    pub fn rotation(self, angle: f32) -> Mat3 {
        match self {
            Axis::Vertical => Mat3::from_rotation_y(angle),
            Axis::Horizontal => Mat3::from_rotation_x(angle),
        }
    }
}

/// Rotate `point` by `angle` around `axis` passing through `center` (z = 0).
pub fn rotate_about(point: Vec3, center: Vec2, axis: Axis, angle: f32) -> Vec3 {
    let pivot = center.extend(0.0);
    pivot + axis.rotation(angle) * (point - pivot)
}
