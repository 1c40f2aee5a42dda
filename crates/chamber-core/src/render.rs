//! Rendering contract.
//!
//! The chamber draws through [`RenderTarget`], so the simulation never
//! touches a browser canvas directly. Particles with a non-finite state are
//! skipped here rather than handed to the drawing API.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::effects::{Effect, EffectKind};
use crate::math::Projection;

/// HSLA colour: hue in degrees, saturation/lightness in percent, alpha in [0,1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 100.0),
            l: l.clamp(0.0, 100.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self::new(self.h, self.s, self.l, a)
    }

    /// CSS `hsla(...)` string.
    pub fn css(&self) -> String {
        format!("hsla({:.1}, {:.1}%, {:.1}%, {:.3})", self.h, self.s, self.l, self.a)
    }
}

/// A 2D drawing surface.
pub trait RenderTarget {
    fn clear(&mut self, width: f32, height: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Hsla);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Hsla);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, line_width: f32, color: Hsla);
}

/// Projected particle, packed for hosts that upload straight to the GPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 2], //  8 bytes
    pub size: f32,          //  4 bytes
    pub depth: f32,         //  4 bytes
    pub hue: f32,           //  4 bytes
    pub alpha: f32,         //  4 bytes
    pub energy: f32,        //  4 bytes
    pub _pad: f32,          //  4 bytes
}

/// Appearance of one particle for this frame.
pub struct Sprite {
    pub projection: Projection,
    pub size: f32,
    pub color: Hsla,
    pub energy: f32,
}

impl Sprite {
    pub fn radius(&self) -> f32 {
        (self.size * self.projection.scale * (0.8 + self.energy * 0.6)).max(0.1)
    }

    pub fn vertex(&self) -> PointVertex {
        PointVertex {
            position: self.projection.screen.to_array(),
            size: self.radius(),
            depth: self.projection.depth,
            hue: self.color.h,
            alpha: self.color.a,
            energy: self.energy,
            _pad: 0.0,
        }
    }
}

pub fn draw_sprite(target: &mut dyn RenderTarget, sprite: &Sprite, glow: f32) {
    let radius = sprite.radius();
    if glow > 0.0 {
        let halo = sprite.color.with_alpha(sprite.color.a * 0.15 * glow);
        target.fill_circle(sprite.projection.screen, radius * 3.0, halo);
    }
    target.fill_circle(sprite.projection.screen, radius, sprite.color);
}

/// Faint lines between nearby sprites; only every `stride`-th sprite takes part.
pub fn draw_connections(
    target: &mut dyn RenderTarget,
    sprites: &[Option<Sprite>],
    stride: usize,
    link_distance: f32,
) {
    let stride = stride.max(1);
    let link_sq = link_distance * link_distance;
    for i in (0..sprites.len()).step_by(stride) {
        let Some(a) = &sprites[i] else { continue };
        for j in (i + stride..sprites.len()).step_by(stride) {
            let Some(b) = &sprites[j] else { continue };
            let d_sq = a.projection.screen.distance_squared(b.projection.screen);
            if d_sq >= link_sq {
                continue;
            }
            let closeness = 1.0 - d_sq.sqrt() / link_distance;
            let alpha = closeness * 0.3 * (a.energy + b.energy) * 0.5;
            target.stroke_line(
                a.projection.screen,
                b.projection.screen,
                0.6,
                a.color.with_alpha(alpha),
            );
        }
    }
}

pub fn draw_effect(target: &mut dyn RenderTarget, effect: &Effect, hue: f32) {
    let fade = effect.fade();
    match &effect.kind {
        EffectKind::EnergyWave(wave) => {
            let radius = wave.speed * effect.age_ms as f32;
            target.stroke_circle(wave.origin, radius, 2.0, Hsla::new(hue, 90.0, 70.0, 0.5 * fade));
        }
        EffectKind::MagneticField(field) => {
            target.stroke_circle(
                field.center,
                field.radius,
                1.0,
                Hsla::new(hue + 40.0, 80.0, 60.0, 0.25 * fade),
            );
        }
        EffectKind::Lightning(bolt) => {
            let color = Hsla::new(hue, 30.0, 90.0, 0.9 * fade);
            for pair in bolt.path.windows(2) {
                target.stroke_line(pair[0], pair[1], 1.5, color);
            }
        }
    }
}

/// Render target that only records calls; useful for headless hosts and tests.
#[derive(Debug, Default)]
pub struct Recorder {
    pub clears: usize,
    pub circles: Vec<(Vec2, f32, Hsla)>,
    pub rings: Vec<(Vec2, f32)>,
    pub lines: Vec<(Vec2, Vec2)>,
}

impl RenderTarget for Recorder {
    fn clear(&mut self, _width: f32, _height: f32) {
        self.clears += 1;
        self.circles.clear();
        self.rings.clear();
        self.lines.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Hsla) {
        self.circles.push((center, radius, color));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, _line_width: f32, _color: Hsla) {
        self.rings.push((center, radius));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, _line_width: f32, _color: Hsla) {
        self.lines.push((from, to));
    }
}
