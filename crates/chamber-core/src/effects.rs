//! Transient visual effects: magnetic fields, energy waves and lightning.
//!
//! Effects are independent of the current formation. Each one ages with the
//! simulation clock and is dropped by [`Effects::advance`] once its lifetime
//! is over, so callers never clean them up.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::math::smoothstep;

/// Swirling field around a point: tangential push with a weak pull inward.
#[derive(Clone, Debug, PartialEq)]
pub struct MagneticField {
    pub center: Vec2,
    pub strength: f32,
    pub radius: f32,
}

/// Expanding ring that pushes particles outward as it passes.
#[derive(Clone, Debug, PartialEq)]
pub struct EnergyWave {
    pub origin: Vec2,
    /// Ring growth in px/ms.
    pub speed: f32,
    pub thickness: f32,
    pub strength: f32,
}

/// Jagged bolt between two points. Purely visual.
#[derive(Clone, Debug, PartialEq)]
pub struct Lightning {
    pub path: Vec<Vec2>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EffectKind {
    MagneticField(MagneticField),
    EnergyWave(EnergyWave),
    Lightning(Lightning),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub age_ms: f64,
    pub lifetime_ms: f64,
}

impl Effect {
    pub fn magnetic_field(center: Vec2, strength: f32, radius: f32) -> Self {
        Self {
            kind: EffectKind::MagneticField(MagneticField {
                center,
                strength,
                radius,
            }),
            age_ms: 0.0,
            lifetime_ms: 3000.0,
        }
    }

    pub fn energy_wave(origin: Vec2, strength: f32) -> Self {
        Self {
            kind: EffectKind::EnergyWave(EnergyWave {
                origin,
                speed: 0.4,
                thickness: 30.0,
                strength,
            }),
            age_ms: 0.0,
            lifetime_ms: 1500.0,
        }
    }

    /// A bolt from `from` to `to` with `segments` randomly displaced joints.
    pub fn lightning<R: Rng>(from: Vec2, to: Vec2, segments: usize, rng: &mut R) -> Self {
        let segments = segments.max(1);
        let span = to - from;
        let normal = span.perp().normalize_or_zero();
        let sway = span.length() * 0.12;
        let path = (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                let p = from + span * t;
                if i == 0 || i == segments {
                    p
                } else {
                    p + normal * rng.gen_range(-sway..=sway)
                }
            })
            .collect();
        Self {
            kind: EffectKind::Lightning(Lightning { path }),
            age_ms: 0.0,
            lifetime_ms: 250.0,
        }
    }

    /// Remaining intensity in [0,1]: 1 when spawned, 0 at end of life.
    pub fn fade(&self) -> f32 {
        if self.lifetime_ms <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age_ms / self.lifetime_ms).clamp(0.0, 1.0) as f32
    }

    pub fn is_expired(&self) -> bool {
        self.age_ms >= self.lifetime_ms
    }

    /// Current radius of an energy wave ring.
    pub fn wave_radius(&self) -> Option<f32> {
        match &self.kind {
            EffectKind::EnergyWave(w) => Some(w.speed * self.age_ms as f32),
            _ => None,
        }
    }

    /// Acceleration this effect applies to a particle at `pos`, px/frame².
    pub fn acceleration(&self, pos: Vec3) -> Vec3 {
        let fade = self.fade();
        match &self.kind {
            EffectKind::MagneticField(field) => {
                let rel = pos.truncate() - field.center;
                let dist = rel.length();
                if dist >= field.radius || dist < 1e-3 {
                    return Vec3::ZERO;
                }
                let falloff = 1.0 - dist / field.radius;
                let dir = rel / dist;
                let swirl = dir.perp() * field.strength;
                let pull = -dir * field.strength * 0.3;
                ((swirl + pull) * falloff * fade).extend(0.0)
            }
            EffectKind::EnergyWave(wave) => {
                let ring = wave.speed * self.age_ms as f32;
                let rel = pos.truncate() - wave.origin;
                let dist = rel.length();
                let band = (dist - ring).abs();
                if band >= wave.thickness || dist < 1e-3 {
                    return Vec3::ZERO;
                }
                let push = smoothstep(wave.thickness, 0.0, band);
                (rel / dist * wave.strength * push * fade).extend(0.0)
            }
            EffectKind::Lightning(_) => Vec3::ZERO,
        }
    }
}

/// The set of live effects owned by a chamber.
#[derive(Clone, Debug, Default)]
pub struct Effects {
    list: Vec<Effect>,
}

impl Effects {
    pub fn push(&mut self, effect: Effect) {
        self.list.push(effect);
    }

    /// Age every effect by `dt_ms` and drop the expired ones.
    pub fn advance(&mut self, dt_ms: f64) {
        for e in self.list.iter_mut() {
            e.age_ms += dt_ms;
        }
        self.list.retain(|e| !e.is_expired());
    }

    /// Summed acceleration from all effects at `pos`.
    pub fn acceleration(&self, pos: Vec3) -> Vec3 {
        self.list.iter().map(|e| e.acceleration(pos)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Scale every effect's geometry after a canvas resize.
    pub fn rescale(&mut self, sx: f32, sy: f32) {
        let scale = Vec2::new(sx, sy);
        for e in self.list.iter_mut() {
            match &mut e.kind {
                EffectKind::MagneticField(f) => f.center *= scale,
                EffectKind::EnergyWave(w) => w.origin *= scale,
                EffectKind::Lightning(l) => {
                    for p in l.path.iter_mut() {
                        *p *= scale;
                    }
                }
            }
        }
    }
}
