use glam::{Vec2, Vec3};
use rand::Rng;

use crate::config::Spring;
use crate::effects::Effects;
use crate::math::drift;
use crate::shapes::{Formation, PointTag};

/// Reference frame length; spring coefficients are expressed per 60 Hz frame.
pub const FRAME_MS: f32 = 1000.0 / 60.0;
/// Longest step integrated in one go, in reference frames.
const MAX_FRAME_STEP: f32 = 2.0;
/// Velocity kept (and inverted) when bouncing off a canvas edge.
const EDGE_RESTITUTION: f32 = 0.5;

/// Which formation slot a particle was assigned to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Membership {
    pub formation: Formation,
    /// Index of the formation point or shape vertex.
    pub vertex: usize,
    pub tag: PointTag,
}

/// Pointer state seen by the particles this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerField {
    pub position: Vec2,
    pub radius: f32,
    pub strength: f32,
}

/// Everything a particle needs from the chamber for one step.
pub struct Environment<'a> {
    /// Simulation time in seconds.
    pub time: f32,
    /// Spring used by particles held in a formation.
    pub formation: Spring,
    /// Spring used by idle particles.
    pub ambient: Spring,
    pub energy_target: f32,
    pub min_energy: f32,
    /// Canvas width, height and half depth.
    pub bounds: Vec3,
    pub pointer: Option<PointerField>,
    pub effects: &'a Effects,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub target: Vec3,
    pub size: f32,
    /// Current hue in degrees; eases toward the theme hue plus `hue_offset`.
    pub hue: f32,
    pub hue_offset: f32,
    /// Pulse phase in radians.
    pub phase: f32,
    pub noise_phase: f32,
    pub noise_speed: f32,
    pub energy: f32,
    pub in_formation: bool,
    pub membership: Option<Membership>,
    /// Speed multiplier for the position update.
    pub speed: f32,
    /// Speed the particle returns to when a transition ends.
    pub base_speed: f32,
}

impl Particle {
    pub fn spawn<R: Rng>(position: Vec3, hue: f32, energy: f32, rng: &mut R) -> Self {
        let hue_offset = rng.gen_range(-20.0..20.0);
        Self {
            position,
            velocity: Vec3::ZERO,
            target: position,
            size: rng.gen_range(1.2..2.8),
            hue: hue + hue_offset,
            hue_offset,
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
            noise_phase: rng.gen_range(0.0..100.0),
            noise_speed: rng.gen_range(0.3..0.9),
            energy,
            in_formation: false,
            membership: None,
            speed: 1.0,
            base_speed: 1.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Advance one step of `dt_ms` milliseconds.
    ///
    /// Spring-damper toward the target plus low-frequency drift. A particle
    /// in formation is dominated by its spring; an idle one by drift. A step
    /// that would produce a non-finite state is discarded and the particle
    /// comes to rest where it was. A particle that is already non-finite is
    /// put back on its target (or the canvas centre) at rest.
    pub fn update(&mut self, dt_ms: f32, env: &Environment) {
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        if !self.is_finite() {
            self.recover(env.bounds);
            return;
        }
        let f = (dt_ms / FRAME_MS).min(MAX_FRAME_STEP);
        let spring = if self.in_formation {
            env.formation
        } else {
            env.ambient
        };

        let mut acc = (self.target - self.position) * spring.stiffness
            - self.velocity * spring.damping
            + drift(self.noise_phase, self.noise_speed, env.time) * spring.noise;

        if let Some(pointer) = env.pointer {
            let rel = self.position.truncate() - pointer.position;
            let dist = rel.length();
            if dist < pointer.radius && dist > 1e-3 {
                let push = (1.0 - dist / pointer.radius) * pointer.strength;
                acc += (rel / dist * push).extend(0.0);
            }
        }
        acc += env.effects.acceleration(self.position);

        let velocity = self.velocity + acc * f;
        let position = self.position + velocity * self.speed * f;
        if !(velocity.is_finite() && position.is_finite()) {
            self.velocity = Vec3::ZERO;
            return;
        }
        self.velocity = velocity;
        self.position = position;
        self.reflect(env.bounds);

        self.phase = (self.phase + 0.05 * f) % std::f32::consts::TAU;
        self.energy += (env.energy_target - self.energy) * 0.02 * f;
        self.energy = self.energy.clamp(env.min_energy, 1.0);
    }

    fn recover(&mut self, bounds: Vec3) {
        if !self.position.is_finite() {
            self.position = if self.target.is_finite() {
                self.target
            } else {
                Vec3::new(bounds.x * 0.5, bounds.y * 0.5, 0.0)
            };
        }
        if !self.target.is_finite() {
            self.target = self.position;
        }
        self.velocity = Vec3::ZERO;
    }

    /// Soft reflection: clamp to the canvas box and bounce with damping.
    fn reflect(&mut self, bounds: Vec3) {
        let lo = Vec3::new(0.0, 0.0, -bounds.z);
        let hi = bounds;
        for axis in 0..3 {
            if self.position[axis] < lo[axis] {
                self.position[axis] = lo[axis];
                self.velocity[axis] = self.velocity[axis].abs() * EDGE_RESTITUTION;
            } else if self.position[axis] > hi[axis] {
                self.position[axis] = hi[axis];
                self.velocity[axis] = -self.velocity[axis].abs() * EDGE_RESTITUTION;
            }
        }
    }

    /// Ease the displayed hue toward `theme_hue + hue_offset`.
    pub fn blend_hue(&mut self, theme_hue: f32, rate: f32) {
        let goal = theme_hue + self.hue_offset;
        // shortest way around the colour wheel
        let delta = ((goal - self.hue + 540.0) % 360.0) - 180.0;
        self.hue = (self.hue + delta * rate.clamp(0.0, 1.0)).rem_euclid(360.0);
    }

    /// Distance from the current target.
    pub fn offset(&self) -> f32 {
        self.position.distance(self.target)
    }
}
