//! The holographic chamber: owns the particles, drives formations and
//! transitions, publishes status, and draws through a [`RenderTarget`].
//!
//! Every public control operation degrades instead of failing: bad input is
//! logged with `tracing` and the chamber falls back to a safe formation or
//! leaves its state untouched.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::config::{ChamberConfig, Spring};
use crate::driver::AnimationDriver;
use crate::effects::{Effect, Effects};
use crate::error::{check_dimensions, ChamberError, Result};
use crate::governor::{OptimalSettings, PerformanceGovernor};
use crate::math::{project, rotate_about, Axis};
use crate::particle::{Environment, Membership, Particle, PointerField, FRAME_MS};
use crate::render::{draw_connections, draw_effect, draw_sprite, Hsla, PointVertex, RenderTarget, Sprite};
use crate::rotation::ShapeRotation;
use crate::shapes::{distribute, generate, vertices, Formation, FormationPoint, ShapeKind, ShapePayload};
use crate::status::{StatusHandle, StatusSnapshot};
use crate::theme::{Mode, Theme};
use crate::transition::{HoldOptions, HoldTransition, TransitionPhase};

/// Interval between lightning bolts while thinking.
const LIGHTNING_EVERY_MS: f64 = 900.0;

pub struct HolographicChamber {
    config: ChamberConfig,
    width: f32,
    height: f32,
    particles: Vec<Particle>,
    mode: Mode,
    shape: ShapeKind,
    /// Un-rotated, un-expanded targets of the current formation, one per particle.
    formation_points: Vec<FormationPoint>,
    /// Vertex list of the current mathematical shape, empty for plain formations.
    shape_vertices: Vec<FormationPoint>,
    pointer: Option<Vec2>,
    effects: Effects,
    transition: Option<HoldTransition>,
    hold_angle: f32,
    rotation: Option<ShapeRotation>,
    pending_rotation_ms: Option<f64>,
    roam_expansion: f32,
    stiffness_boost: f32,
    clock_ms: f64,
    epoch_origin_ms: f64,
    last_status_ms: f64,
    next_lightning_ms: f64,
    governor: PerformanceGovernor,
    status: StatusHandle,
    rng: SmallRng,
}

impl HolographicChamber {
    /// Build a chamber for a `width` x `height` canvas.
    pub fn new(width: f32, height: f32, config: ChamberConfig) -> Result<Self> {
        check_dimensions(width, height)?;
        if config.particle_count == 0 {
            return Err(ChamberError::EmptyParticleSet);
        }
        let governor = PerformanceGovernor::new(
            config.governor.clone(),
            config.particle_count,
            config.min_particles,
            config.max_particles,
        );
        let count = governor.optimal_settings().particle_count;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let theme = Mode::Idle.theme();
        let depth = width.min(height) * 0.1;
        let particles = (0..count)
            .map(|_| {
                let position = Vec3::new(
                    rng.gen_range(0.0..width),
                    rng.gen_range(0.0..height),
                    rng.gen_range(-depth..=depth),
                );
                Particle::spawn(position, theme.hue, theme.energy, &mut rng)
            })
            .collect();

        let mut chamber = Self {
            config,
            width,
            height,
            particles,
            mode: Mode::Idle,
            shape: ShapeKind::Scatter,
            formation_points: Vec::new(),
            shape_vertices: Vec::new(),
            pointer: None,
            effects: Effects::default(),
            transition: None,
            hold_angle: 0.0,
            rotation: None,
            pending_rotation_ms: None,
            roam_expansion: 1.0,
            stiffness_boost: 1.0,
            clock_ms: 0.0,
            epoch_origin_ms: 0.0,
            last_status_ms: 0.0,
            next_lightning_ms: 0.0,
            governor,
            status: Rc::new(RefCell::new(StatusSnapshot::default())),
            rng,
        };
        chamber.morph_to(ShapeKind::Scatter);
        chamber.publish_status();
        debug!(width, height, particles = count, "chamber created");
        Ok(chamber)
    }

    // ---------- accessors ----------

    pub fn config(&self) -> &ChamberConfig {
        &self.config
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_formation(&self) -> Formation {
        self.shape.formation()
    }

    pub fn shape(&self) -> &ShapeKind {
        &self.shape
    }

    pub fn shape_vertices(&self) -> &[FormationPoint] {
        &self.shape_vertices
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn roam_expansion(&self) -> f32 {
        self.roam_expansion
    }

    pub fn stiffness_boost(&self) -> f32 {
        self.stiffness_boost
    }

    pub fn transition_phase(&self) -> Option<TransitionPhase> {
        self.transition.map(|t| t.phase_at(self.clock_ms))
    }

    /// True while a formation is being held and spun for presentation.
    pub fn is_holding(&self) -> bool {
        self.transition_phase() == Some(TransitionPhase::Hold)
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation.is_some()
    }

    pub fn optimal_settings(&self) -> OptimalSettings {
        self.governor.optimal_settings()
    }

    pub fn status(&self) -> StatusSnapshot {
        self.status.borrow().clone()
    }

    /// Shared handle to the published status, refreshed every status interval.
    pub fn status_handle(&self) -> StatusHandle {
        Rc::clone(&self.status)
    }

    /// Epoch time (ms) that corresponds to simulation time zero.
    pub fn set_epoch_origin(&mut self, epoch_ms: f64) {
        if epoch_ms.is_finite() {
            self.epoch_origin_ms = epoch_ms;
        }
    }

    fn theme(&self) -> &'static Theme {
        self.mode.theme()
    }

    fn radius(&self) -> f32 {
        self.width.min(self.height) * self.config.radius_ratio
    }

    // ---------- mode & formation control ----------

    /// Switch mode by name. Unknown names are logged and ignored.
    pub fn set_mode(&mut self, name: &str) {
        match name.parse::<Mode>() {
            Ok(mode) => self.set_mode_typed(mode),
            Err(e) => warn!(error = %e, "ignoring mode change"),
        }
    }

    pub fn set_mode_typed(&mut self, mode: Mode) {
        self.mode = mode;
        let theme = mode.theme();
        if theme.formation != self.current_formation() {
            self.morph_to(theme.formation.default_shape());
        }
        let center = self.center();
        self.effects.push(Effect::energy_wave(center, 1.2));
        self.next_lightning_ms = self.clock_ms + LIGHTNING_EVERY_MS;
        debug!(mode = mode.name(), formation = %theme.formation, "mode changed");
        self.publish_status();
    }

    /// Morph to a named formation; unknown names fall back to a sphere.
    pub fn morph_to_formation(&mut self, name: &str) {
        let formation = name.parse::<Formation>().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to sphere");
            Formation::Sphere
        });
        self.morph_to(formation.default_shape());
    }

    /// Recompute every particle's target from `kind`.
    ///
    /// Pre-empts any running hold, rotation or pending rotation and resets
    /// the roam expansion.
    pub fn morph_to(&mut self, kind: ShapeKind) {
        let count = self.particles.len();
        let seed = self.rng.gen();
        let generated = generate(&kind, count, self.width, self.height, self.config.radius_ratio, seed)
            .and_then(finite_points);
        let points = match generated {
            Ok(points) => points,
            Err(e) if kind != ShapeKind::Sphere => {
                warn!(error = %e, formation = %kind.formation(), "falling back to sphere");
                return self.morph_to(ShapeKind::Sphere);
            }
            Err(e) => {
                warn!(error = %e, "formation unavailable, keeping targets");
                return;
            }
        };
        self.cancel_motion();
        self.roam_expansion = 1.0;
        self.shape_vertices.clear();
        debug!(formation = %kind.formation(), particles = count, "morphing");
        self.apply_formation(kind, points);
    }

    /// Morph, then converge fast, hold and spin, and finally release.
    pub fn morph_to_formation_with_hold(&mut self, name: &str, options: HoldOptions) {
        self.morph_to_formation(name);
        self.transition = Some(HoldTransition::new(self.clock_ms, options, self.config.release_ms));
        self.hold_angle = 0.0;
        self.apply_transition_speeds();
    }

    /// Present a shape described by an external payload.
    ///
    /// Malformed payloads present a sphere instead. The shape converges with
    /// boosted speed and starts its presentation rotation after
    /// `rotation_delay_ms` unless something else pre-empts it.
    pub fn create_mathematical_shape(&mut self, payload: &ShapePayload) {
        let kind = ShapeKind::from_payload(payload).unwrap_or_else(|e| {
            warn!(error = %e, "presenting sphere instead");
            ShapeKind::Sphere
        });
        self.present_shape(kind);
    }

    /// JSON form of [`create_mathematical_shape`](Self::create_mathematical_shape).
    pub fn create_mathematical_shape_json(&mut self, json: &str) {
        let kind = ShapeKind::from_json(json).unwrap_or_else(|e| {
            warn!(error = %e, "presenting sphere instead");
            ShapeKind::Sphere
        });
        self.present_shape(kind);
    }

    pub fn present_shape(&mut self, kind: ShapeKind) {
        let ratio = self.config.radius_ratio;
        let (kind, verts) = match vertices(&kind, self.width, self.height, ratio).and_then(finite_points) {
            Ok(v) => (kind, v),
            Err(e) => {
                warn!(error = %e, "presenting sphere instead");
                match vertices(&ShapeKind::Sphere, self.width, self.height, ratio) {
                    Ok(v) => (ShapeKind::Sphere, v),
                    Err(_) => return,
                }
            }
        };
        let points = match distribute(&verts, self.particles.len(), self.config.jitter, &mut self.rng) {
            Ok(points) => points,
            Err(e) => {
                warn!(error = %e, "shape has no vertices");
                return;
            }
        };
        self.cancel_motion();
        self.roam_expansion = 1.0;
        debug!(formation = %kind.formation(), vertices = verts.len(), "presenting shape");
        self.apply_formation(kind, points);
        self.shape_vertices = verts;
        let boost = self.config.converge_speed;
        for p in self.particles.iter_mut() {
            p.speed = p.base_speed * boost;
        }
        self.pending_rotation_ms = Some(self.clock_ms + self.config.rotation_delay_ms);
    }

    /// Spin the in-formation particles 720 degrees, then restore their targets.
    pub fn start_shape_rotation(&mut self) {
        self.pending_rotation_ms = None;
        let originals: Vec<(usize, Vec3)> = self
            .particles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.in_formation)
            .map(|(i, p)| (i, p.target))
            .collect();
        if originals.is_empty() {
            warn!("no formation to rotate");
            return;
        }
        let axis = if self.current_formation().is_helical() {
            Axis::Vertical
        } else {
            Axis::Horizontal
        };
        for p in self.particles.iter_mut() {
            p.speed = p.base_speed;
        }
        debug!(?axis, particles = originals.len(), "shape rotation started");
        self.rotation = Some(ShapeRotation::new(
            self.clock_ms,
            self.config.rotation_ms,
            axis,
            self.center(),
            originals,
        ));
    }

    fn cancel_motion(&mut self) {
        self.transition = None;
        self.rotation = None;
        self.pending_rotation_ms = None;
        self.hold_angle = 0.0;
        for p in self.particles.iter_mut() {
            p.speed = p.base_speed;
        }
    }

    fn apply_formation(&mut self, kind: ShapeKind, points: Vec<FormationPoint>) {
        let formation = kind.formation();
        let in_formation = formation != Formation::Scatter;
        for (p, point) in self.particles.iter_mut().zip(points.iter()) {
            p.target = point.position;
            p.in_formation = in_formation;
            p.membership = Some(Membership {
                formation,
                vertex: point.vertex,
                tag: point.tag,
            });
        }
        self.shape = kind;
        self.formation_points = points;
    }

    // ---------- host events ----------

    /// Rescale the canvas; positions and targets scale by the size ratio.
    /// A zero or invalid size is ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if let Err(e) = check_dimensions(width, height) {
            warn!(error = %e, "ignoring resize");
            return;
        }
        let sx = width / self.width;
        let sy = height / self.height;
        let scale = Vec3::new(sx, sy, 1.0);
        for p in self.particles.iter_mut() {
            p.position *= scale;
            p.target *= scale;
        }
        for fp in self.formation_points.iter_mut().chain(self.shape_vertices.iter_mut()) {
            fp.position *= scale;
        }
        if let Some(rotation) = self.rotation.as_mut() {
            rotation.rescale(scale);
        }
        self.effects.rescale(sx, sy);
        if let Some(pointer) = self.pointer.as_mut() {
            *pointer *= Vec2::new(sx, sy);
        }
        self.width = width;
        self.height = height;
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.pointer = Some(Vec2::new(x, y));
        }
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer = None;
    }

    pub fn spawn_energy_wave(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.effects.push(Effect::energy_wave(Vec2::new(x, y), 1.2));
        }
    }

    pub fn spawn_magnetic_field(&mut self, x: f32, y: f32, strength: f32) {
        if x.is_finite() && y.is_finite() && strength.is_finite() {
            let radius = self.radius() * 0.8;
            self.effects
                .push(Effect::magnetic_field(Vec2::new(x, y), strength, radius));
        }
    }

    pub fn spawn_lightning(&mut self, from: Vec2, to: Vec2) {
        if from.is_finite() && to.is_finite() {
            let bolt = Effect::lightning(from, to, 8, &mut self.rng);
            self.effects.push(bolt);
        }
    }

    // ---------- self check & status ----------

    /// Coherence and mean energy of the particle set.
    ///
    /// Coherence is 1.0 when no particle is in formation.
    pub fn measure(&self) -> (f32, f32) {
        let threshold = self.config.coherence_threshold;
        let (mut held, mut settled) = (0usize, 0usize);
        let mut energy = 0.0;
        for p in &self.particles {
            energy += p.energy;
            if p.in_formation {
                held += 1;
                if p.offset() <= threshold {
                    settled += 1;
                }
            }
        }
        let coherence = if held == 0 {
            1.0
        } else {
            settled as f32 / held as f32
        };
        let energy = if self.particles.is_empty() {
            0.0
        } else {
            energy / self.particles.len() as f32
        };
        (coherence, energy)
    }

    /// Periodic self check: stiffen springs when the formation is loose,
    /// floor energy when it sags, then publish the status snapshot.
    pub fn maintain_cognitive_connection(&mut self) -> StatusSnapshot {
        let (coherence, energy) = self.measure();
        if coherence < self.config.low_coherence {
            self.stiffness_boost = (self.stiffness_boost * 1.1).min(self.config.max_stiffness_boost);
            debug!(coherence, boost = self.stiffness_boost, "formation loose, stiffening");
        } else {
            self.stiffness_boost = (self.stiffness_boost * 0.95).max(1.0);
        }
        if energy < self.config.energy_floor {
            let floor = self.config.energy_floor;
            for p in self.particles.iter_mut() {
                p.energy = p.energy.max(floor);
            }
        }
        self.publish_status()
    }

    fn publish_status(&mut self) -> StatusSnapshot {
        let (coherence, energy) = self.measure();
        let snapshot = StatusSnapshot {
            coherence,
            energy,
            mode: self.mode.name().to_string(),
            formation: self.current_formation().name().to_string(),
            timestamp: self.epoch_origin_ms + self.clock_ms,
        };
        *self.status.borrow_mut() = snapshot.clone();
        self.last_status_ms = self.clock_ms;
        snapshot
    }

    /// Apply the governor's particle count, rebuilding the set if it changed.
    ///
    /// The rebuilt set keeps the formation, its released state and any
    /// running or pending shape rotation.
    fn apply_governor(&mut self) {
        let wanted = self.governor.optimal_settings().particle_count;
        if wanted == self.particles.len() || wanted == 0 {
            return;
        }
        let released = self.shape != ShapeKind::Scatter && !self.particles.iter().any(|p| p.in_formation);
        let theme = self.theme();
        let (w, h) = (self.width, self.height);
        let depth = w.min(h) * 0.1;
        if wanted < self.particles.len() {
            self.particles.truncate(wanted);
        } else {
            while self.particles.len() < wanted {
                let position = Vec3::new(
                    self.rng.gen_range(0.0..w),
                    self.rng.gen_range(0.0..h),
                    self.rng.gen_range(-depth..=depth),
                );
                let p = Particle::spawn(position, theme.hue, theme.energy, &mut self.rng);
                self.particles.push(p);
            }
        }
        debug!(particles = wanted, released, "particle set rebuilt");

        let kind = self.shape.clone();
        let points = if self.shape_vertices.is_empty() {
            let seed = self.rng.gen();
            generate(&kind, wanted, w, h, self.config.radius_ratio, seed)
        } else {
            distribute(&self.shape_vertices, wanted, self.config.jitter, &mut self.rng)
        };
        let points = match points {
            Ok(points) => points,
            Err(e) => {
                warn!(error = %e, "could not retarget rebuilt particle set");
                self.rotation = None;
                return;
            }
        };
        self.apply_formation(kind, points);
        if released {
            for p in self.particles.iter_mut() {
                p.in_formation = false;
            }
        }
        self.apply_transition_speeds();

        // rotation originals index the old set; restart it on the new one
        // at the same progress
        if let Some(old) = self.rotation.take() {
            let originals: Vec<(usize, Vec3)> = self
                .particles
                .iter()
                .enumerate()
                .filter(|(_, p)| p.in_formation)
                .map(|(i, p)| (i, p.target))
                .collect();
            if !originals.is_empty() {
                self.rotation = Some(ShapeRotation { originals, ..old });
            }
        }
    }

    // ---------- per-frame stages ----------

    fn apply_transition_speeds(&mut self) {
        let Some(t) = self.transition else { return };
        let factor = match t.phase_at(self.clock_ms) {
            TransitionPhase::Converge => self.config.converge_speed,
            TransitionPhase::Hold => self.config.hold_speed,
            TransitionPhase::Release | TransitionPhase::Done => 1.0,
        };
        for p in self.particles.iter_mut() {
            p.speed = p.base_speed * factor;
        }
    }

    fn advance_transition(&mut self, dt_ms: f64) {
        let Some(t) = self.transition else { return };
        let phase = t.phase_at(self.clock_ms);
        self.apply_transition_speeds();
        match phase {
            TransitionPhase::Converge | TransitionPhase::Release => {}
            TransitionPhase::Hold => {
                self.hold_angle += self.config.hold_spin * (dt_ms / 1000.0) as f32;
                let center = self.center();
                let angle = self.hold_angle;
                for (p, fp) in self.particles.iter_mut().zip(self.formation_points.iter()) {
                    if p.in_formation {
                        p.target = rotate_about(fp.position, center, Axis::Vertical, angle);
                    }
                }
            }
            TransitionPhase::Done => {
                self.transition = None;
                for p in self.particles.iter_mut() {
                    p.in_formation = false;
                }
                debug!("hold transition released");
            }
        }
    }

    fn advance_rotation(&mut self) {
        if let Some(at) = self.pending_rotation_ms {
            if self.clock_ms >= at {
                self.start_shape_rotation();
            }
        }
        let Some(rotation) = self.rotation.as_ref() else { return };
        for (i, target) in rotation.targets_at(self.clock_ms) {
            if let Some(p) = self.particles.get_mut(i) {
                p.target = target;
            }
        }
        if rotation.is_finished(self.clock_ms) {
            debug!("shape rotation finished");
            self.rotation = None;
        }
    }

    /// Widen idle drift while nothing is presented.
    fn advance_roam(&mut self, dt_ms: f64) {
        if self.shape != ShapeKind::Scatter || self.transition.is_some() {
            return;
        }
        let grown = self.roam_expansion + self.config.roam_rate * (dt_ms / 1000.0) as f32;
        self.roam_expansion = grown.min(self.config.max_roam);
        let center = self.center().extend(0.0);
        let roam = self.roam_expansion;
        for (p, fp) in self.particles.iter_mut().zip(self.formation_points.iter()) {
            p.target = center + (fp.position - center) * roam;
        }
    }

    fn advance_effects(&mut self, dt_ms: f64) {
        self.effects.advance(dt_ms);
        if self.mode != Mode::Thinking || self.particles.len() < 2 {
            return;
        }
        if self.clock_ms >= self.next_lightning_ms {
            self.next_lightning_ms = self.clock_ms + LIGHTNING_EVERY_MS;
            let n = self.particles.len();
            let a = self.particles[self.rng.gen_range(0..n)].position.truncate();
            let b = self.particles[self.rng.gen_range(0..n)].position.truncate();
            self.spawn_lightning(a, b);
        }
    }

    /// Spring for in-formation particles at the current transition phase.
    fn formation_spring(&self) -> Spring {
        let boosted = Spring {
            stiffness: self.config.formation_spring.stiffness * self.stiffness_boost,
            ..self.config.formation_spring
        };
        match self.transition {
            Some(t) => match t.phase_at(self.clock_ms) {
                TransitionPhase::Converge => boosted,
                TransitionPhase::Hold => self.config.hold_spring,
                TransitionPhase::Release | TransitionPhase::Done => self
                    .config
                    .hold_spring
                    .lerp(&self.config.ambient_spring, t.release_progress(self.clock_ms)),
            },
            None => boosted,
        }
    }

    fn update_particles(&mut self, dt_ms: f64) {
        let theme = self.theme();
        let formation = self.formation_spring();
        let pointer = self.pointer.map(|position| PointerField {
            position,
            radius: self.config.pointer_radius,
            strength: self.config.pointer_strength,
        });
        let env = Environment {
            time: (self.clock_ms / 1000.0) as f32,
            formation,
            ambient: self.config.ambient_spring,
            energy_target: theme.energy,
            min_energy: self.config.min_energy,
            bounds: Vec3::new(self.width, self.height, self.width.min(self.height) * 0.5),
            pointer,
            effects: &self.effects,
        };
        let dt = dt_ms as f32;
        let hue_rate = 0.03 * dt / FRAME_MS;
        for p in self.particles.iter_mut() {
            p.update(dt, &env);
            p.blend_hue(theme.hue, hue_rate);
        }
    }

    // ---------- drawing ----------

    fn sprite(&self, p: &Particle, theme: &Theme) -> Option<Sprite> {
        if !p.is_finite() {
            return None;
        }
        let projection = project(p.position, self.center(), self.config.focal_length)?;
        let pulse = 0.75 + 0.25 * p.phase.sin();
        let alpha = (0.35 + 0.65 * p.energy) * pulse;
        Some(Sprite {
            projection,
            size: p.size,
            color: Hsla::new(p.hue, theme.saturation, theme.lightness, alpha),
            energy: p.energy,
        })
    }

    /// Pack every drawable particle into `out` (cleared first).
    pub fn pack_vertices(&self, out: &mut Vec<PointVertex>) {
        out.clear();
        let theme = self.theme();
        out.extend(
            self.particles
                .iter()
                .filter_map(|p| self.sprite(p, theme))
                .map(|s| s.vertex()),
        );
    }
}

fn finite_points(points: Vec<FormationPoint>) -> Result<Vec<FormationPoint>> {
    if points.iter().all(|p| p.position.is_finite()) {
        Ok(points)
    } else {
        Err(ChamberError::MalformedShape("shape produced non-finite points".into()))
    }
}

impl AnimationDriver for HolographicChamber {
    fn tick(&mut self, dt_ms: f64) {
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        self.clock_ms += dt_ms;
        self.governor.record_frame_time(dt_ms as f32);

        self.advance_transition(dt_ms);
        self.advance_rotation();
        self.advance_roam(dt_ms);
        self.advance_effects(dt_ms);
        self.update_particles(dt_ms);

        if self.clock_ms - self.last_status_ms >= self.config.status_interval_ms {
            self.maintain_cognitive_connection();
            self.apply_governor();
        }
    }

    fn render(&self, target: &mut dyn RenderTarget) {
        target.clear(self.width, self.height);
        let theme = self.theme();
        for effect in self.effects.iter() {
            draw_effect(target, effect, theme.hue);
        }
        let settings = self.governor.optimal_settings();
        let sprites: Vec<Option<Sprite>> = self
            .particles
            .iter()
            .map(|p| self.sprite(p, theme))
            .collect();
        draw_connections(target, &sprites, settings.stride, self.config.link_distance);
        for sprite in sprites.iter().flatten() {
            draw_sprite(target, sprite, settings.glow_intensity);
        }
    }
}
