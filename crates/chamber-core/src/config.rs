use serde::Deserialize;

/// Spring-damper coefficients applied per 60 Hz frame.
///
/// Fields missing from a JSON spring take the formation spring's values.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Spring {
    /// Pull toward target, fraction of the offset per frame.
    pub stiffness: f32,
    /// Fraction of velocity removed per frame.
    pub damping: f32,
    /// Amplitude of the organic drift acceleration in px/frame².
    pub noise: f32,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            stiffness: 0.05,
            damping: 0.22,
            noise: 0.02,
        }
    }
}

impl Spring {
    pub fn lerp(&self, other: &Spring, t: f32) -> Spring {
        let t = t.clamp(0.0, 1.0);
        Spring {
            stiffness: self.stiffness + (other.stiffness - self.stiffness) * t,
            damping: self.damping + (other.damping - self.damping) * t,
            noise: self.noise + (other.noise - self.noise) * t,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    pub enabled: bool,
    pub target_fps: f32,
    /// Rolling window length in samples.
    pub window: usize,
    /// Consecutive over-budget samples before reducing detail.
    pub over_budget_frames: u32,
    /// Consecutive comfortable samples before restoring detail.
    pub under_budget_frames: u32,
    /// "Comfortably under" means below `budget * comfort_ratio`.
    pub comfort_ratio: f32,
    pub decrease_factor: f32,
    pub increase_factor: f32,
    pub max_stride: usize,
    pub min_glow: f32,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_fps: 45.0,
            window: 60,
            over_budget_frames: 20,
            under_budget_frames: 90,
            comfort_ratio: 0.6,
            decrease_factor: 0.85,
            increase_factor: 1.1,
            max_stride: 4,
            min_glow: 0.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChamberConfig {
    pub particle_count: usize,
    pub min_particles: usize,
    pub max_particles: usize,
    pub seed: u64,
    /// Formation radius as a fraction of the shorter canvas side.
    pub radius_ratio: f32,
    pub formation_spring: Spring,
    pub hold_spring: Spring,
    pub ambient_spring: Spring,
    /// Per-particle speed multiplier while converging on a formation.
    pub converge_speed: f32,
    /// Per-particle speed multiplier while a formation is held.
    pub hold_speed: f32,
    /// Angular speed of the held formation in rad/s.
    pub hold_spin: f32,
    /// Time taken to blend from the hold spring back to ambient drift.
    pub release_ms: f64,
    pub rotation_ms: f64,
    /// Delay between a mathematical shape appearing and its rotation.
    pub rotation_delay_ms: f64,
    pub status_interval_ms: f64,
    /// Distance under which an in-formation particle counts as settled.
    pub coherence_threshold: f32,
    pub low_coherence: f32,
    pub max_stiffness_boost: f32,
    pub min_energy: f32,
    pub energy_floor: f32,
    /// Roam expansion growth per second while idle.
    pub roam_rate: f32,
    pub max_roam: f32,
    pub pointer_radius: f32,
    pub pointer_strength: f32,
    pub link_distance: f32,
    pub focal_length: f32,
    pub jitter: f32,
    pub governor: GovernorConfig,
}

impl Default for ChamberConfig {
    fn default() -> Self {
        Self {
            particle_count: 150,
            min_particles: 40,
            max_particles: 300,
            seed: 0x5eed_c0de,
            radius_ratio: 0.3,
            formation_spring: Spring::default(),
            hold_spring: Spring {
                stiffness: 0.05,
                damping: 0.35,
                noise: 0.01,
            },
            ambient_spring: Spring {
                stiffness: 0.002,
                damping: 0.04,
                noise: 0.12,
            },
            converge_speed: 2.0,
            hold_speed: 0.5,
            hold_spin: 0.35,
            release_ms: 1500.0,
            rotation_ms: 7000.0,
            rotation_delay_ms: 2000.0,
            status_interval_ms: 1000.0,
            coherence_threshold: 20.0,
            low_coherence: 0.5,
            max_stiffness_boost: 2.0,
            min_energy: 0.1,
            energy_floor: 0.3,
            roam_rate: 0.02,
            max_roam: 1.6,
            pointer_radius: 90.0,
            pointer_strength: 0.6,
            link_distance: 70.0,
            focal_length: 600.0,
            jitter: 4.0,
            governor: GovernorConfig::default(),
        }
    }
}

impl ChamberConfig {
    /// Parse a partial JSON config; missing fields keep their defaults.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
