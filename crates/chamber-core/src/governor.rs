use std::collections::VecDeque;

use crate::config::GovernorConfig;

/// Render settings recommended by the governor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptimalSettings {
    pub particle_count: usize,
    /// Only every `stride`-th particle takes part in connection lines.
    pub stride: usize,
    /// Halo strength in [min_glow, 1].
    pub glow_intensity: f32,
}

/// Adaptive performance governor.
///
/// Watches frame times over a rolling window and trades particle count,
/// connection stride and glow for frame rate. Detail is cut after a short
/// run of over-budget frames and restored only after a much longer run of
/// comfortable ones, so it does not oscillate. Best effort, cosmetic only.
pub struct PerformanceGovernor {
    pub config: GovernorConfig,
    min_particles: usize,
    max_particles: usize,
    samples: VecDeque<f32>,
    settings: OptimalSettings,
    /// Consecutive samples with the smoothed frame time over budget.
    frames_over_budget: u32,
    /// Consecutive samples comfortably under budget.
    frames_under_budget: u32,
}

impl PerformanceGovernor {
    pub fn new(config: GovernorConfig, baseline: usize, min_particles: usize, max_particles: usize) -> Self {
        let min_particles = min_particles.max(1);
        let max_particles = max_particles.max(min_particles);
        Self {
            samples: VecDeque::with_capacity(config.window.max(1)),
            config,
            min_particles,
            max_particles,
            settings: OptimalSettings {
                particle_count: baseline.clamp(min_particles, max_particles),
                stride: 1,
                glow_intensity: 1.0,
            },
            frames_over_budget: 0,
            frames_under_budget: 0,
        }
    }

    /// Frame budget in milliseconds.
    pub fn budget_ms(&self) -> f32 {
        1000.0 / self.config.target_fps.max(1.0)
    }

    /// Mean and standard deviation of the rolling window.
    pub fn stats(&self) -> (f32, f32) {
        if self.samples.is_empty() {
            return (0.0, 0.0);
        }
        let n = self.samples.len() as f32;
        let mean = self.samples.iter().sum::<f32>() / n;
        let var = self.samples.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / n;
        (mean, var.sqrt())
    }

    /// Feed the latest frame time.
    pub fn record_frame_time(&mut self, ms: f32) {
        if !self.config.enabled || !ms.is_finite() || ms < 0.0 {
            return;
        }
        if self.samples.len() >= self.config.window.max(1) {
            self.samples.pop_front();
        }
        self.samples.push_back(ms);

        let (mean, std_dev) = self.stats();
        // jittery frames count against the budget too
        let load = mean + std_dev * 0.5;
        let budget = self.budget_ms();

        if load > budget {
            self.frames_under_budget = 0;
            self.frames_over_budget += 1;
            if self.frames_over_budget >= self.config.over_budget_frames {
                self.frames_over_budget = 0;
                self.reduce();
            }
        } else if load < budget * self.config.comfort_ratio {
            self.frames_over_budget = 0;
            self.frames_under_budget += 1;
            if self.frames_under_budget >= self.config.under_budget_frames {
                self.frames_under_budget = 0;
                self.restore();
            }
        } else {
            self.frames_over_budget = 0;
            self.frames_under_budget = 0;
        }
    }

    fn reduce(&mut self) {
        let s = &mut self.settings;
        let reduced = (s.particle_count as f32 * self.config.decrease_factor).floor() as usize;
        s.particle_count = reduced.clamp(self.min_particles, self.max_particles);
        s.stride = (s.stride + 1).min(self.config.max_stride.max(1));
        s.glow_intensity = (s.glow_intensity - 0.2).max(self.config.min_glow);
        tracing::info!(
            particle_count = s.particle_count,
            stride = s.stride,
            glow = s.glow_intensity,
            "frame budget exceeded, reducing detail"
        );
    }

    fn restore(&mut self) {
        let s = &mut self.settings;
        let grown = (s.particle_count as f32 * self.config.increase_factor).ceil() as usize;
        s.particle_count = grown.clamp(self.min_particles, self.max_particles);
        s.stride = s.stride.saturating_sub(1).max(1);
        s.glow_intensity = (s.glow_intensity + 0.1).min(1.0);
        tracing::info!(
            particle_count = s.particle_count,
            stride = s.stride,
            glow = s.glow_intensity,
            "frame budget comfortable, restoring detail"
        );
    }

    pub fn optimal_settings(&self) -> OptimalSettings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn governor() -> PerformanceGovernor {
        PerformanceGovernor::new(GovernorConfig::default(), 150, 40, 300)
    }

    #[test]
    fn test_governor_reduces_on_sustained_slow_frames() {
        let mut g = governor();
        for _ in 0..30 {
            g.record_frame_time(30.0);
        }
        let s = g.optimal_settings();
        assert!(s.particle_count < 150, "count should drop: {}", s.particle_count);
        assert!(s.stride > 1);
        assert!(s.glow_intensity < 1.0);
    }

    #[test]
    fn test_governor_ignores_short_spike() {
        let mut g = governor();
        for _ in 0..60 {
            g.record_frame_time(16.0);
        }
        g.record_frame_time(60.0);
        for _ in 0..50 {
            g.record_frame_time(16.0);
        }
        assert_eq!(g.optimal_settings().particle_count, 150);
    }

    #[test]
    fn test_governor_restores_slowly_and_respects_max() {
        let mut g = governor();
        for _ in 0..89 {
            g.record_frame_time(8.0);
        }
        assert_eq!(g.optimal_settings().particle_count, 150, "restore needs a longer run");
        g.record_frame_time(8.0);
        assert!(g.optimal_settings().particle_count > 150);
        for _ in 0..10_000 {
            g.record_frame_time(8.0);
        }
        assert_eq!(g.optimal_settings().particle_count, 300);
    }

    #[test]
    fn test_governor_never_below_minimum() {
        let mut g = governor();
        for _ in 0..5_000 {
            g.record_frame_time(100.0);
        }
        let s = g.optimal_settings();
        assert_eq!(s.particle_count, 40);
        assert_eq!(s.stride, 4);
        assert!((s.glow_intensity - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_governor_disabled_keeps_baseline() {
        let mut config = GovernorConfig::default();
        config.enabled = false;
        let mut g = PerformanceGovernor::new(config, 150, 40, 300);
        for _ in 0..100 {
            g.record_frame_time(100.0);
        }
        assert_eq!(g.optimal_settings().particle_count, 150);
    }
}
