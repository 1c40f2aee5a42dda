//! Hold-then-release formation transition.
//!
//! A morph with hold runs through three timed phases on the simulation
//! clock: converge (boosted speed toward the new targets), hold (slow rigid
//! spin of the whole formation, reduced speed) and release (speed back to
//! baseline, formation spring eases into ambient drift). Timers are clock
//! deltas, never frame counts.

/// Durations of a hold transition in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoldOptions {
    /// Time spent converging before the hold starts.
    pub hold_ms: f64,
    /// Length of the held, rotating presentation.
    pub post_drift_ms: f64,
}

impl Default for HoldOptions {
    fn default() -> Self {
        Self {
            hold_ms: 1200.0,
            post_drift_ms: 3000.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    Converge,
    Hold,
    Release,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoldTransition {
    pub started_ms: f64,
    pub options: HoldOptions,
    pub release_ms: f64,
}

impl HoldTransition {
    pub fn new(started_ms: f64, options: HoldOptions, release_ms: f64) -> Self {
        let sane = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            started_ms,
            options: HoldOptions {
                hold_ms: sane(options.hold_ms),
                post_drift_ms: sane(options.post_drift_ms),
            },
            release_ms: sane(release_ms),
        }
    }

    fn hold_start(&self) -> f64 {
        self.started_ms + self.options.hold_ms
    }

    fn release_start(&self) -> f64 {
        self.hold_start() + self.options.post_drift_ms
    }

    pub fn phase_at(&self, now_ms: f64) -> TransitionPhase {
        if now_ms < self.hold_start() {
            TransitionPhase::Converge
        } else if now_ms < self.release_start() {
            TransitionPhase::Hold
        } else if now_ms < self.release_start() + self.release_ms {
            TransitionPhase::Release
        } else {
            TransitionPhase::Done
        }
    }

    /// Progress through the release phase in [0,1].
    pub fn release_progress(&self, now_ms: f64) -> f32 {
        if self.release_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.release_start()) / self.release_ms).clamp(0.0, 1.0) as f32
    }
}
