use crate::render::RenderTarget;

/// Frame-driven scheduling seam.
///
/// The host calls [`frame`](AnimationDriver::frame) once per display
/// refresh. Every particle is updated before any is drawn, so a render never
/// sees a half-updated set.
pub trait AnimationDriver {
    /// Advance the simulation clock by `dt_ms` and update every particle.
    fn tick(&mut self, dt_ms: f64);

    /// Draw the current state.
    fn render(&self, target: &mut dyn RenderTarget);

    fn frame(&mut self, dt_ms: f64, target: &mut dyn RenderTarget) {
        self.tick(dt_ms);
        self.render(target);
    }
}
