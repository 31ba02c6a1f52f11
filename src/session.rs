use crate::{
    anim::{AnimationDriver, Oscillator, PlayState},
    core::Viewport,
    error::{ObliqError, ObliqResult},
    model::Plot,
    scene::{Scene, SceneComposer},
};

/// Session facade tying the driver and the composer together.
///
/// A session front-loads validation and all domain-only sampling, then offers
/// cheap per-frame calls. The host's refresh loop is the only scheduler:
///
/// - call [`PlotSession::advance`] once per refresh tick while
///   [`PlotSession::is_playing`] (stop scheduling ticks when it is not;
///   nothing is pending inside the session, so there is nothing to cancel)
/// - call [`PlotSession::resize`] when the surface size changes; the call
///   returns only after every layer is recomposed, so a subsequent
///   [`PlotSession::scene`] never observes a mix of stale and fresh
///   projections
pub struct PlotSession {
    composer: SceneComposer,
    driver: AnimationDriver,
}

impl PlotSession {
    /// Pairs each basis curve with its oscillator and starts playing with the
    /// epoch at `now`.
    pub fn new(plot: Plot, oscillators: Vec<Oscillator>, now: f64) -> ObliqResult<Self> {
        if oscillators.len() != plot.basis.len() {
            return Err(ObliqError::validation(format!(
                "oscillator count {} does not match basis count {}",
                oscillators.len(),
                plot.basis.len()
            )));
        }
        Ok(Self {
            composer: SceneComposer::new(plot)?,
            driver: AnimationDriver::new(oscillators, now)?,
        })
    }

    /// The reference plot with its reference oscillators.
    pub fn reference(now: f64) -> ObliqResult<Self> {
        Self::new(Plot::reference(), Oscillator::reference(), now)
    }

    pub fn plot(&self) -> &Plot {
        self.composer.plot()
    }

    /// The composed frame, or `None` until a first viewport is observed.
    pub fn scene(&self) -> Option<&Scene> {
        self.composer.scene()
    }

    pub fn state(&self) -> PlayState {
        self.driver.state()
    }

    pub fn is_playing(&self) -> bool {
        self.driver.is_playing()
    }

    /// Current coefficient vector, for readout panels.
    pub fn coefficients(&self) -> &[f64] {
        self.driver.coefficients()
    }

    /// Seconds of animated time at clock reading `now`, for readout panels.
    pub fn elapsed(&self, now: f64) -> f64 {
        self.driver.elapsed(now)
    }

    /// Recompute the projection and every layer for a new viewport size.
    pub fn resize(&mut self, viewport: Viewport) {
        self.composer.set_viewport(viewport);
    }

    /// One animation tick: refresh the coefficients from the clock and
    /// recompose the result layer. A no-op while paused.
    pub fn advance(&mut self, now: f64) -> ObliqResult<()> {
        if !self.driver.is_playing() {
            return Ok(());
        }
        let Self { composer, driver } = self;
        composer.set_coefficients(driver.tick(now))
    }

    pub fn pause(&mut self, now: f64) {
        self.driver.pause(now);
    }

    pub fn resume(&mut self, now: f64) {
        self.driver.resume(now);
    }

    /// Re-base the epoch, restore neutral coefficients, and recompose.
    /// Keeps the current play state.
    pub fn reset(&mut self, now: f64) -> ObliqResult<()> {
        self.driver.reset(now);
        let Self { composer, driver } = self;
        composer.set_coefficients(driver.coefficients())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oscillator_count_must_match_the_basis_count() {
        let err = PlotSession::new(Plot::reference(), Oscillator::bank(2), 0.0);
        assert!(err.is_err());
    }

    #[test]
    fn advance_publishes_driver_coefficients_to_the_scene() {
        let mut s = PlotSession::reference(0.0).unwrap();
        s.resize(Viewport::new(800, 400));
        s.advance(2.5).unwrap();

        let expected: Vec<f64> = Oscillator::reference()
            .iter()
            .map(|o| o.value(2.5))
            .collect();
        assert_eq!(s.coefficients(), expected.as_slice());

        // The composed result layer reflects the same coefficients.
        let scene_a = s.scene().unwrap().clone();
        s.advance(2.5).unwrap();
        assert_eq!(s.scene().unwrap(), &scene_a);
        s.advance(4.0).unwrap();
        assert_ne!(s.scene().unwrap(), &scene_a);
    }

    #[test]
    fn advance_is_a_no_op_while_paused() {
        let mut s = PlotSession::reference(0.0).unwrap();
        s.resize(Viewport::new(800, 400));
        s.advance(1.0).unwrap();
        let frozen = s.scene().unwrap().clone();
        let coeffs = s.coefficients().to_vec();

        s.pause(1.0);
        s.advance(50.0).unwrap();
        assert_eq!(s.coefficients(), coeffs.as_slice());
        assert_eq!(s.scene().unwrap(), &frozen);
    }

    #[test]
    fn reset_restores_the_neutral_scene() {
        let mut s = PlotSession::reference(0.0).unwrap();
        s.resize(Viewport::new(800, 400));
        s.advance(3.3).unwrap();
        s.reset(3.3).unwrap();
        assert_eq!(s.coefficients(), &[0.5, 0.5, 0.5]);
        assert_eq!(s.elapsed(3.3), 0.0);
        assert!(s.is_playing());
    }
}
