use crate::error::{ObliqError, ObliqResult};

/// Midpoint of the oscillation band; also the value every coefficient takes
/// after construction and after a reset.
pub const NEUTRAL_COEFFICIENT: f64 = 0.5;

/// Half-width of the oscillation band around the neutral midpoint.
const SWING: f64 = 0.3;

/// One per-basis coefficient source: `0.5 + 0.3 * sin(freq * t + phase)`.
///
/// Under the reference frequencies the coefficients stay in `[0.2, 0.8]`,
/// though nothing downstream clamps them.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Oscillator {
    /// Angular frequency in rad/s.
    pub freq: f64,
    /// Phase offset in radians.
    pub phase: f64,
}

impl Oscillator {
    pub fn new(freq: f64, phase: f64) -> Self {
        Self { freq, phase }
    }

    pub fn value(&self, elapsed_secs: f64) -> f64 {
        NEUTRAL_COEFFICIENT + SWING * (self.freq * elapsed_secs + self.phase).sin()
    }

    /// The three reference (freq, phase) pairs.
    pub fn reference() -> Vec<Self> {
        Self::bank(3)
    }

    /// `n` oscillators cycling the reference frequencies, phases spread 2 rad
    /// apart. `bank(3)` is exactly the reference configuration.
    pub fn bank(n: usize) -> Vec<Self> {
        const FREQS: [f64; 3] = [0.5, 0.7, 0.3];
        (0..n)
            .map(|i| Self::new(FREQS[i % FREQS.len()], 2.0 * i as f64))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlayState {
    Playing,
    Paused,
}

/// Owns the clock bookkeeping and derives the coefficient vector from
/// elapsed time.
///
/// The driver schedules nothing itself. Clock readings are monotonic seconds
/// supplied by the host (its refresh callback, a test harness, anything);
/// the host calls [`AnimationDriver::tick`] once per refresh while
/// [`AnimationDriver::is_playing`] and simply stops scheduling ticks when it
/// is not. Construction starts `Playing` with the epoch at `now`.
///
/// Resuming re-bases the epoch to the elapsed time frozen at pause, so the
/// oscillation continues exactly where it stopped instead of jumping by the
/// paused duration.
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    oscillators: Vec<Oscillator>,
    state: PlayState,
    /// Clock reading that counts as elapsed zero (re-based on resume/reset).
    epoch: f64,
    /// Elapsed seconds frozen while paused.
    paused_elapsed: f64,
    coeffs: Vec<f64>,
}

impl AnimationDriver {
    pub fn new(oscillators: Vec<Oscillator>, now: f64) -> ObliqResult<Self> {
        if oscillators.is_empty() {
            return Err(ObliqError::validation(
                "animation driver needs at least one oscillator",
            ));
        }
        let coeffs = vec![NEUTRAL_COEFFICIENT; oscillators.len()];
        Ok(Self {
            oscillators,
            state: PlayState::Playing,
            epoch: now,
            paused_elapsed: 0.0,
            coeffs,
        })
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Seconds of animated time at clock reading `now`.
    pub fn elapsed(&self, now: f64) -> f64 {
        match self.state {
            PlayState::Playing => (now - self.epoch).max(0.0),
            PlayState::Paused => self.paused_elapsed,
        }
    }

    /// Freeze elapsed time. `tick` becomes a no-op until resumed.
    pub fn pause(&mut self, now: f64) {
        if self.state == PlayState::Playing {
            self.paused_elapsed = self.elapsed(now);
            self.state = PlayState::Paused;
        }
    }

    /// Continue from the frozen elapsed time.
    pub fn resume(&mut self, now: f64) {
        if self.state == PlayState::Paused {
            self.epoch = now - self.paused_elapsed;
            self.state = PlayState::Playing;
        }
    }

    /// Re-base the epoch to `now` and restore the neutral coefficients.
    /// The current play state is kept.
    pub fn reset(&mut self, now: f64) {
        self.epoch = now;
        self.paused_elapsed = 0.0;
        self.coeffs.fill(NEUTRAL_COEFFICIENT);
    }

    /// Advance to clock reading `now` and return the refreshed coefficients.
    /// While paused the coefficients are left untouched.
    pub fn tick(&mut self, now: f64) -> &[f64] {
        if self.state == PlayState::Playing {
            let elapsed = (now - self.epoch).max(0.0);
            for (c, osc) in self.coeffs.iter_mut().zip(&self.oscillators) {
                *c = osc.value(elapsed);
            }
        }
        &self.coeffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> AnimationDriver {
        AnimationDriver::new(Oscillator::reference(), 10.0).unwrap()
    }

    #[test]
    fn bank_of_three_is_the_reference_configuration() {
        let bank = Oscillator::bank(3);
        assert_eq!(
            bank,
            vec![
                Oscillator::new(0.5, 0.0),
                Oscillator::new(0.7, 2.0),
                Oscillator::new(0.3, 4.0),
            ]
        );
    }

    #[test]
    fn ticks_match_the_closed_form() {
        let mut d = driver();
        for t in [0.0, 0.4, 1.7, 5.0, 31.4] {
            let coeffs = d.tick(10.0 + t).to_vec();
            for (c, osc) in coeffs.iter().zip(Oscillator::reference()) {
                let expected = 0.5 + 0.3 * (osc.freq * t + osc.phase).sin();
                assert!((c - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn coefficients_stay_inside_the_reference_band() {
        let mut d = driver();
        for i in 0..500 {
            for &c in d.tick(10.0 + f64::from(i) * 0.1) {
                assert!((0.2..=0.8).contains(&c));
            }
        }
    }

    #[test]
    fn pause_freezes_and_resume_continues_smoothly() {
        let mut d = driver();
        d.tick(15.0);
        let at_pause = d.tick(15.0).to_vec();
        d.pause(15.0);
        assert_eq!(d.state(), PlayState::Paused);
        assert_eq!(d.elapsed(99.0), 5.0);

        // Ticks while paused change nothing.
        assert_eq!(d.tick(42.0), at_pause.as_slice());

        // Zero paused duration: coefficients identical after resume.
        let mut instant = d.clone();
        instant.resume(15.0);
        assert_eq!(instant.tick(15.0), at_pause.as_slice());

        // Long pause: the oscillation picks up from the frozen phase.
        d.resume(75.0);
        assert_eq!(d.elapsed(75.0), 5.0);
        assert_eq!(d.tick(75.0), at_pause.as_slice());
    }

    #[test]
    fn reset_is_idempotent_and_keeps_play_state() {
        let mut d = driver();
        d.tick(14.2);
        d.reset(20.0);
        assert_eq!(d.coefficients(), &[0.5, 0.5, 0.5]);
        assert_eq!(d.elapsed(20.0), 0.0);
        d.reset(20.0);
        assert_eq!(d.coefficients(), &[0.5, 0.5, 0.5]);
        assert_eq!(d.elapsed(20.0), 0.0);
        assert!(d.is_playing());

        d.pause(21.0);
        d.reset(22.0);
        assert_eq!(d.state(), PlayState::Paused);
        assert_eq!(d.elapsed(22.0), 0.0);
        assert_eq!(d.coefficients(), &[0.5, 0.5, 0.5]);
    }

    #[test]
    fn empty_oscillator_bank_is_rejected() {
        assert!(AnimationDriver::new(Vec::new(), 0.0).is_err());
    }

    #[test]
    fn clock_regressions_clamp_at_the_epoch() {
        let mut d = driver();
        let coeffs = d.tick(9.0).to_vec(); // before the epoch
        for (c, osc) in coeffs.iter().zip(Oscillator::reference()) {
            assert!((c - osc.value(0.0)).abs() < 1e-12);
        }
    }
}
