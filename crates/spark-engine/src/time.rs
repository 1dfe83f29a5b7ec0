use crate::error::ParticleError;

/// Converts variable wall-clock frame deltas into whole simulation frames.
///
/// Particle life, velocity and gravity are all expressed per frame, so a
/// host running at an uneven refresh rate feeds its real delta here and
/// calls `ParticleSystem::step` once per returned frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_dt: f32,
    accumulator: f32,
}

impl FrameClock {
    /// Most frames returned by one `accumulate` call.
    pub const MAX_FRAMES_PER_CALL: u32 = 10;

    /// Rejects durations that are zero, negative or not finite.
    pub fn new(frame_dt: f32) -> Result<Self, ParticleError> {
        if !(frame_dt.is_finite() && frame_dt > 0.0) {
            return Err(ParticleError::InvalidFrameDuration(frame_dt));
        }
        Ok(Self {
            frame_dt,
            accumulator: 0.0,
        })
    }

    /// Add elapsed seconds. Returns how many simulation frames are due.
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.max(0.0);
        // Drop backlog past the cap instead of replaying it later.
        self.accumulator = self
            .accumulator
            .min(self.frame_dt * Self::MAX_FRAMES_PER_CALL as f32);
        let frames = (self.accumulator / self.frame_dt) as u32;
        self.accumulator -= frames as f32 * self.frame_dt;
        frames
    }

    /// Seconds per simulation frame.
    pub fn frame_dt(&self) -> f32 {
        self.frame_dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            frame_dt: 1.0 / 60.0,
            accumulator: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_frame_exact() {
        let mut clock = FrameClock::new(0.25).unwrap();
        assert_eq!(clock.accumulate(0.25), 1);
    }

    #[test]
    fn carries_partial_frames() {
        let mut clock = FrameClock::new(0.25).unwrap();
        assert_eq!(clock.accumulate(0.125), 0);
        assert_eq!(clock.accumulate(0.25), 1);
        assert_eq!(clock.accumulate(0.125), 1);
    }

    #[test]
    fn caps_long_stalls() {
        let mut clock = FrameClock::new(0.25).unwrap();
        assert_eq!(clock.accumulate(5.0), FrameClock::MAX_FRAMES_PER_CALL);
        assert_eq!(clock.accumulate(0.0), 0);
    }

    #[test]
    fn default_runs_at_sixty_hz() {
        assert_eq!(FrameClock::default().frame_dt(), 1.0 / 60.0);
    }

    #[test]
    fn rejects_non_positive_frame_duration() {
        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = FrameClock::new(dt).unwrap_err();
            assert!(matches!(err, ParticleError::InvalidFrameDuration(_)));
        }
    }

    #[test]
    fn ignores_negative_time() {
        let mut clock = FrameClock::new(0.25).unwrap();
        assert_eq!(clock.accumulate(-1.0), 0);
        assert_eq!(clock.accumulate(0.25), 1);
    }
}
