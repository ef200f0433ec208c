use constants::materials::CROSSFADE_DURATION_SECONDS;

/// Outcome of advancing the crossfade by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeStep {
    /// No fade in flight.
    Idle,
    /// Fade in flight; carries the new blend factor.
    Blending(f32),
    /// Blend reached 1 this tick. `next` becomes `current` and the blend resets.
    Completed,
}

/// Timed linear blend between the current and next background.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossfadeState {
    is_fading: bool,
    progress: f32,
    duration: f32,
}

impl Default for CrossfadeState {
    fn default() -> Self {
        Self::with_duration(CROSSFADE_DURATION_SECONDS)
    }
}

impl CrossfadeState {
    pub fn with_duration(duration: f32) -> Self {
        Self {
            is_fading: false,
            progress: 0.0,
            duration: duration.max(f32::EPSILON),
        }
    }

    pub fn is_fading(&self) -> bool {
        self.is_fading
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Start (or restart) a fade from 0. Only one fade is ever in flight.
    pub fn begin(&mut self) {
        self.is_fading = true;
        self.progress = 0.0;
    }

    /// Advance linearly at `1 / duration` per second of `delta_seconds`.
    pub fn advance(&mut self, delta_seconds: f32) -> FadeStep {
        if !self.is_fading {
            return FadeStep::Idle;
        }

        self.progress = (self.progress + delta_seconds.max(0.0) / self.duration).min(1.0);
        if self.progress >= 1.0 {
            self.is_fading = false;
            self.progress = 0.0;
            return FadeStep::Completed;
        }

        FadeStep::Blending(self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f32 = 1.0 / 60.0;

    #[test]
    fn idle_until_begun() {
        let mut fade = CrossfadeState::default();
        assert_eq!(fade.advance(TICK), FadeStep::Idle);
        assert_eq!(fade.progress(), 0.0);
    }

    #[test]
    fn blend_is_monotonic_and_completes_within_duration() {
        let mut fade = CrossfadeState::default();
        fade.begin();

        let max_ticks = (fade.duration() / TICK).ceil() as usize + 1;
        let mut last = 0.0;
        let mut ticks = 0;
        loop {
            ticks += 1;
            match fade.advance(TICK) {
                FadeStep::Blending(mix) => {
                    assert!(mix >= last, "blend went backwards: {} < {}", mix, last);
                    assert!(mix < 1.0);
                    last = mix;
                }
                FadeStep::Completed => break,
                FadeStep::Idle => panic!("fade stopped without completing"),
            }
            assert!(ticks <= max_ticks, "fade overran its duration");
        }

        assert!(ticks >= max_ticks - 2);
        assert!(!fade.is_fading());
        assert_eq!(fade.progress(), 0.0);
    }

    #[test]
    fn long_frame_completes_in_one_step() {
        let mut fade = CrossfadeState::default();
        fade.begin();
        assert_eq!(fade.advance(1.0), FadeStep::Completed);
    }

    #[test]
    fn restart_resets_progress() {
        let mut fade = CrossfadeState::default();
        fade.begin();
        fade.advance(0.1);
        fade.begin();
        assert!(fade.is_fading());
        assert_eq!(fade.progress(), 0.0);
    }
}
