use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Longest step a measured frame may report, in seconds.
pub const MAX_MEASURED_STEP: f32 = 0.1;

/// Step used by fixed timing when none is configured (60 Hz).
pub const DEFAULT_FIXED_STEP: f32 = 1.0 / 60.0;

/// How the frame loop decides its per-frame delta time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameTiming {
    /// Real elapsed time since the previous frame, clamped to `MAX_MEASURED_STEP`.
    #[default]
    Measured,
    /// The same step every frame, regardless of wall clock.
    Fixed(f32),
}

/// Produces one delta time per frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    timing: FrameTiming,
    last: Option<Instant>,
}

impl FrameClock {
    /// A fixed step that is not a positive finite number falls back to
    /// `DEFAULT_FIXED_STEP`.
    pub fn new(timing: FrameTiming) -> Self {
        let timing = match timing {
            FrameTiming::Fixed(step) if !(step.is_finite() && step > 0.0) => {
                tracing::warn!(step, "invalid fixed step, using {DEFAULT_FIXED_STEP}");
                FrameTiming::Fixed(DEFAULT_FIXED_STEP)
            }
            other => other,
        };
        Self { timing, last: None }
    }

    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Delta time for a frame starting at `now`. The first measured frame is 0.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        match self.timing {
            FrameTiming::Fixed(step) => step,
            FrameTiming::Measured => {
                let dt = self
                    .last
                    .map(|last| now.saturating_duration_since(last).as_secs_f32())
                    .unwrap_or(0.0);
                self.last = Some(now);
                dt.min(MAX_MEASURED_STEP)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fixed_step_ignores_wall_clock() {
        let mut clock = FrameClock::new(FrameTiming::Fixed(DEFAULT_FIXED_STEP));
        let t0 = Instant::now();
        assert_eq!(clock.tick_at(t0), DEFAULT_FIXED_STEP);
        assert_eq!(clock.tick_at(t0 + Duration::from_secs(3)), DEFAULT_FIXED_STEP);
    }

    #[test]
    fn bad_fixed_step_falls_back_to_default() {
        let t0 = Instant::now();
        for step in [-0.5, 0.0, f32::NAN, f32::INFINITY] {
            let mut clock = FrameClock::new(FrameTiming::Fixed(step));
            assert_eq!(clock.tick_at(t0), DEFAULT_FIXED_STEP);
        }
    }

    #[test]
    fn negative_step_from_config_does_not_reverse_spin() {
        let timing: FrameTiming = serde_json::from_str(r#"{"fixed":-1.0}"#).unwrap();
        let mut clock = FrameClock::new(timing);
        let mut cube = crate::Cube::new(glam::Vec3::ZERO, glam::Vec3::ONE);
        cube.update(clock.tick_at(Instant::now()));
        let y = cube.transform().orientation().y;
        assert!(y > 0.0 && y < 1.0, "orientation.y = {y}");
    }

    #[test]
    fn measured_step_uses_elapsed_time() {
        let mut clock = FrameClock::new(FrameTiming::Measured);
        let t0 = Instant::now();
        assert_eq!(clock.tick_at(t0), 0.0);
        let dt = clock.tick_at(t0 + Duration::from_millis(20));
        assert!((dt - 0.02).abs() < 1e-4);
    }

    #[test]
    fn measured_step_is_clamped() {
        let mut clock = FrameClock::new(FrameTiming::Measured);
        let t0 = Instant::now();
        clock.tick_at(t0);
        assert_eq!(clock.tick_at(t0 + Duration::from_secs(2)), MAX_MEASURED_STEP);
    }

    #[test]
    fn timing_json_shape() {
        let fixed: FrameTiming = serde_json::from_str(r#"{"fixed":0.5}"#).unwrap();
        assert_eq!(fixed, FrameTiming::Fixed(0.5));
        let measured: FrameTiming = serde_json::from_str(r#""measured""#).unwrap();
        assert_eq!(measured, FrameTiming::Measured);
    }
}
