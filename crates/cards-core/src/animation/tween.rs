#![forbid(unsafe_code)]

//! Fixed-duration interpolation with easing.

use std::time::Duration;

use super::{Animation, EasingFn, ease_out};

/// Interpolates between `from` and `to` over a duration, after an optional delay.
///
/// Tracks elapsed time as [`Duration`] internally for precise accumulation
/// (no floating-point drift).
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f64,
    to: f64,
    elapsed: Duration,
    delay: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Tween {
    /// Create a tween with the default ease-out curve.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            delay: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: ease_out,
        }
    }

    /// Set the easing function (builder).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Hold the start value for `delay` before moving (builder).
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Linear progress after the delay, in [0, 1].
    #[must_use]
    pub fn raw_progress(&self) -> f64 {
        let active = self.elapsed.saturating_sub(self.delay);
        (active.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    fn sample(&self, t: f64) -> f64 {
        self.from + (self.to - self.from) * (self.easing)(t)
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.delay.saturating_add(self.duration)
    }

    fn value(&self) -> f64 {
        if self.is_complete() {
            return self.to;
        }
        self.sample(self.raw_progress())
    }

    fn velocity(&self) -> f64 {
        if self.is_complete() || self.elapsed < self.delay {
            return 0.0;
        }
        // Central difference over a small slice of normalized time.
        let t = self.raw_progress();
        let h = 1e-3;
        let lo = (t - h).max(0.0);
        let hi = (t + h).min(1.0);
        if hi <= lo {
            return 0.0;
        }
        let slope = (self.sample(hi) - self.sample(lo)) / (hi - lo);
        slope / self.duration.as_secs_f64()
    }

    fn target(&self) -> f64 {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::linear;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn holds_start_during_delay() {
        let mut tween = Tween::new(10.0, 60.0, MS_300).delay(MS_100);
        tween.tick(Duration::from_millis(50));
        assert_eq!(tween.value(), 10.0);
        assert_eq!(tween.velocity(), 0.0);
        assert!(!tween.is_complete());
    }

    #[test]
    fn completes_after_delay_plus_duration() {
        let mut tween = Tween::new(0.0, 1.0, MS_300).delay(MS_100);
        tween.tick(MS_300);
        assert!(!tween.is_complete());
        tween.tick(MS_100);
        assert!(tween.is_complete());
        assert_eq!(tween.value(), 1.0);
    }

    #[test]
    fn linear_midpoint_and_velocity() {
        let mut tween = Tween::new(0.0, 100.0, Duration::from_secs(1)).easing(linear);
        tween.tick(Duration::from_millis(500));
        assert!((tween.value() - 50.0).abs() < 1e-9);
        assert!((tween.velocity() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut tween = Tween::new(0.0, 1.0, Duration::ZERO);
        assert!(!tween.is_complete());
        tween.tick(Duration::from_nanos(1));
        assert!(tween.is_complete());
    }

    #[test]
    fn decreasing_tween() {
        let mut tween = Tween::new(1.0, 0.0, MS_300);
        tween.tick(Duration::from_millis(150));
        let v = tween.value();
        assert!(v < 1.0 && v > 0.0);
        assert!(tween.velocity() < 0.0);
    }
}
