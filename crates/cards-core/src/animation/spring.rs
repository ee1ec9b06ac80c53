#![forbid(unsafe_code)]

//! Damped spring animation.
//!
//! Designers describe springs with two friendly knobs, *speed* and
//! *bounciness*. [`SpringParams::coefficients`] converts those into the
//! tension and friction of a unit-mass harmonic oscillator:
//!
//! ```text
//! s = normalize(speed / 1.7, 0, 20)
//! b = project(normalize(bounciness / 1.7, 0, 20), 0, 0.8)
//! tension  = project(s, 0.5, 200)
//! friction = quadratic_out(b, no_bounce_friction(tension), 0.01)
//! ```
//!
//! The oscillator is integrated with semi-implicit Euler in fixed 1 ms
//! sub-steps, so results do not depend on the caller's frame rate beyond the
//! final partial step.
//!
//! # Invariants
//!
//! 1. Once at rest, `value() == target()` exactly and `velocity() == 0`.
//! 2. A spring constructed at its target with zero velocity is already at rest.
//! 3. `tick` never produces NaN for finite inputs.
//! 4. One `tick` integrates at most 10 s of simulated time; the rest of a
//!    longer `dt` is dropped.

use std::time::Duration;

use super::Animation;

/// Integration step.
const STEP: f64 = 0.001;

/// Sub-step budget of a single `tick` (10 s of simulated time).
const MAX_TICK_STEPS: u32 = 10_000;

/// Rest velocity bound, as a multiple of the displacement threshold.
const REST_VELOCITY_FACTOR: f64 = 10.0;

/// Designer-facing spring description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    /// How quickly the spring approaches its target. Useful range `[0, 20]`.
    pub speed: f64,
    /// How much it overshoots. 0 = no visible bounce. Useful range `[0, 20]`.
    pub bounciness: f64,
}

impl SpringParams {
    /// Create spring parameters.
    #[must_use]
    pub const fn new(speed: f64, bounciness: f64) -> Self {
        Self { speed, bounciness }
    }

    /// Convert to physical coefficients.
    #[must_use]
    pub fn coefficients(&self) -> SpringCoefficients {
        let s = normalize(self.speed / 1.7, 0.0, 20.0);
        let b = project(normalize(self.bounciness / 1.7, 0.0, 20.0), 0.0, 0.8);
        let tension = project(s, 0.5, 200.0);
        let friction = quadratic_out(b, no_bounce_friction(tension), 0.01);
        SpringCoefficients {
            tension: tension.max(f64::MIN_POSITIVE),
            friction: friction.max(0.0),
            mass: 1.0,
        }
    }
}

/// Physical spring coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringCoefficients {
    /// Stiffness `k`.
    pub tension: f64,
    /// Damping `c`.
    pub friction: f64,
    /// Mass `m`.
    pub mass: f64,
}

impl SpringCoefficients {
    /// Damping ratio `c / (2 * sqrt(k * m))`. Below 1 the spring overshoots.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.friction / (2.0 * (self.tension * self.mass).sqrt())
    }
}

fn normalize(value: f64, start: f64, end: f64) -> f64 {
    (value - start) / (end - start)
}

fn project(n: f64, start: f64, end: f64) -> f64 {
    start + n * (end - start)
}

fn lerp(t: f64, start: f64, end: f64) -> f64 {
    t * end + (1.0 - t) * start
}

fn quadratic_out(t: f64, start: f64, end: f64) -> f64 {
    lerp(2.0 * t - t * t, start, end)
}

/// Friction that keeps a spring of the given tension from visibly bouncing.
///
/// Piecewise cubic fit; each piece covers one tension band.
fn no_bounce_friction(tension: f64) -> f64 {
    let x = tension;
    if x <= 18.0 {
        0.0007 * x.powi(3) - 0.031 * x.powi(2) + 0.64 * x + 1.28
    } else if x <= 44.0 {
        0.000044 * x.powi(3) - 0.006 * x.powi(2) + 0.36 * x + 2.0
    } else {
        0.000_000_45 * x.powi(3) - 0.000332 * x.powi(2) + 0.1078 * x + 5.84
    }
}

/// A spring pulling one channel toward a target.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    coefficients: SpringCoefficients,
    rest_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring at `from`, heading to `to`.
    #[must_use]
    pub fn new(from: f64, to: f64, params: SpringParams) -> Self {
        Self::with_coefficients(from, to, params.coefficients())
    }

    /// Create a spring from explicit coefficients.
    #[must_use]
    pub fn with_coefficients(from: f64, to: f64, coefficients: SpringCoefficients) -> Self {
        let mut spring = Self {
            position: from,
            velocity: 0.0,
            target: to,
            coefficients,
            rest_threshold: 0.01,
            at_rest: false,
        };
        spring.check_rest();
        spring
    }

    /// Seed the spring with an initial velocity (builder).
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        if velocity.is_finite() {
            self.velocity = velocity;
        }
        self.at_rest = false;
        self.check_rest();
        self
    }

    /// Set the displacement under which the spring snaps to rest (builder).
    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs().max(f64::EPSILON);
        self.at_rest = false;
        self.check_rest();
        self
    }

    /// Physical coefficients in use.
    #[must_use]
    pub fn coefficients(&self) -> SpringCoefficients {
        self.coefficients
    }

    fn check_rest(&mut self) {
        let displacement = (self.position - self.target).abs();
        if displacement < self.rest_threshold
            && self.velocity.abs() < self.rest_threshold * REST_VELOCITY_FACTOR
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }

    fn step(&mut self, h: f64) {
        let SpringCoefficients {
            tension,
            friction,
            mass,
        } = self.coefficients;
        let displacement = self.position - self.target;
        let acceleration = (-tension * displacement - friction * self.velocity) / mass;
        self.velocity += acceleration * h;
        self.position += self.velocity * h;
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        let mut steps = 0;
        while remaining > 0.0 && !self.at_rest && steps < MAX_TICK_STEPS {
            let h = remaining.min(STEP);
            self.step(h);
            remaining -= h;
            steps += 1;
            self.check_rest();
        }
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f64 {
        self.position
    }

    fn velocity(&self) -> f64 {
        self.velocity
    }

    fn target(&self) -> f64 {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn settle(spring: &mut Spring) -> (usize, f64) {
        let mut frames = 0;
        let mut peak = spring.value();
        while !spring.is_complete() && frames < 5_000 {
            spring.tick(MS_16);
            frames += 1;
            peak = peak.min(spring.value());
        }
        (frames, peak)
    }

    #[test]
    fn push_spring_coefficients() {
        let c = SpringParams::new(12.0, 0.0).coefficients();
        assert!((c.tension - 70.94).abs() < 0.1, "tension {}", c.tension);
        assert!(c.friction > 11.0 && c.friction < 13.0, "friction {}", c.friction);
        assert!(c.damping_ratio() < 1.0);
    }

    #[test]
    fn bounciness_lowers_friction() {
        let calm = SpringParams::new(12.0, 0.0).coefficients();
        let bouncy = SpringParams::new(12.0, 2.0).coefficients();
        assert!(bouncy.friction < calm.friction);
        assert_eq!(bouncy.tension, calm.tension);
    }

    #[test]
    fn faster_spring_is_stiffer() {
        let slow = SpringParams::new(4.0, 0.0).coefficients();
        let fast = SpringParams::new(16.0, 0.0).coefficients();
        assert!(fast.tension > slow.tension);
    }

    #[test]
    fn starts_at_rest_when_on_target() {
        let spring = Spring::new(1.0, 1.0, SpringParams::new(12.0, 2.0));
        assert!(spring.is_complete());
        assert_eq!(spring.value(), 1.0);
    }

    #[test]
    fn velocity_wakes_spring_on_target() {
        let spring = Spring::new(0.0, 0.0, SpringParams::new(12.0, 0.0)).with_velocity(500.0);
        assert!(!spring.is_complete());
    }

    #[test]
    fn settles_exactly_on_target() {
        let mut spring = Spring::new(600.0, 0.0, SpringParams::new(12.0, 2.0));
        let (frames, _) = settle(&mut spring);
        assert!(frames < 5_000);
        assert_eq!(spring.value(), 0.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn bouncy_spring_overshoots() {
        let mut spring = Spring::new(600.0, 0.0, SpringParams::new(12.0, 12.0));
        let (_, lowest) = settle(&mut spring);
        assert!(lowest < 0.0, "expected overshoot below target, lowest {lowest}");
    }

    #[test]
    fn initial_velocity_carries_motion() {
        let mut still = Spring::new(0.0, 500.0, SpringParams::new(12.0, 0.0));
        let mut flung = Spring::new(0.0, 500.0, SpringParams::new(12.0, 0.0)).with_velocity(2_000.0);
        still.tick(MS_16);
        flung.tick(MS_16);
        assert!(flung.value() > still.value());
    }

    #[test]
    fn non_finite_velocity_ignored() {
        let spring = Spring::new(0.0, 1.0, SpringParams::new(12.0, 0.0)).with_velocity(f64::NAN);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn frictionless_spring_tick_is_bounded() {
        let mut spring = Spring::new(100.0, 0.0, SpringParams::new(12.0, 42.5));
        assert!(spring.coefficients().friction < 0.02);
        spring.tick(Duration::from_secs(86_400));
        assert!(!spring.is_complete());
        assert!(spring.value().is_finite());
        assert!(spring.value().abs() <= 101.0, "energy stays bounded");
    }

    #[test]
    fn long_tick_is_stable() {
        let mut spring = Spring::new(1_000.0, 0.0, SpringParams::new(20.0, 0.0));
        spring.tick(Duration::from_secs(30));
        assert!(spring.is_complete());
        assert!(spring.value().is_finite());
    }
}
