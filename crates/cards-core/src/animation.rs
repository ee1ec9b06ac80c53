#![forbid(unsafe_code)]

//! Value animation primitives.
//!
//! Animations interpolate a single `f64` channel from its current value to a
//! target and report their instantaneous velocity, so an interrupted motion
//! can hand its momentum to the next one. Time only advances through
//! [`Animation::tick`]; nothing here reads a clock.
//!
//! Two strategies exist, both behind the [`Motion`] enum so callers pick one
//! at construction time without dynamic dispatch:
//!
//! - [`Spring`]: physically modelled, parameterised by speed and bounciness.
//! - [`Tween`]: fixed duration with an easing curve and optional delay.

pub mod spring;
pub mod tween;

use std::time::Duration;

pub use spring::{Spring, SpringCoefficients, SpringParams};
pub use tween::Tween;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f64) -> f64;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out (slower end than quadratic).
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation of one `f64` channel toward a target.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has come to rest at its target.
    fn is_complete(&self) -> bool;

    /// Current value of the channel.
    fn value(&self) -> f64;

    /// Current rate of change, in units per second.
    fn velocity(&self) -> f64;

    /// Value the animation settles at.
    fn target(&self) -> f64;
}

// ---------------------------------------------------------------------------
// Curve / Motion
// ---------------------------------------------------------------------------

/// How a channel should move toward its target.
#[derive(Debug, Clone, Copy)]
pub enum Curve {
    /// Spring physics.
    Spring(SpringParams),
    /// Fixed duration with easing, optionally delayed.
    Timed {
        /// Length of the motion once it starts.
        duration: Duration,
        /// Easing applied to normalized progress.
        easing: EasingFn,
        /// Time to hold the start value before moving.
        delay: Duration,
    },
}

impl Curve {
    /// Spring curve from speed and bounciness.
    #[must_use]
    pub const fn spring(speed: f64, bounciness: f64) -> Self {
        Self::Spring(SpringParams::new(speed, bounciness))
    }

    /// Timed curve without delay.
    #[must_use]
    pub const fn timed(duration: Duration, easing: EasingFn) -> Self {
        Self::Timed {
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }

    /// Same curve, held for `delay` before it starts. Springs ignore delays.
    #[must_use]
    pub fn delayed(self, delay: Duration) -> Self {
        match self {
            Self::Timed {
                duration, easing, ..
            } => Self::Timed {
                duration,
                easing,
                delay,
            },
            spring @ Self::Spring(_) => spring,
        }
    }

    /// Build the animation moving `from` toward `to`.
    ///
    /// `velocity` seeds springs; tweens ignore it.
    #[must_use]
    pub fn motion(self, from: f64, to: f64, velocity: f64, rest_threshold: f64) -> Motion {
        match self {
            Self::Spring(params) => Motion::Spring(
                Spring::new(from, to, params)
                    .with_velocity(velocity)
                    .with_rest_threshold(rest_threshold),
            ),
            Self::Timed {
                duration,
                easing,
                delay,
            } => Motion::Tween(Tween::new(from, to, duration).easing(easing).delay(delay)),
        }
    }
}

/// A running animation built from a [`Curve`].
#[derive(Debug, Clone)]
pub enum Motion {
    /// Spring-driven motion.
    Spring(Spring),
    /// Duration-driven motion.
    Tween(Tween),
}

impl Animation for Motion {
    fn tick(&mut self, dt: Duration) {
        match self {
            Self::Spring(s) => s.tick(dt),
            Self::Tween(t) => t.tick(dt),
        }
    }

    fn is_complete(&self) -> bool {
        match self {
            Self::Spring(s) => s.is_complete(),
            Self::Tween(t) => t.is_complete(),
        }
    }

    fn value(&self) -> f64 {
        match self {
            Self::Spring(s) => s.value(),
            Self::Tween(t) => t.value(),
        }
    }

    fn velocity(&self) -> f64 {
        match self {
            Self::Spring(s) => s.velocity(),
            Self::Tween(t) => t.velocity(),
        }
    }

    fn target(&self) -> f64 {
        match self {
            Self::Spring(s) => s.target(),
            Self::Tween(t) => t.target(),
        }
    }
}
