#![forbid(unsafe_code)]

//! Keyed animation driver.
//!
//! The [`AnimationDriver`] runs at most one animation per
//! [`AnimationKey`] (a view and one of its properties), writes every sampled
//! value into a [`PropertySink`], and queues a [`DriverEvent`] when an
//! animation settles or is cancelled.
//!
//! # Invariants
//!
//! 1. At most one running animation per key. Starting another supersedes the
//!    first, which is reported as `Cancelled`, never `Settled`.
//! 2. Every token is resolved exactly once: one `Settled` or one `Cancelled`.
//! 3. [`apply_now`](AnimationDriver::apply_now) writes the value and queues
//!    `Settled` before returning; no animation object exists for it.
//! 4. In [`DriverMode::Instant`], [`animate`](AnimationDriver::animate)
//!    behaves exactly like `apply_now`.
//! 5. The driver remembers the last value it wrote per key, so a new
//!    animation starts where the previous one was interrupted.
//!
//! # Failure Modes
//!
//! None. Starting an animation cannot fail; a non-finite target is written
//! through as-is and settles immediately.

use std::collections::HashMap;
use std::time::Duration;

use cards_core::animation::{Animation, Curve, Motion};
use cards_core::view::{Property, ViewId};
use tracing::trace;

/// Receives sampled property values.
pub trait PropertySink {
    /// Write `value` into `property` of `view`.
    fn set_property(&mut self, view: ViewId, property: Property, value: f64);
}

/// Identifies one animatable channel of one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationKey {
    /// Animated view.
    pub view: ViewId,
    /// Animated property.
    pub property: Property,
}

impl AnimationKey {
    /// Create a key.
    #[must_use]
    pub const fn new(view: ViewId, property: Property) -> Self {
        Self { view, property }
    }
}

/// Handle for one started animation (or instant application).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationToken(u64);

impl AnimationToken {
    /// Raw token value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Resolution of an animation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    /// The animation reached its target and stopped moving.
    Settled {
        /// Resolved token.
        token: AnimationToken,
        /// Channel it animated.
        key: AnimationKey,
    },
    /// The animation was removed before settling.
    Cancelled {
        /// Resolved token.
        token: AnimationToken,
        /// Channel it animated.
        key: AnimationKey,
    },
}

impl DriverEvent {
    /// Token this event resolves.
    #[must_use]
    pub const fn token(&self) -> AnimationToken {
        match self {
            Self::Settled { token, .. } | Self::Cancelled { token, .. } => *token,
        }
    }

    /// Whether the animation completed normally.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Settled { .. })
    }
}

/// Whether the driver animates or applies values immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverMode {
    /// Animations run through [`AnimationDriver::tick`].
    #[default]
    Animated,
    /// Every animation is applied synchronously (reduced motion, or no
    /// animation capability on the host).
    Instant,
}

#[derive(Debug)]
struct Running {
    token: AnimationToken,
    key: AnimationKey,
    motion: Motion,
}

/// Runs keyed one-dimensional animations.
#[derive(Debug, Default)]
pub struct AnimationDriver {
    mode: DriverMode,
    running: Vec<Running>,
    presented: HashMap<AnimationKey, f64>,
    events: Vec<DriverEvent>,
    next_token: u64,
}

impl AnimationDriver {
    /// Create an animating driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver in the given mode.
    #[must_use]
    pub fn with_mode(mode: DriverMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> DriverMode {
        self.mode
    }

    /// Change mode. Running animations keep running until they settle.
    pub fn set_mode(&mut self, mode: DriverMode) {
        self.mode = mode;
    }

    /// Last value written for `key`, or the property's identity value.
    #[must_use]
    pub fn presented_value(&self, key: AnimationKey) -> f64 {
        self.presented
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.property.identity())
    }

    /// Whether an animation is running for `key`.
    #[must_use]
    pub fn is_animating(&self, key: AnimationKey) -> bool {
        self.running.iter().any(|r| r.key == key)
    }

    /// Number of running animations.
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// True when nothing is running and no events are pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.running.is_empty() && self.events.is_empty()
    }

    fn mint(&mut self) -> AnimationToken {
        self.next_token += 1;
        AnimationToken(self.next_token)
    }

    fn write<S: PropertySink + ?Sized>(&mut self, key: AnimationKey, value: f64, sink: &mut S) {
        sink.set_property(key.view, key.property, value);
        self.presented.insert(key, value);
    }

    /// Remove the running animation for `key`, returning its velocity.
    fn supersede(&mut self, key: AnimationKey) -> Option<f64> {
        let idx = self.running.iter().position(|r| r.key == key)?;
        let old = self.running.remove(idx);
        trace!(
            token = old.token.0,
            view = key.view.0,
            property = key.property.as_str(),
            "animation superseded"
        );
        self.events.push(DriverEvent::Cancelled {
            token: old.token,
            key,
        });
        Some(old.motion.velocity())
    }

    /// Animate `key` toward `to`.
    ///
    /// `velocity` seeds spring motion; `None` inherits the velocity of the
    /// animation being superseded (or zero).
    pub fn animate<S: PropertySink + ?Sized>(
        &mut self,
        key: AnimationKey,
        to: f64,
        curve: Curve,
        velocity: Option<f64>,
        sink: &mut S,
    ) -> AnimationToken {
        if self.mode == DriverMode::Instant {
            return self.apply_now(key, to, sink);
        }
        let inherited = self.supersede(key);
        let from = self.presented_value(key);
        let velocity = velocity.or(inherited).unwrap_or(0.0);
        let token = self.mint();
        let motion = curve.motion(from, to, velocity, key.property.rest_threshold());
        trace!(
            token = token.0,
            view = key.view.0,
            property = key.property.as_str(),
            from,
            to,
            velocity,
            "animation started"
        );
        self.running.push(Running { token, key, motion });
        token
    }

    /// Apply `to` immediately and queue `Settled` for the returned token.
    pub fn apply_now<S: PropertySink + ?Sized>(
        &mut self,
        key: AnimationKey,
        to: f64,
        sink: &mut S,
    ) -> AnimationToken {
        self.supersede(key);
        self.write(key, to, sink);
        let token = self.mint();
        self.events.push(DriverEvent::Settled { token, key });
        token
    }

    /// Write `value` immediately without a token (gesture tracking).
    ///
    /// Any running animation on `key` is cancelled.
    pub fn set<S: PropertySink + ?Sized>(&mut self, key: AnimationKey, value: f64, sink: &mut S) {
        self.supersede(key);
        self.write(key, value, sink);
    }

    /// Cancel the animation running for `key`. The channel keeps its last
    /// sampled value. Returns whether anything was running.
    pub fn cancel(&mut self, key: AnimationKey) -> bool {
        self.supersede(key).is_some()
    }

    /// Cancel every animation on `view` and forget its presented values.
    pub fn forget_view(&mut self, view: ViewId) {
        for property in Property::ALL {
            self.supersede(AnimationKey::new(view, property));
        }
        self.presented.retain(|key, _| key.view != view);
    }

    /// Advance every running animation by `dt` and write the sampled values.
    pub fn tick<S: PropertySink + ?Sized>(&mut self, dt: Duration, sink: &mut S) {
        let mut i = 0;
        while i < self.running.len() {
            let entry = &mut self.running[i];
            entry.motion.tick(dt);
            let key = entry.key;
            let value = entry.motion.value();
            let complete = entry.motion.is_complete();
            self.write(key, value, sink);
            if complete {
                let done = self.running.remove(i);
                trace!(
                    token = done.token.0,
                    view = key.view.0,
                    property = key.property.as_str(),
                    "animation settled"
                );
                self.events.push(DriverEvent::Settled {
                    token: done.token,
                    key,
                });
            } else {
                i += 1;
            }
        }
    }

    /// Jump every running animation to its target and settle it.
    pub fn finish_all<S: PropertySink + ?Sized>(&mut self, sink: &mut S) {
        for done in std::mem::take(&mut self.running) {
            let target = done.motion.target();
            self.write(done.key, target, sink);
            self.events.push(DriverEvent::Settled {
                token: done.token,
                key: done.key,
            });
        }
    }

    /// Drain all pending events. Clears the event queue.
    pub fn drain_events(&mut self) -> Vec<DriverEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }
}
