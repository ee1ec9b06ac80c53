#![forbid(unsafe_code)]

//! Discard animation for a single card.
//!
//! [`PopAnimation`] drops one view by a fixed distance while fading it out.
//! It is used for cards that leave without the full pop transition, such as
//! buried cards removed by a reconciliation.
//!
//! # Invariants
//!
//! 1. Completion is reported exactly once, by the [`handle`](PopAnimation::handle)
//!    call that resolves the last of its two driver tokens.
//! 2. [`start`](PopAnimation::start) on a running animation is a contract
//!    violation and panics.
//! 3. [`stop`](PopAnimation::stop) is idempotent, never reports completion,
//!    and is a no-op once the animation has completed.
//! 4. If the driver cancels one of its channels (another animation took the
//!    key), the whole animation stops without completing.

use std::time::Duration;

use cards_core::animation::{Curve, ease_out};
use cards_core::view::{Property, ViewId};
use tracing::trace;

use crate::driver::{AnimationDriver, AnimationKey, AnimationToken, DriverEvent, PropertySink};

/// Lifecycle of a [`PopAnimation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopStatus {
    /// Not started.
    #[default]
    Idle,
    /// Channels are animating.
    Running,
    /// Both channels settled; completion was reported.
    Completed,
    /// Stopped before completing.
    Stopped,
}

/// Drops and fades one view.
#[derive(Debug, Clone)]
pub struct PopAnimation {
    view: ViewId,
    distance: f64,
    duration: Duration,
    delay: Duration,
    pending: Vec<AnimationToken>,
    status: PopStatus,
}

impl PopAnimation {
    /// Animation for `view` with the stock distance (50) and duration (300ms).
    #[must_use]
    pub fn new(view: ViewId) -> Self {
        Self {
            view,
            distance: 50.0,
            duration: Duration::from_millis(300),
            delay: Duration::ZERO,
            pending: Vec::new(),
            status: PopStatus::Idle,
        }
    }

    /// Set how far the view drops (builder).
    #[must_use]
    pub fn distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Set the motion duration (builder).
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Delay the start of the motion (builder).
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Animated view.
    #[must_use]
    pub fn view(&self) -> ViewId {
        self.view
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> PopStatus {
        self.status
    }

    /// Whether channels are still animating.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == PopStatus::Running
    }

    /// Whether the animation finished (completed or stopped).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.status, PopStatus::Completed | PopStatus::Stopped)
    }

    /// Start dropping and fading the view.
    ///
    /// # Panics
    ///
    /// Panics if the animation is already running.
    pub fn start<S: PropertySink + ?Sized>(&mut self, driver: &mut AnimationDriver, sink: &mut S) {
        assert!(
            self.status != PopStatus::Running,
            "attempt to start a PopAnimation that is already running"
        );
        self.status = PopStatus::Running;
        let curve = Curve::timed(self.duration, ease_out).delayed(self.delay);
        let translation = AnimationKey::new(self.view, Property::TranslationY);
        let opacity = AnimationKey::new(self.view, Property::Opacity);
        let to = driver.presented_value(translation) + self.distance;
        trace!(view = self.view.0, to, "discard started");
        self.pending = vec![
            driver.animate(translation, to, curve, None, sink),
            driver.animate(opacity, 0.0, curve, None, sink),
        ];
        // Instant drivers settle synchronously; completion still goes
        // through `handle` so it is reported from one place.
    }

    /// Feed a driver event. Returns `true` exactly once, when the animation
    /// completes.
    pub fn handle(&mut self, event: &DriverEvent, driver: &mut AnimationDriver) -> bool {
        if self.status != PopStatus::Running {
            return false;
        }
        let token = event.token();
        let Some(idx) = self.pending.iter().position(|t| *t == token) else {
            return false;
        };
        self.pending.swap_remove(idx);
        if !event.is_settled() {
            self.stop(driver);
            return false;
        }
        if self.pending.is_empty() {
            self.status = PopStatus::Completed;
            trace!(view = self.view.0, "discard completed");
            return true;
        }
        false
    }

    /// Stop without completing. Safe to call repeatedly and after completion.
    pub fn stop(&mut self, driver: &mut AnimationDriver) {
        if self.status != PopStatus::Running {
            return;
        }
        self.status = PopStatus::Stopped;
        self.pending.clear();
        driver.cancel(AnimationKey::new(self.view, Property::TranslationY));
        driver.cancel(AnimationKey::new(self.view, Property::Opacity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverMode;

    #[derive(Default)]
    struct Sink;

    impl PropertySink for Sink {
        fn set_property(&mut self, _: ViewId, _: Property, _: f64) {}
    }

    fn pump(anim: &mut PopAnimation, driver: &mut AnimationDriver) -> usize {
        let mut completions = 0;
        for event in driver.drain_events() {
            if anim.handle(&event, driver) {
                completions += 1;
            }
        }
        completions
    }

    fn run(anim: &mut PopAnimation, driver: &mut AnimationDriver) -> usize {
        let mut completions = pump(anim, driver);
        for _ in 0..100 {
            driver.tick(Duration::from_millis(16), &mut Sink);
            completions += pump(anim, driver);
        }
        completions
    }

    #[test]
    fn completes_once_and_lands_lower_and_transparent() {
        let mut driver = AnimationDriver::new();
        let view = ViewId(9);
        let mut anim = PopAnimation::new(view);
        anim.start(&mut driver, &mut Sink);
        assert!(anim.is_running());
        assert_eq!(run(&mut anim, &mut driver), 1);
        assert_eq!(anim.status(), PopStatus::Completed);
        assert_eq!(
            driver.presented_value(AnimationKey::new(view, Property::TranslationY)),
            50.0
        );
        assert_eq!(
            driver.presented_value(AnimationKey::new(view, Property::Opacity)),
            0.0
        );
    }

    #[test]
    fn stop_is_idempotent_and_suppresses_completion() {
        let mut driver = AnimationDriver::new();
        let mut anim = PopAnimation::new(ViewId(1));
        anim.start(&mut driver, &mut Sink);
        driver.tick(Duration::from_millis(16), &mut Sink);
        anim.stop(&mut driver);
        anim.stop(&mut driver);
        assert_eq!(anim.status(), PopStatus::Stopped);
        assert_eq!(run(&mut anim, &mut driver), 0);
    }

    #[test]
    fn stop_after_completion_is_noop() {
        let mut driver = AnimationDriver::new();
        let mut anim = PopAnimation::new(ViewId(1));
        anim.start(&mut driver, &mut Sink);
        assert_eq!(run(&mut anim, &mut driver), 1);
        anim.stop(&mut driver);
        assert_eq!(anim.status(), PopStatus::Completed);
    }

    #[test]
    #[should_panic(expected = "already running")]
    fn double_start_panics() {
        let mut driver = AnimationDriver::new();
        let mut anim = PopAnimation::new(ViewId(1));
        anim.start(&mut driver, &mut Sink);
        anim.start(&mut driver, &mut Sink);
    }

    #[test]
    fn instant_driver_completes_on_first_pump() {
        let mut driver = AnimationDriver::with_mode(DriverMode::Instant);
        let mut anim = PopAnimation::new(ViewId(4)).distance(10.0);
        anim.start(&mut driver, &mut Sink);
        assert_eq!(pump(&mut anim, &mut driver), 1);
        assert!(anim.is_finished());
    }

    #[test]
    fn delay_holds_position() {
        let mut driver = AnimationDriver::new();
        let view = ViewId(2);
        let mut anim = PopAnimation::new(view).delay(Duration::from_millis(100));
        anim.start(&mut driver, &mut Sink);
        driver.tick(Duration::from_millis(50), &mut Sink);
        assert_eq!(
            driver.presented_value(AnimationKey::new(view, Property::TranslationY)),
            0.0
        );
        assert_eq!(run(&mut anim, &mut driver), 1);
    }

    #[test]
    fn superseded_channel_stops_animation() {
        let mut driver = AnimationDriver::new();
        let view = ViewId(3);
        let mut anim = PopAnimation::new(view);
        anim.start(&mut driver, &mut Sink);
        driver.set(AnimationKey::new(view, Property::Opacity), 1.0, &mut Sink);
        assert_eq!(run(&mut anim, &mut driver), 0);
        assert_eq!(anim.status(), PopStatus::Stopped);
        assert!(!driver.is_animating(AnimationKey::new(view, Property::TranslationY)));
    }
}
