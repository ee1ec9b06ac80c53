#![forbid(unsafe_code)]

//! Pan-gesture math for drag-to-dismiss.
//!
//! A [`DragSession`] follows one pan gesture on the top card. The host feeds
//! it raw vertical translations; the session returns the translation to apply
//! to the card and, when the gesture ends, decides between dismissing the
//! card and sending it back to rest.
//!
//! # Rubber banding
//!
//! Downward drags follow the touch 1:1. Anything beyond the allowed range
//! (upward, past the resting position) is passed through
//!
//! ```text
//! rubber(x, d) = sign(x) * (c * |x| * d) / (d + c * |x|),   c = 0.01
//! ```
//!
//! where `d` is the container height. The response decelerates as the drag
//! grows and approaches, but never reaches, `d`.
//!
//! # Invariants
//!
//! 1. `rubber_band(0, d) == 0` and `rubber_band(-x, d) == -rubber_band(x, d)`.
//! 2. `|rubber_band(x, d)| < d` for every finite `x` and `d > 0`.
//! 3. A session produces exactly one [`PanOutcome`], on its terminal phase.

/// Resistance coefficient of the rubber band.
pub const RUBBER_BAND_COEFFICIENT: f64 = 0.01;

/// Resisted displacement for a requested `offset` beyond a bound.
///
/// `dimension` is the size of the dragged view along the drag axis.
/// Non-positive or non-finite dimensions resist completely.
#[must_use]
pub fn rubber_band(offset: f64, dimension: f64) -> f64 {
    if offset == 0.0 || offset.is_nan() || !dimension.is_finite() || dimension <= 0.0 {
        return 0.0;
    }
    let stretched = RUBBER_BAND_COEFFICIENT * offset.abs();
    // Same curve as `c*|x|*d / (d + c*|x|)`, arranged so every float step is
    // monotone in |x|.
    let mut result = (dimension - dimension * dimension / (dimension + stretched)).max(0.0);
    if result >= dimension {
        // Largest float below the asymptote.
        result = f64::from_bits(dimension.to_bits() - 1);
    }
    result.copysign(offset)
}

/// Constrain a raw drag translation to `[0, ∞)`, rubber-banding the excess.
#[must_use]
pub fn constrain_translation(translation: f64, dimension: f64) -> f64 {
    let constrained = translation.max(0.0);
    constrained + rubber_band(translation - constrained, dimension)
}

/// Phase of a pan gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanPhase {
    /// The recognizer started tracking.
    Began,
    /// The touch moved.
    Changed,
    /// The touch lifted normally.
    Ended,
    /// The system cancelled the gesture.
    Cancelled,
    /// The recognizer failed.
    Failed,
}

impl PanPhase {
    /// Whether this phase ends the gesture.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled | Self::Failed)
    }
}

/// One sample from a pan recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanEvent {
    /// Recognizer phase.
    pub phase: PanPhase,
    /// Total vertical translation since the gesture began, in points.
    /// Positive is downward.
    pub translation_y: f64,
    /// Vertical velocity in points per second. Positive is downward.
    pub velocity_y: f64,
}

impl PanEvent {
    /// Create a pan sample.
    #[must_use]
    pub const fn new(phase: PanPhase, translation_y: f64, velocity_y: f64) -> Self {
        Self {
            phase,
            translation_y,
            velocity_y,
        }
    }

    /// `Began` sample with no movement.
    #[must_use]
    pub const fn began() -> Self {
        Self::new(PanPhase::Began, 0.0, 0.0)
    }

    /// `Changed` sample.
    #[must_use]
    pub const fn changed(translation_y: f64) -> Self {
        Self::new(PanPhase::Changed, translation_y, 0.0)
    }

    /// `Ended` sample.
    #[must_use]
    pub const fn ended(translation_y: f64, velocity_y: f64) -> Self {
        Self::new(PanPhase::Ended, translation_y, velocity_y)
    }
}

/// When a finished drag dismisses the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissThreshold {
    /// Minimum downward translation.
    /// Default: 25.0 points
    pub min_distance: f64,
    /// Velocity must exceed this (downward).
    /// Default: 0.0 points per second
    pub min_velocity: f64,
}

impl Default for DismissThreshold {
    fn default() -> Self {
        Self {
            min_distance: 25.0,
            min_velocity: 0.0,
        }
    }
}

impl DismissThreshold {
    /// Decide the outcome of a gesture that ended at `translation` with `velocity`.
    #[must_use]
    pub fn resolve(&self, translation: f64, velocity: f64) -> PanOutcome {
        if translation >= self.min_distance && velocity > self.min_velocity {
            PanOutcome::Dismiss { velocity }
        } else {
            PanOutcome::Restore
        }
    }
}

/// What to do with the card when the gesture ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanOutcome {
    /// Pop the card, carrying the release velocity into the exit spring.
    Dismiss {
        /// Release velocity, points per second.
        velocity: f64,
    },
    /// Spring the card back to its resting position.
    Restore,
}

/// State of one drag on the top card.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    dimension: f64,
    raw_translation: f64,
    applied_translation: f64,
    samples: usize,
}

impl DragSession {
    /// Start tracking a drag on a view `dimension` points tall.
    #[must_use]
    pub fn begin(dimension: f64) -> Self {
        Self {
            dimension,
            raw_translation: 0.0,
            applied_translation: 0.0,
            samples: 0,
        }
    }

    /// Feed a raw translation; returns the translation to apply to the view.
    pub fn update(&mut self, translation: f64) -> f64 {
        if translation.is_finite() {
            self.raw_translation = translation;
            self.applied_translation = constrain_translation(translation, self.dimension);
        }
        self.samples += 1;
        self.applied_translation
    }

    /// Resolve the session for a terminal sample.
    ///
    /// Only a normal `Ended` can dismiss; cancelled and failed gestures always
    /// restore.
    #[must_use]
    pub fn finish(&mut self, event: PanEvent, threshold: &DismissThreshold) -> PanOutcome {
        self.update(event.translation_y);
        match event.phase {
            PanPhase::Ended => threshold.resolve(self.raw_translation, event.velocity_y),
            _ => PanOutcome::Restore,
        }
    }

    /// Translation currently applied to the view.
    #[must_use]
    pub fn applied_translation(&self) -> f64 {
        self.applied_translation
    }

    /// Last raw translation from the recognizer.
    #[must_use]
    pub fn raw_translation(&self) -> f64 {
        self.raw_translation
    }

    /// How far the view is lifted above its resting position (never negative).
    #[must_use]
    pub fn lift(&self) -> f64 {
        (-self.applied_translation).max(0.0)
    }

    /// Number of samples seen so far.
    #[must_use]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Dimension used for rubber banding.
    #[must_use]
    pub fn dimension(&self) -> f64 {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT: f64 = 500.0;

    #[test]
    fn rubber_band_zero() {
        assert_eq!(rubber_band(0.0, HEIGHT), 0.0);
    }

    #[test]
    fn rubber_band_is_odd() {
        for x in [1.0, 10.0, 250.0, 10_000.0] {
            assert_eq!(rubber_band(-x, HEIGHT), -rubber_band(x, HEIGHT));
        }
    }

    #[test]
    fn rubber_band_resists_strongly() {
        let r = rubber_band(100.0, HEIGHT);
        assert!(r > 0.0 && r < 1.0, "100pt pull should move under 1pt, got {r}");
    }

    #[test]
    fn rubber_band_bounded_by_dimension() {
        assert!(rubber_band(1e12, HEIGHT) < HEIGHT);
        assert!(rubber_band(f64::INFINITY, HEIGHT) < HEIGHT);
        assert!(rubber_band(-1e300, HEIGHT) > -HEIGHT);
    }

    #[test]
    fn rubber_band_degenerate_dimension() {
        assert_eq!(rubber_band(50.0, 0.0), 0.0);
        assert_eq!(rubber_band(50.0, -10.0), 0.0);
        assert_eq!(rubber_band(f64::NAN, HEIGHT), 0.0);
    }

    #[test]
    fn downward_follows_touch() {
        assert_eq!(constrain_translation(42.0, HEIGHT), 42.0);
    }

    #[test]
    fn upward_is_resisted() {
        let y = constrain_translation(-80.0, HEIGHT);
        assert!(y < 0.0 && y > -1.0);
    }

    #[test]
    fn dismiss_decisions() {
        let t = DismissThreshold::default();
        assert_eq!(t.resolve(30.0, 5.0), PanOutcome::Dismiss { velocity: 5.0 });
        assert_eq!(t.resolve(30.0, -5.0), PanOutcome::Restore);
        assert_eq!(t.resolve(10.0, 5.0), PanOutcome::Restore);
        assert_eq!(t.resolve(25.0, 0.1), PanOutcome::Dismiss { velocity: 0.1 });
        assert_eq!(t.resolve(30.0, 0.0), PanOutcome::Restore);
    }

    #[test]
    fn session_tracks_lift() {
        let mut s = DragSession::begin(HEIGHT);
        assert_eq!(s.update(60.0), 60.0);
        assert_eq!(s.lift(), 0.0);
        let y = s.update(-200.0);
        assert!(y < 0.0);
        assert_eq!(s.lift(), -y);
        assert_eq!(s.samples(), 2);
        assert_eq!(s.raw_translation(), -200.0);
    }

    #[test]
    fn cancelled_session_restores_even_past_threshold() {
        let mut s = DragSession::begin(HEIGHT);
        s.update(100.0);
        let outcome = s.finish(
            PanEvent::new(PanPhase::Cancelled, 100.0, 900.0),
            &DismissThreshold::default(),
        );
        assert_eq!(outcome, PanOutcome::Restore);
    }

    #[test]
    fn ended_session_dismisses() {
        let mut s = DragSession::begin(HEIGHT);
        let outcome = s.finish(PanEvent::ended(30.0, 5.0), &DismissThreshold::default());
        assert_eq!(outcome, PanOutcome::Dismiss { velocity: 5.0 });
        assert_eq!(s.applied_translation(), 30.0);
    }

    #[test]
    fn non_finite_samples_are_ignored() {
        let mut s = DragSession::begin(HEIGHT);
        s.update(12.0);
        assert_eq!(s.update(f64::NAN), 12.0);
    }

    #[test]
    fn terminal_phases() {
        assert!(!PanPhase::Began.is_terminal());
        assert!(!PanPhase::Changed.is_terminal());
        assert!(PanPhase::Ended.is_terminal());
        assert!(PanPhase::Cancelled.is_terminal());
        assert!(PanPhase::Failed.is_terminal());
    }
}
