#![forbid(unsafe_code)]

//! Deterministic card stack simulator.
//!
//! `StackSimulator` drives a [`CardStackController`] on a [`RecordingHost`]
//! with a fixed frame step, collecting every [`StackEvent`] and transition
//! notification along the way.
//!
//! # Example
//!
//! ```
//! use cards_core::view::ViewId;
//! use cards_harness::StackSimulator;
//!
//! let mut sim = StackSimulator::new();
//! let op = sim.push(ViewId(1), true);
//! sim.settle();
//! assert_eq!(sim.completion_count(op), 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use cards_core::gesture::{PanEvent, PanPhase};
use cards_core::view::{Property, ViewId};
use cards_stack::config::CardStackConfig;
use cards_stack::controller::{CardStackController, OperationId, PanResponse, StackEvent};
use cards_stack::transition::TransitionEvent;
use serde_json::{Value, json};

use crate::recording_host::RecordingHost;

/// Default frame step (about 60 Hz).
pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);

/// Frames [`StackSimulator::settle`] runs before giving up.
pub const MAX_SETTLE_FRAMES: u32 = 2_000;

/// Frame-stepped simulation of one card stack.
#[derive(Debug)]
pub struct StackSimulator {
    controller: CardStackController<RecordingHost>,
    frame: Duration,
    frames: u64,
    elapsed: Duration,
    events: Vec<StackEvent>,
    transitions: Rc<RefCell<Vec<TransitionEvent>>>,
}

impl Default for StackSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StackSimulator {
    /// Simulator with the default host and configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_host(RecordingHost::default(), CardStackConfig::default())
    }

    /// Simulator with the default host and `config`.
    #[must_use]
    pub fn with_config(config: CardStackConfig) -> Self {
        Self::with_host(RecordingHost::default(), config)
    }

    /// Simulator over a custom host.
    #[must_use]
    pub fn with_host(host: RecordingHost, config: CardStackConfig) -> Self {
        let mut controller = CardStackController::new(host, config);
        let transitions = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&transitions);
        controller.observe_transitions(move |event| sink.borrow_mut().push(*event));
        Self {
            controller,
            frame: DEFAULT_FRAME,
            frames: 0,
            elapsed: Duration::ZERO,
            events: Vec::new(),
            transitions,
        }
    }

    /// Use a different frame step (builder).
    #[must_use]
    pub fn with_frame(mut self, frame: Duration) -> Self {
        self.frame = frame;
        self
    }

    /// Controller under simulation.
    #[must_use]
    pub fn controller(&self) -> &CardStackController<RecordingHost> {
        &self.controller
    }

    /// Mutable controller access. Events it queues are collected on the
    /// next simulator call.
    pub fn controller_mut(&mut self) -> &mut CardStackController<RecordingHost> {
        &mut self.controller
    }

    /// Recording host.
    #[must_use]
    pub fn host(&self) -> &RecordingHost {
        self.controller.host()
    }

    /// Frames stepped so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulated time so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn collect(&mut self) {
        self.events.extend(self.controller.drain_events());
    }

    // --- Driving -----------------------------------------------------------

    /// Push `content`.
    pub fn push(&mut self, content: ViewId, animated: bool) -> OperationId {
        let op = self.controller.push(content, animated);
        self.collect();
        op
    }

    /// Pop the top card.
    pub fn pop(&mut self, animated: bool) -> Option<OperationId> {
        let op = self.controller.pop(animated);
        self.collect();
        op
    }

    /// Reconcile against `contents`.
    pub fn set_cards(&mut self, contents: &[ViewId], animated: bool) -> OperationId {
        let op = self.controller.set_cards(contents.to_vec(), animated);
        self.collect();
        op
    }

    /// Feed one pan sample.
    pub fn pan(&mut self, event: PanEvent) -> PanResponse {
        let response = self.controller.handle_pan(event);
        self.collect();
        response
    }

    /// Drag the top card to `translation` in `steps` frames and release it
    /// with `velocity`. Returns the response to the release.
    pub fn drag(&mut self, translation: f64, velocity: f64, steps: u32) -> PanResponse {
        if self.pan(PanEvent::began()) != PanResponse::Tracking {
            return PanResponse::Ignored;
        }
        let steps = steps.max(1);
        for step in 1..=steps {
            let y = translation * f64::from(step) / f64::from(steps);
            self.pan(PanEvent::changed(y));
            self.step();
        }
        self.pan(PanEvent::new(PanPhase::Ended, translation, velocity))
    }

    /// Advance one frame.
    pub fn step(&mut self) {
        self.controller.tick(self.frame);
        self.frames += 1;
        self.elapsed += self.frame;
        self.collect();
    }

    /// Advance `n` frames.
    pub fn step_n(&mut self, n: u32) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Step until the controller settles; returns the frames it took.
    ///
    /// # Panics
    ///
    /// Panics if the controller is still busy after [`MAX_SETTLE_FRAMES`].
    pub fn settle(&mut self) -> u32 {
        let mut frames = 0;
        while !self.controller.is_settled() {
            assert!(
                frames < MAX_SETTLE_FRAMES,
                "stack did not settle within {MAX_SETTLE_FRAMES} frames: {:?}",
                self.controller.state()
            );
            self.step();
            frames += 1;
        }
        self.collect();
        frames
    }

    // --- Inspection --------------------------------------------------------

    /// Every event collected so far.
    #[must_use]
    pub fn events(&self) -> &[StackEvent] {
        &self.events
    }

    /// Take the collected events.
    pub fn take_events(&mut self) -> Vec<StackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Completed operations, in completion order.
    #[must_use]
    pub fn completions(&self) -> Vec<OperationId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StackEvent::Completed(op) => Some(*op),
                _ => None,
            })
            .collect()
    }

    /// How many times `op` completed.
    #[must_use]
    pub fn completion_count(&self, op: OperationId) -> usize {
        self.events
            .iter()
            .filter(|e| **e == StackEvent::Completed(op))
            .count()
    }

    /// Whether `op` resolved as a no-op.
    #[must_use]
    pub fn was_skipped(&self, op: OperationId) -> bool {
        self.events.contains(&StackEvent::Skipped(op))
    }

    /// Transition notifications so far.
    #[must_use]
    pub fn transitions(&self) -> Vec<TransitionEvent> {
        self.transitions.borrow().clone()
    }

    /// Contents whose dismiss affordance is currently interactive.
    #[must_use]
    pub fn enabled_affordances(&self) -> Vec<ViewId> {
        self.controller
            .cards()
            .iter()
            .filter(|card| self.host().is_interactive(card.dismiss()))
            .map(|card| card.content())
            .collect()
    }

    /// Presented translation of the container presenting `content`.
    #[must_use]
    pub fn translation_of(&self, content: ViewId) -> Option<f64> {
        let card = self.controller.card(content)?;
        Some(
            self.host()
                .property_or_identity(card.container(), Property::TranslationY),
        )
    }

    /// JSON snapshot of the stack and host.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let contents: Vec<u64> = self
            .controller
            .contents()
            .iter()
            .map(|c| c.get())
            .collect();
        json!({
            "contents": contents,
            "state": format!("{:?}", self.controller.state()),
            "top_dismissable": self.controller.top_dismissable(),
            "host": self.host().snapshot(),
        })
    }
}
