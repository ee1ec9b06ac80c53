#![forbid(unsafe_code)]

//! Card stack controller.
//!
//! [`CardStackController`] owns the ordered card list and turns push, pop,
//! reconciliation and drag-to-dismiss requests into per-card animations on
//! an [`AnimationDriver`]. Each request runs as one *transaction*: the card
//! list is mutated first, every card is laid out toward its new depth, and
//! the transaction finishes once every animation it started has resolved.
//!
//! # State machine
//!
//! ```text
//!            push                  settle
//!   Empty ───────────▶ Transitioning ───────▶ Idle
//!                          ▲   ▲                │ │
//!          push/pop/set    │   │ release        │ │ pan began
//!          ────────────────┘   └──── Dragging ◀─┘ │ (top dismissable)
//!                                                 │
//!                    pop/set to empty ────────────┘
//! ```
//!
//! The state is derived, never stored: `Dragging` while a drag session is
//! open, `Transitioning` while a transaction is active, otherwise `Empty` or
//! `Idle` depending on the card list.
//!
//! # Invariants
//!
//! 1. Requests made while a transaction or drag is in flight are queued and
//!    started in FIFO order once the controller is free. A drag released
//!    into a dismissal pops the dragged card before any queued request runs.
//! 2. Every [`OperationId`] is resolved by exactly one
//!    [`StackEvent::Completed`] or [`StackEvent::Skipped`].
//! 3. After a transaction settles, only the top card's affordance is
//!    interactive, and only if that card is dismissable.
//! 4. A dismissed container stays attached until its exit animation
//!    resolves, then is detached exactly once.
//! 5. The content extension applied during a drag is reset to the card's
//!    stored extension exactly when the card settles.
//! 6. Only a dismissable top card is dismissed by a drag, even if it became
//!    non-dismissable mid-gesture.
//!
//! # Lifecycle order
//!
//! `Attached` for new containers, then `WillDisappear` (old top) and
//! `WillAppear` (new top) before any animation starts. When everything
//! settles: `DidDisappear`, `DidAppear`, `Detached` for each removed card,
//! the transition `Ended` notification, and finally `Completed`.

use std::collections::VecDeque;
use std::time::Duration;

use cards_core::animation::{Curve, SpringParams};
use cards_core::gesture::{DragSession, PanEvent, PanOutcome, PanPhase};
use cards_core::view::{Property, ViewId};
use tracing::{debug, trace, warn};

use crate::card::{Card, Channels};
use crate::config::CardStackConfig;
use crate::driver::{AnimationDriver, AnimationKey, AnimationToken, DriverEvent, DriverMode};
use crate::host::CardHost;
use crate::pop_animation::PopAnimation;
use crate::transition::{TransitionCoordinator, TransitionEvent, TransitionId, TransitionKind};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Identifier of one requested stack operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OperationId(u64);

impl OperationId {
    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Notification queued by the controller. Views are identified by content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackEvent {
    /// A container joined the stack view.
    Attached(ViewId),
    /// A card is about to become the top card.
    WillAppear(ViewId),
    /// A card became the top card.
    DidAppear(ViewId),
    /// The top card is about to stop being the top card.
    WillDisappear(ViewId),
    /// A card stopped being the top card.
    DidDisappear(ViewId),
    /// A container left the stack view.
    Detached(ViewId),
    /// An operation settled.
    Completed(OperationId),
    /// A queued operation turned out to be a no-op.
    Skipped(OperationId),
}

/// Derived controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackState {
    /// No cards.
    Empty,
    /// Cards at rest.
    Idle,
    /// A transaction is animating.
    Transitioning,
    /// The user is dragging the top card.
    Dragging,
}

/// How the controller reacted to a pan sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanResponse {
    /// The sample was not consumed.
    Ignored,
    /// A drag session is tracking the gesture.
    Tracking,
    /// The release dismissed the top card.
    Dismissing(OperationId),
    /// The release sends the card back to rest.
    Restoring,
}

// ---------------------------------------------------------------------------
// Internal bookkeeping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Request {
    Push {
        content: ViewId,
        animated: bool,
    },
    Pop {
        animated: bool,
        velocity: Option<f64>,
    },
    SetCards {
        contents: Vec<ViewId>,
        animated: bool,
    },
}

#[derive(Debug)]
struct Transaction {
    op: Option<OperationId>,
    transition: Option<TransitionId>,
    pending: Vec<AnimationToken>,
    discards: Vec<PopAnimation>,
    appearing: Option<ViewId>,
    disappearing: Option<ViewId>,
    leaving: Vec<Card>,
    restore_extension: Option<(ViewId, f64)>,
}

impl Transaction {
    fn new(op: Option<OperationId>) -> Self {
        Self {
            op,
            transition: None,
            pending: Vec::new(),
            discards: Vec::new(),
            appearing: None,
            disappearing: None,
            leaving: Vec::new(),
            restore_extension: None,
        }
    }

    /// Settled and cancelled tokens both count as resolved.
    fn resolve(&mut self, event: &DriverEvent, driver: &mut AnimationDriver) {
        let token = event.token();
        if let Some(idx) = self.pending.iter().position(|t| *t == token) {
            self.pending.swap_remove(idx);
            return;
        }
        for discard in &mut self.discards {
            if discard.handle(event, driver) {
                trace!(view = discard.view().0, "discard settled");
            }
        }
    }

    fn is_settled(&self) -> bool {
        self.pending.is_empty() && self.discards.iter().all(PopAnimation::is_finished)
    }
}

#[derive(Debug)]
struct Drag {
    session: DragSession,
    content: ViewId,
    stored_extension: f64,
}

// ---------------------------------------------------------------------------
// CardStackController
// ---------------------------------------------------------------------------

/// Presents a stack of cards on a [`CardHost`].
pub struct CardStackController<H: CardHost> {
    host: H,
    config: CardStackConfig,
    cards: Vec<Card>,
    driver: AnimationDriver,
    transitions: TransitionCoordinator,
    active: Option<Transaction>,
    queue: VecDeque<(OperationId, Request)>,
    drag: Option<Drag>,
    events: Vec<StackEvent>,
    next_op: u64,
}

impl<H: CardHost + std::fmt::Debug> std::fmt::Debug for CardStackController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardStackController")
            .field("host", &self.host)
            .field("cards", &self.cards.len())
            .field("state", &self.state())
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl<H: CardHost> CardStackController<H> {
    /// Create an empty controller presenting on `host`.
    #[must_use]
    pub fn new(host: H, config: CardStackConfig) -> Self {
        let mode = if config.reduced_motion {
            DriverMode::Instant
        } else {
            DriverMode::Animated
        };
        Self {
            host,
            config,
            cards: Vec::new(),
            driver: AnimationDriver::with_mode(mode),
            transitions: TransitionCoordinator::new(),
            active: None,
            queue: VecDeque::new(),
            drag: None,
            events: Vec::new(),
            next_op: 0,
        }
    }

    // --- Accessors ---------------------------------------------------------

    /// Host the stack presents on.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access (for simulating environment changes).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &CardStackConfig {
        &self.config
    }

    /// Animation driver, for inspecting presented values.
    #[must_use]
    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    /// Cards bottom to top.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Card presenting `content`.
    #[must_use]
    pub fn card(&self, content: ViewId) -> Option<&Card> {
        self.cards.iter().find(|c| c.content() == content)
    }

    /// Content views bottom to top.
    #[must_use]
    pub fn contents(&self) -> Vec<ViewId> {
        self.cards.iter().map(Card::content).collect()
    }

    /// Content of the top card.
    #[must_use]
    pub fn top(&self) -> Option<ViewId> {
        self.cards.last().map(Card::content)
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the stack has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> StackState {
        if self.drag.is_some() {
            StackState::Dragging
        } else if self.active.is_some() {
            StackState::Transitioning
        } else if self.cards.is_empty() {
            StackState::Empty
        } else {
            StackState::Idle
        }
    }

    /// Whether a push, pop or replace transition is bracketed right now.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transitions.is_transitioning()
    }

    /// No transaction is active and no animation is running. Open drag
    /// sessions do not count.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.active.is_none() && self.queue.is_empty() && self.driver.running_count() == 0
    }

    /// Number of requests waiting for the current transaction.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Subscribe to transition begin/end notifications.
    pub fn observe_transitions(&mut self, observer: impl FnMut(&TransitionEvent) + 'static) {
        self.transitions.observe(observer);
    }

    /// Drain queued lifecycle and completion events.
    pub fn drain_events(&mut self) -> Vec<StackEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Operations --------------------------------------------------------

    /// Push `content` on top of the stack.
    pub fn push(&mut self, content: ViewId, animated: bool) -> OperationId {
        let op = self.mint();
        self.request(op, Request::Push { content, animated });
        op
    }

    /// Pop the top card.
    ///
    /// Returns `None` without doing anything when the stack holds at most one
    /// card and nothing is in flight. A pop queued behind other work that
    /// finds a root-only stack resolves as [`StackEvent::Skipped`].
    pub fn pop(&mut self, animated: bool) -> Option<OperationId> {
        self.pop_inner(animated, None)
    }

    /// Pop the top card, seeding its exit spring with `velocity` (points per
    /// second, positive downward).
    pub fn pop_with_velocity(&mut self, animated: bool, velocity: f64) -> Option<OperationId> {
        self.pop_inner(animated, Some(velocity))
    }

    fn pop_inner(&mut self, animated: bool, velocity: Option<f64>) -> Option<OperationId> {
        if !self.is_busy() && self.cards.len() <= 1 {
            debug!(len = self.cards.len(), "pop ignored on root-only stack");
            return None;
        }
        let op = self.mint();
        self.request(op, Request::Pop { animated, velocity });
        Some(op)
    }

    /// Reconcile the stack against `contents` (bottom to top).
    ///
    /// Duplicate entries keep their first position.
    pub fn set_cards(&mut self, contents: Vec<ViewId>, animated: bool) -> OperationId {
        let op = self.mint();
        self.request(op, Request::SetCards { contents, animated });
        op
    }

    /// Whether the top card may be dismissed. `false` on an empty stack.
    #[must_use]
    pub fn top_dismissable(&self) -> bool {
        self.cards.last().is_some_and(Card::is_dismissable)
    }

    /// Allow or forbid dismissing the top card. Fades its affordance
    /// without moving the card. No-op on an empty stack.
    pub fn set_top_dismissable(&mut self, dismissable: bool) {
        let Some(card) = self.cards.last_mut() else {
            return;
        };
        if card.is_dismissable() == dismissable {
            return;
        }
        card.set_dismissable(dismissable);
        let dismiss = card.dismiss();
        let key = card.key(Property::AffordanceAlpha);
        debug!(content = card.content().0, dismissable, "top dismissable changed");
        self.host.set_interactive(dismiss, dismissable);
        let alpha = if dismissable { 1.0 } else { 0.0 };
        let curve = self.config.affordance_curve();
        self.driver.animate(key, alpha, curve, None, &mut self.host);
        self.pump();
    }

    /// Re-anchor every container after the host's size class changed.
    pub fn traits_changed(&mut self) {
        let class = self.host.size_class();
        let inset = self.config.top_inset.for_class(class);
        debug!(?class, inset, "traits changed");
        let leaving = self.active.iter_mut().flat_map(|tx| tx.leaving.iter_mut());
        for card in self.cards.iter_mut().chain(leaving) {
            if card.top_inset() != inset {
                card.set_top_inset(inset);
                self.host.set_top_inset(card.container(), inset);
            }
        }
    }

    /// Advance animations by `dt` and process everything that settled.
    pub fn tick(&mut self, dt: Duration) {
        self.driver.tick(dt, &mut self.host);
        self.pump();
    }

    // --- Gestures ----------------------------------------------------------

    /// Feed one pan sample recognized on the top card.
    pub fn handle_pan(&mut self, event: PanEvent) -> PanResponse {
        let response = match event.phase {
            PanPhase::Began => self.begin_drag(),
            PanPhase::Changed => self.update_drag(event.translation_y),
            PanPhase::Ended | PanPhase::Cancelled | PanPhase::Failed => self.end_drag(event),
        };
        self.pump();
        response
    }

    fn begin_drag(&mut self) -> PanResponse {
        if self.state() != StackState::Idle {
            trace!(state = ?self.state(), "pan ignored");
            return PanResponse::Ignored;
        }
        let Some(card) = self.cards.last() else {
            return PanResponse::Ignored;
        };
        if !card.is_dismissable() {
            trace!(content = card.content().0, "pan ignored on non-dismissable card");
            return PanResponse::Ignored;
        }
        let height = self.host.container_height(card.container());
        let drag = Drag {
            session: DragSession::begin(height),
            content: card.content(),
            stored_extension: card.content_extension(),
        };
        self.driver.cancel(card.key(Property::TranslationY));
        debug!(content = drag.content.0, height, "drag began");
        self.drag = Some(drag);
        PanResponse::Tracking
    }

    fn update_drag(&mut self, translation: f64) -> PanResponse {
        let Some(drag) = self.drag.as_mut() else {
            return PanResponse::Ignored;
        };
        let applied = drag.session.update(translation);
        let extension = drag.stored_extension + drag.session.lift();
        let content = drag.content;
        if let Some(card) = self.cards.last_mut() {
            card.set_content_extension(extension);
            self.driver
                .set(card.key(Property::TranslationY), applied, &mut self.host);
        }
        self.host.set_content_extension(content, extension);
        PanResponse::Tracking
    }

    fn end_drag(&mut self, event: PanEvent) -> PanResponse {
        let Some(mut drag) = self.drag.take() else {
            return PanResponse::Ignored;
        };
        let outcome = drag.session.finish(event, &self.config.dismiss_threshold);
        let restore = Some((drag.content, drag.stored_extension));
        let Some(card) = self.cards.last_mut() else {
            return PanResponse::Ignored;
        };
        let key = card.key(Property::TranslationY);
        let applied = drag.session.applied_translation();
        let extension = drag.stored_extension + drag.session.lift();
        card.set_content_extension(extension);
        let dismissable = card.is_dismissable();
        self.driver.set(key, applied, &mut self.host);
        self.host.set_content_extension(drag.content, extension);
        debug!(
            content = drag.content.0,
            translation = drag.session.raw_translation(),
            velocity = event.velocity_y,
            phase = ?event.phase,
            ?outcome,
            dismissable,
            "drag ended"
        );

        // Runs ahead of anything queued during the drag.
        if let PanOutcome::Dismiss { velocity } = outcome
            && dismissable
            && self.cards.len() > 1
        {
            let op = self.mint();
            self.start_pop(op, true, Some(velocity));
            if let Some(tx) = self.active.as_mut() {
                tx.restore_extension = restore;
            }
            return PanResponse::Dismissing(op);
        }

        let mut tx = Transaction::new(None);
        tx.restore_extension = restore;
        let spring = self.config.restore_spring;
        self.layout_cards(&mut tx, spring, true, Channels::TRANSLATION);
        self.active = Some(tx);
        PanResponse::Restoring
    }

    // --- Scheduling --------------------------------------------------------

    fn mint(&mut self) -> OperationId {
        self.next_op += 1;
        OperationId(self.next_op)
    }

    fn is_busy(&self) -> bool {
        self.active.is_some() || self.drag.is_some() || !self.queue.is_empty()
    }

    fn request(&mut self, op: OperationId, request: Request) {
        if self.is_busy() {
            debug!(op = op.0, queued = self.queue.len() + 1, "operation queued");
            self.queue.push_back((op, request));
        } else {
            self.start(op, request);
        }
        self.pump();
    }

    fn start(&mut self, op: OperationId, request: Request) {
        match request {
            Request::Push { content, animated } => self.start_push(op, content, animated),
            Request::Pop { animated, velocity } => self.start_pop(op, animated, velocity),
            Request::SetCards { contents, animated } => {
                self.start_set_cards(op, contents, animated);
            }
        }
    }

    /// Resolve driver events until nothing changes, finishing the active
    /// transaction and starting queued requests as they become possible.
    fn pump(&mut self) {
        loop {
            let events = self.driver.drain_events();
            if let Some(tx) = self.active.as_mut() {
                for event in &events {
                    tx.resolve(event, &mut self.driver);
                }
            }
            let mut progressed = false;
            if self.active.as_ref().is_some_and(Transaction::is_settled) {
                self.finish_active();
                progressed = true;
            }
            if self.active.is_none()
                && self.drag.is_none()
                && let Some((op, request)) = self.queue.pop_front()
            {
                self.start(op, request);
                progressed = true;
            }
            if !progressed && self.driver.pending_event_count() == 0 {
                break;
            }
        }
    }

    fn finish_active(&mut self) {
        let Some(mut tx) = self.active.take() else {
            return;
        };
        if let Some((content, extension)) = tx.restore_extension {
            if let Some(card) = self
                .cards
                .iter_mut()
                .chain(tx.leaving.iter_mut())
                .find(|c| c.content() == content)
            {
                card.set_content_extension(extension);
            }
            self.host.set_content_extension(content, extension);
        }
        if let Some(view) = tx.disappearing {
            self.events.push(StackEvent::DidDisappear(view));
        }
        if let Some(view) = tx.appearing {
            self.events.push(StackEvent::DidAppear(view));
        }
        for card in tx.leaving {
            self.detach_card(card);
        }
        if let Some(id) = tx.transition {
            self.transitions.end(id);
        }
        if let Some(op) = tx.op {
            debug!(op = op.0, len = self.cards.len(), "operation completed");
            self.events.push(StackEvent::Completed(op));
        }
    }

    // --- Transactions ------------------------------------------------------

    fn start_push(&mut self, op: OperationId, content: ViewId, animated: bool) {
        if self.card(content).is_some() {
            warn!(op = op.0, content = content.0, "push of a card already in the stack");
            self.events.push(StackEvent::Skipped(op));
            return;
        }
        debug!(op = op.0, content = content.0, animated, depth = self.cards.len(), "push");
        let mut tx = Transaction::new(Some(op));
        let card = self.attach_card(content);
        tx.disappearing = self.top();
        tx.appearing = Some(content);
        self.emit_will(&tx);
        tx.transition = Some(self.transitions.begin(TransitionKind::Push));
        self.host.layout_if_needed();
        if animated {
            let offscreen = self.offscreen(&card);
            self.driver
                .set(card.key(Property::TranslationY), offscreen, &mut self.host);
        }
        self.cards.push(card);
        let spring = self.config.push_spring;
        self.layout_cards(&mut tx, spring, animated, Channels::all());
        self.active = Some(tx);
    }

    fn start_pop(&mut self, op: OperationId, animated: bool, velocity: Option<f64>) {
        if self.cards.len() <= 1 {
            debug!(op = op.0, "queued pop skipped on root-only stack");
            self.events.push(StackEvent::Skipped(op));
            return;
        }
        let Some(removed) = self.cards.pop() else {
            return;
        };
        debug!(op = op.0, content = removed.content().0, animated, ?velocity, "pop");
        let mut tx = Transaction::new(Some(op));
        tx.disappearing = Some(removed.content());
        tx.appearing = self.top();
        self.emit_will(&tx);
        tx.transition = Some(self.transitions.begin(TransitionKind::Pop));
        let spring = self.config.pop_spring;
        self.dismiss_top(&mut tx, removed, spring, animated, velocity);
        self.layout_cards(&mut tx, spring, animated, Channels::all());
        self.active = Some(tx);
    }

    fn start_set_cards(&mut self, op: OperationId, contents: Vec<ViewId>, animated: bool) {
        let mut wanted: Vec<ViewId> = Vec::with_capacity(contents.len());
        for content in contents {
            if !wanted.contains(&content) {
                wanted.push(content);
            }
        }
        let mut tx = Transaction::new(Some(op));
        if wanted == self.contents() {
            debug!(op = op.0, "set_cards unchanged");
            self.active = Some(tx);
            return;
        }
        debug!(op = op.0, from = self.cards.len(), to = wanted.len(), animated, "set_cards");

        let old_top = self.top();
        let new_top = wanted.last().copied();
        let mut current = std::mem::take(&mut self.cards);
        let mut added = Vec::new();
        let mut ordered = Vec::with_capacity(wanted.len());
        for content in &wanted {
            match current.iter().position(|c| c.content() == *content) {
                Some(idx) => ordered.push(current.remove(idx)),
                None => {
                    let card = self.attach_card(*content);
                    added.push(card.content());
                    ordered.push(card);
                }
            }
        }
        if old_top != new_top {
            tx.disappearing = old_top;
            tx.appearing = new_top;
        }
        self.emit_will(&tx);
        tx.transition = Some(self.transitions.begin(TransitionKind::Replace));
        self.host.layout_if_needed();

        // `current` now holds only the removed cards.
        let spring = self.config.pop_spring;
        for card in current {
            if Some(card.content()) == old_top {
                self.dismiss_top(&mut tx, card, spring, animated, None);
            } else if animated {
                self.set_card_interactive(&card, false);
                let mut discard = PopAnimation::new(card.container())
                    .distance(self.config.discard_distance)
                    .duration(self.config.discard_duration);
                discard.start(&mut self.driver, &mut self.host);
                tx.discards.push(discard);
                tx.leaving.push(card);
            } else {
                self.set_card_interactive(&card, false);
                tx.leaving.push(card);
            }
        }

        if animated {
            for card in ordered.iter().filter(|c| added.contains(&c.content())) {
                let offscreen = self.offscreen(card);
                self.driver
                    .set(card.key(Property::TranslationY), offscreen, &mut self.host);
            }
        }
        self.cards = ordered;
        let spring = self.config.push_spring;
        self.layout_cards(&mut tx, spring, animated, Channels::all());
        self.active = Some(tx);
    }

    // --- Helpers -----------------------------------------------------------

    fn attach_card(&mut self, content: ViewId) -> Card {
        let views = self.host.make_container(content, &self.config.dismiss_icon);
        let inset = self.config.top_inset.for_class(self.host.size_class());
        self.host.attach(views.container, inset);
        self.events.push(StackEvent::Attached(content));
        Card::new(content, views, inset)
    }

    fn detach_card(&mut self, card: Card) {
        self.driver.forget_view(card.container());
        self.driver.forget_view(card.dismiss());
        self.host
            .set_content_extension(card.content(), card.content_extension());
        self.host.detach(card.container());
        self.events.push(StackEvent::Detached(card.content()));
    }

    fn emit_will(&mut self, tx: &Transaction) {
        if let Some(view) = tx.disappearing {
            self.events.push(StackEvent::WillDisappear(view));
        }
        if let Some(view) = tx.appearing {
            self.events.push(StackEvent::WillAppear(view));
        }
    }

    fn offscreen(&self, card: &Card) -> f64 {
        self.host.bounds().height - card.top_inset()
    }

    fn set_card_interactive(&mut self, card: &Card, interactive: bool) {
        self.host.set_interactive(card.container(), interactive);
        self.host.set_interactive(card.dismiss(), interactive);
    }

    /// Send a removed top card down and out; it detaches when the
    /// transaction finishes.
    fn dismiss_top(
        &mut self,
        tx: &mut Transaction,
        card: Card,
        spring: SpringParams,
        animated: bool,
        velocity: Option<f64>,
    ) {
        self.set_card_interactive(&card, false);
        let to = self.offscreen(&card);
        let key = card.key(Property::TranslationY);
        let token = if animated {
            self.driver
                .animate(key, to, Curve::Spring(spring), velocity, &mut self.host)
        } else {
            self.driver.apply_now(key, to, &mut self.host)
        };
        tx.pending.push(token);
        tx.leaving.push(card);
    }

    /// Move every card toward the appearance of its depth.
    fn layout_cards(
        &mut self,
        tx: &mut Transaction,
        spring: SpringParams,
        animated: bool,
        channels: Channels,
    ) {
        let curve = Curve::Spring(spring);
        let fade = self.config.affordance_curve();
        let count = self.cards.len();
        for idx in 0..count {
            let depth = count - 1 - idx;
            let card = &self.cards[idx];
            let look = self.config.appearance.appearance_at(depth);
            let mut targets: Vec<(AnimationKey, f64, Curve)> = Vec::with_capacity(4);
            if channels.contains(Channels::TRANSLATION) {
                targets.push((card.key(Property::TranslationY), look.offset, curve));
            }
            if channels.contains(Channels::SCALE) {
                targets.push((card.key(Property::Scale), look.scale, curve));
            }
            if channels.contains(Channels::OPACITY) {
                targets.push((card.key(Property::Opacity), look.opacity, curve));
            }
            if channels.contains(Channels::AFFORDANCE) {
                let enabled = card.affordance_enabled(depth == 0);
                let (container, dismiss) = (card.container(), card.dismiss());
                targets.push((
                    card.key(Property::AffordanceAlpha),
                    if enabled { 1.0 } else { 0.0 },
                    fade,
                ));
                self.host.set_interactive(container, depth == 0);
                self.host.set_interactive(dismiss, enabled);
            }
            trace!(idx, depth, offset = look.offset, scale = look.scale, "layout card");
            for (key, to, curve) in targets {
                let token = if animated {
                    self.driver.animate(key, to, curve, None, &mut self.host)
                } else {
                    self.driver.apply_now(key, to, &mut self.host)
                };
                tx.pending.push(token);
            }
        }
    }
}
