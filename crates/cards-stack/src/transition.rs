#![forbid(unsafe_code)]

//! Transition bracketing.
//!
//! A [`TransitionCoordinator`] hands out one [`TransitionId`] per push, pop or
//! replace and notifies observers when it begins and ends. Observers use the
//! brackets to, for example, block interaction while cards are moving.
//!
//! # Invariants
//!
//! 1. Each id gets exactly one `Began` and at most one `Ended`, in that order.
//! 2. Beginning a transition while another is current replaces the current
//!    handle. The stale transition stays in flight and still reports `Ended`
//!    when it finishes, but [`current`](TransitionCoordinator::current) and
//!    [`is_transitioning`](TransitionCoordinator::is_transitioning) only
//!    reflect the newest one.
//! 3. Ending an id that is not in flight is a contract violation: it panics
//!    in debug builds and is ignored otherwise.

use std::fmt;

use tracing::debug;

/// Identifier of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionId(u64);

impl TransitionId {
    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What kind of stack change a transition brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// A card is pushed on top.
    Push,
    /// The top card is removed.
    Pop,
    /// The whole stack is reconciled against a new list.
    Replace,
}

impl TransitionKind {
    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Replace => "replace",
        }
    }
}

/// Notification delivered to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    /// A transition started.
    Began {
        /// Transition id.
        id: TransitionId,
        /// Transition kind.
        kind: TransitionKind,
    },
    /// A transition finished.
    Ended {
        /// Transition id.
        id: TransitionId,
        /// Transition kind.
        kind: TransitionKind,
    },
}

type Observer = Box<dyn FnMut(&TransitionEvent)>;

/// Tracks the current transition and every transition still in flight.
#[derive(Default)]
pub struct TransitionCoordinator {
    current: Option<TransitionId>,
    in_flight: Vec<(TransitionId, TransitionKind)>,
    observers: Vec<Observer>,
    next_id: u64,
}

impl fmt::Debug for TransitionCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionCoordinator")
            .field("current", &self.current)
            .field("in_flight", &self.in_flight.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TransitionCoordinator {
    /// Create a coordinator with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to begin/end notifications.
    pub fn observe(&mut self, observer: impl FnMut(&TransitionEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, event: TransitionEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    /// Start a transition, replacing the current handle.
    pub fn begin(&mut self, kind: TransitionKind) -> TransitionId {
        self.next_id += 1;
        let id = TransitionId(self.next_id);
        if let Some(stale) = self.current.replace(id) {
            debug!(stale = stale.0, id = id.0, "transition replaced while in flight");
        }
        self.in_flight.push((id, kind));
        debug!(id = id.0, kind = kind.as_str(), "transition began");
        self.notify(TransitionEvent::Began { id, kind });
        id
    }

    /// Finish a transition.
    pub fn end(&mut self, id: TransitionId) {
        let Some(idx) = self.in_flight.iter().position(|(t, _)| *t == id) else {
            debug_assert!(false, "ended transition {id:?} that is not in flight");
            return;
        };
        let (_, kind) = self.in_flight.remove(idx);
        if self.current == Some(id) {
            self.current = None;
        }
        debug!(id = id.0, kind = kind.as_str(), "transition ended");
        self.notify(TransitionEvent::Ended { id, kind });
    }

    /// The newest transition, if it has not ended.
    #[must_use]
    pub fn current(&self) -> Option<TransitionId> {
        self.current
    }

    /// Whether the newest transition is still running.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.current.is_some()
    }

    /// Number of begun transitions that have not ended (including stale ones).
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether `id` has begun and not yet ended.
    #[must_use]
    pub fn is_in_flight(&self, id: TransitionId) -> bool {
        self.in_flight.iter().any(|(t, _)| *t == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording() -> (TransitionCoordinator, Rc<RefCell<Vec<TransitionEvent>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = TransitionCoordinator::new();
        let sink = Rc::clone(&log);
        coordinator.observe(move |event| sink.borrow_mut().push(*event));
        (coordinator, log)
    }

    #[test]
    fn begin_then_end() {
        let (mut c, log) = recording();
        assert!(!c.is_transitioning());
        let id = c.begin(TransitionKind::Push);
        assert!(c.is_transitioning());
        assert_eq!(c.current(), Some(id));
        c.end(id);
        assert!(!c.is_transitioning());
        assert_eq!(
            *log.borrow(),
            vec![
                TransitionEvent::Began { id, kind: TransitionKind::Push },
                TransitionEvent::Ended { id, kind: TransitionKind::Push },
            ]
        );
    }

    #[test]
    fn stale_transition_still_ends_but_is_not_current() {
        let (mut c, log) = recording();
        let first = c.begin(TransitionKind::Push);
        let second = c.begin(TransitionKind::Pop);
        assert_eq!(c.current(), Some(second));
        assert_eq!(c.in_flight_count(), 2);

        c.end(first);
        assert!(c.is_transitioning(), "stale end must not clear the current one");
        assert_eq!(c.current(), Some(second));
        assert!(!c.is_in_flight(first));

        c.end(second);
        assert!(!c.is_transitioning());
        assert_eq!(log.borrow().len(), 4);
        assert_eq!(
            log.borrow()[2],
            TransitionEvent::Ended { id: first, kind: TransitionKind::Push }
        );
    }

    #[test]
    fn newest_ending_first_leaves_stale_in_flight() {
        let (mut c, _log) = recording();
        let first = c.begin(TransitionKind::Replace);
        let second = c.begin(TransitionKind::Push);
        c.end(second);
        assert!(!c.is_transitioning());
        assert!(c.is_in_flight(first));
        c.end(first);
        assert_eq!(c.in_flight_count(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "not in flight")]
    fn ending_twice_is_a_contract_violation() {
        let mut c = TransitionCoordinator::new();
        let id = c.begin(TransitionKind::Pop);
        c.end(id);
        c.end(id);
    }

    #[test]
    fn ids_are_unique() {
        let mut c = TransitionCoordinator::new();
        let a = c.begin(TransitionKind::Push);
        let b = c.begin(TransitionKind::Push);
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn debug_format() {
        let c = TransitionCoordinator::new();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("TransitionCoordinator"));
        assert!(dbg.contains("in_flight"));
    }
}
