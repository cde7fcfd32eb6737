//! In-memory diagnostics recorder.

use std::cell::RefCell;
use std::collections::VecDeque;

use super::{GuardEvent, Outcome};
use crate::config::DEFAULT_DIAGNOSTICS_CAPACITY;
use crate::policy::PolicyKind;

/// Bounded in-memory recorder for guard decisions.
///
/// Events are kept in the order they happened. Once `capacity` events are
/// held, each new event evicts the oldest one, so a guard that stays active
/// for the life of a surface holds a fixed amount of history. The guard
/// shares one trail with all of its interceptors.
///
/// # Example
///
/// ```
/// use policy_guard::diagnostics::{DiagnosticsTrail, GuardEvent, Outcome};
/// use policy_guard::PolicyKind;
///
/// let trail = DiagnosticsTrail::new();
/// trail.record(GuardEvent::new("root", PolicyKind::PrintBlock, Outcome::Suppressed));
///
/// assert_eq!(trail.count(PolicyKind::PrintBlock, Outcome::Suppressed), 1);
/// ```
#[derive(Debug)]
pub struct DiagnosticsTrail {
    events: RefCell<VecDeque<GuardEvent>>,
    capacity: usize,
}

impl DiagnosticsTrail {
    /// Creates a new empty trail holding up to
    /// [`DEFAULT_DIAGNOSTICS_CAPACITY`] events.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_DIAGNOSTICS_CAPACITY)
    }

    /// Creates a new empty trail holding up to `capacity` events.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: RefCell::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Returns the maximum number of events kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Emits an event through tracing and stores it, evicting the oldest
    /// event when full.
    pub fn record(&self, event: GuardEvent) {
        event.emit();
        let mut events = self.events.borrow_mut();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Returns a snapshot of the retained events, oldest first.
    pub fn events(&self) -> Vec<GuardEvent> {
        self.events.borrow().iter().cloned().collect()
    }

    /// Counts events with the given kind and outcome.
    pub fn count(&self, kind: PolicyKind, outcome: Outcome) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.kind() == kind && e.outcome() == outcome)
            .count()
    }

    /// Returns the number of retained events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Clears all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Default for DiagnosticsTrail {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_starts_empty() {
        let trail = DiagnosticsTrail::new();
        assert!(trail.is_empty());
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn trail_records_in_order() {
        let trail = DiagnosticsTrail::new();
        trail.record(GuardEvent::new("a", PolicyKind::DragBlock, Outcome::Suppressed));
        trail.record(GuardEvent::new("a", PolicyKind::ContextMenuBlock, Outcome::Allowed));

        let events = trail.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), PolicyKind::DragBlock);
        assert_eq!(events[1].outcome(), Outcome::Allowed);
        assert_eq!(trail.count(PolicyKind::ContextMenuBlock, Outcome::Allowed), 1);
        assert_eq!(trail.count(PolicyKind::ContextMenuBlock, Outcome::Suppressed), 0);
    }

    #[test]
    fn trail_is_capped_and_evicts_oldest() {
        let trail = DiagnosticsTrail::with_capacity(3);
        for at in 0..10 {
            trail.record(GuardEvent::new("a", PolicyKind::PinchZoomBlock, Outcome::Allowed).at(at));
        }

        assert_eq!(trail.len(), 3);
        let times: Vec<_> = trail.events().iter().map(GuardEvent::timestamp_ms).collect();
        assert_eq!(times, vec![Some(7), Some(8), Some(9)]);
    }

    #[test]
    fn zero_capacity_keeps_latest_event() {
        let trail = DiagnosticsTrail::with_capacity(0);
        assert_eq!(trail.capacity(), 1);
        trail.record(GuardEvent::new("a", PolicyKind::DragBlock, Outcome::Suppressed));
        trail.record(GuardEvent::new("a", PolicyKind::PrintBlock, Outcome::Suppressed));
        assert_eq!(trail.len(), 1);
        assert_eq!(trail.events()[0].kind(), PolicyKind::PrintBlock);
    }

    #[test]
    fn default_capacity() {
        assert_eq!(DiagnosticsTrail::default().capacity(), DEFAULT_DIAGNOSTICS_CAPACITY);
    }

    #[test]
    fn trail_can_be_cleared() {
        let trail = DiagnosticsTrail::new();
        trail.record(GuardEvent::new("a", PolicyKind::PrintBlock, Outcome::Suppressed));
        trail.clear();
        assert!(trail.is_empty());
    }
}
