//! Request sequencing.
//!
//! Requests are never cancelled and may resolve in any order. Each one takes a
//! [`Ticket`] when it is issued; a snapshot is painted only if its ticket is
//! newer than the last one painted, so a slow early response cannot overwrite
//! a fast later one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Issue position of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Hands out strictly increasing tickets.
#[derive(Debug)]
pub struct Sequencer {
    next: AtomicU64,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    /// Create a sequencer whose first ticket is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Take the next ticket.
    pub fn issue(&self) -> Ticket {
        Ticket(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Ticket of the last snapshot painted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedMark {
    last: Option<Ticket>,
}

impl AppliedMark {
    /// Record `ticket` as applied if it is newer than the current mark.
    ///
    /// Returns `false` for a stale ticket, which must not be painted.
    pub fn advance(&mut self, ticket: Ticket) -> bool {
        if self.is_stale(ticket) {
            return false;
        }
        self.last = Some(ticket);
        true
    }

    /// Whether `ticket` is not newer than the last applied one.
    #[must_use]
    pub fn is_stale(&self, ticket: Ticket) -> bool {
        self.last.is_some_and(|last| ticket <= last)
    }

    /// Last applied ticket.
    #[must_use]
    pub const fn last(&self) -> Option<Ticket> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let sequencer = Sequencer::new();
        let a = sequencer.issue();
        let b = sequencer.issue();
        assert!(b > a);
        assert_eq!(a.get(), 1);
    }

    #[test]
    fn test_in_order_responses_all_apply() {
        let sequencer = Sequencer::new();
        let mut mark = AppliedMark::default();
        let first = sequencer.issue();
        let second = sequencer.issue();

        assert!(mark.advance(first));
        assert!(mark.advance(second));
        assert_eq!(mark.last(), Some(second));
    }

    #[test]
    fn test_late_response_is_discarded() {
        let sequencer = Sequencer::new();
        let mut mark = AppliedMark::default();
        let first = sequencer.issue();
        let second = sequencer.issue();

        assert!(mark.advance(second));
        assert!(!mark.advance(first));
        assert_eq!(mark.last(), Some(second));
    }

    #[test]
    fn test_same_ticket_applies_once() {
        let mut mark = AppliedMark::default();
        let ticket = Sequencer::new().issue();
        assert!(mark.advance(ticket));
        assert!(!mark.advance(ticket));
    }
}
