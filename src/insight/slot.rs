//! Insight request lifecycle with last-write-wins tickets.
//!
//! Each trigger takes a fresh ticket and overwrites the slot. A completion is
//! applied only when the slot is still pending on that exact ticket, so a
//! superseded request, or one issued before a line switch, is dropped.

#![allow(missing_docs)]

/// Monotonic source of request tickets. Never reset for the life of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketCounter {
    last: u64,
}

impl TicketCounter {
    pub fn issue(&mut self) -> u64 {
        self.last = self.last.wrapping_add(1);
        self.last
    }

    #[must_use]
    pub const fn last_issued(&self) -> u64 {
        self.last
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InsightSlot {
    #[default]
    Idle,
    Pending {
        ticket: u64,
    },
    Ready {
        ticket: u64,
        text: String,
    },
}

impl InsightSlot {
    /// Start a new request, clearing any visible result.
    ///
    /// Returns the ticket of a request that was still pending and is now
    /// superseded.
    pub fn begin(&mut self, ticket: u64) -> Option<u64> {
        let superseded = self.pending_ticket();
        *self = Self::Pending { ticket };
        superseded
    }

    /// Apply a completion. Returns `false` (and leaves the slot untouched)
    /// when `ticket` is not the one currently pending.
    pub fn resolve(&mut self, ticket: u64, text: String) -> bool {
        if self.pending_ticket() == Some(ticket) {
            *self = Self::Ready { ticket, text };
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn pending_ticket(&self) -> Option<u64> {
        match self {
            Self::Pending { ticket } => Some(*ticket),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Ready { text, .. } => Some(text),
            _ => None,
        }
    }
}
