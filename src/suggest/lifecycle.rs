//! Single-slot lifecycle for suggestion requests
//!
//! ```text
//! Idle ──begin──▶ InFlight ──resolve──▶ Resolved
//!   ▲               │  │
//!   └────cancel─────┘  └────fail──────▶ Failed
//! ```
//!
//! Only one request may be in flight. `begin` hands out a ticket; a result
//! delivered with a ticket that is no longer current (because the request
//! was cancelled) is dropped, so a late answer can never mutate the
//! schedule.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::SuggestError;

/// Where the suggestion request currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionState {
    Idle,
    InFlight {
        goal: String,
        started_at: DateTime<Utc>,
    },
    Resolved {
        courses: usize,
    },
    Failed {
        notice: String,
    },
}

/// Proof that a caller started the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

#[derive(Debug)]
pub struct SuggestionLifecycle {
    state: SuggestionState,
    current: u64,
}

impl Default for SuggestionLifecycle {
    fn default() -> Self {
        Self {
            state: SuggestionState::Idle,
            current: 0,
        }
    }
}

impl SuggestionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    /// The loading flag: true while a request is outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self.state, SuggestionState::InFlight { .. })
    }

    /// Start a request, or refuse if one is already running
    pub fn begin(&mut self, goal: &str) -> Result<RequestTicket, SuggestError> {
        if self.is_loading() {
            warn!("Suggestion requested while another is in flight");
            return Err(SuggestError::Busy);
        }

        self.current += 1;
        self.state = SuggestionState::InFlight {
            goal: goal.to_string(),
            started_at: Utc::now(),
        };
        debug!("Suggestion request #{} started", self.current);
        Ok(RequestTicket(self.current))
    }

    /// Record success. Returns false, changing nothing, if `ticket` is stale.
    pub fn resolve(&mut self, ticket: RequestTicket, courses: usize) -> bool {
        if !self.is_current(ticket) {
            debug!("Dropping result of stale request #{}", ticket.0);
            return false;
        }
        info!("Suggestion request #{} resolved with {} courses", ticket.0, courses);
        self.state = SuggestionState::Resolved { courses };
        true
    }

    /// Record failure. Returns false, changing nothing, if `ticket` is stale.
    pub fn fail(&mut self, ticket: RequestTicket, error: &SuggestError) -> bool {
        if !self.is_current(ticket) {
            debug!("Dropping failure of stale request #{}", ticket.0);
            return false;
        }
        warn!("Suggestion request #{} failed: {}", ticket.0, error);
        self.state = SuggestionState::Failed {
            notice: error.user_notice().to_string(),
        };
        true
    }

    /// Abandon the outstanding request, if any
    pub fn cancel(&mut self) -> bool {
        if !self.is_loading() {
            return false;
        }
        info!("Suggestion request #{} cancelled", self.current);
        // Invalidate the outstanding ticket
        self.current += 1;
        self.state = SuggestionState::Idle;
        true
    }

    /// Whether `ticket` belongs to the request still in flight
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.is_loading() && ticket.0 == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_rejected_while_in_flight() {
        let mut lifecycle = SuggestionLifecycle::new();
        let ticket = lifecycle.begin("robotics").unwrap();
        assert!(lifecycle.is_loading());
        assert!(matches!(lifecycle.begin("biology"), Err(SuggestError::Busy)));

        assert!(lifecycle.resolve(ticket, 8));
        assert_eq!(lifecycle.state(), &SuggestionState::Resolved { courses: 8 });
        assert!(!lifecycle.is_loading());
        assert!(lifecycle.begin("biology").is_ok());
    }

    #[test]
    fn test_failure_clears_loading_flag() {
        let mut lifecycle = SuggestionLifecycle::new();
        let ticket = lifecycle.begin("law").unwrap();
        assert!(lifecycle.fail(ticket, &SuggestError::Malformed("x".into())));
        assert_eq!(
            lifecycle.state(),
            &SuggestionState::Failed { notice: "Sync failed.".to_string() }
        );
        assert!(!lifecycle.is_loading());
    }

    #[test]
    fn test_cancel_invalidates_ticket() {
        let mut lifecycle = SuggestionLifecycle::new();
        let ticket = lifecycle.begin("music").unwrap();
        assert!(lifecycle.cancel());
        assert_eq!(lifecycle.state(), &SuggestionState::Idle);

        assert!(!lifecycle.resolve(ticket, 8));
        assert_eq!(lifecycle.state(), &SuggestionState::Idle);

        let next = lifecycle.begin("music").unwrap();
        assert_ne!(next, ticket);
        assert!(!lifecycle.is_current(ticket));
        assert!(lifecycle.is_current(next));
        assert!(!lifecycle.fail(ticket, &SuggestError::Malformed("late".into())));
        assert!(lifecycle.is_loading());
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let mut lifecycle = SuggestionLifecycle::new();
        assert!(!lifecycle.cancel());
    }
}
