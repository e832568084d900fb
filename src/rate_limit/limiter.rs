//! Fixed-Window Rate Limiter
//!
//! Per-`(identifier, operation_kind)` throttle. Each key gets a window of
//! `capacity` operations over `window` time; the window resets wholesale
//! once it elapses. A fixed window admits up to `2 * capacity - 1`
//! operations across one boundary in the worst case, which is a deliberate
//! trade for lock-free-simple state over a sliding log; abuse prevention
//! does not need sliding precision.
//!
//! Exhaustion is a normal outcome carrying a retry time, not an error.

use std::time::{Duration, Instant};

use super::config::{OperationKind, RateLimitTable};
use super::store::{LimitKey, WindowState, WindowStore};
use crate::audit;
use crate::metrics;

/// Result of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitOutcome {
    /// The operation is admitted; `remaining` tokens are left in the window
    Allowed {
        /// Tokens left after this admission
        remaining: u32,
    },

    /// The window is exhausted; retry once `retry_after` has elapsed
    Limited {
        /// Time until the current window rolls over
        retry_after: Duration,
    },
}

impl RateLimitOutcome {
    /// Whether the operation was admitted
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitOutcome::Allowed { .. })
    }

    /// Retry hint for limited outcomes
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            RateLimitOutcome::Allowed { .. } => None,
            RateLimitOutcome::Limited { retry_after } => Some(*retry_after),
        }
    }
}

/// Snapshot of one window for dashboards and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitStatus {
    /// Tokens left in the current window
    pub remaining: u32,

    /// When the current window opened; `None` when no live window exists
    pub window_start: Option<Instant>,
}

/// Fixed-window rate limiter
#[derive(Debug, Default)]
pub struct RateLimiter {
    table: RateLimitTable,
    store: WindowStore,
}

impl RateLimiter {
    /// Create a limiter with the given limit table
    pub fn new(table: RateLimitTable) -> Self {
        Self {
            table,
            store: WindowStore::new(),
        }
    }

    /// Create a limiter with the default limit table
    pub fn with_defaults() -> Self {
        Self::new(RateLimitTable::default())
    }

    /// Check and consume one token for `(identifier, kind)`
    ///
    /// A missing or elapsed window is initialized fresh with one token
    /// already consumed. Within a live window, tokens decrement until the
    /// window is exhausted, after which the outcome carries the time left
    /// until the window rolls over.
    pub fn check_rate(&self, identifier: &str, kind: OperationKind) -> RateLimitOutcome {
        let quota = self.table.quota(kind);
        let slot = self.store.slot(&LimitKey::new(identifier, kind));
        let mut state = slot.lock().unwrap();
        let now = Instant::now();

        let outcome = match state.as_mut() {
            Some(window) if now.duration_since(window.window_start) < quota.window() => {
                if window.remaining > 0 {
                    window.remaining -= 1;
                    RateLimitOutcome::Allowed {
                        remaining: window.remaining,
                    }
                } else {
                    let elapsed = now.duration_since(window.window_start);
                    RateLimitOutcome::Limited {
                        retry_after: quota.window() - elapsed,
                    }
                }
            }
            _ => {
                if quota.capacity == 0 {
                    // A zero-capacity quota admits nothing.
                    RateLimitOutcome::Limited {
                        retry_after: quota.window(),
                    }
                } else {
                    *state = Some(WindowState {
                        remaining: quota.capacity - 1,
                        window_start: now,
                    });
                    RateLimitOutcome::Allowed {
                        remaining: quota.capacity - 1,
                    }
                }
            }
        };
        drop(state);

        audit::log_rate_limit(identifier, kind, &outcome);
        metrics::RATE_LIMIT_CHECKS_TOTAL
            .with_label_values(&[
                kind.as_str(),
                if outcome.is_allowed() { "allowed" } else { "limited" },
            ])
            .inc();

        outcome
    }

    /// Clear the window for exactly `(identifier, kind)`
    ///
    /// Other kinds for the same identifier, and other identifiers, are
    /// untouched.
    pub fn reset(&self, identifier: &str, kind: OperationKind) {
        self.store.remove(&LimitKey::new(identifier, kind));
    }

    /// Report the current window for `(identifier, kind)`
    ///
    /// An absent or elapsed window reports full capacity with no window
    /// start; status never materializes an entry.
    pub fn status(&self, identifier: &str, kind: OperationKind) -> LimitStatus {
        let quota = self.table.quota(kind);
        let fresh = LimitStatus {
            remaining: quota.capacity,
            window_start: None,
        };

        let Some(slot) = self.store.peek(&LimitKey::new(identifier, kind)) else {
            return fresh;
        };
        let state = slot.lock().unwrap();
        match *state {
            Some(window)
                if Instant::now().duration_since(window.window_start) < quota.window() =>
            {
                LimitStatus {
                    remaining: window.remaining,
                    window_start: Some(window.window_start),
                }
            }
            _ => fresh,
        }
    }

    /// Number of `(identifier, kind)` pairs with tracked state
    pub fn tracked_keys(&self) -> usize {
        self.store.len()
    }
}
