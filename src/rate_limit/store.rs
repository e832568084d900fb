//! Window Store
//!
//! Keyed storage for fixed-window state. Each `(identifier, kind)` pair
//! owns one slot behind its own mutex, so checks for different keys never
//! block each other while checks for the same key serialize exactly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use super::config::OperationKind;

/// Key identifying one rate-limit window
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct LimitKey {
    /// Identifier being throttled (user id, API token, client address)
    pub identifier: String,

    /// Operation kind
    pub kind: OperationKind,
}

impl LimitKey {
    /// Create a new limit key
    pub fn new(identifier: &str, kind: OperationKind) -> Self {
        Self {
            identifier: identifier.to_string(),
            kind,
        }
    }
}

/// State of one fixed window
#[derive(Debug, Clone, Copy)]
pub struct WindowState {
    /// Tokens left in the current window
    pub remaining: u32,

    /// When the current window opened
    pub window_start: Instant,
}

/// Slot holding the lazily created window state for one key
pub type WindowSlot = Arc<Mutex<Option<WindowState>>>;

/// In-memory window store
///
/// The outer map lock is held only long enough to fetch or insert a slot;
/// all window arithmetic happens under the per-slot mutex.
#[derive(Debug, Default)]
pub struct WindowStore {
    windows: RwLock<HashMap<LimitKey, WindowSlot>>,
}

impl WindowStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the slot for a key, creating an empty one on first use
    pub fn slot(&self, key: &LimitKey) -> WindowSlot {
        {
            let windows = self.windows.read().unwrap();
            if let Some(slot) = windows.get(key) {
                return Arc::clone(slot);
            }
        }

        let mut windows = self.windows.write().unwrap();
        Arc::clone(windows.entry(key.clone()).or_default())
    }

    /// Fetch the slot for a key without creating one
    pub fn peek(&self, key: &LimitKey) -> Option<WindowSlot> {
        let windows = self.windows.read().unwrap();
        windows.get(key).map(Arc::clone)
    }

    /// Remove the slot for exactly one key
    pub fn remove(&self, key: &LimitKey) {
        let mut windows = self.windows.write().unwrap();
        windows.remove(key);
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        let windows = self.windows.read().unwrap();
        windows.len()
    }

    /// Whether any keys are tracked
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
