//! Decider Registry
//!
//! Registered-implementation dispatch for custom policy decisions. The
//! engine never loads code paths by name; callers register `Decider`
//! implementations at startup, and only names on the statically
//! configured allow-list are ever consulted.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::action::ActionContext;
use super::actor::Actor;

/// A pluggable policy decision
///
/// Implementations receive the actor, the action under decision, and the
/// target resource type, and return whether the action is permitted.
pub trait Decider: Send + Sync {
    /// Decide whether the actor may perform the action on the resource
    fn decide(&self, actor: &Actor, action: &ActionContext, resource_type: &str) -> bool;
}

/// Named deciders gated by an allow-list
#[derive(Default)]
pub struct DeciderRegistry {
    allow_list: HashSet<String>,
    deciders: HashMap<String, Arc<dyn Decider>>,
}

impl DeciderRegistry {
    /// Create a registry trusting the given module names
    pub fn new<I, S>(allow_list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allow_list: allow_list.into_iter().map(Into::into).collect(),
            deciders: HashMap::new(),
        }
    }

    /// Create a registry that trusts nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a decider under a name
    ///
    /// Registration of a name outside the allow-list is refused; the
    /// decider is dropped and `false` is returned.
    pub fn register(&mut self, name: &str, decider: Arc<dyn Decider>) -> bool {
        if !self.allow_list.contains(name) {
            tracing::warn!(module = name, "refusing to register decider outside the allow-list");
            return false;
        }
        self.deciders.insert(name.to_string(), decider);
        true
    }

    /// Whether a name is on the allow-list
    pub fn is_trusted(&self, name: &str) -> bool {
        self.allow_list.contains(name)
    }

    /// Look up a decider, requiring both trust and registration
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn Decider>> {
        if !self.allow_list.contains(name) {
            return None;
        }
        self.deciders.get(name)
    }
}

impl std::fmt::Debug for DeciderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeciderRegistry")
            .field("allow_list", &self.allow_list)
            .field("registered", &self.deciders.keys().collect::<Vec<_>>())
            .finish()
    }
}
