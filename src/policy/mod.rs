//! Policy Module
//!
//! Decides whether an actor may view or edit a translated field, combining
//! static per-resource policy configuration with the requesting actor's
//! identity. Fail-closed by default; pluggable decisions go through an
//! allow-listed decider registry.

pub mod action;
pub mod actor;
pub mod config;
pub mod engine;
pub mod registry;

pub use action::{ActionCategory, ActionContext};
pub use actor::{Actor, Role};
pub use config::{ApprovalConfig, PolicyConfig, PolicyKind};
pub use engine::{Decision, PolicyEngine};
pub use registry::{Decider, DeciderRegistry};
