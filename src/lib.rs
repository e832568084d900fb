//! LinguaGuard Core
//!
//! The access-control and caching core that gates every translation
//! read/write for data-model resources. Three components, composed by a
//! translation serving layer on every operation:
//!
//! - [`RateLimiter`]: per-`(identifier, operation_kind)` fixed-window
//!   throttle
//! - [`TranslationCache`]: key-validated, signed, TTL-bound store for
//!   computed translation values
//! - [`PolicyEngine`]: fail-closed decision function over the actor, the
//!   action, and the resource's policy configuration
//!
//! All operations are synchronous and non-blocking. The limiter and
//! cache admit concurrent callers exactly; the policy engine is pure.

pub mod audit;
pub mod cache;
pub mod config;
pub mod metrics;
pub mod policy;
pub mod rate_limit;
pub mod validate;

pub use audit::AuditMonitor;
pub use cache::{CacheKey, CacheStats, TranslationCache};
pub use config::Config;
pub use policy::{
    ActionCategory, ActionContext, Actor, Decider, DeciderRegistry, Decision, PolicyConfig,
    PolicyEngine, PolicyKind, Role,
};
pub use rate_limit::{OperationKind, RateLimitOutcome, RateLimitTable, RateLimiter};
pub use validate::{FieldRegistry, ValidationError};
