//! Rate Limiting Module
//!
//! Per-identifier, per-operation-kind throttling for translation access.
//! A fixed-window token bucket keyed by `(identifier, operation_kind)`,
//! with capacities looked up from a static per-kind table.

pub mod config;
pub mod limiter;
pub mod store;

pub use config::{LimitQuota, OperationKind, RateLimitTable};
pub use limiter::{LimitStatus, RateLimitOutcome, RateLimiter};
pub use store::{LimitKey, WindowState, WindowStore};
