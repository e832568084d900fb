//! Audit Event Emission
//!
//! Structured audit events for every access decision, rate-limit check,
//! and validation failure, emitted through `tracing` for an external
//! structured-logging collaborator. Severity tracks outcome: successes at
//! debug, denials and validation failures at warn, detected attack
//! patterns at error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::policy::{ActionContext, Actor, Decision};
use crate::rate_limit::{OperationKind, RateLimitOutcome};
use crate::validate::ValidationError;

/// Default validation failures per window before an identifier is flagged
pub const DEFAULT_BURST_THRESHOLD: u32 = 100;

/// Default burst detection window
pub const DEFAULT_BURST_WINDOW_SECS: u64 = 60;

/// Report a policy decision
pub fn log_decision(actor: &Actor, action: &ActionContext, decision: &Decision) {
    if decision.allowed {
        tracing::debug!(
            actor = %actor.audit_id(),
            action = %action.name,
            category = action.category.as_str(),
            resource = %action.resource_type,
            "access allowed"
        );
    } else {
        tracing::warn!(
            actor = %actor.audit_id(),
            action = %action.name,
            category = action.category.as_str(),
            resource = %action.resource_type,
            reason = decision.reason.as_deref().unwrap_or("unspecified"),
            "access denied"
        );
    }
}

/// Report a rate-limit check
pub fn log_rate_limit(identifier: &str, kind: OperationKind, outcome: &RateLimitOutcome) {
    match outcome {
        RateLimitOutcome::Allowed { remaining } => {
            tracing::debug!(
                identifier,
                kind = kind.as_str(),
                remaining,
                "rate limit check passed"
            );
        }
        RateLimitOutcome::Limited { retry_after } => {
            tracing::warn!(
                identifier,
                kind = kind.as_str(),
                retry_after_ms = retry_after.as_millis() as u64,
                "rate limit exceeded"
            );
        }
    }
}

/// Report a cache key validation failure
pub fn log_cache_validation(operation: &str, error: &ValidationError) {
    tracing::warn!(operation, error = %error, "cache key validation failed");
}

/// Report a detected attack pattern
pub fn log_suspicious_activity(identifier: &str, detail: &str) {
    tracing::error!(identifier, detail, "suspicious activity detected");
}

/// One flagged burst of validation failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuspiciousEvent {
    /// Identifier that triggered the alert
    pub identifier: String,

    /// Failures counted in the window at alert time
    pub failures: u32,

    /// When the alert fired
    pub at: DateTime<Utc>,
}

#[derive(Debug)]
struct FailureWindow {
    count: u32,
    window_start: Instant,
    alerted: bool,
}

/// Burst detector for validation failures
///
/// Counts validation failures per identifier in a fixed window and emits
/// one high-severity event per window once the threshold is crossed —
/// the signature of a single identifier probing with hundreds of
/// structurally invalid keys.
#[derive(Debug)]
pub struct AuditMonitor {
    threshold: u32,
    window: Duration,
    failures: RwLock<HashMap<String, FailureWindow>>,
    alerts: RwLock<Vec<SuspiciousEvent>>,
}

impl Default for AuditMonitor {
    fn default() -> Self {
        Self::new(
            DEFAULT_BURST_THRESHOLD,
            Duration::from_secs(DEFAULT_BURST_WINDOW_SECS),
        )
    }
}

impl AuditMonitor {
    /// Create a monitor with a custom threshold and window
    pub fn new(threshold: u32, window: Duration) -> Self {
        Self {
            threshold,
            window,
            failures: RwLock::new(HashMap::new()),
            alerts: RwLock::new(Vec::new()),
        }
    }

    /// Record one validation failure for an identifier
    ///
    /// Returns `true` when this failure crossed the threshold and fired
    /// an alert.
    pub fn record_validation_failure(&self, identifier: &str) -> bool {
        let now = Instant::now();
        let mut failures = self.failures.write().unwrap();

        let window = failures
            .entry(identifier.to_string())
            .or_insert(FailureWindow {
                count: 0,
                window_start: now,
                alerted: false,
            });

        if now.duration_since(window.window_start) >= self.window {
            window.count = 0;
            window.window_start = now;
            window.alerted = false;
        }
        window.count += 1;

        if window.count >= self.threshold && !window.alerted {
            window.alerted = true;
            let count = window.count;
            drop(failures);

            log_suspicious_activity(
                identifier,
                &format!("{count} invalid keys inside one detection window"),
            );

            let mut alerts = self.alerts.write().unwrap();
            alerts.push(SuspiciousEvent {
                identifier: identifier.to_string(),
                failures: count,
                at: Utc::now(),
            });
            // Keep only the most recent alerts.
            if alerts.len() > 1000 {
                let excess = alerts.len() - 1000;
                alerts.drain(0..excess);
            }
            return true;
        }
        false
    }

    /// Alerts fired so far, oldest first
    pub fn recent_alerts(&self) -> Vec<SuspiciousEvent> {
        self.alerts.read().unwrap().clone()
    }
}
