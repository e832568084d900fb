//! Rate Limit Configuration
//!
//! Per-operation-kind capacity and window settings for the fixed-window
//! limiter.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-window limits
pub const DEFAULT_READ_CAPACITY: u32 = 300; // reads per minute
pub const DEFAULT_WRITE_CAPACITY: u32 = 60; // writes per minute
pub const DEFAULT_IMPORT_CAPACITY: u32 = 10; // imports per hour
pub const DEFAULT_EXPORT_CAPACITY: u32 = 20; // exports per hour
pub const DEFAULT_FALLBACK_CAPACITY: u32 = 30; // unlisted kinds, per minute

/// Kinds of translation operations that can be rate-limited
///
/// A closed set: operation kinds are never derived from request strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Translation reads (view, fallback resolution)
    Read,
    /// Translation writes (edit, delete)
    Write,
    /// Bulk file imports
    Import,
    /// Bulk file exports
    Export,
}

impl OperationKind {
    /// All operation kinds, for iteration in tests and dashboards
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Read,
        OperationKind::Write,
        OperationKind::Import,
        OperationKind::Export,
    ];

    /// Stable label for logging and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Read => "read",
            OperationKind::Write => "write",
            OperationKind::Import => "import",
            OperationKind::Export => "export",
        }
    }
}

/// Capacity and window for one operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitQuota {
    /// Operations admitted per window
    pub capacity: u32,

    /// Window length in seconds
    pub window_secs: u64,
}

impl LimitQuota {
    /// Create a new quota
    pub fn new(capacity: u32, window_secs: u64) -> Self {
        Self {
            capacity,
            window_secs,
        }
    }

    /// Window length as a duration
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Static table of per-kind limits
///
/// Kinds left unset fall back to the conservative default, so a
/// partially configured table stays safe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitTable {
    /// Limit for translation reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<LimitQuota>,

    /// Limit for translation writes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write: Option<LimitQuota>,

    /// Limit for bulk imports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import: Option<LimitQuota>,

    /// Limit for bulk exports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<LimitQuota>,

    /// Quota applied to kinds with no configured limit
    pub fallback: LimitQuota,
}

impl Default for RateLimitTable {
    fn default() -> Self {
        Self {
            read: Some(LimitQuota::new(DEFAULT_READ_CAPACITY, 60)),
            write: Some(LimitQuota::new(DEFAULT_WRITE_CAPACITY, 60)),
            import: Some(LimitQuota::new(DEFAULT_IMPORT_CAPACITY, 3600)),
            export: Some(LimitQuota::new(DEFAULT_EXPORT_CAPACITY, 3600)),
            fallback: LimitQuota::new(DEFAULT_FALLBACK_CAPACITY, 60),
        }
    }
}

impl RateLimitTable {
    /// Create the default table
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the quota for an operation kind
    pub fn quota(&self, kind: OperationKind) -> LimitQuota {
        let configured = match kind {
            OperationKind::Read => self.read,
            OperationKind::Write => self.write,
            OperationKind::Import => self.import,
            OperationKind::Export => self.export,
        };
        configured.unwrap_or(self.fallback)
    }

    /// Override the quota for one kind
    pub fn set_quota(&mut self, kind: OperationKind, quota: LimitQuota) {
        let slot = match kind {
            OperationKind::Read => &mut self.read,
            OperationKind::Write => &mut self.write,
            OperationKind::Import => &mut self.import,
            OperationKind::Export => &mut self.export,
        };
        *slot = Some(quota);
    }

    /// Check the table for nonsense values
    ///
    /// # Errors
    ///
    /// Returns an error if any quota has a zero capacity or window.
    pub fn validate(&self) -> anyhow::Result<()> {
        let entries = [
            ("read", self.read),
            ("write", self.write),
            ("import", self.import),
            ("export", self.export),
            ("fallback", Some(self.fallback)),
        ];
        for (kind, quota) in entries {
            let Some(quota) = quota else { continue };
            if quota.capacity == 0 {
                anyhow::bail!("rate limit capacity for '{}' must be > 0", kind);
            }
            if quota.window_secs == 0 {
                anyhow::bail!("rate limit window for '{}' must be > 0 seconds", kind);
            }
        }
        Ok(())
    }
}
