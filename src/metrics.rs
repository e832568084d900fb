// Prometheus metrics for translation access monitoring
//
// Series cover the three core components:
// - Policy decisions by category and outcome (counter)
// - Rate limit checks by kind and outcome (counter)
// - Cache hits, misses, and validation failures (counters)
// - Live cache entries (gauge)

use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

lazy_static! {
    pub static ref REGISTRY: Arc<Registry> = Arc::new(Registry::new());

    // Policy metrics
    pub static ref POLICY_DECISIONS_TOTAL: CounterVec = CounterVec::new(
        prometheus::Opts::new("policy_decisions_total", "Policy decisions by category and outcome"),
        &["category", "outcome"]
    ).expect("Failed to create policy decisions metric");

    // Rate limit metrics
    pub static ref RATE_LIMIT_CHECKS_TOTAL: CounterVec = CounterVec::new(
        prometheus::Opts::new("rate_limit_checks_total", "Rate limit checks by kind and outcome"),
        &["kind", "outcome"]
    ).expect("Failed to create rate limit checks metric");

    // Cache metrics
    pub static ref CACHE_HITS_TOTAL: IntCounter = IntCounter::new(
        "cache_hits_total",
        "Total cache hits"
    ).expect("Failed to create cache hits metric");

    pub static ref CACHE_MISSES_TOTAL: IntCounter = IntCounter::new(
        "cache_misses_total",
        "Total cache misses"
    ).expect("Failed to create cache misses metric");

    pub static ref CACHE_VALIDATION_FAILURES_TOTAL: IntCounter = IntCounter::new(
        "cache_validation_failures_total",
        "Total cache key validation failures"
    ).expect("Failed to create cache validation failures metric");

    pub static ref CACHE_ENTRIES: IntGauge = IntGauge::new(
        "cache_entries",
        "Number of live cache entries"
    ).expect("Failed to create cache entries metric");
}

/// Initialize the metrics registry - must be called once at startup
pub fn init() -> prometheus::Result<()> {
    REGISTRY.register(Box::new(POLICY_DECISIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RATE_LIMIT_CHECKS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CACHE_HITS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CACHE_MISSES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CACHE_VALIDATION_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CACHE_ENTRIES.clone()))?;
    Ok(())
}

/// Render all registered series in the Prometheus text format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if encoder.encode(&families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_registers_once() {
        // A second init returns AlreadyReg rather than panicking.
        let first = init();
        let second = init();
        assert!(first.is_ok() || second.is_err());
    }

    #[test]
    fn test_counters_increment() {
        let before = CACHE_HITS_TOTAL.get();
        CACHE_HITS_TOTAL.inc();
        assert_eq!(CACHE_HITS_TOTAL.get(), before + 1);
    }

    #[test]
    fn test_labeled_counter() {
        POLICY_DECISIONS_TOTAL
            .with_label_values(&["view", "allowed"])
            .inc();
        assert!(
            POLICY_DECISIONS_TOTAL
                .with_label_values(&["view", "allowed"])
                .get()
                >= 1.0
        );
    }

    #[test]
    fn test_gather_renders_text() {
        let _ = init();
        CACHE_MISSES_TOTAL.inc();
        let text = gather();
        assert!(text.contains("cache_misses_total"));
    }
}
