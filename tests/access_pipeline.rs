//! Composed access flow tests.
//!
//! Exercises the three components the way the translation serving layer
//! composes them: rate limit check, then policy decision, then cache
//! read-or-compute. A denied request must never reach the cache.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;

use linguaguard::audit::AuditMonitor;
use linguaguard::cache::TranslationCache;
use linguaguard::policy::{
    ActionContext, Actor, PolicyConfig, PolicyEngine, PolicyKind, Role,
};
use linguaguard::rate_limit::{LimitQuota, OperationKind, RateLimitTable, RateLimiter};
use linguaguard::validate::FieldRegistry;

struct Core {
    limiter: RateLimiter,
    engine: PolicyEngine,
    cache: TranslationCache,
}

fn core() -> Core {
    let registry = Arc::new(FieldRegistry::with_fields(["title", "description"]));
    Core {
        limiter: RateLimiter::with_defaults(),
        engine: PolicyEngine::without_deciders(),
        cache: TranslationCache::new(
            SecretString::from("integration-secret-0123456789abcdef"),
            registry,
        ),
    }
}

/// The serving layer's read path: limit, decide, then consult the cache,
/// computing and populating on a miss.
fn serve_read(
    core: &Core,
    actor: &Actor,
    policy: Option<&PolicyConfig>,
    locale: &str,
    record_id: &str,
    compute: impl FnOnce() -> serde_json::Value,
) -> Option<serde_json::Value> {
    if !core
        .limiter
        .check_rate(&actor.audit_id(), OperationKind::Read)
        .is_allowed()
    {
        return None;
    }

    let action = ActionContext::view("Product");
    if !core.engine.matches(actor, &action, policy) {
        return None;
    }

    let key = core.cache.key("Product", "title", locale, record_id).ok()?;
    if let Some(cached) = core.cache.get(&key) {
        return Some(cached);
    }
    let value = compute();
    core.cache.put(&key, value.clone()).ok()?;
    Some(value)
}

#[test]
fn allowed_read_populates_and_reuses_cache() {
    let core = core();
    let actor = Actor::with_role("reader-1", Role::Editor);
    let policy = PolicyConfig::new().with_view(PolicyKind::Authenticated);

    let first = serve_read(&core, &actor, Some(&policy), "en", "1", || {
        json!("Widget")
    });
    assert_eq!(first, Some(json!("Widget")));

    // Second read must come from the cache, not the compute closure.
    let second = serve_read(&core, &actor, Some(&policy), "en", "1", || {
        panic!("cache should have served this read")
    });
    assert_eq!(second, Some(json!("Widget")));

    let stats = core.cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.size, 1);
}

#[test]
fn denied_read_never_touches_the_cache() {
    let core = core();
    let anonymous = Actor::anonymous();
    let policy = PolicyConfig::new().with_view(PolicyKind::Authenticated);

    let result = serve_read(&core, &anonymous, Some(&policy), "en", "1", || {
        panic!("a denied request must not compute")
    });
    assert_eq!(result, None);
    assert_eq!(core.cache.stats().size, 0);
    assert_eq!(core.cache.stats().misses, 0);
}

#[test]
fn unconfigured_resource_block_fails_closed_end_to_end() {
    let core = core();
    let admin = Actor::with_role("root", Role::Admin);
    let empty_block = PolicyConfig::new();

    let result = serve_read(&core, &admin, Some(&empty_block), "en", "1", || {
        panic!("deny-by-default must stop the read")
    });
    assert_eq!(result, None);
}

#[test]
fn rate_limited_identifier_is_cut_off() {
    let mut table = RateLimitTable::default();
    table.set_quota(OperationKind::Read, LimitQuota::new(3, 60));
    let mut core = core();
    core.limiter = RateLimiter::new(table);
    let actor = Actor::with_role("burst-user", Role::Editor);
    let policy = PolicyConfig::new().with_view(PolicyKind::Public);

    for _ in 0..3 {
        assert!(
            serve_read(&core, &actor, Some(&policy), "en", "1", || json!("v")).is_some()
        );
    }
    // The fourth read in the window is refused before policy or cache.
    assert_eq!(
        serve_read(&core, &actor, Some(&policy), "en", "1", || json!("v")),
        None
    );
}

#[test]
fn invalidated_entry_is_recomputed_on_next_read() {
    let core = core();
    let actor = Actor::with_role("reader-1", Role::Editor);
    let policy = PolicyConfig::new().with_view(PolicyKind::Public);

    serve_read(&core, &actor, Some(&policy), "en", "1", || json!("genuine"));

    // The write path invalidates the affected key.
    let key = core.cache.key("Product", "title", "en", "1").unwrap();
    core.cache.invalidate(&key);

    let value = serve_read(&core, &actor, Some(&policy), "en", "1", || {
        json!("recomputed")
    });
    assert_eq!(value, Some(json!("recomputed")));
}

#[test]
fn translator_edit_flow_respects_locale_assignment() {
    let core = core();
    let policy = PolicyConfig::new().with_edit(PolicyKind::TranslatorScoped);
    let translator = Actor::translator("t-1", ["en", "es"]);

    let allowed = core.engine.matches(
        &translator,
        &ActionContext::edit("Product", "en"),
        Some(&policy),
    );
    let denied = core.engine.matches(
        &translator,
        &ActionContext::edit("Product", "fr"),
        Some(&policy),
    );
    assert!(allowed);
    assert!(!denied);

    // A write invalidates the cached value for exactly that locale.
    let key_en = core.cache.key("Product", "title", "en", "1").unwrap();
    let key_es = core.cache.key("Product", "title", "es", "1").unwrap();
    core.cache.put(&key_en, json!("old")).unwrap();
    core.cache.put(&key_es, json!("viejo")).unwrap();

    core.cache.invalidate(&key_en);
    assert_eq!(core.cache.get(&key_en), None);
    assert_eq!(core.cache.get(&key_es), Some(json!("viejo")));
}

#[test]
fn invalid_key_burst_raises_an_alert() {
    let core = core();
    let monitor = AuditMonitor::new(25, Duration::from_secs(60));
    let mut alerted = false;

    // One identifier probing with structurally invalid keys.
    for i in 0..30 {
        let bad_locale = format!("zz-invalid-{i}");
        let result = core.cache.key("Product", "title", &bad_locale, "1");
        assert!(result.is_err());
        if monitor.record_validation_failure("probe-identifier") {
            alerted = true;
        }
    }

    assert!(alerted, "the burst should cross the detection threshold");
    let alerts = monitor.recent_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].identifier, "probe-identifier");
}
