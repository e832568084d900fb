//! Translation Cache
//!
//! Key-validated, signed, TTL-bound store for computed translation values.
//! Values enter the store only through a validated `put` and leave only
//! after their signature verifies, so direct tampering with the backing
//! map is detected and reported as a miss rather than surfaced.

use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use super::key::CacheKey;
use super::signer::EntrySigner;
use crate::audit;
use crate::metrics;
use crate::validate::{
    validate_field, validate_locale, validate_record_id, validate_resource_type, FieldRegistry,
    ValidationError,
};

/// Default entry lifetime
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Default maximum entry count
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Usage statistics for the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently stored
    pub size: usize,

    /// Lifetime hit count
    pub hits: u64,

    /// Lifetime miss count
    pub misses: u64,
}

/// One stored entry: serialized value, its signature, and its expiry
#[derive(Debug, Clone)]
struct StoredEntry {
    payload: Vec<u8>,
    signature: Vec<u8>,
    expires_at: Instant,
}

/// Validated, signed, TTL-bound translation value cache
#[derive(Debug)]
pub struct TranslationCache {
    entries: RwLock<HashMap<CacheKey, StoredEntry>>,
    signer: EntrySigner,
    registry: Arc<FieldRegistry>,
    ttl: Duration,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TranslationCache {
    /// Create a cache with the default TTL and size bound
    pub fn new(secret: SecretString, registry: Arc<FieldRegistry>) -> Self {
        Self::with_limits(
            secret,
            registry,
            Duration::from_secs(DEFAULT_TTL_SECS),
            DEFAULT_MAX_ENTRIES,
        )
    }

    /// Create a cache with custom TTL and size bound
    pub fn with_limits(
        secret: SecretString,
        registry: Arc<FieldRegistry>,
        ttl: Duration,
        max_entries: usize,
    ) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            signer: EntrySigner::new(secret),
            registry: Arc::clone(&registry),
            ttl,
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Validate components and build a cache key
    ///
    /// # Errors
    ///
    /// Returns the specific `ValidationError` for the first failing
    /// component; the failure is reported to the audit log.
    pub fn key(
        &self,
        resource_type: &str,
        field: &str,
        locale: &str,
        record_id: &str,
    ) -> Result<CacheKey, ValidationError> {
        CacheKey::new(resource_type, field, locale, record_id, &self.registry).map_err(|err| {
            audit::log_cache_validation("key", &err);
            metrics::CACHE_VALIDATION_FAILURES_TOTAL.inc();
            err
        })
    }

    /// Store a value under a key
    ///
    /// The serialized value is signed before insertion. A key that fails
    /// revalidation stores nothing.
    ///
    /// # Errors
    ///
    /// Returns the `ValidationError` for a key that is not valid for this
    /// cache's field registry.
    pub fn put(&self, key: &CacheKey, value: serde_json::Value) -> Result<(), ValidationError> {
        if let Err(err) = self.revalidate(key) {
            audit::log_cache_validation("put", &err);
            metrics::CACHE_VALIDATION_FAILURES_TOTAL.inc();
            return Err(err);
        }

        let payload =
            serde_json::to_vec(&value).expect("a serde_json::Value always serializes");
        let signature = self.signer.sign(&payload);
        let entry = StoredEntry {
            payload,
            signature,
            expires_at: Instant::now() + self.ttl,
        };

        let mut entries = self.entries.write().unwrap();
        if !entries.contains_key(key) {
            Self::make_room(&mut entries, self.max_entries);
        }
        entries.insert(key.clone(), entry);
        metrics::CACHE_ENTRIES.set(entries.len() as i64);

        Ok(())
    }

    /// Fetch the value for a key
    ///
    /// Returns `None` for an absent, expired, invalid, or
    /// signature-mismatched entry — all four are indistinguishable to the
    /// caller. Expired and tampered entries are removed on the way out.
    pub fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        if let Err(err) = self.revalidate(key) {
            audit::log_cache_validation("get", &err);
            metrics::CACHE_VALIDATION_FAILURES_TOTAL.inc();
            return self.miss();
        }

        let entry = {
            let entries = self.entries.read().unwrap();
            entries.get(key).cloned()
        };
        let Some(entry) = entry else {
            return self.miss();
        };

        if entry.expires_at <= Instant::now() {
            self.remove_entry(key);
            return self.miss();
        }

        if !self.signer.verify(&entry.payload, &entry.signature) {
            audit::log_suspicious_activity(
                key.record_id(),
                &format!("cache entry signature mismatch for {key}"),
            );
            self.remove_entry(key);
            return self.miss();
        }

        match serde_json::from_slice(&entry.payload) {
            Ok(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                metrics::CACHE_HITS_TOTAL.inc();
                Some(value)
            }
            Err(_) => {
                // A verified payload that fails to parse means the stored
                // bytes never came from a valid put.
                self.remove_entry(key);
                self.miss()
            }
        }
    }

    /// Remove the entry for exactly one key
    pub fn invalidate(&self, key: &CacheKey) {
        self.remove_entry(key);
    }

    /// Remove every entry
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap();
        entries.clear();
        metrics::CACHE_ENTRIES.set(0);
    }

    /// Current size and lifetime hit/miss counts
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read().unwrap();
        CacheStats {
            size: entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    // A key built against another registry is not trusted here; both the
    // put and get paths re-run the shared validators before touching the
    // store.
    fn revalidate(&self, key: &CacheKey) -> Result<(), ValidationError> {
        validate_resource_type(key.resource_type())?;
        validate_field(key.field(), &self.registry)?;
        validate_locale(key.locale())?;
        validate_record_id(key.record_id())?;
        Ok(())
    }

    fn miss(&self) -> Option<serde_json::Value> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        metrics::CACHE_MISSES_TOTAL.inc();
        None
    }

    fn remove_entry(&self, key: &CacheKey) {
        let mut entries = self.entries.write().unwrap();
        entries.remove(key);
        metrics::CACHE_ENTRIES.set(entries.len() as i64);
    }

    // Prune expired entries; if the store is still full, the entry
    // closest to expiry is evicted.
    fn make_room(entries: &mut HashMap<CacheKey, StoredEntry>, max_entries: usize) {
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);

        if entries.len() >= max_entries {
            let victim = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(key, _)| key.clone());
            if let Some(victim) = victim {
                entries.remove(&victim);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn corrupt_payload(&self, key: &CacheKey) {
        let mut entries = self.entries.write().unwrap();
        if let Some(entry) = entries.get_mut(key) {
            entry.payload = b"\"tampered\"".to_vec();
        }
    }

    #[cfg(test)]
    pub(crate) fn corrupt_signature(&self, key: &CacheKey) {
        let mut entries = self.entries.write().unwrap();
        if let Some(entry) = entries.get_mut(key) {
            entry.signature[0] ^= 0xff;
        }
    }
}
