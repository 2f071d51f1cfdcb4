//! Memoization of completed chunk trees, keyed by content+rule hash.
//!
//! Purely advisory: a disabled or bypassed cache changes nothing but speed,
//! because the underlying computation is deterministic. What the cache does
//! guarantee is single-flight — concurrent callers with the same key block on
//! one in-flight computation instead of racing — and a loud failure if two
//! computations of the same key ever disagree.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use lru::LruCache;
use sha2::{Digest, Sha256};

use ragsplit_core::{CacheConfig, ChunkError, ChunkRule, Document};

use crate::hierarchy::{ChunkOutput, HierarchicalChunker};
use crate::normalize::normalize;

type Flight = Arc<OnceLock<Result<Arc<ChunkOutput>, ChunkError>>>;

/// Shared, bounded cache of chunk trees.
pub struct ChunkCache {
    entries: Mutex<LruCache<String, Arc<ChunkOutput>>>,
    inflight: Mutex<HashMap<String, Flight>>,
    verify_hits: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ChunkCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            inflight: Mutex::new(HashMap::new()),
            verify_hits: false,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        let mut cache = Self::new(config.capacity);
        cache.verify_hits = config.verify_hits;
        cache
    }

    /// Content-addressed key over the normalized text and every rule field.
    pub fn key(normalized_content: &str, rule: &ChunkRule) -> String {
        let mut hasher = Sha256::new();
        hasher.update(normalized_content.as_bytes());
        hasher.update([0]);
        hasher.update(rule.parent_max_size.to_le_bytes());
        hasher.update(rule.parent_overlap.to_le_bytes());
        hasher.update(rule.parent_separator.as_bytes());
        hasher.update([0]);
        hasher.update(rule.child_max_size.to_le_bytes());
        hasher.update(rule.child_overlap.to_le_bytes());
        hasher.update(rule.child_separator.as_bytes());
        hasher.update([0, rule.keep_separator as u8]);
        let digest = hasher.finalize();
        let mut key = String::with_capacity(64);
        for byte in digest {
            key.push_str(&format!("{byte:02x}"));
        }
        key
    }

    /// Return the cached tree for `(document, rule)`, computing it at most
    /// once across concurrent callers. Validation and normalization errors
    /// surface immediately; nothing partial is ever stored.
    pub fn get_or_compute(
        &self,
        chunker: &HierarchicalChunker,
        doc: &Document,
        rule: &ChunkRule,
    ) -> Result<Arc<ChunkOutput>, ChunkError> {
        rule.validate()?;
        let normalized = normalize(&doc.content, chunker.limits())?;
        let key = Self::key(&normalized.content, rule);

        if let Some(found) = lock(&self.entries).get(&key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            if self.verify_hits {
                let fresh = chunker.chunk(doc, rule)?;
                if fresh != *found {
                    tracing::error!(%key, "determinism violation detected on cache hit");
                    return Err(ChunkError::DeterminismViolation { key });
                }
            }
            return Ok(found);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let flight: Flight = lock(&self.inflight).entry(key.clone()).or_default().clone();
        let result = flight
            .get_or_init(|| chunker.chunk(doc, rule).map(Arc::new))
            .clone();
        let result = match result {
            Ok(output) => self.publish(&key, output),
            Err(err) => Err(err),
        };
        lock(&self.inflight).remove(&key);
        result
    }

    /// Store a completed tree and return the canonical cached instance. If an
    /// entry already exists for the key, the two trees must be identical;
    /// anything else is a splitter defect.
    fn publish(&self, key: &str, output: Arc<ChunkOutput>) -> Result<Arc<ChunkOutput>, ChunkError> {
        let mut entries = lock(&self.entries);
        if let Some(existing) = entries.peek(key) {
            if **existing != *output {
                tracing::error!(%key, "determinism violation detected on publish");
                return Err(ChunkError::DeterminismViolation {
                    key: key.to_string(),
                });
            }
            return Ok(Arc::clone(existing));
        }
        entries.put(key.to_string(), Arc::clone(&output));
        Ok(output)
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

/// Lock a mutex, recovering the data on poison — cache state is always a
/// complete, immutable tree, so a panicked peer cannot leave it half-written.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
