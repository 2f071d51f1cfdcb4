use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub limits: LimitsConfig,
    pub cache: CacheConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            limits: LimitsConfig::from_env(),
            cache: CacheConfig::from_env(),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  limits:  max_content_length={}, min_content_length={}",
            self.limits.max_content_length,
            self.limits.min_content_length
        );
        tracing::info!(
            "  cache:   capacity={}, verify_hits={}",
            self.cache.capacity,
            self.cache.verify_hits
        );
    }
}

// ── Normalizer limits ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Content longer than this is truncated (with a warning), not rejected.
    pub max_content_length: usize,
    /// Normalized content shorter than this is rejected.
    pub min_content_length: usize,
}

impl LimitsConfig {
    fn from_env() -> Self {
        Self {
            max_content_length: env_usize("MAX_CONTENT_LENGTH", 100_000),
            min_content_length: env_usize("MIN_CONTENT_LENGTH", 1),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_content_length: 100_000,
            min_content_length: 1,
        }
    }
}

// ── Chunk cache ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum cached chunk trees before LRU eviction.
    pub capacity: usize,
    /// Recompute on every cache hit and compare against the stored tree.
    /// Expensive; intended for soak tests, off by default.
    pub verify_hits: bool,
}

impl CacheConfig {
    fn from_env() -> Self {
        Self {
            capacity: env_usize("CHUNK_CACHE_CAPACITY", 128),
            verify_hits: env_or("CHUNK_CACHE_VERIFY_HITS", "false") == "true",
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 128,
            verify_hits: false,
        }
    }
}
