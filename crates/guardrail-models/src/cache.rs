//! Generic TTL+LRU caching with an eviction policy shared by every cache in
//! the gateway: the scanner-result cache, the §4.9 auth/keyword/template/
//! risk-config caches, and the gateway-integration session cache.
//!
//! ## Design Philosophy
//!
//! This cache implementation follows enterprise-grade patterns:
//! - **Thread-Safe**: Uses Arc + RwLock for concurrent access
//! - **LRU Eviction**: Least Recently Used items are evicted first
//! - **TTL Support**: Entries expire after configured time-to-live
//! - **Statistics**: Tracks hits, misses, and hit rates
//! - **Lazy Cleanup**: Expired items cleaned on access (no background threads)
//!
//! ## Usage Example
//!
//! ```rust
//! use guardrail_models::cache::{ResultCache, CacheConfig};
//! use guardrail_core::ScanResult;
//! use std::time::Duration;
//!
//! let cache = ResultCache::new(CacheConfig {
//!     max_size: 1000,
//!     ttl: Duration::from_secs(300),
//! });
//!
//! // Insert a result
//! let result = ScanResult::pass("safe text".to_string());
//! cache.insert("key1".to_string(), result);
//!
//! // Retrieve it
//! if let Some(cached_result) = cache.get("key1") {
//!     println!("Cache hit!");
//! }
//!
//! // Check statistics
//! let stats = cache.stats();
//! println!("Hit rate: {:.2}%", stats.hit_rate() * 100.0);
//! ```

use guardrail_core::ScanResult;
use std::collections::{hash_map::DefaultHasher, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Configuration for a [`TtlCache`]
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache
    pub max_size: usize,
    /// Time-to-live for cache entries
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 10_000,
            ttl: Duration::from_secs(300), // 5 minutes
        }
    }
}

/// Thread-safe, generic TTL+LRU cache.
///
/// ## Performance Characteristics
///
/// - **Get**: O(1) average, O(n) worst case for access order update
/// - **Insert**: O(1) average, O(n) worst case for eviction
/// - **Memory**: O(max_size * entry_size)
///
/// ## Thread Safety
///
/// Uses `Arc<RwLock<_>>` for interior mutability:
/// - Multiple concurrent readers
/// - Exclusive writer access
/// - Clone creates a new reference to same cache
pub struct TtlCache<V> {
    inner: Arc<RwLock<CacheInner<V>>>,
}

/// The scanner-result cache used by the library-style scan handlers.
pub type ResultCache = TtlCache<ScanResult>;

/// Internal cache state
struct CacheInner<V> {
    config: CacheConfig,
    entries: HashMap<String, CacheEntry<V>>,
    access_order: Vec<String>, // LRU tracking (oldest first, newest last)
    stats: CacheStats,
}

/// A single cache entry with metadata
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Cache performance statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
}

impl CacheStats {
    /// Total number of cache requests
    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit rate as a value between 0.0 and 1.0
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// Create a new cache with the given configuration
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                config,
                entries: HashMap::new(),
                access_order: Vec::new(),
                stats: CacheStats::default(),
            })),
        }
    }

    /// Get a cached value by key.
    ///
    /// Returns `None` if the key doesn't exist or the entry has expired
    /// (expired entries are removed lazily on access). Updates LRU order on
    /// a hit.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.write().unwrap();

        if let Some(entry) = inner.entries.get(key) {
            if entry.inserted_at.elapsed() < inner.config.ttl {
                let value = entry.value.clone();
                inner.stats.hits += 1;
                inner.access_order.retain(|k| k != key);
                inner.access_order.push(key.to_string());
                return Some(value);
            } else {
                inner.entries.remove(key);
                inner.access_order.retain(|k| k != key);
            }
        }

        inner.stats.misses += 1;
        None
    }

    /// Insert or update a cache entry.
    ///
    /// If the cache is at capacity, evicts the least recently used entry.
    /// If the key already exists, updates it and refreshes the TTL.
    pub fn insert(&self, key: String, value: V) {
        let mut inner = self.inner.write().unwrap();

        if inner.config.max_size == 0 {
            return;
        }

        if inner.entries.contains_key(&key) {
            inner.access_order.retain(|k| k != &key);
        } else if inner.entries.len() >= inner.config.max_size {
            if let Some(oldest_key) = inner.access_order.first().cloned() {
                inner.entries.remove(&oldest_key);
                inner.access_order.remove(0);
            }
        }

        inner.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
        inner.access_order.push(key);
    }

    /// Remove a single entry, regardless of its TTL (used on write-invalidate
    /// paths, §4.9 "admin writes bust the affected cache entry").
    pub fn invalidate(&self, key: &str) {
        let mut inner = self.inner.write().unwrap();
        inner.entries.remove(key);
        inner.access_order.retain(|k| k != key);
    }

    /// Clear all entries from the cache. Does not reset statistics.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.entries.clear();
        inner.access_order.clear();
    }

    /// Number of entries currently held, including not-yet-lazily-cleaned
    /// expired ones.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.read().unwrap().stats.clone()
    }

    /// Reset cache statistics without affecting cached entries.
    pub fn reset_stats(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.stats = CacheStats::default();
    }

    /// Generate a deterministic hash key from input text — useful for
    /// content-addressed cache keys (e.g. scan results keyed by input text).
    pub fn hash_key(input: &str) -> String {
        let mut hasher = DefaultHasher::new();
        input.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }
}

impl<V> Clone for TtlCache<V> {
    /// Clone creates a new reference to the same underlying cache; all
    /// clones share cache data and statistics.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_result(text: &str) -> ScanResult {
        ScanResult::pass(text.to_string())
    }

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_size, 10_000);
        assert_eq!(config.ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_cache_stats_empty() {
        let stats = CacheStats::default();
        assert_eq!(stats.total_requests(), 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_cache_stats_calculation() {
        let stats = CacheStats { hits: 7, misses: 3 };
        assert_eq!(stats.total_requests(), 10);
        assert!((stats.hit_rate() - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_basic_insert_get() {
        let cache = ResultCache::new(CacheConfig {
            max_size: 10,
            ttl: Duration::from_secs(60),
        });

        let result = create_test_result("test");
        cache.insert("key1".to_string(), result.clone());

        assert_eq!(cache.get("key1"), Some(result));
    }

    #[test]
    fn test_cache_miss() {
        let cache = ResultCache::new(CacheConfig {
            max_size: 10,
            ttl: Duration::from_secs(60),
        });

        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn test_is_empty() {
        let cache = ResultCache::new(CacheConfig::default());
        assert!(cache.is_empty());

        cache.insert("key".to_string(), create_test_result("test"));
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_invalidate_removes_single_entry() {
        let cache = ResultCache::new(CacheConfig::default());
        cache.insert("key1".to_string(), create_test_result("a"));
        cache.insert("key2".to_string(), create_test_result("b"));

        cache.invalidate("key1");

        assert!(cache.get("key1").is_none());
        assert!(cache.get("key2").is_some());
    }

    #[test]
    fn test_hash_key_deterministic() {
        let key1 = ResultCache::hash_key("test input");
        let key2 = ResultCache::hash_key("test input");
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_hash_key_different_inputs() {
        let key1 = ResultCache::hash_key("input1");
        let key2 = ResultCache::hash_key("input2");
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_generic_cache_holds_arbitrary_value_type() {
        let cache: TtlCache<String> = TtlCache::new(CacheConfig::default());
        cache.insert("k".to_string(), "v".to_string());
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }
}
