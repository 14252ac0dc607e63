//! Auth cache (§4.9): a short-TTL, read-through cache in front of the
//! tenant/application API-key lookup, keyed by the raw key value itself.
//! Avoids a Postgres round trip on every gateway/proxy/detection request
//! while staying small enough that a revoked key is only honored for at
//! most `ttl` after revocation.

use super::types::AuthContext;
use guardrail_models::cache::{CacheConfig, TtlCache};
use std::time::Duration;

#[derive(Clone)]
pub struct AuthCache {
    inner: TtlCache<AuthContext>,
}

impl AuthCache {
    pub fn new(ttl: Duration, max_size: usize) -> Self {
        Self {
            inner: TtlCache::new(CacheConfig { max_size, ttl }),
        }
    }

    pub fn get(&self, raw_key: &str) -> Option<AuthContext> {
        self.inner.get(raw_key)
    }

    pub fn insert(&self, raw_key: &str, ctx: AuthContext) {
        self.inner.insert(raw_key.to_string(), ctx);
    }

    /// Bust the cached entry for a key — called by admin endpoints that
    /// revoke or rotate a key, so the change takes effect immediately
    /// rather than waiting out the TTL.
    pub fn invalidate(&self, raw_key: &str) {
        self.inner.invalidate(raw_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn hit_after_insert_miss_after_invalidate() {
        let cache = AuthCache::new(Duration::from_secs(300), 100);
        let ctx = AuthContext::Tenant { tenant_id: Uuid::new_v4() };

        assert!(cache.get("sk-xxai-abc").is_none());
        cache.insert("sk-xxai-abc", ctx.clone());
        assert!(cache.get("sk-xxai-abc").is_some());

        cache.invalidate("sk-xxai-abc");
        assert!(cache.get("sk-xxai-abc").is_none());
    }
}
