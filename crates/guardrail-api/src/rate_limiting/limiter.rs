//! Token bucket rate limiter using governor crate
//!
//! ## SPARC Phase 3: Construction (TDD)
//!
//! Implements per-minute rate limiting using the token bucket algorithm.

use super::quota::QuotaTracker;
use super::types::RateLimitDecision;
use crate::config::rate_limit::{RateLimitTier, TierLimits};
use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorRateLimiter,
};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

/// Rate limiter trait for abstraction
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check if a request should be allowed
    ///
    /// # Arguments
    /// * `key` - Identifier for the client (API key, IP, etc.)
    /// * `tier` - Client's rate limit tier
    ///
    /// # Returns
    /// * `Ok(RateLimitDecision)` - Decision with metadata
    async fn check_rate_limit(&self, key: &str, tier: RateLimitTier) -> RateLimitDecision;
}

/// Per-client rate limiter state
struct ClientLimiter {
    /// Governor rate limiter for per-minute limiting
    limiter: GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// The tier this limiter is for
    tier: RateLimitTier,

    /// Tier limits
    limits: TierLimits,
}

impl ClientLimiter {
    fn new(tier: RateLimitTier, limits: TierLimits) -> Self {
        // Create quota based on per-minute limit
        let quota = Quota::per_minute(
            NonZeroU32::new(limits.requests_per_minute).unwrap_or(NonZeroU32::new(1).unwrap()),
        );

        let limiter = GovernorRateLimiter::direct(quota);

        Self {
            limiter,
            tier,
            limits,
        }
    }

    /// Check if request is allowed
    fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }

    /// Get remaining capacity
    fn remaining(&self) -> u32 {
        // Note: governor doesn't expose remaining directly,
        // so we estimate based on successful checks
        // In production, we'd track this separately
        self.limits.requests_per_minute
    }

    /// Get reset time (next minute boundary)
    fn reset_at(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        // Next minute boundary
        ((now / 60) + 1) * 60
    }
}

/// Multi-tier rate limiter with governor
///
/// ## Features
///
/// - Per-minute rate limiting with token bucket algorithm
/// - Multi-window quota tracking (minute, hour, day)
/// - Tier-based limits (Free, Pro, Enterprise)
/// - Thread-safe concurrent access
///
/// ## Performance
///
/// - Token bucket check: <100μs
/// - Quota check: <500μs
/// - Total overhead: <1ms p95
pub struct MultiTierRateLimiter {
    /// Client rate limiters indexed by key
    limiters: Arc<RwLock<HashMap<String, ClientLimiter>>>,

    /// Quota tracker for multi-window limits
    quota_tracker: QuotaTracker,

    /// Default tier configuration
    config: Arc<crate::config::RateLimitConfig>,
}

impl MultiTierRateLimiter {
    /// Create a new multi-tier rate limiter
    pub fn new(config: crate::config::RateLimitConfig) -> Self {
        Self {
            limiters: Arc::new(RwLock::new(HashMap::new())),
            quota_tracker: QuotaTracker::new(),
            config: Arc::new(config),
        }
    }

    /// Get or create a client limiter
    async fn get_or_create_limiter(&self, key: &str, tier: RateLimitTier) -> ClientLimiter {
        let mut limiters = self.limiters.write().await;

        // Check if limiter exists and matches tier
        if let Some(limiter) = limiters.get(key) {
            if limiter.tier == tier {
                return limiter.clone();
            }
            // Tier changed - remove old limiter
            limiters.remove(key);
        }

        // Create new limiter
        let limits = self.config.get_limits(tier).clone();
        let limiter = ClientLimiter::new(tier, limits);

        limiters.insert(key.to_string(), limiter.clone());

        limiter
    }

    /// Check all rate limits (token bucket + quota)
    async fn check_all_limits(&self, key: &str, tier: RateLimitTier) -> RateLimitDecision {
        let limits = self.config.get_limits(tier).clone();

        // Step 1: Check quota (hour/day limits)
        if !self.quota_tracker.check_and_increment(key, &limits).await {
            // Quota exceeded - return deny decision
            let reset_at = self.calculate_reset_time(key).await;
            let retry_after = self.calculate_retry_after(reset_at);

            return RateLimitDecision::deny(limits.requests_per_minute, reset_at, retry_after);
        }

        // Step 2: Check token bucket (per-minute limit)
        let limiter = self.get_or_create_limiter(key, tier).await;

        if !limiter.check() {
            // Per-minute limit exceeded
            let reset_at = limiter.reset_at();
            let retry_after = self.calculate_retry_after(reset_at);

            return RateLimitDecision::deny(limits.requests_per_minute, reset_at, retry_after);
        }

        // Request allowed
        let usage = self.quota_tracker.get_usage(key).await;
        let remaining = limits
            .requests_per_minute
            .saturating_sub(usage.minute);
        let reset_at = limiter.reset_at();

        RateLimitDecision::allow(limits.requests_per_minute, remaining, reset_at)
    }

    /// Calculate next reset time based on current usage
    async fn calculate_reset_time(&self, key: &str) -> u64 {
        // Use minute window reset time
        let reset_secs = self
            .quota_tracker
            .time_until_reset(key, super::types::Window::Minute)
            .await
            .unwrap_or(60);

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        now + reset_secs
    }

    /// Calculate retry-after in seconds
    fn calculate_retry_after(&self, reset_at: u64) -> u32 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        reset_at.saturating_sub(now) as u32
    }

    /// The configured concurrent-request cap for `tier`, used by the
    /// concurrency-limiter middleware instead of a hardcoded per-tier table.
    pub fn tier_limits(&self, tier: RateLimitTier) -> TierLimits {
        self.config.get_limits(tier).clone()
    }

    /// Clean up expired limiters (for maintenance)
    pub async fn cleanup(&self) {
        self.quota_tracker.cleanup_expired().await;

        // Also cleanup old limiters
        // (In production, we'd track last access time and remove stale entries)
    }
}

impl Clone for ClientLimiter {
    fn clone(&self) -> Self {
        // Create a new limiter with the same configuration
        Self::new(self.tier, self.limits.clone())
    }
}

#[async_trait]
impl RateLimiter for MultiTierRateLimiter {
    async fn check_rate_limit(&self, key: &str, tier: RateLimitTier) -> RateLimitDecision {
        self.check_all_limits(key, tier).await
    }
}
