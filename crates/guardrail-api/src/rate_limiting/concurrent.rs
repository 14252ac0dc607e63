//! Concurrent request limiter using semaphores
//!
//! ## SPARC Phase 3: Construction (TDD)
//!
//! Limits the number of simultaneous requests per client using tokio semaphores.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, RwLock, Semaphore};

/// Permit guard for concurrent requests
///
/// Automatically releases the semaphore permit when dropped.
pub struct ConcurrentPermit {
    #[allow(dead_code)]
    permit: OwnedSemaphorePermit,
}

/// Per-client semaphore for concurrent limiting
#[derive(Clone)]
struct ClientSemaphore {
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl ClientSemaphore {
    fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// Try to acquire a permit (non-blocking)
    fn try_acquire_owned(self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.semaphore).try_acquire_owned().ok()
    }

    /// Get available permits
    fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Get max concurrent
    fn max(&self) -> usize {
        self.max_concurrent
    }
}

/// Concurrent request limiter
///
/// ## Features
///
/// - Limits simultaneous requests per client
/// - Non-blocking permit acquisition
/// - Automatic permit release via RAII
/// - Tier-based concurrent limits
///
/// ## Example
///
/// ```rust,ignore
/// let limiter = ConcurrentLimiter::new();
/// let limits = TierLimits { max_concurrent: 10, /* ... */ };
///
/// if let Some(permit) = limiter.try_acquire("user1", &limits).await {
///     // Process request
///     // Permit automatically released when dropped
/// } else {
///     // Return 429 Too Many Requests
/// }
/// ```
pub struct ConcurrentLimiter {
    /// Client semaphores indexed by key
    semaphores: Arc<RwLock<HashMap<String, ClientSemaphore>>>,
}

impl ConcurrentLimiter {
    /// Create a new concurrent limiter
    pub fn new() -> Self {
        Self {
            semaphores: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Try to acquire a concurrent request permit
    ///
    /// # Arguments
    ///
    /// * `key` - Identifier for the client (API key, IP, etc.)
    /// * `max_concurrent` - Maximum concurrent requests for this client
    ///
    /// # Returns
    ///
    /// * `Some(ConcurrentPermit)` - Permit acquired, request allowed
    /// * `None` - No permits available, too many concurrent requests
    pub async fn try_acquire(
        &self,
        key: &str,
        max_concurrent: usize,
    ) -> Option<ConcurrentPermit> {
        // Get or create semaphore
        let semaphore = {
            let mut semaphores = self.semaphores.write().await;

            semaphores
                .entry(key.to_string())
                .or_insert_with(|| ClientSemaphore::new(max_concurrent))
                .clone()
        };

        // Try to acquire permit
        semaphore.try_acquire_owned().map(|permit| ConcurrentPermit { permit })
    }

    /// Get number of available permits for a client
    pub async fn available_permits(&self, key: &str) -> Option<usize> {
        let semaphores = self.semaphores.read().await;
        semaphores.get(key).map(|s| s.available())
    }

    /// Get max concurrent for a client
    pub async fn max_concurrent(&self, key: &str) -> Option<usize> {
        let semaphores = self.semaphores.read().await;
        semaphores.get(key).map(|s| s.max())
    }

    /// Get number of tracked clients
    pub async fn client_count(&self) -> usize {
        self.semaphores.read().await.len()
    }

    /// Clean up unused semaphores (for maintenance)
    pub async fn cleanup(&self) {
        let mut semaphores = self.semaphores.write().await;

        // Remove semaphores that are at full capacity (no active requests)
        semaphores.retain(|_, sem| sem.available() != sem.max());
    }
}

impl Default for ConcurrentLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ConcurrentLimiter {
    fn clone(&self) -> Self {
        Self {
            semaphores: Arc::clone(&self.semaphores),
        }
    }
}
