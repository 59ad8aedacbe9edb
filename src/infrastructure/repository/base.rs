//! Generic repository base composing the cache and the retry executor

use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::domain::DomainError;
use crate::domain::cache::{Cache, CacheExt};
use crate::infrastructure::cache::InMemoryCache;
use crate::infrastructure::retry::{RetryConfig, run_with_retry};

/// Caching policy for a read operation
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    /// When disabled, reads always call through and never touch the cache
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            enabled: true,
        }
    }
}

impl CacheConfig {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, enabled: true }
    }

    pub fn disabled() -> Self {
        Self {
            ttl: Duration::ZERO,
            enabled: false,
        }
    }
}

/// Read-through / write-through access to a remote resource
///
/// Owns its cache exclusively; all mutation goes through the operations
/// below, so for a single repository instance an invalidation issued after a
/// write is visible to the next read.
#[derive(Debug)]
pub struct ResourceRepository {
    cache: Box<dyn Cache>,
}

impl ResourceRepository {
    pub fn new() -> Self {
        Self {
            cache: Box::new(InMemoryCache::new()),
        }
    }

    /// Builds the repository around an injected cache
    pub fn with_cache(cache: Box<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Serves the value from cache when possible; otherwise runs `fetch`
    /// under the retry policy and populates the cache with the result.
    ///
    /// A cache hit bypasses both the fetch and the retry logic entirely. A
    /// failed fetch writes nothing.
    pub async fn read_through<T, F, Fut>(
        &self,
        key: &str,
        cache_config: &CacheConfig,
        retry_config: &RetryConfig,
        fetch: F,
    ) -> Result<T, DomainError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, DomainError>>,
    {
        if cache_config.enabled {
            if let Some(hit) = self.cache.get(key).await? {
                tracing::debug!(key, "Cache hit");
                return Ok(hit);
            }
            tracing::debug!(key, "Cache miss, fetching");
        }

        let value = run_with_retry(retry_config, key, fetch).await?;

        if cache_config.enabled {
            self.cache.set(key, &value, cache_config.ttl).await?;
        }

        Ok(value)
    }

    /// Runs `mutate` under the retry policy, bypassing the cache, then
    /// invalidates the given patterns. A failed mutation invalidates nothing.
    pub async fn write_through<T, F, Fut>(
        &self,
        operation_name: &str,
        retry_config: &RetryConfig,
        invalidation_patterns: &[String],
        mutate: F,
    ) -> Result<T, DomainError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, DomainError>>,
    {
        let value = run_with_retry(retry_config, operation_name, mutate).await?;

        for pattern in invalidation_patterns {
            let removed = self.cache.delete_pattern(pattern).await?;
            tracing::debug!(pattern = %pattern, removed, "Invalidated after write");
        }

        Ok(value)
    }

    /// Removes entries matching the pattern, or everything when `None`.
    pub async fn invalidate(&self, pattern: Option<&str>) -> Result<(), DomainError> {
        match pattern {
            Some(pattern) => {
                self.cache.delete_pattern(pattern).await?;
            }
            None => self.cache.clear().await?,
        }
        Ok(())
    }
}

impl Default for ResourceRepository {
    fn default() -> Self {
        Self::new()
    }
}
