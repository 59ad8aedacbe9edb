//! In-memory cache implementation using moka

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::DomainError;
use crate::domain::cache::Cache;

/// Configuration for the in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries before moka starts evicting
    pub max_capacity: u64,
    /// Backstop TTL applied by moka when the per-entry deadline never fires
    pub default_ttl: Duration,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            default_ttl: Duration::from_secs(3600),
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

/// Cache entry stored in moka
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Serialized JSON value
    data: String,
    /// Expiration deadline (millis since epoch); the entry is logically
    /// absent once the current time exceeds this
    expires_at: u64,
}

/// In-memory cache with per-entry TTL
///
/// Each entry records its own expiration deadline and is checked lazily on
/// lookup, so reads never observe stale data even without a sweeper; moka's
/// own TTL and capacity limits act only as a memory backstop.
#[derive(Debug)]
pub struct InMemoryCache {
    cache: MokaCache<String, CacheEntry>,
}

impl InMemoryCache {
    /// Creates a new in-memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a new in-memory cache with the given configuration
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.default_ttl)
            .build();

        Self { cache }
    }

    fn current_time_millis() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn is_expired(entry: &CacheEntry) -> bool {
        Self::current_time_millis() > entry.expires_at
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        match self.cache.get(key).await {
            Some(entry) => {
                if Self::is_expired(&entry) {
                    self.cache.remove(key).await;
                    return Ok(None);
                }

                Ok(Some(entry.data.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let expires_at = Self::current_time_millis() + ttl.as_millis() as u64;
        let entry = CacheEntry {
            data: value.to_string(),
            expires_at,
        };

        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let existed = self.cache.get(key).await.is_some();
        self.cache.remove(key).await;
        Ok(existed)
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let regex = regex::Regex::new(pattern)
            .map_err(|e| DomainError::cache(format!("Invalid pattern: {}", e)))?;

        // Sync pending tasks first so iteration sees recent inserts
        self.cache.run_pending_tasks().await;

        let cache_clone = self.cache.clone();
        let keys_to_delete: Vec<String> = tokio::task::spawn_blocking(move || {
            cache_clone
                .iter()
                .filter_map(|(k, _)| {
                    let key_str: &str = k.as_ref();

                    if regex.is_match(key_str) {
                        Some(key_str.to_string())
                    } else {
                        None
                    }
                })
                .collect()
        })
        .await
        .map_err(|e| DomainError::internal(format!("Failed to iterate cache: {}", e)))?;

        let mut deleted = 0;
        for key in keys_to_delete {
            self.cache.remove(&key).await;
            deleted += 1;
        }

        Ok(deleted)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Duration::from_secs(60))
            .await
            .unwrap();

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert_eq!(result, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let cache = InMemoryCache::new();

        let result: Option<String> = cache.get("missing").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_entry() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"old", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("key1", &"new", Duration::from_secs(60))
            .await
            .unwrap();

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert_eq!(result, Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent_and_removed() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Duration::from_millis(50))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert!(result.is_none());

        // The expired entry was deleted as a side effect of the lookup
        assert!(cache.cache.get("key1").await.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(cache.delete("key1").await.unwrap());
        assert!(!cache.delete("key1").await.unwrap());

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_pattern() {
        let cache = InMemoryCache::new();

        cache
            .set("banks:all", &"a", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("banks:id:7", &"b", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("iban:validate:DE89", &"c", Duration::from_secs(60))
            .await
            .unwrap();

        let deleted = cache.delete_pattern("^banks:").await.unwrap();
        assert_eq!(deleted, 2);

        let kept: Option<String> = cache.get("iban:validate:DE89").await.unwrap();
        assert_eq!(kept, Some("c".to_string()));
    }

    #[tokio::test]
    async fn test_anchored_pattern_does_not_over_invalidate() {
        let cache = InMemoryCache::new();

        cache
            .set("banks:id:1", &"one", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("banks:id:10", &"ten", Duration::from_secs(60))
            .await
            .unwrap();

        let deleted = cache.delete_pattern("^banks:id:1$").await.unwrap();
        assert_eq!(deleted, 1);

        let kept: Option<String> = cache.get("banks:id:10").await.unwrap();
        assert_eq!(kept, Some("ten".to_string()));
    }

    #[tokio::test]
    async fn test_delete_pattern_matching_nothing_is_noop() {
        let cache = InMemoryCache::new();

        let deleted = cache.delete_pattern("^banks:id:99$").await.unwrap();
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn test_delete_pattern_rejects_invalid_regex() {
        let cache = InMemoryCache::new();

        let result = cache.delete_pattern("banks:(").await;
        assert!(matches!(result, Err(DomainError::Cache { .. })));
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("key2", &"value2", Duration::from_secs(60))
            .await
            .unwrap();

        cache.clear().await.unwrap();

        assert_eq!(cache.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_complex_types() {
        let cache = InMemoryCache::new();

        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        struct TestData {
            name: String,
            values: Vec<i32>,
        }

        let data = TestData {
            name: "test".to_string(),
            values: vec![1, 2, 3],
        };

        cache
            .set("complex", &data, Duration::from_secs(60))
            .await
            .unwrap();

        let result: Option<TestData> = cache.get("complex").await.unwrap();
        assert_eq!(result, Some(data));
    }
}
