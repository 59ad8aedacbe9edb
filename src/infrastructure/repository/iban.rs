//! IBAN validation repository
//!
//! Validation is modeled purely as a read: the cache key is derived from the
//! normalized identifier, so formatted and compact spellings of the same IBAN
//! share one entry.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::cache::key;
use crate::domain::{DomainError, IbanApi, IbanValidation};
use crate::infrastructure::retry::RetryConfig;

use super::base::{CacheConfig, ResourceRepository};

const VALIDATE_TTL: Duration = Duration::from_secs(10 * 60);
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Repository for IBAN validations, owning its cache exclusively
#[derive(Debug)]
pub struct IbanRepository {
    api: Arc<dyn IbanApi>,
    base: ResourceRepository,
    caching_enabled: bool,
    retry_delay: Duration,
}

impl IbanRepository {
    pub fn new(api: Arc<dyn IbanApi>) -> Self {
        Self {
            api,
            base: ResourceRepository::new(),
            caching_enabled: true,
            retry_delay: RETRY_DELAY,
        }
    }

    /// Disables caching; every validation calls through to the remote API
    pub fn with_caching_disabled(mut self) -> Self {
        self.caching_enabled = false;
        self
    }

    /// Overrides the backoff base delay (mainly for tests and tooling)
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Validates an IBAN, serving repeated validations of the same
    /// (normalized) identifier from cache
    pub async fn validate(&self, iban: &str) -> Result<IbanValidation, DomainError> {
        let key = key::iban_validate(iban);
        let cache_config = CacheConfig {
            ttl: VALIDATE_TTL,
            enabled: self.caching_enabled,
        };
        let retry_config = RetryConfig::new(2, self.retry_delay);

        self.base
            .read_through(&key, &cache_config, &retry_config, || {
                self.api.validate_iban(iban)
            })
            .await
    }

    /// Drops the cached validation for one IBAN, or all of them
    pub async fn clear_validation_cache(&self, iban: Option<&str>) -> Result<(), DomainError> {
        match iban {
            Some(iban) => {
                self.base
                    .invalidate(Some(&key::exact(&key::iban_validate(iban))))
                    .await
            }
            None => self.base.invalidate(Some(key::IBAN_PATTERN)).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct MockIbanApi {
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IbanApi for MockIbanApi {
        async fn validate_iban(&self, iban: &str) -> Result<IbanValidation, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(iban.to_string());
            Ok(IbanValidation {
                valid: true,
                iban: Some(iban.to_string()),
                country_code: Some("DE".to_string()),
                check_digits: Some("89".to_string()),
                bank_code: Some("37040044".to_string()),
                account_number: Some("0532013000".to_string()),
                bank: None,
                error_message: None,
            })
        }
    }

    #[tokio::test]
    async fn test_equivalent_spellings_share_one_cache_entry() {
        let api = Arc::new(MockIbanApi::default());
        let repo = IbanRepository::new(api.clone());

        repo.validate("DE89 3704 0044 0532 0130 00").await.unwrap();
        repo.validate("DE89370400440532013000").await.unwrap();
        repo.validate("de89 3704 0044 0532 0130 00").await.unwrap();

        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remote_sees_caller_supplied_form() {
        let api = Arc::new(MockIbanApi::default());
        let repo = IbanRepository::new(api.clone());

        repo.validate("DE89 3704 0044 0532 0130 00").await.unwrap();

        let seen = api.seen.lock().unwrap().clone();
        assert_eq!(seen, vec!["DE89 3704 0044 0532 0130 00".to_string()]);
    }

    #[tokio::test]
    async fn test_clear_single_validation_forces_refetch() {
        let api = Arc::new(MockIbanApi::default());
        let repo = IbanRepository::new(api.clone());

        repo.validate("DE89370400440532013000").await.unwrap();
        repo.clear_validation_cache(Some("DE89 3704 0044 0532 0130 00"))
            .await
            .unwrap();
        repo.validate("DE89370400440532013000").await.unwrap();

        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_all_validations() {
        let api = Arc::new(MockIbanApi::default());
        let repo = IbanRepository::new(api.clone());

        repo.validate("DE89370400440532013000").await.unwrap();
        repo.validate("FR1420041010050500013M02606").await.unwrap();
        repo.clear_validation_cache(None).await.unwrap();
        repo.validate("DE89370400440532013000").await.unwrap();
        repo.validate("FR1420041010050500013M02606").await.unwrap();

        assert_eq!(api.calls.load(Ordering::SeqCst), 4);
    }
}
