//! Bank repository - cached, retrying access to bank records
//!
//! Read budgets are generous (idempotent), write budgets are smaller because
//! the remote API does not guarantee idempotency for mutations. Every write
//! invalidates the all-banks aggregate and the record's anchored by-id key.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::cache::key;
use crate::domain::{Bank, BankApi, BankDraft, BankId, DomainError};
use crate::infrastructure::retry::RetryConfig;

use super::base::{CacheConfig, ResourceRepository};

const LIST_TTL: Duration = Duration::from_secs(5 * 60);
const BY_ID_TTL: Duration = Duration::from_secs(10 * 60);
const SEARCH_TTL: Duration = Duration::from_secs(3 * 60);
const COUNTRY_TTL: Duration = Duration::from_secs(5 * 60);

const READ_RETRY_DELAY: Duration = Duration::from_secs(1);
const WRITE_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Repository for bank records, owning its cache exclusively
#[derive(Debug)]
pub struct BankRepository {
    api: Arc<dyn BankApi>,
    base: ResourceRepository,
    caching_enabled: bool,
    read_retry_delay: Duration,
    write_retry_delay: Duration,
}

impl BankRepository {
    pub fn new(api: Arc<dyn BankApi>) -> Self {
        Self {
            api,
            base: ResourceRepository::new(),
            caching_enabled: true,
            read_retry_delay: READ_RETRY_DELAY,
            write_retry_delay: WRITE_RETRY_DELAY,
        }
    }

    /// Disables caching; every read calls through to the remote API
    pub fn with_caching_disabled(mut self) -> Self {
        self.caching_enabled = false;
        self
    }

    /// Overrides the backoff base delays (mainly for tests and tooling)
    pub fn with_retry_delays(mut self, read: Duration, write: Duration) -> Self {
        self.read_retry_delay = read;
        self.write_retry_delay = write;
        self
    }

    fn cache_config(&self, ttl: Duration) -> CacheConfig {
        CacheConfig {
            ttl,
            enabled: self.caching_enabled,
        }
    }

    fn read_retry(&self, max_retries: u32) -> RetryConfig {
        RetryConfig::new(max_retries, self.read_retry_delay)
    }

    fn write_retry(&self) -> RetryConfig {
        RetryConfig::new(2, self.write_retry_delay)
    }

    /// All bank records
    pub async fn list(&self) -> Result<Vec<Bank>, DomainError> {
        let key = key::banks_all();
        self.base
            .read_through(&key, &self.cache_config(LIST_TTL), &self.read_retry(3), || {
                self.api.list_banks()
            })
            .await
    }

    /// A single bank by id; by-id lookups get the longest TTL
    pub async fn get(&self, id: BankId) -> Result<Bank, DomainError> {
        let key = key::bank_by_id(id.value());
        self.base
            .read_through(
                &key,
                &self.cache_config(BY_ID_TTL),
                &self.read_retry(2),
                || self.api.get_bank(id),
            )
            .await
    }

    /// Creates a bank record and invalidates the reads it staled
    pub async fn create(&self, draft: BankDraft) -> Result<Bank, DomainError> {
        let bank = self
            .base
            .write_through(
                "banks.create",
                &self.write_retry(),
                &[key::exact(&key::banks_all())],
                || self.api.create_bank(&draft),
            )
            .await?;

        // The by-id key for a fresh record never existed; removing it is a
        // guaranteed no-op kept for symmetry with update and delete.
        self.base
            .invalidate(Some(&key::exact(&key::bank_by_id(bank.id.value()))))
            .await?;

        tracing::info!(id = %bank.id, "Created bank");
        Ok(bank)
    }

    /// Replaces a bank record
    pub async fn update(&self, id: BankId, draft: BankDraft) -> Result<Bank, DomainError> {
        let bank = self
            .base
            .write_through(
                "banks.update",
                &self.write_retry(),
                &[
                    key::exact(&key::banks_all()),
                    key::exact(&key::bank_by_id(id.value())),
                ],
                || self.api.update_bank(id, &draft),
            )
            .await?;

        tracing::info!(id = %id, "Updated bank");
        Ok(bank)
    }

    /// Deletes a bank record
    pub async fn delete(&self, id: BankId) -> Result<(), DomainError> {
        self.base
            .write_through(
                "banks.delete",
                &self.write_retry(),
                &[
                    key::exact(&key::banks_all()),
                    key::exact(&key::bank_by_id(id.value())),
                ],
                || self.api.delete_bank(id),
            )
            .await?;

        tracing::info!(id = %id, "Deleted bank");
        Ok(())
    }

    /// Banks whose name contains the given term; the cache key uses the
    /// lower-cased term so equivalent searches share one entry
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Bank>, DomainError> {
        let key = key::banks_search(name);
        self.base
            .read_through(
                &key,
                &self.cache_config(SEARCH_TTL),
                &self.read_retry(2),
                || self.api.search_banks(name),
            )
            .await
    }

    /// All banks for a country code
    pub async fn by_country(&self, country_code: &str) -> Result<Vec<Bank>, DomainError> {
        let key = key::banks_country(country_code);
        self.base
            .read_through(
                &key,
                &self.cache_config(COUNTRY_TTL),
                &self.read_retry(2),
                || self.api.banks_by_country(country_code),
            )
            .await
    }

    /// Drops every cached bank read
    pub async fn clear_cache(&self) -> Result<(), DomainError> {
        self.base.invalidate(Some(key::BANKS_PATTERN)).await
    }

    /// Drops the cached entry for one bank
    pub async fn clear_bank_cache(&self, id: BankId) -> Result<(), DomainError> {
        self.base
            .invalidate(Some(&key::exact(&key::bank_by_id(id.value()))))
            .await
    }
}
