//! Remote API trait seams
//!
//! The repositories never talk HTTP directly; they drive these traits through
//! the retry executor. The concrete implementation lives in
//! `infrastructure::api`.

use async_trait::async_trait;

use super::{Bank, BankDraft, BankId, DomainError, IbanValidation};

/// Remote operations on bank records
#[async_trait]
pub trait BankApi: Send + Sync + std::fmt::Debug {
    /// Fetch all bank records
    async fn list_banks(&self) -> Result<Vec<Bank>, DomainError>;

    /// Fetch a single bank by id
    async fn get_bank(&self, id: BankId) -> Result<Bank, DomainError>;

    /// Create a new bank record, returning it with its server-assigned id
    async fn create_bank(&self, draft: &BankDraft) -> Result<Bank, DomainError>;

    /// Replace an existing bank record
    async fn update_bank(&self, id: BankId, draft: &BankDraft) -> Result<Bank, DomainError>;

    /// Delete a bank record
    async fn delete_bank(&self, id: BankId) -> Result<(), DomainError>;

    /// Search banks by (partial) name
    async fn search_banks(&self, name: &str) -> Result<Vec<Bank>, DomainError>;

    /// Fetch all banks for a country code
    async fn banks_by_country(&self, country_code: &str) -> Result<Vec<Bank>, DomainError>;
}

/// Remote IBAN validation
#[async_trait]
pub trait IbanApi: Send + Sync + std::fmt::Debug {
    /// Validate an IBAN; the checksum logic lives behind the API boundary
    async fn validate_iban(&self, iban: &str) -> Result<IbanValidation, DomainError>;
}
