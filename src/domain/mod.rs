//! Domain types and trait seams

pub mod bank;
pub mod cache;
pub mod client;
pub mod error;
pub mod iban;

pub use bank::{Bank, BankDraft, BankId};
pub use client::{BankApi, IbanApi};
pub use error::DomainError;
pub use iban::{IbanValidation, normalize_iban};
