//! IBAN Validator client
//!
//! Data-access layer for the IBAN Validator API with:
//! - Time-bounded response caching with pattern invalidation
//! - Retry with exponential backoff for transient remote failures
//! - Read-through / write-through repositories for banks and IBAN validation

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
