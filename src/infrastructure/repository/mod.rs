//! Repositories - cached, retrying access to the remote API

mod bank;
mod base;
mod iban;

pub use bank::BankRepository;
pub use base::{CacheConfig, ResourceRepository};
pub use iban::IbanRepository;
