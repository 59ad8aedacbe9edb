//! Bank entity and related types

use serde::{Deserialize, Serialize};

/// Bank identifier assigned by the server on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankId(i64);

impl BankId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for BankId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bank record as returned by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    pub id: BankId,
    pub name: String,
    pub bic: String,
    pub bank_code: String,
    pub country_code: String,
}

/// Payload for creating or updating a bank record
///
/// The id is server-assigned, so drafts never carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDraft {
    pub name: String,
    pub bic: String,
    pub bank_code: String,
    pub country_code: String,
}

impl BankDraft {
    pub fn new(
        name: impl Into<String>,
        bic: impl Into<String>,
        bank_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            bic: bic.into(),
            bank_code: bank_code.into(),
            country_code: country_code.into(),
        }
    }
}
