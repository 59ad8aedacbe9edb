//! IBAN validation result and identifier normalization

use serde::{Deserialize, Serialize};

use super::Bank;

/// Result of validating an IBAN against the remote service
///
/// All fields beyond `valid` are populated only when the server could parse
/// the identifier; `bank` is present when the bank code matched a known
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IbanValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_digits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<Bank>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Normalizes an IBAN for identity purposes: strips all whitespace and
/// upper-cases the rest, so `"de89 3704 0044 0532 0130 00"` and
/// `"DE89370400440532013000"` map to the same cache key.
pub fn normalize_iban(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
