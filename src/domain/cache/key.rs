//! Cache key construction and invalidation patterns
//!
//! Keys are colon-delimited segments, namespaced by domain as the first
//! segment (`banks:id:7`, `iban:validate:DE89…`). Invalidation patterns are
//! regexes matched against whole keys; anything carrying an identifier must
//! go through [`exact`] so that `banks:id:1` can never match `banks:id:10`.

use crate::domain::iban::normalize_iban;

/// Segment delimiter for cache keys
pub const DELIMITER: &str = ":";

/// Joins key segments with the delimiter, order preserved.
pub fn join(parts: &[&str]) -> String {
    parts.join(DELIMITER)
}

/// Anchored, escaped pattern matching exactly one key.
pub fn exact(key: &str) -> String {
    format!("^{}$", regex::escape(key))
}

/// Pattern matching every key in the banks namespace
pub const BANKS_PATTERN: &str = "^banks:";

/// Pattern matching every cached IBAN validation
pub const IBAN_PATTERN: &str = "^iban:validate:";

/// Key for the all-banks aggregate
pub fn banks_all() -> String {
    join(&["banks", "all"])
}

/// Key for a single bank record
pub fn bank_by_id(id: i64) -> String {
    join(&["banks", "id", &id.to_string()])
}

/// Key for a name search; the term is lower-cased so semantically identical
/// searches share one entry.
pub fn banks_search(name: &str) -> String {
    join(&["banks", "search", &name.to_lowercase()])
}

/// Key for a by-country listing
pub fn banks_country(country_code: &str) -> String {
    join(&["banks", "country", &country_code.to_uppercase()])
}

/// Key for a cached validation result, derived from the normalized IBAN.
pub fn iban_validate(iban: &str) -> String {
    join(&["iban", "validate", &normalize_iban(iban)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_join_preserves_order() {
        assert_eq!(join(&["banks", "id", "7"]), "banks:id:7");
    }

    #[test]
    fn test_exact_does_not_match_longer_keys() {
        let pattern = Regex::new(&exact(&bank_by_id(1))).unwrap();
        assert!(pattern.is_match("banks:id:1"));
        assert!(!pattern.is_match("banks:id:10"));
    }

    #[test]
    fn test_namespace_pattern_matches_all_bank_keys() {
        let pattern = Regex::new(BANKS_PATTERN).unwrap();
        assert!(pattern.is_match(&banks_all()));
        assert!(pattern.is_match(&bank_by_id(3)));
        assert!(pattern.is_match(&banks_search("Sparkasse")));
        assert!(!pattern.is_match(&iban_validate("DE89370400440532013000")));
    }

    #[test]
    fn test_search_key_is_case_folded() {
        assert_eq!(banks_search("Sparkasse"), banks_search("sparkasse"));
    }

    #[test]
    fn test_iban_key_ignores_grouping() {
        assert_eq!(
            iban_validate("DE89 3704 0044 0532 0130 00"),
            iban_validate("DE89370400440532013000")
        );
    }
}
