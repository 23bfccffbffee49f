//! Search query normalization.

use serde::Serialize;

/// Normalized queries shorter than this (in characters) never hit the network.
pub const MIN_QUERY_LEN: usize = 4;

/// Institutional mail domain users commonly paste along with their username.
pub const DEFAULT_INSTITUTION_SUFFIX: &str = "@eou.edu";

/// Lowercased, trimmed search key with the institutional suffix removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Normalize raw input.
    ///
    /// Only the first occurrence of `suffix` is removed. Matching is
    /// case-insensitive because the input is lowercased first.
    pub fn normalize(raw: &str, suffix: &str) -> Self {
        let lowered = raw.to_lowercase();
        let trimmed = lowered.trim();
        let suffix = suffix.to_lowercase();

        if suffix.is_empty() {
            return Self(trimmed.to_owned());
        }
        Self(trimmed.replacen(&suffix, "", 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, the only gating signal.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_searchable(&self) -> bool {
        self.len() >= MIN_QUERY_LEN
    }
}

impl core::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn norm(raw: &str) -> SearchQuery {
        SearchQuery::normalize(raw, DEFAULT_INSTITUTION_SUFFIX)
    }

    #[test]
    fn strips_suffix_case_insensitively() {
        assert_eq!(norm("  MMonty@EOU.edu ").as_str(), "mmonty");
    }

    #[test]
    fn strips_only_first_occurrence() {
        assert_eq!(norm("a@eou.edub@eou.edu").as_str(), "ab@eou.edu");
    }

    #[test]
    fn suffix_alone_is_not_searchable() {
        let q = norm("@eou.edu");
        assert!(q.is_empty());
        assert!(!q.is_searchable());
    }

    #[test]
    fn gate_counts_characters_not_bytes() {
        assert!(!norm("éé").is_searchable());
        assert!(norm("éééé").is_searchable());
        assert!(!norm("abc").is_searchable());
        assert!(norm("9100").is_searchable());
    }

    #[test]
    fn empty_suffix_only_trims_and_lowercases() {
        assert_eq!(SearchQuery::normalize(" AB@eou.edu ", "").as_str(), "ab@eou.edu");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(
            pad in " {0,2}",
            user in "[a-zA-Z0-9.]{0,16}",
            suffix in prop::option::of("@[eE][oO][uU]\\.[eE][dD][uU]"),
        ) {
            let raw = format!("{pad}{user}{}{pad}", suffix.unwrap_or_default());
            let once = norm(&raw);
            prop_assert_eq!(once.as_str(), user.to_lowercase());
            prop_assert_eq!(norm(once.as_str()), once);
        }

        #[test]
        fn searchable_iff_long_enough(raw in "[a-z0-9]{0,10}") {
            prop_assert_eq!(norm(&raw).is_searchable(), raw.chars().count() >= MIN_QUERY_LEN);
        }
    }
}
