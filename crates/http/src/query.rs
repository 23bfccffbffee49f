//! Query-string construction (`application/x-www-form-urlencoded`).

/// Ordered query parameters.
///
/// Insertion order is preserved in the encoded output, which keeps resource
/// paths stable for logging and for hosts that cache by URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode as `k=v&k2=v2` (spaces become `+`).
    pub fn encode(&self) -> String {
        // Encoding a sequence of string pairs cannot fail.
        serde_urlencoded::to_string(&self.pairs).unwrap_or_default()
    }
}

/// `{endpoint}?{query}`. The separator is always present, matching how the
/// platform pipelines are addressed.
pub fn resource_path(endpoint: &str, query: &str) -> String {
    format!("{endpoint}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_in_insertion_order() {
        let q = QueryParams::new()
            .with("cardId", "a|b|c")
            .with("cardPrefix", "prod")
            .with("userSearchKey", "jane doe");

        assert_eq!(q.encode(), "cardId=a%7Cb%7Cc&cardPrefix=prod&userSearchKey=jane+doe");
    }

    #[test]
    fn resource_path_always_has_separator() {
        assert_eq!(resource_path("/api/x", ""), "/api/x?");
        assert_eq!(resource_path("/api/x", "a=1"), "/api/x?a=1");
    }
}
