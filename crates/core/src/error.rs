//! Shared error model.

use thiserror::Error;

/// Result type used by the foundation crates.
pub type CoreResult<T> = Result<T, CoreError>;

/// Foundation-level error.
///
/// Keep this focused on deterministic failures (bad identifiers, missing
/// configuration). Transport and policy concerns have their own error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An identifier was invalid (e.g. empty).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A required configuration value was absent.
    #[error("missing configuration: {0}")]
    MissingConfig(String),
}

impl CoreError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn missing_config(key: impl Into<String>) -> Self {
        Self::MissingConfig(key.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(CoreError::invalid_id("card id").to_string(), "invalid identifier: card id");
        assert_eq!(
            CoreError::missing_config("PIPELINE_GET_USER_MAP").to_string(),
            "missing configuration: PIPELINE_GET_USER_MAP"
        );
    }
}
