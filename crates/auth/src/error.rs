use thiserror::Error;

use cardkit_http::{ApiError, TransportError};

/// Why an access check could not reach a policy decision.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("security endpoint is not configured")]
    NotConfigured,

    #[error("security request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("security pipeline returned {0}")]
    Api(#[from] ApiError),

    #[error("malformed allow-list: {0}")]
    MalformedPolicy(String),
}
