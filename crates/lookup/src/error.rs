use thiserror::Error;

use cardkit_http::{ApiError, TransportError};

/// Why a lookup request produced no records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("user-map endpoint is not configured")]
    NotConfigured,

    #[error("user lookup request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("user lookup returned {0}")]
    Api(#[from] ApiError),
}

/// Resolution of one lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome<T> {
    Records(T),
    /// Superseded or torn down. Never a failure.
    Aborted,
    Failed(LookupError),
}
