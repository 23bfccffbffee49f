//! Normalized result of a pipeline call.

use serde::{Deserialize, Serialize, Serializer};

/// Message reported when a 200 response carries an unparsable body.
pub const PARSE_ERROR_MESSAGE: &str = "unable to parse response";

/// Message reported for any non-200 status.
pub const SERVER_ERROR_MESSAGE: &str = "server error";

/// Message reported when the transport itself failed.
pub const FETCH_FAILED_MESSAGE: &str = "fetch failed";

/// Normalized API failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    pub status_code: u16,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }

    pub fn parse_error() -> Self {
        Self::new(PARSE_ERROR_MESSAGE, 500)
    }

    pub fn server_error(status_code: u16) -> Self {
        Self::new(SERVER_ERROR_MESSAGE, status_code)
    }

    pub fn fetch_failed() -> Self {
        Self::new(FETCH_FAILED_MESSAGE, 500)
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.message, self.status_code)
    }
}

impl std::error::Error for ApiError {}

/// `{data, status: "success"}` or `{error: {message, statusCode}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Success { data: T },
    Error { error: ApiError },
}

impl<T> ApiOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ApiOutcome::Success { data } => Some(data),
            ApiOutcome::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            ApiOutcome::Success { .. } => None,
            ApiOutcome::Error { error } => Some(error),
        }
    }

    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            ApiOutcome::Success { data } => Ok(data),
            ApiOutcome::Error { error } => Err(error),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireOutcome<'a, T> {
    Success { data: &'a T, status: &'static str },
    Error { error: &'a ApiError },
}

impl<T: Serialize> Serialize for ApiOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ApiOutcome::Success { data } => WireOutcome::Success {
                data,
                status: "success",
            }
            .serialize(serializer),
            ApiOutcome::Error { error } => {
                let wire: WireOutcome<'_, T> = WireOutcome::Error { error };
                wire.serialize(serializer)
            }
        }
    }
}
