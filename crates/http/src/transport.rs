//! Transport seam: the fetch-like function the host supplies.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request options handed to the transport together with the resource path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl FetchRequest {
    /// A request that sends and accepts JSON.
    pub fn json(method: Method) -> Self {
        Self {
            method,
            headers: vec![
                ("Content-Type".to_owned(), "application/json".to_owned()),
                ("Accept".to_owned(), "application/json".to_owned()),
            ],
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response as seen by the building blocks: a status and a raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request's cancellation signal fired. Not a failure.
    #[error("request aborted")]
    Aborted,

    #[error("network error: {0}")]
    Network(String),

    #[error("endpoint not configured: {0}")]
    NotConfigured(String),

    #[error("request body could not be encoded: {0}")]
    Encode(String),
}

impl TransportError {
    pub fn is_aborted(&self) -> bool {
        matches!(self, TransportError::Aborted)
    }
}

/// Fetch-like transport supplied by the host.
///
/// Implementations should observe `signal` and resolve to
/// [`TransportError::Aborted`] once it fires. Callers in this workspace also
/// race the call against the signal themselves, see [`fetch_cancellable`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(
        &self,
        path: &str,
        request: FetchRequest,
        signal: Option<CancellationToken>,
    ) -> Result<FetchResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn fetch(
        &self,
        path: &str,
        request: FetchRequest,
        signal: Option<CancellationToken>,
    ) -> Result<FetchResponse, TransportError> {
        (**self).fetch(path, request, signal).await
    }
}

/// Run a fetch that resolves to `Aborted` as soon as `signal` fires, whether
/// or not the transport honours the signal itself.
pub async fn fetch_cancellable<T: Transport + ?Sized>(
    transport: &T,
    path: &str,
    request: FetchRequest,
    signal: &CancellationToken,
) -> Result<FetchResponse, TransportError> {
    if signal.is_cancelled() {
        return Err(TransportError::Aborted);
    }

    // The transport is polled first so it can observe the signal and clean up.
    tokio::select! {
        biased;
        res = transport.fetch(path, request, Some(signal.clone())) => res,
        () = signal.cancelled() => Err(TransportError::Aborted),
    }
}
