//! Generic CRUD helpers over an injected [`Transport`].
//!
//! Each helper builds `{endpoint}?{query}`, performs the call and normalizes
//! the response into an [`ApiOutcome`]:
//!
//! - `200` with a JSON body: `Success { data }`
//! - `200` with an unparsable body: `Error { "unable to parse response", 500 }`
//! - anything else: `Error { "server error", <status> }`
//!
//! Transport failures are logged and returned as `Err` for the caller to
//! present. Aborts are returned as `Err(TransportError::Aborted)` without
//! being logged as failures.

use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::outcome::{ApiError, ApiOutcome};
use crate::query::resource_path;
use crate::transport::{FetchRequest, FetchResponse, Method, Transport, TransportError, fetch_cancellable};

/// Perform a GET against `endpoint?query`.
pub async fn submit_get<T, Tr>(
    endpoint: &str,
    transport: &Tr,
    query: &str,
) -> Result<ApiOutcome<T>, TransportError>
where
    T: DeserializeOwned,
    Tr: Transport + ?Sized,
{
    submit(endpoint, transport, query, FetchRequest::json(Method::Get), None).await
}

/// Perform a GET whose outcome is abandoned as soon as `signal` fires.
pub async fn submit_get_cancellable<T, Tr>(
    endpoint: &str,
    transport: &Tr,
    query: &str,
    signal: &CancellationToken,
) -> Result<ApiOutcome<T>, TransportError>
where
    T: DeserializeOwned,
    Tr: Transport + ?Sized,
{
    submit(endpoint, transport, query, FetchRequest::json(Method::Get), Some(signal)).await
}

/// Perform a POST with a JSON body.
pub async fn submit_post<T, B, Tr>(
    endpoint: &str,
    transport: &Tr,
    query: &str,
    body: &B,
) -> Result<ApiOutcome<T>, TransportError>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
    Tr: Transport + ?Sized,
{
    submit_with_body(Method::Post, endpoint, transport, query, body).await
}

/// Perform a PUT with a JSON body.
pub async fn submit_put<T, B, Tr>(
    endpoint: &str,
    transport: &Tr,
    query: &str,
    body: &B,
) -> Result<ApiOutcome<T>, TransportError>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
    Tr: Transport + ?Sized,
{
    submit_with_body(Method::Put, endpoint, transport, query, body).await
}

/// Perform a DELETE with a JSON body.
pub async fn submit_delete<T, B, Tr>(
    endpoint: &str,
    transport: &Tr,
    query: &str,
    body: &B,
) -> Result<ApiOutcome<T>, TransportError>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
    Tr: Transport + ?Sized,
{
    submit_with_body(Method::Delete, endpoint, transport, query, body).await
}

async fn submit_with_body<T, B, Tr>(
    method: Method,
    endpoint: &str,
    transport: &Tr,
    query: &str,
    body: &B,
) -> Result<ApiOutcome<T>, TransportError>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
    Tr: Transport + ?Sized,
{
    let body = serde_json::to_string(body).map_err(|e| {
        tracing::error!("unable to encode {} body for {}: {}", method, endpoint, e);
        TransportError::Encode(e.to_string())
    })?;

    submit(endpoint, transport, query, FetchRequest::json(method).with_body(body), None).await
}

async fn submit<T, Tr>(
    endpoint: &str,
    transport: &Tr,
    query: &str,
    request: FetchRequest,
    signal: Option<&CancellationToken>,
) -> Result<ApiOutcome<T>, TransportError>
where
    T: DeserializeOwned,
    Tr: Transport + ?Sized,
{
    let method = request.method;
    let path = resource_path(endpoint, query);
    let start = Instant::now();

    let response = match signal {
        Some(signal) => fetch_cancellable(transport, &path, request, signal).await,
        None => transport.fetch(&path, request, None).await,
    };

    let response = match response {
        Ok(response) => response,
        Err(TransportError::Aborted) => {
            tracing::debug!("{} {} aborted", method, endpoint);
            return Err(TransportError::Aborted);
        }
        Err(e) => {
            tracing::error!("{} {} failed: {}", method, endpoint, e);
            return Err(e);
        }
    };

    tracing::debug!(
        "{} {} time: {}",
        method.as_str().to_lowercase(),
        endpoint,
        start.elapsed().as_millis()
    );

    Ok(normalize(&response))
}

/// Map a raw response onto the normalized outcome.
pub fn normalize<T: DeserializeOwned>(response: &FetchResponse) -> ApiOutcome<T> {
    match response.status {
        200 => match response.json::<T>() {
            Ok(data) => ApiOutcome::Success { data },
            Err(e) => {
                tracing::warn!("unable to parse response body: {}", e);
                ApiOutcome::Error {
                    error: ApiError::parse_error(),
                }
            }
        },
        status => ApiOutcome::Error {
            error: ApiError::server_error(status),
        },
    }
}
