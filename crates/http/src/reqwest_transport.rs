//! `reqwest`-backed transport for binaries and integration use.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::transport::{FetchRequest, FetchResponse, Method, Transport, TransportError};

/// Transport that resolves resource paths against a base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: Some(token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn send(&self, path: &str, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut req = self.client.request(method, self.url(path));
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(FetchResponse { status, body })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(
        &self,
        path: &str,
        request: FetchRequest,
        signal: Option<CancellationToken>,
    ) -> Result<FetchResponse, TransportError> {
        match signal {
            Some(signal) => tokio::select! {
                biased;
                () = signal.cancelled() => Err(TransportError::Aborted),
                res = self.send(path, request) => res,
            },
            None => self.send(path, request).await,
        }
    }
}
