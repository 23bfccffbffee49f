//! Scripted in-memory transport for tests and local development.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::transport::{FetchRequest, FetchResponse, Transport, TransportError};

/// One call observed by a [`StubTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub path: String,
    pub request: FetchRequest,
    pub had_signal: bool,
}

#[derive(Debug)]
struct ScriptedReply {
    delay: Duration,
    result: Result<FetchResponse, TransportError>,
}

#[derive(Debug, Default)]
struct StubState {
    replies: VecDeque<ScriptedReply>,
    calls: Vec<RecordedCall>,
    aborted: usize,
}

/// Transport that answers calls from a FIFO script.
///
/// A reply may carry a delay; while delayed the call observes its
/// cancellation signal and resolves to `Aborted` if it fires. An exhausted
/// script answers with a network error.
#[derive(Debug, Default)]
pub struct StubTransport {
    state: Mutex<StubState>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn push_reply(&self, delay: Duration, result: Result<FetchResponse, TransportError>) {
        self.lock().replies.push_back(ScriptedReply { delay, result });
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_reply(Duration::ZERO, Ok(FetchResponse::new(status, body.to_string())));
    }

    pub fn push_delayed_json(&self, delay: Duration, status: u16, body: serde_json::Value) {
        self.push_reply(delay, Ok(FetchResponse::new(status, body.to_string())));
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.push_reply(Duration::ZERO, Ok(FetchResponse::new(status, body)));
    }

    pub fn push_error(&self, error: TransportError) {
        self.push_reply(Duration::ZERO, Err(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Number of calls that resolved through their cancellation signal.
    pub fn aborted_count(&self) -> usize {
        self.lock().aborted
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn fetch(
        &self,
        path: &str,
        request: FetchRequest,
        signal: Option<CancellationToken>,
    ) -> Result<FetchResponse, TransportError> {
        let reply = {
            let mut state = self.lock();
            state.calls.push(RecordedCall {
                path: path.to_owned(),
                request,
                had_signal: signal.is_some(),
            });
            state.replies.pop_front()
        };

        let Some(reply) = reply else {
            return Err(TransportError::Network("no scripted reply".to_owned()));
        };

        let signal = signal.unwrap_or_default();
        tokio::select! {
            biased;
            () = signal.cancelled() => {
                self.lock().aborted += 1;
                Err(TransportError::Aborted)
            }
            () = tokio::time::sleep(reply.delay) => reply.result,
        }
    }
}
