//! Search, debounce by length, cancel superseded requests, publish once.
//!
//! - At most one lookup request is live per controller
//! - A superseded request never mutates state, even if it resolves late
//! - The sink only sees an identity when it differs from the last one emitted
//!   for the current entity

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use cardkit_core::{CardConfiguration, CardContext, EntityId};
use cardkit_http::{QueryParams, Transport, TransportError, submit_get_cancellable};

use crate::error::{LookupError, LookupOutcome};
use crate::query::{DEFAULT_INSTITUTION_SUFFIX, SearchQuery};
use crate::record::{Identity, UserRecord};
use crate::sink::IdentitySink;
use crate::view::LookupView;

/// Where and how a controller looks users up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    endpoint: Option<String>,
    context: CardContext,
    institution_suffix: String,
}

impl LookupConfig {
    /// Takes the user-map endpoint from the card configuration.
    pub fn new(context: CardContext, config: &CardConfiguration) -> Self {
        Self {
            endpoint: config.user_map_endpoint().map(str::to_owned),
            context,
            institution_suffix: DEFAULT_INSTITUTION_SUFFIX.to_owned(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_institution_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.institution_suffix = suffix.into();
        self
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn context(&self) -> &CardContext {
        &self.context
    }

    pub fn institution_suffix(&self) -> &str {
        &self.institution_suffix
    }

    /// `cardId, cardPrefix, userSearchKey`, in that order.
    pub fn request_query(&self, query: &SearchQuery) -> String {
        QueryParams::new()
            .with("cardId", self.context.card_id().as_str())
            .with("cardPrefix", self.context.card_prefix())
            .with("userSearchKey", query.as_str())
            .encode()
    }
}

#[derive(Default)]
struct LookupState {
    raw: String,
    query: SearchQuery,
    result: Vec<UserRecord>,
    busy: bool,
    entity: Option<EntityId>,
    last_emitted: Option<(Option<EntityId>, Identity)>,
    token: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl LookupState {
    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}

struct Inner {
    config: LookupConfig,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn IdentitySink>,
    state: Mutex<LookupState>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, LookupState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Emit `identity` unless it is what the current entity last received.
    fn emit_if_changed(&self, state: &mut LookupState, identity: Identity) {
        let key = (state.entity.clone(), identity);
        if state.last_emitted.as_ref() == Some(&key) {
            return;
        }
        self.sink.set_identity(key.0.as_ref(), &key.1);
        state.last_emitted = Some(key);
    }

    fn apply_result(&self, state: &mut LookupState) {
        let identity = Identity::from_records(&state.result);
        self.emit_if_changed(state, identity);
    }

    async fn fetch(&self, query: &SearchQuery, token: &CancellationToken) -> LookupOutcome<Vec<UserRecord>> {
        let Some(endpoint) = self.config.endpoint() else {
            return LookupOutcome::Failed(LookupError::NotConfigured);
        };

        let params = self.config.request_query(query);
        match submit_get_cancellable(endpoint, self.transport.as_ref(), &params, token).await {
            Ok(outcome) => match outcome.into_result() {
                Ok(records) => LookupOutcome::Records(records),
                Err(e) => LookupOutcome::Failed(e.into()),
            },
            Err(TransportError::Aborted) => LookupOutcome::Aborted,
            Err(e) => LookupOutcome::Failed(e.into()),
        }
    }
}

/// Query-change effect. Always cancels the previous request first.
fn on_query_change(inner: &Arc<Inner>, state: &mut LookupState) {
    state.cancel_in_flight();
    state.query = SearchQuery::normalize(&state.raw, inner.config.institution_suffix());

    if !state.query.is_searchable() {
        state.busy = false;
        state.result.clear();
        inner.apply_result(state);
        return;
    }

    state.busy = true;
    let token = CancellationToken::new();
    state.token = Some(token.clone());

    let inner = Arc::clone(inner);
    let query = state.query.clone();
    state.task = Some(tokio::spawn(run_lookup(inner, query, token)));
}

async fn run_lookup(inner: Arc<Inner>, query: SearchQuery, token: CancellationToken) {
    let outcome = inner.fetch(&query, &token).await;

    let mut state = inner.lock();
    if token.is_cancelled() {
        tracing::debug!(query = %query, "lookup superseded");
        return;
    }

    match outcome {
        LookupOutcome::Records(records) => {
            tracing::debug!(query = %query, matches = records.len(), "lookup resolved");
            // Only a single match is kept.
            state.result = if records.len() == 1 { records } else { Vec::new() };
            inner.apply_result(&mut state);
        }
        LookupOutcome::Aborted => {
            tracing::debug!(query = %query, "lookup aborted by transport");
        }
        LookupOutcome::Failed(e) => {
            tracing::error!("user lookup for {} failed: {}", query, e);
            state.result.clear();
            inner.apply_result(&mut state);
        }
    }

    state.busy = false;
    state.token = None;
}

/// Drives one lookup widget.
///
/// Mutating operations spawn onto the ambient tokio runtime. Dropping the
/// controller cancels any in-flight request.
pub struct LookupController {
    inner: Arc<Inner>,
}

impl LookupController {
    pub fn new(config: LookupConfig, transport: Arc<dyn Transport>, sink: Arc<dyn IdentitySink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                sink,
                state: Mutex::new(LookupState::default()),
            }),
        }
    }

    /// Text-input change: blank the sink, then search.
    pub fn update_query(&self, raw: impl Into<String>) {
        let mut state = self.inner.lock();
        self.inner.emit_if_changed(&mut state, Identity::blank());
        state.raw = raw.into();
        on_query_change(&self.inner, &mut state);
    }

    /// Replace the query without blanking the sink first.
    pub fn set_search_value(&self, value: impl Into<String>) {
        let mut state = self.inner.lock();
        state.raw = value.into();
        on_query_change(&self.inner, &mut state);
    }

    /// Reset everything and emit one blank identity.
    pub fn clear(&self) {
        self.clear_with(|| {});
    }

    /// [`clear`](Self::clear), then run `on_done` once the lock is released.
    pub fn clear_with(&self, on_done: impl FnOnce()) {
        {
            let mut state = self.inner.lock();
            state.cancel_in_flight();
            state.raw.clear();
            state.query = SearchQuery::default();
            state.result.clear();
            state.busy = false;

            let blank = Identity::blank();
            self.inner.sink.set_identity(state.entity.as_ref(), &blank);
            state.last_emitted = Some((state.entity.clone(), blank));
        }
        on_done();
    }

    /// Change the entity the emitted identity belongs to.
    pub fn set_entity(&self, entity: Option<EntityId>) {
        let mut state = self.inner.lock();
        state.entity = entity;
        self.inner.apply_result(&mut state);
    }

    pub fn view(&self) -> LookupView {
        let state = self.inner.lock();
        if state.busy {
            return LookupView::Busy;
        }
        if !state.query.is_searchable() {
            return LookupView::Blank;
        }
        match state.result.as_slice() {
            [only] => LookupView::Resolved(only.display_name()),
            _ => LookupView::Blank,
        }
    }

    pub fn raw_query(&self) -> String {
        self.inner.lock().raw.clone()
    }

    pub fn query(&self) -> SearchQuery {
        self.inner.lock().query.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.lock().busy
    }

    pub fn result(&self) -> Vec<UserRecord> {
        self.inner.lock().result.clone()
    }

    /// Identity the current result resolves to.
    pub fn identity(&self) -> Identity {
        Identity::from_records(&self.inner.lock().result)
    }

    pub fn config(&self) -> &LookupConfig {
        &self.inner.config
    }

    /// Wait for the most recently spawned request to finish.
    pub async fn wait_idle(&self) {
        loop {
            let task = self.inner.lock().task.take();
            let Some(task) = task else {
                break;
            };
            if let Err(e) = task.await {
                tracing::warn!("lookup task ended abnormally: {}", e);
            }
        }
    }

    /// Cancel any in-flight request. State is left as is.
    pub fn shutdown(&self) {
        self.inner.lock().cancel_in_flight();
    }
}

impl Drop for LookupController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
