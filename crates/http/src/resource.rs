//! Refreshable GET resource.
//!
//! Wraps [`submit_get`] with the state a view needs: the last good `data`,
//! the last `data_error`, and whether a request is an initial load or a
//! background refresh. A refresh keeps the current `data` visible until the
//! replacement lands.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::outcome::{ApiError, ApiOutcome};
use crate::request::submit_get;
use crate::transport::{Transport, TransportError};

/// Point-in-time view of a [`GetResource`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSnapshot<T> {
    pub data: Option<T>,
    pub data_error: Option<ApiError>,
    pub is_loading: bool,
    pub is_refreshing: bool,
}

impl<T> Default for ResourceSnapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            data_error: None,
            is_loading: false,
            is_refreshing: false,
        }
    }
}

struct ResourceState<T> {
    snapshot: ResourceSnapshot<T>,
    generation: u64,
}

struct Shared<T> {
    transport: Option<Arc<dyn Transport>>,
    endpoint: Option<String>,
    query: String,
    enabled: bool,
    state: Mutex<ResourceState<T>>,
    mounted: CancellationToken,
}

/// A GET request with load/refresh lifecycle.
///
/// Dropping the handle (or calling [`unmount`](GetResource::unmount)) stops
/// polling and discards any response still in flight.
pub struct GetResource<T> {
    shared: Arc<Shared<T>>,
}

impl<T> GetResource<T>
where
    T: DeserializeOwned + Clone + Send + 'static,
{
    /// `transport` and `endpoint` may be absent while the host is still
    /// initializing; requests are skipped until both are present, and always
    /// skipped when `enabled` is false.
    pub fn new(
        transport: Option<Arc<dyn Transport>>,
        endpoint: Option<String>,
        query: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                transport,
                endpoint,
                query: query.into(),
                enabled,
                state: Mutex::new(ResourceState {
                    snapshot: ResourceSnapshot::default(),
                    generation: 0,
                }),
                mounted: CancellationToken::new(),
            }),
        }
    }

    pub fn snapshot(&self) -> ResourceSnapshot<T> {
        self.shared.lock().snapshot.clone()
    }

    /// Initial load.
    pub async fn load(&self) {
        self.shared.run().await;
    }

    /// Re-issue the same request, keeping `data` until the new result lands.
    pub async fn refresh(&self) {
        self.shared.run().await;
    }

    /// Refresh every `interval` until unmounted.
    pub fn spawn_polling(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick completes immediately; callers load explicitly.
            ticker.tick().await;

            loop {
                tokio::select! {
                    () = shared.mounted.cancelled() => {
                        tracing::debug!("resource polling stopped");
                        break;
                    }
                    _ = ticker.tick() => shared.run().await,
                }
            }
        })
    }

    /// Stop all further state updates.
    pub fn unmount(&self) {
        self.shared.mounted.cancel();
    }
}

impl<T> Drop for GetResource<T> {
    fn drop(&mut self) {
        self.shared.mounted.cancel();
    }
}

impl<T> Shared<T>
where
    T: DeserializeOwned + Clone + Send + 'static,
{
    fn lock(&self) -> MutexGuard<'_, ResourceState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run(&self) {
        if !self.enabled || self.mounted.is_cancelled() {
            return;
        }
        let (Some(transport), Some(endpoint)) = (self.transport.as_ref(), self.endpoint.as_deref())
        else {
            tracing::debug!("resource skipped: transport or endpoint not available");
            return;
        };

        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            if state.snapshot.data.is_some() {
                state.snapshot.is_refreshing = true;
            } else {
                state.snapshot.is_loading = true;
            }
            state.generation
        };

        let result = tokio::select! {
            () = self.mounted.cancelled() => return,
            result = submit_get::<T, _>(endpoint, transport.as_ref(), &self.query) => result,
        };

        let mut state = self.lock();
        if self.mounted.is_cancelled() || state.generation != generation {
            return;
        }

        match result {
            Ok(ApiOutcome::Success { data }) => {
                state.snapshot.data = Some(data);
                state.snapshot.data_error = None;
            }
            Ok(ApiOutcome::Error { error }) => {
                state.snapshot.data_error = Some(error);
            }
            Err(TransportError::Aborted) => {}
            Err(_) => {
                state.snapshot.data_error = Some(ApiError::fetch_failed());
            }
        }
        state.snapshot.is_loading = false;
        state.snapshot.is_refreshing = false;
    }
}
