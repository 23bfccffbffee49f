//! Re-evaluates access whenever the card, page or held roles change.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::authorize::AccessDecision;
use crate::evaluator::{AccessContext, AccessEvaluator};

struct ActiveCheck {
    context: AccessContext,
    token: CancellationToken,
}

struct Inner {
    evaluator: AccessEvaluator,
    tx: watch::Sender<AccessDecision>,
    current: Mutex<Option<ActiveCheck>>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Option<ActiveCheck>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Publishes the access decision for the current [`AccessContext`].
///
/// Starts in `Loading`. Each context change resets to `Loading` and starts a
/// fresh check; a check that was superseded never publishes.
///
/// `set_context` spawns onto the ambient tokio runtime.
pub struct AccessWatcher {
    inner: Arc<Inner>,
}

impl AccessWatcher {
    pub fn new(evaluator: AccessEvaluator) -> Self {
        let (tx, _) = watch::channel(AccessDecision::loading());
        Self {
            inner: Arc::new(Inner {
                evaluator,
                tx,
                current: Mutex::new(None),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AccessDecision> {
        self.inner.tx.subscribe()
    }

    /// Latest published decision.
    pub fn decision(&self) -> AccessDecision {
        self.inner.tx.borrow().clone()
    }

    /// Point the watcher at `context`. A no-op when nothing changed.
    pub fn set_context(&self, context: AccessContext) {
        let token = {
            let mut current = self.inner.lock();
            if current.as_ref().is_some_and(|c| c.context == context) {
                return;
            }
            if let Some(previous) = current.take() {
                previous.token.cancel();
            }

            let token = CancellationToken::new();
            *current = Some(ActiveCheck {
                context: context.clone(),
                token: token.clone(),
            });
            self.inner.tx.send_replace(AccessDecision::loading());
            token
        };

        tracing::debug!(page = %context.page_name(), "access context changed");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let decision = tokio::select! {
                biased;
                () = token.cancelled() => return,
                decision = inner.evaluator.evaluate(&context) => decision,
            };

            // Checked under the lock so a concurrent `set_context` cannot
            // interleave between the check and the publish.
            let _current = inner.lock();
            if token.is_cancelled() {
                return;
            }
            inner.tx.send_replace(decision);
        });
    }

    /// Wait for the current check to settle.
    pub async fn settled(&self) -> AccessDecision {
        let mut rx = self.subscribe();
        match rx.wait_for(|d| !d.access_is_loading()).await {
            Ok(decision) => decision.clone(),
            Err(_) => self.decision(),
        }
    }

    /// Abandon any in-flight check. The last decision stays published, and
    /// the next `set_context` starts a fresh check even for the same context.
    pub fn shutdown(&self) {
        if let Some(active) = self.inner.lock().take() {
            active.token.cancel();
        }
    }
}

impl Drop for AccessWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use crate::authorize::{AccessState, DenialKind};
    use cardkit_core::{CardConfiguration, CardContext, SECURITY_ENDPOINT_KEY};
    use cardkit_http::testing::StubTransport;
    use serde_json::json;
    use std::time::Duration;

    fn context(page: &str, roles: &[&str]) -> AccessContext {
        AccessContext::new(
            CardContext::new("t|e|pkg|c", "prod"),
            page,
            roles.iter().map(|r| Role::new((*r).to_owned())).collect(),
        )
    }

    fn watcher(stub: &Arc<StubTransport>) -> AccessWatcher {
        let config = CardConfiguration::new().with_endpoint(SECURITY_ENDPOINT_KEY, "/api/security");
        AccessWatcher::new(AccessEvaluator::new(stub.clone(), &config))
    }

    #[tokio::test(start_paused = true)]
    async fn starts_loading_then_settles() {
        let stub = Arc::new(StubTransport::new());
        stub.push_delayed_json(Duration::from_millis(50), 200, json!(["STAFF"]));
        let w = watcher(&stub);

        assert!(w.decision().access_is_loading());
        w.set_context(context("Home", &["STAFF"]));
        assert!(w.decision().access_is_loading());

        let d = w.settled().await;
        assert_eq!(d.state(), AccessState::Valid);
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_context_does_not_refetch() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, json!(["STAFF"]));
        let w = watcher(&stub);

        w.set_context(context("Home", &["STAFF"]));
        w.settled().await;
        w.set_context(context("Home", &["STAFF", "STAFF"]));

        assert_eq!(stub.call_count(), 1);
        assert_eq!(w.decision().state(), AccessState::Valid);
    }

    #[tokio::test(start_paused = true)]
    async fn context_change_resets_to_loading() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, json!(["STAFF"]));
        stub.push_delayed_json(Duration::from_millis(50), 200, json!(["STAFF"]));
        let w = watcher(&stub);

        w.set_context(context("Home", &["STAFF"]));
        assert_eq!(w.settled().await.state(), AccessState::Valid);

        w.set_context(context("Reports", &["STAFF"]));
        assert!(w.decision().access_is_loading());
        assert!(w.decision().access_is_invalid());

        w.settled().await;
        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_check_never_publishes() {
        let stub = Arc::new(StubTransport::new());
        stub.push_delayed_json(Duration::from_millis(100), 200, json!(["ADMIN"]));
        stub.push_json(200, json!([]));
        let w = watcher(&stub);

        w.set_context(context("Home", &["ADMIN"]));
        tokio::time::sleep(Duration::from_millis(10)).await;
        w.set_context(context("Home", &["STUDENT"]));

        let d = w.settled().await;
        assert_eq!(d.denial(), Some(DenialKind::NoPolicyConfigured));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(w.decision().denial(), Some(DenialKind::NoPolicyConfigured));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_keeps_loading() {
        let stub = Arc::new(StubTransport::new());
        stub.push_delayed_json(Duration::from_millis(100), 200, json!(["ADMIN"]));
        let w = watcher(&stub);
        let rx = w.subscribe();

        w.set_context(context("Home", &["ADMIN"]));
        tokio::time::sleep(Duration::from_millis(10)).await;
        w.shutdown();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(rx.borrow().access_is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn same_context_after_shutdown_checks_again() {
        let stub = Arc::new(StubTransport::new());
        stub.push_delayed_json(Duration::from_millis(100), 200, json!(["ADMIN"]));
        stub.push_json(200, json!(["ADMIN"]));
        let w = watcher(&stub);

        w.set_context(context("Home", &["ADMIN"]));
        tokio::time::sleep(Duration::from_millis(10)).await;
        w.shutdown();
        w.set_context(context("Home", &["ADMIN"]));

        let d = tokio::time::timeout(Duration::from_secs(5), w.settled())
            .await
            .expect("check re-ran after shutdown");
        assert_eq!(d.state(), AccessState::Valid);
        assert_eq!(stub.call_count(), 2);
    }
}
