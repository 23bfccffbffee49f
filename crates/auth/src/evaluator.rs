//! Fetch a page's allow-list and reduce it to an [`AccessDecision`].

use std::sync::Arc;

use serde_json::Value;

use cardkit_core::{CardConfiguration, CardContext, PageName};
use cardkit_http::{ApiOutcome, QueryParams, Transport, submit_get};

use crate::authorize::{AccessDecision, authorize};
use crate::error::AccessError;
use crate::{AllowList, Role};

/// Everything an access check depends on. A change to any field re-runs the
/// check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    card: CardContext,
    page_name: PageName,
    roles: Vec<Role>,
}

impl AccessContext {
    /// Held roles are treated as a set: order and duplicates do not matter.
    pub fn new(card: CardContext, page_name: impl Into<PageName>, mut roles: Vec<Role>) -> Self {
        roles.sort();
        roles.dedup();
        Self {
            card,
            page_name: page_name.into(),
            roles,
        }
    }

    pub fn card(&self) -> &CardContext {
        &self.card
    }

    pub fn page_name(&self) -> &PageName {
        &self.page_name
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// `cardId, cardPrefix, packageName, pageName`, in that order.
    pub fn query(&self) -> QueryParams {
        QueryParams::new()
            .with("cardId", self.card.card_id().as_str())
            .with("cardPrefix", self.card.card_prefix())
            .with("packageName", self.card.package_name())
            .with("pageName", self.page_name.as_str())
    }
}

/// Evaluates page access against the security pipeline.
pub struct AccessEvaluator {
    transport: Arc<dyn Transport>,
    security_endpoint: Option<String>,
}

impl AccessEvaluator {
    pub fn new(transport: Arc<dyn Transport>, config: &CardConfiguration) -> Self {
        Self {
            transport,
            security_endpoint: config.security_endpoint().map(str::to_owned),
        }
    }

    /// Never fails: any error resolves to an invalid decision carrying it.
    pub async fn evaluate(&self, context: &AccessContext) -> AccessDecision {
        match self.fetch_allow_list(context).await {
            Ok(allowed) => {
                let decision = authorize(context.roles(), &allowed);
                tracing::debug!(
                    page = %context.page_name(),
                    allowed = allowed.len(),
                    state = ?decision.state(),
                    "access evaluated"
                );
                decision
            }
            Err(e) => {
                tracing::warn!("access check for page {} failed: {}", context.page_name(), e);
                AccessDecision::failed(e)
            }
        }
    }

    async fn fetch_allow_list(&self, context: &AccessContext) -> Result<AllowList, AccessError> {
        let endpoint = self
            .security_endpoint
            .as_deref()
            .ok_or(AccessError::NotConfigured)?;

        let outcome: ApiOutcome<Value> =
            submit_get(endpoint, self.transport.as_ref(), &context.query().encode()).await?;

        let payload = outcome.into_result()?;
        AllowList::from_json(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorize::{AccessState, DenialKind};
    use cardkit_core::SECURITY_ENDPOINT_KEY;
    use cardkit_http::testing::StubTransport;
    use cardkit_http::{ApiError, TransportError};
    use serde_json::json;

    fn context(roles: &[&str]) -> AccessContext {
        AccessContext::new(
            CardContext::new("tenant|ext|advising|card-7", "prod"),
            "Dashboard",
            roles.iter().map(|r| Role::new((*r).to_owned())).collect(),
        )
    }

    fn evaluator(stub: &Arc<StubTransport>) -> AccessEvaluator {
        let config = CardConfiguration::new().with_endpoint(SECURITY_ENDPOINT_KEY, "/api/security");
        AccessEvaluator::new(stub.clone(), &config)
    }

    #[tokio::test]
    async fn builds_request_from_context() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, json!(["STAFF"]));

        evaluator(&stub).evaluate(&context(&["STAFF"])).await;

        assert_eq!(
            stub.calls()[0].path,
            "/api/security?cardId=tenant%7Cext%7Cadvising%7Ccard-7&cardPrefix=prod&packageName=advising&pageName=Dashboard"
        );
    }

    #[tokio::test]
    async fn grants_on_intersection() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, json!([{ "xsdkroleRole": "ADVISOR" }, { "roleCode": "STAFF" }]));

        let d = evaluator(&stub).evaluate(&context(&["STUDENT", "STAFF"])).await;

        assert_eq!(d.state(), AccessState::Valid);
    }

    #[tokio::test]
    async fn empty_policy_blocks_everyone() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, json!([]));

        let d = evaluator(&stub).evaluate(&context(&["ADMIN"])).await;

        assert!(d.access_is_invalid());
        assert_eq!(d.denial(), Some(DenialKind::NoPolicyConfigured));
        assert!(d.access_error().is_none());
    }

    #[tokio::test]
    async fn server_error_fails_closed_with_error() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(500, json!({}));

        let d = evaluator(&stub).evaluate(&context(&["ADMIN"])).await;

        assert!(d.access_is_invalid());
        assert_eq!(d.access_error(), Some(&AccessError::Api(ApiError::server_error(500))));
    }

    #[tokio::test]
    async fn transport_error_fails_closed() {
        let stub = Arc::new(StubTransport::new());
        stub.push_error(TransportError::Network("timeout".to_owned()));

        let d = evaluator(&stub).evaluate(&context(&["ADMIN"])).await;

        assert_eq!(d.denial(), Some(DenialKind::FetchFailed));
        assert!(matches!(d.access_error(), Some(AccessError::Transport(_))));
    }

    #[tokio::test]
    async fn non_array_payload_fails_closed() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, json!({ "roles": ["ADMIN"] }));

        let d = evaluator(&stub).evaluate(&context(&["ADMIN"])).await;

        assert!(matches!(d.access_error(), Some(AccessError::MalformedPolicy(_))));
    }

    #[tokio::test]
    async fn missing_endpoint_fails_closed_without_request() {
        let stub = Arc::new(StubTransport::new());
        let ev = AccessEvaluator::new(stub.clone(), &CardConfiguration::new());

        let d = ev.evaluate(&context(&["ADMIN"])).await;

        assert_eq!(d.access_error(), Some(&AccessError::NotConfigured));
        assert_eq!(stub.call_count(), 0);
    }

    #[test]
    fn role_order_does_not_change_context() {
        assert_eq!(context(&["B", "A", "A"]), context(&["A", "B"]));
    }
}
