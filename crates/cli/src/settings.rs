//! Environment-driven settings for the `cardkit` binary.

use std::sync::Arc;

use anyhow::{Context, Result};

use cardkit_auth::Role;
use cardkit_core::{CardConfiguration, CardContext, CardId};
use cardkit_http::{ReqwestTransport, Transport};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Everything a command needs to talk to the host's pipelines.
#[derive(Debug, Clone)]
pub struct CliSettings {
    pub api_url: String,
    pub auth_token: Option<String>,
    pub card: CardContext,
    pub config: CardConfiguration,
    pub roles: Vec<Role>,
}

impl CliSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `var`, which stands in for the environment.
    ///
    /// `CARDKIT_ENDPOINTS` may hold the card configuration JSON; the
    /// dedicated endpoint variables override its two well-known keys.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_blank = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let api_url = non_blank("CARDKIT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let auth_token = non_blank("CARDKIT_AUTH_TOKEN");

        let card_id: CardId = non_blank("CARDKIT_CARD_ID")
            .context("CARDKIT_CARD_ID is not set")?
            .parse()?;
        let card_prefix = non_blank("CARDKIT_CARD_PREFIX").unwrap_or_default();

        let config = match non_blank("CARDKIT_ENDPOINTS") {
            Some(json) => serde_json::from_str::<CardConfiguration>(&json)
                .context("CARDKIT_ENDPOINTS is not a JSON object of endpoint paths")?,
            None => CardConfiguration::new(),
        }
        .with_env_overrides(&var);

        let roles = non_blank("CARDKIT_ROLES")
            .map(|list| Role::parse_list(&list))
            .unwrap_or_default();

        Ok(Self {
            api_url,
            auth_token,
            card: CardContext::new(card_id, card_prefix),
            config,
            roles,
        })
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        match &self.auth_token {
            Some(token) => {
                tracing::info!("using authenticated transport against {}", self.api_url);
                Arc::new(ReqwestTransport::with_token(&self.api_url, token))
            }
            None => {
                tracing::info!("using anonymous transport against {}", self.api_url);
                Arc::new(ReqwestTransport::new(&self.api_url))
            }
        }
    }

    /// A configured endpoint key, or a literal path starting with `/`.
    pub fn resolve_endpoint(&self, key_or_path: &str) -> Result<String> {
        if let Some(path) = self.config.endpoint(key_or_path) {
            return Ok(path.to_owned());
        }
        if key_or_path.starts_with('/') {
            return Ok(key_or_path.to_owned());
        }
        Ok(self.config.require_endpoint(key_or_path)?.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<CliSettings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        CliSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn card_id_is_required() {
        let err = settings(&[]).unwrap_err();
        assert!(err.to_string().contains("CARDKIT_CARD_ID"));
    }

    #[test]
    fn defaults_and_overrides() {
        let s = settings(&[
            ("CARDKIT_CARD_ID", "t|e|pkg|c"),
            ("CARDKIT_CARD_PREFIX", "prod"),
            ("CARDKIT_AUTH_TOKEN", "  "),
            ("CARDKIT_ENDPOINTS", r#"{"PIPELINE_GET_USER_MAP":"/old","PIPELINE_GET_TERMS":"/terms"}"#),
            ("CARDKIT_USER_MAP_ENDPOINT", "/api/user-map"),
            ("CARDKIT_ROLES", "STAFF, ADVISOR"),
        ])
        .unwrap();

        assert_eq!(s.api_url, DEFAULT_API_URL);
        assert_eq!(s.auth_token, None);
        assert_eq!(s.card.package_name(), "pkg");
        assert_eq!(s.config.user_map_endpoint(), Some("/api/user-map"));
        assert_eq!(s.config.endpoint("PIPELINE_GET_TERMS"), Some("/terms"));
        assert_eq!(s.roles, vec![Role::new("STAFF"), Role::new("ADVISOR")]);
    }

    #[test]
    fn malformed_endpoint_json_is_reported() {
        let err = settings(&[("CARDKIT_CARD_ID", "c"), ("CARDKIT_ENDPOINTS", "[1,2]")]).unwrap_err();
        assert!(err.to_string().contains("CARDKIT_ENDPOINTS"));
    }

    #[test]
    fn security_endpoint_without_endpoint_json() {
        let s = settings(&[
            ("CARDKIT_CARD_ID", "c"),
            ("CARDKIT_SECURITY_ENDPOINT", "/api/security"),
            ("CARDKIT_USER_MAP_ENDPOINT", ""),
        ])
        .unwrap();

        assert_eq!(s.config.security_endpoint(), Some("/api/security"));
        assert_eq!(s.config.user_map_endpoint(), None);
    }

    #[test]
    fn endpoint_resolution() {
        let s = settings(&[
            ("CARDKIT_CARD_ID", "c"),
            ("CARDKIT_ENDPOINTS", r#"{"PIPELINE_GET_TERMS":"/terms"}"#),
        ])
        .unwrap();

        assert_eq!(s.resolve_endpoint("PIPELINE_GET_TERMS").unwrap(), "/terms");
        assert_eq!(s.resolve_endpoint("/raw/path").unwrap(), "/raw/path");
        assert!(s.resolve_endpoint("PIPELINE_MISSING").is_err());
    }
}
