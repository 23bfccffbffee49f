//! Card configuration: endpoint paths keyed by their platform names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Configuration key of the user lookup pipeline.
pub const USER_MAP_ENDPOINT_KEY: &str = "PIPELINE_GET_USER_MAP";

/// Configuration key of the page security pipeline.
pub const SECURITY_ENDPOINT_KEY: &str = "PIPELINE_GET_SDK_SECURITY";

/// Endpoint configuration of a card, as delivered by the host.
///
/// The host hands over a flat JSON object of `KEY -> path`. The two keys the
/// building blocks consume have named accessors; everything else (CRUD
/// pipelines a card defines for itself) is reachable through [`endpoint`].
///
/// [`endpoint`]: CardConfiguration::endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardConfiguration {
    endpoints: BTreeMap<String, String>,
}

impl CardConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_endpoint(mut self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.endpoints.insert(key.into(), path.into());
        self
    }

    /// Look up an endpoint path. Blank values count as absent.
    pub fn endpoint(&self, key: &str) -> Option<&str> {
        self.endpoints
            .get(key)
            .map(String::as_str)
            .filter(|p| !p.trim().is_empty())
    }

    pub fn require_endpoint(&self, key: &str) -> CoreResult<&str> {
        self.endpoint(key).ok_or_else(|| CoreError::missing_config(key))
    }

    pub fn user_map_endpoint(&self) -> Option<&str> {
        self.endpoint(USER_MAP_ENDPOINT_KEY)
    }

    pub fn security_endpoint(&self) -> Option<&str> {
        self.endpoint(SECURITY_ENDPOINT_KEY)
    }

    /// Build a configuration from `CARDKIT_*` environment variables.
    pub fn from_env() -> Self {
        Self::new().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay the dedicated endpoint variables read through `var`.
    ///
    /// `CARDKIT_USER_MAP_ENDPOINT` and `CARDKIT_SECURITY_ENDPOINT` replace the
    /// two well-known keys. Unset or blank variables leave the entry alone.
    #[must_use]
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        for (name, key) in ENV_OVERRIDES {
            if let Some(path) = var(name).filter(|p| !p.trim().is_empty()) {
                self = self.with_endpoint(key, path);
            }
        }
        self
    }
}

const ENV_OVERRIDES: [(&str, &str); 2] = [
    ("CARDKIT_USER_MAP_ENDPOINT", USER_MAP_ENDPOINT_KEY),
    ("CARDKIT_SECURITY_ENDPOINT", SECURITY_ENDPOINT_KEY),
];
