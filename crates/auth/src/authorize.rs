//! Page access policy.
//!
//! - No IO
//! - No panics
//! - Fail-closed: an empty allow-list admits nobody

use serde::Serialize;

use crate::error::AccessError;
use crate::{AllowList, Role};

/// Tri-state access status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    /// No decision yet. Never authorized.
    Loading,
    Invalid,
    Valid,
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// The page has no configured roles.
    NoPolicyConfigured,
    /// None of the caller's roles is on the allow-list.
    NoMatchingRole,
    /// The allow-list could not be fetched or parsed.
    FetchFailed,
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    state: AccessState,
    denial: Option<DenialKind>,
    error: Option<AccessError>,
}

impl AccessDecision {
    pub fn loading() -> Self {
        Self {
            state: AccessState::Loading,
            denial: None,
            error: None,
        }
    }

    pub fn valid() -> Self {
        Self {
            state: AccessState::Valid,
            denial: None,
            error: None,
        }
    }

    pub fn denied(kind: DenialKind) -> Self {
        Self {
            state: AccessState::Invalid,
            denial: Some(kind),
            error: None,
        }
    }

    pub fn failed(error: AccessError) -> Self {
        Self {
            state: AccessState::Invalid,
            denial: Some(DenialKind::FetchFailed),
            error: Some(error),
        }
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    pub fn denial(&self) -> Option<DenialKind> {
        self.denial
    }

    pub fn access_is_loading(&self) -> bool {
        self.state == AccessState::Loading
    }

    /// True for anything but a settled `Valid`, including while loading.
    pub fn access_is_invalid(&self) -> bool {
        self.state != AccessState::Valid
    }

    pub fn access_error(&self) -> Option<&AccessError> {
        self.error.as_ref()
    }
}

impl Default for AccessDecision {
    fn default() -> Self {
        Self::loading()
    }
}

/// Decide whether a caller holding `held` may view a page guarded by `allowed`.
pub fn authorize(held: &[Role], allowed: &AllowList) -> AccessDecision {
    if allowed.is_empty() {
        return AccessDecision::denied(DenialKind::NoPolicyConfigured);
    }

    if allowed.admits_any(held) {
        AccessDecision::valid()
    } else {
        AccessDecision::denied(DenialKind::NoMatchingRole)
    }
}
