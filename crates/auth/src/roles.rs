use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role code held by a caller or named in a page allow-list.
///
/// Roles are opaque, case-sensitive strings at this layer; the platform owns
/// their meaning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a comma-separated role list, skipping blanks.
    pub fn parse_list(list: &str) -> Vec<Role> {
        list.split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(|r| Role::new(r.to_owned()))
            .collect()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
