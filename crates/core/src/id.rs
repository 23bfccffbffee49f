//! Strongly-typed identifiers passed between the host and the building blocks.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifier of a dashboard card.
///
/// Cards are addressed by a pipe-delimited composite such as
/// `tenant|extension|package|card`. The third segment names the package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

/// Identifier of an external entity a lookup widget writes into
/// (e.g. one row of a form that hosts several lookups).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

/// Name of a page guarded by the access evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageName(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl FromStr for $t {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(CoreError::invalid_id(format!("{}: empty", $name)));
                }
                Ok(Self(trimmed.to_owned()))
            }
        }
    };
}

impl_string_newtype!(CardId, "CardId");
impl_string_newtype!(EntityId, "EntityId");
impl_string_newtype!(PageName, "PageName");

impl CardId {
    /// Package segment of the composite id, or `""` when the id has fewer
    /// than three segments.
    pub fn package_name(&self) -> &str {
        self.0.split('|').nth(2).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_name_is_third_segment() {
        let id = CardId::new("tenant|ext|payroll-tools|card-1");
        assert_eq!(id.package_name(), "payroll-tools");
    }

    #[test]
    fn package_name_missing_is_empty() {
        assert_eq!(CardId::new("tenant|ext").package_name(), "");
        assert_eq!(CardId::new("").package_name(), "");
    }

    #[test]
    fn package_name_empty_segment_is_kept_empty() {
        assert_eq!(CardId::new("a|b||d").package_name(), "");
    }

    #[test]
    fn parse_rejects_blank() {
        assert!("  ".parse::<PageName>().is_err());
        assert_eq!("home".parse::<PageName>().unwrap().as_str(), "home");
    }
}
