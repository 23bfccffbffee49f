//! Page allow-lists as returned by the security pipeline.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;

use crate::Role;
use crate::error::AccessError;

/// One raw allow-list entry.
///
/// The pipeline has returned several shapes over time: a record carrying the
/// code under `xsdkroleRole` or `roleCode`, or a bare string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RoleEntry {
    Code(String),
    Record(RoleRecord),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleRecord {
    #[serde(rename = "xsdkroleRole", default)]
    pub xsdkrole_role: Option<String>,
    #[serde(rename = "roleCode", default)]
    pub role_code: Option<String>,
}

impl RoleEntry {
    /// Canonical role code, if the entry carries a non-empty one.
    ///
    /// For records the first *present* field wins: an empty `xsdkroleRole`
    /// shadows `roleCode` and yields nothing.
    pub fn code(&self) -> Option<&str> {
        let code = match self {
            RoleEntry::Code(code) => code.as_str(),
            RoleEntry::Record(record) => record
                .xsdkrole_role
                .as_deref()
                .or(record.role_code.as_deref())?,
            RoleEntry::Other(_) => return None,
        };
        (!code.is_empty()).then_some(code)
    }
}

/// Normalized set of role codes allowed to view a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    codes: BTreeSet<String>,
}

impl AllowList {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a RoleEntry>) -> Self {
        Self {
            codes: entries
                .into_iter()
                .filter_map(RoleEntry::code)
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Normalize a pipeline payload. Anything but a JSON array is malformed.
    pub fn from_json(payload: &Value) -> Result<Self, AccessError> {
        let Value::Array(items) = payload else {
            return Err(AccessError::MalformedPolicy(
                "allow-list payload is not an array".to_owned(),
            ));
        };

        let entries: Vec<RoleEntry> = items
            .iter()
            .map(|item| RoleEntry::deserialize(item).unwrap_or_else(|_| RoleEntry::Other(item.clone())))
            .collect();

        Ok(Self::from_entries(&entries))
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.codes.contains(role.as_str())
    }

    /// True if any held role appears in the list.
    pub fn admits_any(&self, held: &[Role]) -> bool {
        held.iter().any(|role| self.contains(role))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_all_shapes() {
        let list = AllowList::from_json(&json!([
            { "xsdkroleRole": "STAFF" },
            { "roleCode": "FACULTY" },
            "ADMIN",
            { "xsdkroleRole": null, "roleCode": "ADVISOR" },
        ]))
        .unwrap();

        let codes: Vec<&str> = list.codes().collect();
        assert_eq!(codes, vec!["ADMIN", "ADVISOR", "FACULTY", "STAFF"]);
    }

    #[test]
    fn drops_falsy_and_unrecognized_entries() {
        let list = AllowList::from_json(&json!([
            null,
            "",
            0,
            false,
            { "xsdkroleRole": "" , "roleCode": "SHADOWED" },
            { "somethingElse": "X" },
            { "roleCode": 42 },
        ]))
        .unwrap();

        assert!(list.is_empty());
    }

    #[test]
    fn non_array_payload_is_malformed() {
        assert!(matches!(
            AllowList::from_json(&json!({ "roles": ["STAFF"] })),
            Err(AccessError::MalformedPolicy(_))
        ));
    }

    #[test]
    fn matching_is_exact() {
        let list = AllowList::from_json(&json!(["STAFF"])).unwrap();
        assert!(list.admits_any(&[Role::new("STAFF")]));
        assert!(!list.admits_any(&[Role::new("staff")]));
        assert!(!list.admits_any(&[]));
    }
}
