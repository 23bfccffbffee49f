use serde::{Deserialize, Serialize};

/// One row of the user-map pipeline response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "userid", default)]
    pub user_id: String,
    #[serde(rename = "userfirstname", default)]
    pub first_name: String,
    #[serde(rename = "userlastname", default)]
    pub last_name: String,
}

impl UserRecord {
    pub fn new(
        user_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last", as shown next to the search box.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Identity pushed into the caller's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Identity {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Identity {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.id.is_empty() && self.first_name.is_empty() && self.last_name.is_empty()
    }

    /// Exactly one record resolves; zero or many resolve to blank.
    pub fn from_records(records: &[UserRecord]) -> Self {
        match records {
            [only] => Self::from(only),
            _ => Self::blank(),
        }
    }
}

impl From<&UserRecord> for Identity {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.user_id.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
        }
    }
}
