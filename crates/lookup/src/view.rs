use serde::Serialize;

/// What the result label next to the search box shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum LookupView {
    /// A request is in flight.
    Busy,
    Blank,
    /// Exactly one match, as "First Last".
    Resolved(String),
}

impl LookupView {
    pub fn label(&self) -> &str {
        match self {
            LookupView::Resolved(name) => name,
            LookupView::Busy | LookupView::Blank => "",
        }
    }
}

impl core::fmt::Display for LookupView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LookupView::Busy => f.write_str("…"),
            other => f.write_str(other.label()),
        }
    }
}
