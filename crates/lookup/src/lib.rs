//! `cardkit-lookup` — the logic behind a user-lookup widget.
//!
//! A [`LookupController`] owns the search text, gates it by length, keeps at
//! most one request in flight and pushes the resolved identity into an
//! [`IdentitySink`].

pub mod controller;
pub mod error;
pub mod query;
pub mod record;
pub mod sink;
pub mod view;

pub use controller::{LookupConfig, LookupController};
pub use error::{LookupError, LookupOutcome};
pub use query::{DEFAULT_INSTITUTION_SUFFIX, MIN_QUERY_LEN, SearchQuery};
pub use record::{Identity, UserRecord};
pub use sink::{Emission, FieldSink, IdentitySink, RecordingSink};
pub use view::LookupView;
