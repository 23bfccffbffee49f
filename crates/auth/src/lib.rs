//! `cardkit-auth` — role-based page access for cards.
//!
//! Policy ([`authorize`]) is pure. The evaluator fetches a page's allow-list
//! through the injected transport, and the watcher keeps a decision current as
//! the context changes.

pub mod allow_list;
pub mod authorize;
pub mod error;
pub mod evaluator;
pub mod roles;
pub mod watcher;

pub use allow_list::{AllowList, RoleEntry, RoleRecord};
pub use authorize::{AccessDecision, AccessState, DenialKind, authorize};
pub use error::AccessError;
pub use evaluator::{AccessContext, AccessEvaluator};
pub use roles::Role;
pub use watcher::AccessWatcher;
