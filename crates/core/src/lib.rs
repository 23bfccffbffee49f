//! `cardkit-core` — foundation types shared by the card building blocks.
//!
//! This crate contains **pure** values (no transport, no runtime).

pub mod config;
pub mod context;
pub mod error;
pub mod id;

pub use config::{CardConfiguration, SECURITY_ENDPOINT_KEY, USER_MAP_ENDPOINT_KEY};
pub use context::CardContext;
pub use error::{CoreError, CoreResult};
pub use id::{CardId, EntityId, PageName};
