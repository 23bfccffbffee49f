//! `cardkit-http` — pipeline calls over a host-supplied transport.
//!
//! The transport is a seam ([`Transport`]); nothing here depends on a
//! particular HTTP client unless the `reqwest` feature is enabled.

pub mod outcome;
pub mod query;
pub mod request;
pub mod resource;
pub mod transport;

#[cfg(feature = "reqwest")]
pub mod reqwest_transport;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use outcome::{ApiError, ApiOutcome};
pub use query::{QueryParams, resource_path};
pub use request::{
    normalize, submit_delete, submit_get, submit_get_cancellable, submit_post, submit_put,
};
pub use resource::{GetResource, ResourceSnapshot};
pub use transport::{
    FetchRequest, FetchResponse, Method, Transport, TransportError, fetch_cancellable,
};

#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;
