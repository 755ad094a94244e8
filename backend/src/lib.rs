//! User registry backend: REST CRUD over user records with graceful drain.
//!
//! The crate is laid out hexagonally: `domain` holds transport-agnostic
//! types and ports, `inbound::http` the actix-web adapter, and
//! `outbound::persistence` the Diesel PostgreSQL adapter. `server` wires the
//! pieces together and owns the drain coordinator used at shutdown.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use doc::ApiDoc;
pub use middleware::Trace;
