//! Transport-agnostic domain types for the user registry.
//!
//! The domain owns the entity model, the normalised query specification, the
//! error taxonomy, and the ports implemented by outbound adapters. Nothing in
//! this module knows about HTTP or SQL.

mod error;
pub mod ports;
mod query;
mod user;

pub use error::{Error, ErrorCode};
pub use query::{IdRange, UserQuery};
pub use user::User;
