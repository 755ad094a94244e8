//! HTTP inbound adapter exposing the user CRUD endpoints.

pub mod error;
pub mod health;
pub mod hooks;
pub mod params;
pub mod state;
pub mod users;

pub use error::ApiResult;
