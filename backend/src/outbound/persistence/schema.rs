//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the bootstrap DDL in `pool.rs`. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// User records managed by the CRUD endpoints.
    users (id) {
        /// Primary key, assigned by the `SERIAL` sequence unless the client
        /// supplies one explicitly on create.
        id -> Int4,
        /// Display name; empty string when unset.
        name -> Varchar,
        /// Free-form gender text; empty string when unset.
        gender -> Varchar,
        /// Free-form birthday text; the service applies no date format.
        birthday -> Varchar,
    }
}
