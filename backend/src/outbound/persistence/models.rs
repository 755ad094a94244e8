//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain. They exist solely to satisfy Diesel's type
//! requirements for queries and mutations.

use diesel::prelude::*;

use crate::domain::User;

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub gender: String,
    pub birthday: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            gender: row.gender,
            birthday: row.birthday,
        }
    }
}

/// Insertable struct letting the sequence assign the id.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub gender: &'a str,
    pub birthday: &'a str,
}

impl<'a> NewUserRow<'a> {
    pub fn from_user(user: &'a User) -> Self {
        Self {
            name: &user.name,
            gender: &user.gender,
            birthday: &user.birthday,
        }
    }
}

/// Insertable struct carrying a client-supplied id.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRowWithId<'a> {
    pub id: i32,
    pub name: &'a str,
    pub gender: &'a str,
    pub birthday: &'a str,
}

impl<'a> NewUserRowWithId<'a> {
    pub fn from_user(user: &'a User) -> Self {
        Self {
            id: user.id,
            name: &user.name,
            gender: &user.gender,
            birthday: &user.birthday,
        }
    }
}

/// Sparse changeset: only non-empty fields are written, mirroring the
/// zero-value convention the update endpoint has always had.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub name: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub birthday: Option<&'a str>,
}

impl<'a> UserChangeset<'a> {
    /// Build the changeset from a user payload.
    pub fn from_user(user: &'a User) -> Self {
        fn non_empty(value: &str) -> Option<&str> {
            (!value.is_empty()).then_some(value)
        }
        Self {
            name: non_empty(&user.name),
            gender: non_empty(&user.gender),
            birthday: non_empty(&user.birthday),
        }
    }

    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.gender.is_none() && self.birthday.is_none()
    }
}
