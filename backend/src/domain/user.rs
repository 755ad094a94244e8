//! User entity model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A user record as stored in the `users` table.
///
/// Field semantics follow the zero-value convention used throughout the
/// service: an `id` of [`User::UNSET_ID`] means "not assigned / do not filter
/// by id", and an empty string in any text field means "unconstrained" when
/// the record doubles as an equality filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Storage-assigned identifier; immutable once assigned.
    #[schema(example = 42)]
    pub id: i32,
    /// Display name.
    #[schema(example = "Alice")]
    pub name: String,
    /// Free-form gender text.
    #[schema(example = "F")]
    pub gender: String,
    /// Free-form birthday text; the service applies no date format.
    #[schema(example = "2000-01-01")]
    pub birthday: String,
}

impl User {
    /// Sentinel id meaning "unassigned" on create and "unconstrained" in
    /// filters.
    pub const UNSET_ID: i32 = 0;

    /// True when the id carries the unset sentinel.
    pub fn has_unset_id(&self) -> bool {
        self.id == Self::UNSET_ID
    }

    /// Clear the id back to the unset sentinel.
    ///
    /// Range-scoped operations call this so an inclusive id range supersedes
    /// any specific id filter.
    pub fn clear_id(&mut self) {
        self.id = Self::UNSET_ID;
    }
}
