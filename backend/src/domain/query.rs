//! Normalised query specification built from request parameters.

use serde::{Deserialize, Serialize};

use super::User;

/// Inclusive `[low, high]` interval over user ids.
///
/// A range only constrains a query when it is *active*: both bounds must be
/// present and differ from [`IdRange::UNSET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    /// Inclusive lower bound.
    pub low: i32,
    /// Inclusive upper bound.
    pub high: i32,
}

impl IdRange {
    /// Sentinel bound meaning "not supplied".
    pub const UNSET: i32 = -1;

    /// Construct a range from raw bounds.
    pub fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    /// True when both bounds were supplied.
    pub fn is_active(&self) -> bool {
        self.low != Self::UNSET && self.high != Self::UNSET
    }

    /// Return the range only when it constrains a query.
    pub fn active(self) -> Option<Self> {
        self.is_active().then_some(self)
    }
}

impl Default for IdRange {
    fn default() -> Self {
        Self::new(Self::UNSET, Self::UNSET)
    }
}

/// Typed filter/paging/ordering specification for repository queries.
///
/// Constructed fresh per request by the parameter parser and discarded once
/// the repository call returns. Numeric fields use `-1` ([`UserQuery::UNSET`])
/// as the "not supplied" sentinel; `order` uses `0` for "unordered".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// Equality filters; zero-value fields are unconstrained.
    pub user: User,
    /// Optional inclusive id range. When active it supersedes `user.id`.
    pub range: IdRange,
    /// Skip this many results; `-1` applies no offset.
    pub offset: i32,
    /// Cap the result count; `-1` applies no limit.
    pub limit: i32,
    /// `0` leaves results unordered; any other value orders ascending by id.
    pub order: i32,
}

impl UserQuery {
    /// Sentinel for unset `offset`/`limit`.
    pub const UNSET: i32 = -1;
    /// `order` value meaning "no ordering requested".
    pub const UNORDERED: i32 = 0;

    /// Build a normalised query.
    ///
    /// An active range clears the equality id filter so the range supersedes
    /// a specific id during update, delete, and search.
    pub fn new(mut user: User, range: IdRange, offset: i32, limit: i32, order: i32) -> Self {
        if range.is_active() {
            user.clear_id();
        }
        Self {
            user,
            range,
            offset,
            limit,
            order,
        }
    }

    /// Query matching a single user record with no paging or ordering.
    pub fn for_user(user: User) -> Self {
        Self::new(
            user,
            IdRange::default(),
            Self::UNSET,
            Self::UNSET,
            Self::UNORDERED,
        )
    }

    /// True when the caller requested ascending-by-id ordering.
    pub fn wants_ordering(&self) -> bool {
        self.order != Self::UNORDERED
    }
}
