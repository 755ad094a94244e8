//! Query-parameter parsing into the normalised query specification.
//!
//! Parameters arrive untyped from the query string (and an optional path
//! segment). This module turns them into [`User`] and [`UserQuery`] values,
//! failing with [`ErrorCode::InvalidParameter`] when a numeric-looking field
//! does not parse as an integer.

use serde::Deserialize;

use crate::domain::{Error, IdRange, User, UserQuery};

/// Raw query-string parameters accepted by every user endpoint.
///
/// Absent keys deserialize to `None`, which the parser maps to the sentinel
/// defaults. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUserParams {
    /// Equality id filter; superseded by a path id when one is present.
    pub id: Option<String>,
    /// Equality name filter or payload field.
    pub name: Option<String>,
    /// Equality gender filter or payload field.
    pub gender: Option<String>,
    /// Equality birthday filter or payload field.
    pub birthday: Option<String>,
    /// Inclusive lower id bound.
    pub low: Option<String>,
    /// Inclusive upper id bound.
    pub high: Option<String>,
    /// Result count cap.
    pub limit: Option<String>,
    /// Result skip count.
    pub offset: Option<String>,
    /// Nonzero requests ascending-by-id ordering.
    pub order: Option<String>,
}

fn parse_int(field: &str, raw: &str) -> Result<i32, Error> {
    raw.parse::<i32>()
        .map_err(|_| Error::invalid_parameter(format!("parameter '{field}' is not an integer")))
}

fn parse_opt_int(field: &str, raw: Option<&String>, default: i32) -> Result<i32, Error> {
    match raw {
        Some(value) if !value.is_empty() => parse_int(field, value),
        _ => Ok(default),
    }
}

/// Build the user payload / equality filter from a path id and raw
/// parameters.
///
/// A path id takes precedence over a query-string `id` and must itself be a
/// valid integer; without either, the id stays at the unset sentinel.
pub fn parse_user(path_id: Option<&str>, params: &RawUserParams) -> Result<User, Error> {
    let id = match path_id {
        Some(raw) => parse_int("id", raw)?,
        None => parse_opt_int("id", params.id.as_ref(), User::UNSET_ID)?,
    };

    Ok(User {
        id,
        name: params.name.clone().unwrap_or_default(),
        gender: params.gender.clone().unwrap_or_default(),
        birthday: params.birthday.clone().unwrap_or_default(),
    })
}

/// Build the full query specification from a path id and raw parameters.
///
/// Each paging field reads from its own key; `offset` in particular is never
/// derived from `order`.
pub fn parse_query(path_id: Option<&str>, params: &RawUserParams) -> Result<UserQuery, Error> {
    let user = parse_user(path_id, params)?;

    let low = parse_opt_int("low", params.low.as_ref(), IdRange::UNSET)?;
    let high = parse_opt_int("high", params.high.as_ref(), IdRange::UNSET)?;
    let limit = parse_opt_int("limit", params.limit.as_ref(), UserQuery::UNSET)?;
    let offset = parse_opt_int("offset", params.offset.as_ref(), UserQuery::UNSET)?;
    let order = parse_opt_int("order", params.order.as_ref(), UserQuery::UNORDERED)?;

    Ok(UserQuery::new(
        user,
        IdRange::new(low, high),
        offset,
        limit,
        order,
    ))
}
