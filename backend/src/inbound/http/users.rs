//! User CRUD handler shells.
//!
//! Every handler follows the same lifecycle: admission via the drain
//! coordinator, parameter parsing, the optional pre-hook, the repository
//! call, the optional post-hook, and the response envelope. The admission
//! guard is held across the repository call so its drop releases the
//! in-flight slot on every exit path.
//!
//! Each operation serves both `/user` and `/user/{id}`; a path id takes
//! precedence over the query-string `id`.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, routes, web};
use serde_json::json;
use tracing::error;

use crate::domain::ports::UserPersistenceError;
use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::params::{RawUserParams, parse_query, parse_user};
use crate::inbound::http::state::HttpState;

fn path_id<'r>(req: &'r HttpRequest) -> Option<&'r str> {
    req.match_info().get("id")
}

fn map_repository_error(err: UserPersistenceError) -> Error {
    error!(error = %err, "repository operation failed");
    Error::repository("database operation failed")
}

fn object_response<T: serde::Serialize>(object: &T) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "object": object }))
}

/// Response for a request filtered by a pre-operation hook: a well-formed
/// envelope with nothing in it.
fn filtered_response() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "object": null }))
}

/// Create a user.
///
/// An id supplied in the path is persisted as-is; otherwise storage assigns
/// one. The stored record is echoed back.
#[utoipa::path(
    post,
    path = "/user",
    responses(
        (status = 200, description = "Created user", body = User),
        (status = 400, description = "Malformed integer parameter", body = Error),
        (status = 405, description = "Data-layer failure", body = Error),
        (status = 406, description = "Server shutting down", body = Error)
    ),
    tags = ["users"],
    operation_id = "addUser"
)]
#[routes]
#[post("/user")]
#[post("/user/{id}")]
pub async fn add_user(
    req: HttpRequest,
    params: web::Query<RawUserParams>,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let Some(_guard) = state.drain.try_enter() else {
        return Err(Error::shutting_down());
    };

    let user = parse_user(path_id(&req), &params)?;
    if !state.hooks.add.admit(&user) {
        return Ok(filtered_response());
    }

    let result = state.users.create(&user).await;
    state.hooks.add.observe(&user, result.is_ok());
    let stored = result.map_err(map_repository_error)?;
    Ok(object_response(&stored))
}

/// Update users in scope, setting the supplied non-empty fields.
///
/// An active `[low, high]` range supersedes a specific id; the echoed record
/// then carries the cleared id.
#[utoipa::path(
    put,
    path = "/user",
    responses(
        (status = 200, description = "Updated user echo", body = User),
        (status = 400, description = "Malformed integer parameter", body = Error),
        (status = 405, description = "Data-layer failure", body = Error),
        (status = 406, description = "Server shutting down", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[routes]
#[put("/user")]
#[put("/user/{id}")]
pub async fn update_user(
    req: HttpRequest,
    params: web::Query<RawUserParams>,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let Some(_guard) = state.drain.try_enter() else {
        return Err(Error::shutting_down());
    };

    let query = parse_query(path_id(&req), &params)?;
    if !state.hooks.update.admit(&query.user) {
        return Ok(filtered_response());
    }

    let result = state.users.update(&query.user, query.range.active()).await;
    state.hooks.update.observe(&query.user, result.is_ok());
    result.map_err(map_repository_error)?;
    Ok(object_response(&query.user))
}

/// Delete users in scope.
#[utoipa::path(
    delete,
    path = "/user",
    responses(
        (status = 200, description = "Deleted user echo", body = User),
        (status = 400, description = "Malformed integer parameter", body = Error),
        (status = 405, description = "Data-layer failure", body = Error),
        (status = 406, description = "Server shutting down", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[routes]
#[delete("/user")]
#[delete("/user/{id}")]
pub async fn delete_user(
    req: HttpRequest,
    params: web::Query<RawUserParams>,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let Some(_guard) = state.drain.try_enter() else {
        return Err(Error::shutting_down());
    };

    let query = parse_query(path_id(&req), &params)?;
    if !state.hooks.delete.admit(&query.user) {
        return Ok(filtered_response());
    }

    let result = state.users.delete(&query.user, query.range.active()).await;
    state.hooks.delete.observe(&query.user, result.is_ok());
    result.map_err(map_repository_error)?;
    Ok(object_response(&query.user))
}

/// Query users by equality filters, id range, offset, limit, and ordering.
#[utoipa::path(
    get,
    path = "/user",
    params(
        ("id" = Option<i32>, Query, description = "Equality id filter; 0 means unconstrained"),
        ("low" = Option<i32>, Query, description = "Inclusive lower id bound"),
        ("high" = Option<i32>, Query, description = "Inclusive upper id bound"),
        ("limit" = Option<i32>, Query, description = "Result count cap; -1 means no limit"),
        ("offset" = Option<i32>, Query, description = "Results to skip; -1 means no offset"),
        ("order" = Option<i32>, Query, description = "Nonzero orders ascending by id"),
        ("name" = Option<String>, Query, description = "Equality name filter"),
        ("gender" = Option<String>, Query, description = "Equality gender filter"),
        ("birthday" = Option<String>, Query, description = "Equality birthday filter")
    ),
    responses(
        (status = 200, description = "Matching users", body = [User]),
        (status = 400, description = "Malformed integer parameter", body = Error),
        (status = 405, description = "Data-layer failure", body = Error),
        (status = 406, description = "Server shutting down", body = Error)
    ),
    tags = ["users"],
    operation_id = "queryUsers"
)]
#[routes]
#[get("/user")]
#[get("/user/{id}")]
pub async fn query_users(
    req: HttpRequest,
    params: web::Query<RawUserParams>,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let Some(_guard) = state.drain.try_enter() else {
        return Err(Error::shutting_down());
    };

    let query = parse_query(path_id(&req), &params)?;
    if !state.hooks.query.admit(&query.user) {
        return Ok(filtered_response());
    }

    let result = state.users.find(&query).await;
    state.hooks.query.observe(&query.user, result.is_ok());
    let users = result.map_err(map_repository_error)?;
    Ok(object_response(&users))
}
