//! OpenAPI document aggregating the HTTP surface.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, User};
use crate::inbound::http::{health, users};

/// Public OpenAPI surface served by Swagger UI in debug builds.
#[derive(OpenApi)]
#[openapi(
    paths(
        users::add_user,
        users::update_user,
        users::delete_user,
        users::query_users,
        health::live,
        health::ready,
    ),
    components(schemas(User, Error, ErrorCode)),
    tags(
        (name = "users", description = "User CRUD operations"),
        (name = "health", description = "Probe endpoints")
    )
)]
pub struct ApiDoc;
