//! HTTP server assembly and shutdown coordination.

mod config;
pub mod drain;

pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE};
pub use drain::{AdmissionGuard, DrainCoordinator};

use std::net::SocketAddr;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use crate::inbound::http::health::{self, HealthState};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users;
use crate::middleware::Trace;

/// Assemble the application: middleware, user CRUD routes, and health
/// probes. Swagger UI is mounted in debug builds only.
pub fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(http_state)
        .app_data(health_state)
        .wrap(Trace)
        .service(users::add_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(users::query_users)
        .service(health::ready)
        .service(health::live);

    #[cfg(debug_assertions)]
    let app = {
        use utoipa::OpenApi;
        app.service(
            utoipa_swagger_ui::SwaggerUi::new("/docs/{_:.*}")
                .url("/api-docs/openapi.json", crate::ApiDoc::openapi()),
        )
    };

    app
}

/// Bind the server and mark the service ready.
///
/// OS signals are left to the caller, which owns the drain sequence, so the
/// default actix signal handling is disabled.
///
/// # Errors
///
/// Returns the bind error when the listen address is unavailable.
pub fn create_server(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
    addr: SocketAddr,
) -> std::io::Result<Server> {
    let health = health_state.clone();
    let server = HttpServer::new(move || build_app(http_state.clone(), health_state.clone()))
        .disable_signals()
        .bind(addr)?
        .run();
    health.mark_ready();
    Ok(server)
}
