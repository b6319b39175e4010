//! AgriCad API - authentication gate and page router
//!
//! HTTP server fronting the land registry: credential login against the
//! configured admin account and the mayors/farmers tables, stateless
//! session tokens, and a route guard that keeps each role inside its
//! own page tree.

pub mod audit;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use crate::auth::route_guard;
use crate::state::AppState;
use axum::{http::HeaderValue, middleware, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation for the auth API surface
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login_handler,
        handlers::auth::logout_handler,
        handlers::auth::session_handler,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        auth::LoginRequest,
        auth::LoginResponse,
        auth::SessionInfo,
        handlers::auth::LogoutResponse,
        error::ApiError,
    )),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "health", description = "Health and readiness probes"),
    ),
    info(
        title = "AgriCad API",
        description = "Land registry authentication and routing gate",
    )
)]
pub struct ApiDoc;

fn cors_layer(state: &AppState) -> CorsLayer {
    if !state.config.server.cors_enabled {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = state
        .config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Build the application router
///
/// The route guard runs on every request; `/api`, the probes, and the
/// Swagger UI are neutral to it, while the page routes are subject to
/// the role/path decision table.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::page_routes())
        .nest("/api", routes::api_routes())
        .merge(routes::health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state))
        .with_state(state)
}

/// Test router with fixed credentials and signing secret
///
/// The database pool is lazy and unused unless a test authenticates a
/// persisted account.
#[cfg(feature = "test-utils")]
pub fn create_router_for_testing() -> Router {
    use agricad_core::AppConfig;

    let mut config = AppConfig::default();
    config.auth.admin_email = Some("admin@agricad.test".to_string());
    config.auth.admin_password = Some("admin-secret".to_string());
    config.auth.session_secret = "test-secret".to_string();

    let state = Arc::new(AppState::new(config).expect("test state"));
    create_router(state)
}
