//! Route definitions
//!
//! The page surface (sign-in root, landing, dashboards) is what the
//! route guard evaluates; the API surface under `/api` and the health
//! probes are neutral and enforce their own access in the handlers.

use crate::handlers::{auth, dashboard, health, pages};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Auth API routes under `/api`
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/session", get(auth::session_handler))
}

/// Browser-facing page routes, all subject to the route guard
pub fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(pages::sign_in_page))
        .route("/landing", get(pages::landing_page))
        .route("/admin/dashboard", get(dashboard::admin_dashboard))
        .route("/mayor/dashboard", get(dashboard::mayor_dashboard))
        .route("/farmer/dashboard", get(dashboard::farmer_dashboard))
}

/// Health probe routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
}
