//! Role dashboard handlers
//!
//! Each dashboard sits under its role's restricted tree; the route
//! guard guarantees the handler only runs for a session holding that
//! role, so the extension is always present here.

use crate::auth::{SessionInfo, SessionUser};
use crate::error::AppError;
use axum::{response::IntoResponse, Extension, Json};
use serde::Serialize;

/// Dashboard payload: the viewer's identity plus their village scope
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub dashboard: &'static str,
    pub user: SessionInfo,
}

fn dashboard_response(
    dashboard: &'static str,
    user: Option<Extension<SessionUser>>,
) -> Result<Json<DashboardResponse>, AppError> {
    // The guard redirects before this can be absent; treat a missing
    // identity as a rejection anyway.
    let Some(Extension(user)) = user else {
        return Err(AppError::Unauthorized);
    };
    Ok(Json(DashboardResponse {
        dashboard,
        user: SessionInfo::from(&user),
    }))
}

/// Administrator dashboard
pub async fn admin_dashboard(
    user: Option<Extension<SessionUser>>,
) -> Result<impl IntoResponse, AppError> {
    dashboard_response("admin", user)
}

/// Mayor dashboard, scoped to the mayor's managed villages
pub async fn mayor_dashboard(
    user: Option<Extension<SessionUser>>,
) -> Result<impl IntoResponse, AppError> {
    dashboard_response("mayor", user)
}

/// Farmer dashboard, scoped to the farmer's home village
pub async fn farmer_dashboard(
    user: Option<Extension<SessionUser>>,
) -> Result<impl IntoResponse, AppError> {
    dashboard_response("farmer", user)
}
