//! Authentication API handlers
//!
//! Login exchanges credentials for a session token, delivered both in
//! the JSON body (for API clients using the Authorization header) and
//! as an HTTP-only cookie (for the browser pages behind the guard).

use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::auth::{
    issue_session_token, Authenticator, LoginRequest, LoginResponse, SessionInfo, SessionUser,
    SESSION_COOKIE,
};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Logout response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

fn session_cookie(token: String) -> Cookie<'static> {
    // No max-age: the token's own expiry bounds the session, and a
    // stale cookie simply fails verification.
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Login with email and password
///
/// Authenticates against the configured admin account, then the mayors
/// and farmers tables. Every failure mode returns the same generic 401.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ApiError),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ip_address = extract_ip_address(&headers);
    let user_agent = extract_user_agent(&headers);

    let authenticator = Authenticator::new(state.db.clone(), &state.config.auth);
    let identity = match authenticator
        .authenticate(&request.email, &request.password)
        .await
    {
        Ok(identity) => identity,
        Err(e) => {
            audit_log(&AuditEvent::LoginFailure {
                email: request.email.clone(),
                reason: "credential rejection".to_string(),
                ip_address,
                user_agent,
            });
            return Err(e);
        }
    };

    let token = issue_session_token(
        &state.session,
        identity.id,
        &identity.name,
        &identity.email,
        &identity.scope,
    )?;

    audit_log(&AuditEvent::LoginSuccess {
        user_id: identity.id,
        email: identity.email.clone(),
        role: identity.scope.role().as_str().to_string(),
        ip_address,
        user_agent,
    });

    let (role, villages, village) = identity.scope.to_parts();
    let response = LoginResponse {
        token: token.clone(),
        token_type: "Bearer".to_string(),
        expires_in: state.session.ttl_secs,
        user: SessionInfo {
            id: identity.id.to_string(),
            name: identity.name,
            email: identity.email,
            role: role.as_str().to_string(),
            villages,
            village,
        },
    };

    Ok((jar.add(session_cookie(token)), Json(response)))
}

/// Logout the current session
///
/// Clears the session cookie. Tokens are stateless, so a copy held
/// elsewhere remains valid until it expires.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse),
    )
)]
pub async fn logout_handler(
    jar: CookieJar,
    headers: HeaderMap,
    user: Option<Extension<SessionUser>>,
) -> impl IntoResponse {
    if let Some(Extension(user)) = user {
        audit_log(&AuditEvent::Logout {
            user_id: user.id,
            email: user.email.clone(),
            ip_address: extract_ip_address(&headers),
        });
    }

    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    (
        jar,
        Json(LogoutResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// Current session info
///
/// Returns the identity decoded from the presented token, or 401 when
/// no valid token accompanies the request.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "Current session", body = SessionInfo),
        (status = 401, description = "No valid session", body = crate::error::ApiError),
    )
)]
pub async fn session_handler(
    user: Option<Extension<SessionUser>>,
) -> Result<impl IntoResponse, AppError> {
    match user {
        Some(Extension(user)) => Ok((StatusCode::OK, Json(SessionInfo::from(&user)))),
        None => Err(AppError::Unauthorized),
    }
}
