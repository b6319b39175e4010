//! Route authorization
//!
//! Gates every page request on `(token presence, token role, pathname)`
//! alone; no backend calls. Two stages, mirroring the coarse/fine split
//! the decision table requires:
//!
//! 1. [`authorize`] - coarse gate: is this path reachable at all without
//!    a session? `false` resolves to a redirect to the sign-in root.
//! 2. [`evaluate`] - fine decision: allow, bounce to the sign-in root,
//!    or forward a signed-in visitor from the root to their dashboard.
//!
//! Route prefixes are matched on exact path segments, so `/administrator`
//! does not fall into the `/admin` tree. Neutral paths (the auth API,
//! health probes, static assets) are never evaluated; the guard only
//! attaches the decoded identity for handlers that want it.

use super::models::SessionUser;
use super::token::verify_session_token;
use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::state::AppState;
use agricad_core::Role;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Sign-in root: the login page and the target of every denial redirect
pub const SIGN_IN_ROOT: &str = "/";

/// Public landing page, reachable with or without a session
pub const PUBLIC_LANDING: &str = "/landing";

/// Name of the HTTP-only cookie carrying the session token
pub const SESSION_COOKIE: &str = "agricad_session";

/// Classification of an incoming path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Public landing page; always allowed
    Public,
    /// The sign-in root
    SignInRoot,
    /// A role-owned tree (`/admin`, `/mayor`, `/farmer`)
    Restricted(Role),
    /// Not evaluated by the guard (auth API, probes, assets)
    Neutral,
}

impl RouteClass {
    /// Classify a request path
    ///
    /// Prefix ownership is decided by the first path segment, compared
    /// exactly and case-sensitively. `/admin` and `/admin/reports` are
    /// admin paths; `/administrator` is not.
    pub fn classify(path: &str) -> Self {
        if path == SIGN_IN_ROOT {
            return RouteClass::SignInRoot;
        }
        if path == PUBLIC_LANDING {
            return RouteClass::Public;
        }

        let first_segment = path
            .strip_prefix('/')
            .map(|rest| rest.split('/').next().unwrap_or(""))
            .unwrap_or("");

        match Role::parse(first_segment) {
            Some(role) => RouteClass::Restricted(role),
            None => RouteClass::Neutral,
        }
    }
}

/// Coarse authorization callback
///
/// `true` lets the request proceed to the fine decision; `false` means
/// the caller redirects to the sign-in root. The sign-in root itself is
/// reachable without a session - it is the redirect target.
pub fn authorize(path: &str, has_session: bool) -> bool {
    matches!(
        RouteClass::classify(path),
        RouteClass::Public | RouteClass::SignInRoot
    ) || has_session
}

/// Outcome of the fine routing decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Serve the requested page
    Allow,
    /// Redirect to the sign-in root
    ToSignIn,
    /// Forward a signed-in visitor to their role's dashboard
    ToDashboard(&'static str),
}

/// Fine routing decision for an evaluated path
///
/// Pure over its inputs; this is the decision table:
///
/// | session | path           | decision                                  |
/// |---------|----------------|-------------------------------------------|
/// | any     | public landing | allow                                     |
/// | none    | anything else  | to sign-in (root itself stays served)     |
/// | held    | sign-in root   | to own dashboard; unmapped role stays     |
/// | held    | foreign prefix | to sign-in                                |
/// | held    | own prefix     | allow                                     |
pub fn evaluate(path: &str, user: Option<&SessionUser>) -> RouteDecision {
    match RouteClass::classify(path) {
        RouteClass::Public => RouteDecision::Allow,
        RouteClass::SignInRoot => match user {
            // A session with an unmapped role has no dashboard and
            // stays on the root page: no redirect loop, no 404.
            Some(u) => match u.dashboard_path() {
                Some(dashboard) => RouteDecision::ToDashboard(dashboard),
                None => RouteDecision::Allow,
            },
            None => RouteDecision::Allow,
        },
        RouteClass::Restricted(required) => match user {
            Some(u) if u.role() == Some(required) => RouteDecision::Allow,
            Some(_) => RouteDecision::ToSignIn,
            None => RouteDecision::ToSignIn,
        },
        RouteClass::Neutral => RouteDecision::Allow,
    }
}

/// Pull the session token from the Authorization header or the session
/// cookie, preferring the header.
fn extract_token(request: &Request, jar: &CookieJar) -> Option<String> {
    if let Some(auth_header) = request.headers().get(header::AUTHORIZATION) {
        if let Ok(value) = auth_header.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Route authorization middleware
///
/// Runs on every request before the handler. Decodes the session token
/// if one is present, classifies the path, and applies the two-stage
/// decision. On `Allow` the decoded [`SessionUser`] is inserted into
/// request extensions as the per-request identity.
pub async fn route_guard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    state.increment_requests();
    let path = request.uri().path().to_string();

    let user = extract_token(&request, &jar).and_then(|token| {
        match verify_session_token(&state.session, &token) {
            Ok(claims) => Some(SessionUser::from(claims)),
            Err(e) => {
                audit_log(&AuditEvent::InvalidToken {
                    ip_address: extract_ip_address(request.headers()),
                    user_agent: extract_user_agent(request.headers()),
                    reason: e.to_string(),
                });
                None
            }
        }
    });

    // Neutral paths are not evaluated; the identity still rides along
    // for handlers like the session endpoint.
    if RouteClass::classify(&path) == RouteClass::Neutral {
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        return next.run(request).await;
    }

    if !authorize(&path, user.is_some()) {
        return Redirect::to(SIGN_IN_ROOT).into_response();
    }

    match evaluate(&path, user.as_ref()) {
        RouteDecision::Allow => {
            if let Some(user) = user {
                request.extensions_mut().insert(user);
            }
            next.run(request).await
        }
        RouteDecision::ToSignIn => {
            if let Some(user) = &user {
                audit_log(&AuditEvent::RouteDenied {
                    user_id: user.id,
                    email: user.email.clone(),
                    role: user.role.clone(),
                    path: path.clone(),
                    ip_address: extract_ip_address(request.headers()),
                });
            }
            Redirect::to(SIGN_IN_ROOT).into_response()
        }
        RouteDecision::ToDashboard(dashboard) => Redirect::to(dashboard).into_response(),
    }
}
