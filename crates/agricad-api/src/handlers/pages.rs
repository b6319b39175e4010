//! Public page handlers
//!
//! The sign-in root and the public landing page. Signed-in visitors
//! never reach the sign-in handler; the route guard forwards them to
//! their dashboard before the handler runs.

use axum::response::Html;

/// Sign-in page at the root path
pub async fn sign_in_page() -> Html<&'static str> {
    Html(include_str!("../../static/sign_in.html"))
}

/// Public landing page, reachable with or without a session
pub async fn landing_page() -> Html<&'static str> {
    Html(include_str!("../../static/landing.html"))
}
