//! Authentication and route authorization
//!
//! This module provides the credential and routing gate for the service:
//! - Session token generation and validation
//! - Password hashing with Argon2
//! - Credential authentication against config and database
//! - Route guard middleware applying the role/path decision table
//! - Request-scoped identity and auth API payloads

pub mod authenticator;
pub mod guard;
pub mod models;
pub mod password;
pub mod token;

pub use authenticator::{AuthenticatedIdentity, Authenticator};
pub use guard::{
    authorize, evaluate, route_guard, RouteClass, RouteDecision, PUBLIC_LANDING, SESSION_COOKIE,
    SIGN_IN_ROOT,
};
pub use models::{LoginRequest, LoginResponse, SessionInfo, SessionUser};
pub use password::{constant_time_eq, hash_password, verify_password, PasswordError};
pub use token::{issue_session_token, verify_session_token, Claims, SessionConfig, TokenError};
