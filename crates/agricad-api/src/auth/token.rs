//! Session token generation and validation
//!
//! Implements the stateless session credential with HMAC-SHA256 signing.
//! A token is issued once at login, carries the holder's role and village
//! scope, and is verified on every request without a server-side lookup.

use agricad_core::{AuthConfig, RoleScope};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Session claims embedded in the token
///
/// `role` is kept as a plain string on the wire so a token carrying an
/// unmapped role still decodes; the typed [`RoleScope`] conversion happens
/// in [`SessionUser`](super::models::SessionUser), where an unmapped role
/// resolves to "no dashboard" instead of a hard failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject - user ID
    pub sub: String,
    /// Unique token identifier
    pub jti: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
    /// Holder's display name
    pub name: String,
    /// Holder's email address
    pub email: String,
    /// Holder's role (admin, mayor, farmer)
    pub role: String,
    /// Managed village names, in stored order (mayor only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub villages: Option<Vec<String>>,
    /// Home village (farmer only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
}

/// Token generation and validation errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode session token: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// Session signing configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Session lifetime in seconds
    pub ttl_secs: u64,
    /// Token issuer identifier
    pub issuer: String,
}

impl SessionConfig {
    /// Derive the signing configuration from the application auth config
    pub fn from_auth_config(auth: &AuthConfig) -> Self {
        Self {
            secret: auth.session_secret.clone(),
            ttl_secs: auth.session_ttl_secs,
            issuer: auth.issuer.clone(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_auth_config(&AuthConfig::default())
    }
}

/// Issue a signed session token for an authenticated identity
///
/// The token round-trips exactly `id`, `role`, and the role's scope
/// fields (`villages` for mayor, `village` for farmer), plus the
/// registered claims. It is immutable once issued; re-login regenerates.
pub fn issue_session_token(
    config: &SessionConfig,
    user_id: Uuid,
    name: &str,
    email: &str,
    scope: &RoleScope,
) -> Result<String, TokenError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let (role, villages, village) = scope.to_parts();

    let claims = Claims {
        iss: config.issuer.clone(),
        sub: user_id.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now,
        exp: now + config.ttl_secs,
        name: name.to_string(),
        email: email.to_string(),
        role: role.as_str().to_string(),
        villages,
        village,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify a session token and extract its claims
///
/// A pure, side-effect-free check: signature, expiry, and issuer only.
pub fn verify_session_token(config: &SessionConfig, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_mayor_token() {
        let config = SessionConfig::default();
        let user_id = Uuid::new_v4();
        let scope = RoleScope::Mayor {
            villages: vec!["Alba".to_string(), "Borgo".to_string()],
        };

        let token =
            issue_session_token(&config, user_id, "Ana Petrescu", "ana@agricad.test", &scope)
                .expect("Failed to issue token");

        let claims = verify_session_token(&config, &token).expect("Failed to verify token");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "mayor");
        assert_eq!(
            claims.villages,
            Some(vec!["Alba".to_string(), "Borgo".to_string()])
        );
        assert_eq!(claims.village, None);
        assert_eq!(claims.iss, "agricad");
    }

    #[test]
    fn test_admin_token_carries_no_village_fields() {
        let config = SessionConfig::default();
        let token = issue_session_token(
            &config,
            Uuid::new_v4(),
            "Admin",
            "admin@agricad.test",
            &RoleScope::Admin,
        )
        .unwrap();

        let claims = verify_session_token(&config, &token).unwrap();
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.villages, None);
        assert_eq!(claims.village, None);
    }

    #[test]
    fn test_farmer_token_round_trips_village() {
        let config = SessionConfig::default();
        let scope = RoleScope::Farmer {
            village: "Alba".to_string(),
        };
        let token = issue_session_token(
            &config,
            Uuid::new_v4(),
            "Ion Moraru",
            "ion@agricad.test",
            &scope,
        )
        .unwrap();

        let claims = verify_session_token(&config, &token).unwrap();
        assert_eq!(claims.role, "farmer");
        assert_eq!(claims.village, Some("Alba".to_string()));
        assert_eq!(claims.villages, None);
    }

    #[test]
    fn test_invalid_token() {
        let config = SessionConfig::default();
        let result = verify_session_token(&config, "invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let config1 = SessionConfig {
            secret: "secret1".to_string(),
            ..Default::default()
        };
        let config2 = SessionConfig {
            secret: "secret2".to_string(),
            ..Default::default()
        };

        let token = issue_session_token(
            &config1,
            Uuid::new_v4(),
            "Test",
            "test@agricad.test",
            &RoleScope::Admin,
        )
        .unwrap();

        let result = verify_session_token(&config2, &token);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token() {
        let config = SessionConfig::default();
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();

        let claims = Claims {
            iss: config.issuer.clone(),
            sub: Uuid::new_v4().to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
            name: "Test".to_string(),
            email: "test@agricad.test".to_string(),
            role: "farmer".to_string(),
            villages: None,
            village: Some("Alba".to_string()),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = verify_session_token(&config, &token);
        assert!(matches!(result, Err(TokenError::ExpiredToken)));
    }

    #[test]
    fn test_unmapped_role_still_decodes() {
        // Tokens are only ever issued with known roles, but a decoded
        // claim set keeps the raw string so routing can degrade to
        // "no dashboard" instead of rejecting the session outright.
        let config = SessionConfig::default();
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();

        let claims = Claims {
            iss: config.issuer.clone(),
            sub: Uuid::new_v4().to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + 600,
            name: "Ghost".to_string(),
            email: "ghost@agricad.test".to_string(),
            role: "surveyor".to_string(),
            villages: None,
            village: None,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let decoded = verify_session_token(&config, &token).unwrap();
        assert_eq!(decoded.role, "surveyor");
    }
}
