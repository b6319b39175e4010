//! Request-scoped identity and auth API payloads
//!
//! [`SessionUser`] is the immutable per-request view of a verified session
//! token. The guard decodes it once, inserts it into request extensions,
//! and every downstream handler reads the same value; there is no ambient
//! or global session state.

use super::token::Claims;
use agricad_core::{Role, RoleScope};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Verified session identity carried in request extensions
///
/// `role` preserves the raw claim string; `scope` is its typed form and
/// is `None` when the claim carries a role this deployment does not map.
/// An unmapped role keeps the session alive but grants no dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// Holder's unique identifier
    pub id: Uuid,
    /// Holder's display name
    pub name: String,
    /// Holder's email address
    pub email: String,
    /// Raw role claim as issued
    pub role: String,
    /// Typed role scope, if the role claim is mapped
    pub scope: Option<RoleScope>,
    /// Token identifier
    pub jti: String,
}

impl SessionUser {
    /// The typed role, if mapped
    pub fn role(&self) -> Option<Role> {
        self.scope.as_ref().map(RoleScope::role)
    }

    /// The dashboard this session is redirected to from the sign-in root
    ///
    /// `None` means "no dashboard": the holder stays on the root page.
    pub fn dashboard_path(&self) -> Option<&'static str> {
        self.role().map(|role| role.dashboard_path())
    }
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        let scope = RoleScope::from_parts(
            &claims.role,
            claims.villages.clone(),
            claims.village.clone(),
        );
        Self {
            id: Uuid::parse_str(&claims.sub).unwrap_or_else(|_| Uuid::nil()),
            name: claims.name,
            email: claims.email,
            role: claims.role,
            scope,
            jti: claims.jti,
        }
    }
}

/// Login request payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response with the issued session token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: SessionInfo,
}

/// Public view of a session identity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub villages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
}

impl From<&SessionUser> for SessionInfo {
    fn from(user: &SessionUser) -> Self {
        let (villages, village) = match &user.scope {
            Some(scope) => {
                let (_, villages, village) = scope.to_parts();
                (villages, village)
            }
            None => (None, None),
        };
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            villages,
            village,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_role(role: &str) -> Claims {
        Claims {
            iss: "agricad".to_string(),
            sub: Uuid::new_v4().to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: 1000,
            exp: 2000,
            name: "Test".to_string(),
            email: "test@agricad.test".to_string(),
            role: role.to_string(),
            villages: None,
            village: None,
        }
    }

    #[test]
    fn test_session_user_from_mayor_claims() {
        let mut claims = claims_with_role("mayor");
        claims.villages = Some(vec!["Alba".to_string()]);

        let user = SessionUser::from(claims);
        assert_eq!(user.role(), Some(Role::Mayor));
        assert_eq!(user.dashboard_path(), Some("/mayor/dashboard"));
        assert_eq!(
            user.scope,
            Some(RoleScope::Mayor {
                villages: vec!["Alba".to_string()]
            })
        );
    }

    #[test]
    fn test_mayor_without_villages_keeps_role() {
        let user = SessionUser::from(claims_with_role("mayor"));
        assert_eq!(user.role(), Some(Role::Mayor));
        assert_eq!(user.scope, Some(RoleScope::Mayor { villages: vec![] }));
    }

    #[test]
    fn test_unmapped_role_has_no_dashboard() {
        let user = SessionUser::from(claims_with_role("surveyor"));
        assert_eq!(user.role(), None);
        assert_eq!(user.dashboard_path(), None);
        assert_eq!(user.role, "surveyor");
    }

    #[test]
    fn test_session_info_omits_foreign_scope_fields() {
        let mut claims = claims_with_role("farmer");
        claims.village = Some("Alba".to_string());
        let user = SessionUser::from(claims);

        let info = SessionInfo::from(&user);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["role"], "farmer");
        assert_eq!(json["village"], "Alba");
        assert!(json.get("villages").is_none());
    }
}
