//! AgriCad Core - Domain models and shared types
//!
//! This crate defines the abstractions shared by the AgriCad gate:
//! - Roles and role-scoped village access
//! - Configuration management
//!
//! A session in AgriCad belongs to exactly one role, and that role
//! determines both the dashboard the holder lands on and the data scope
//! the holder may read. The scope fields differ per role, so the role is
//! modelled as a closed tagged union rather than a flat record with
//! optional fields.

pub mod config;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};

use serde::{Deserialize, Serialize};

// ============================================================================
// Roles
// ============================================================================

/// Application role
///
/// Determines which path-prefix family a session may enter:
/// - `Admin`: full registry access, `/admin` tree
/// - `Mayor`: manages one or more villages, `/mayor` tree
/// - `Farmer`: cultivates parcels in a single village, `/farmer` tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Mayor,
    Farmer,
}

impl Role {
    /// Convert role to its wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Mayor => "mayor",
            Role::Farmer => "farmer",
        }
    }

    /// Parse a role from its wire representation
    ///
    /// Returns `None` for unrecognized values; callers treat an unmapped
    /// role as "no dashboard" rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "mayor" => Some(Role::Mayor),
            "farmer" => Some(Role::Farmer),
            _ => None,
        }
    }

    /// The dashboard each role is redirected to after sign-in
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Mayor => "/mayor/dashboard",
            Role::Farmer => "/farmer/dashboard",
        }
    }

    /// The leading path segment owned by this role
    pub fn route_prefix(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Role scope
// ============================================================================

/// Role together with its village scope
///
/// Each variant carries only the fields meaningful for that role:
/// a mayor holds an ordered list of managed village names, a farmer a
/// single village, an admin no village scope at all. The serde layout is
/// internally tagged on `role`, so a serialized scope contributes exactly
/// `role` plus the role's own fields to a session token:
///
/// ```json
/// {"role":"mayor","villages":["Alba","Borgo"]}
/// {"role":"farmer","village":"Alba"}
/// {"role":"admin"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleScope {
    Admin,
    Mayor { villages: Vec<String> },
    Farmer { village: String },
}

impl RoleScope {
    /// The role this scope belongs to
    pub fn role(&self) -> Role {
        match self {
            RoleScope::Admin => Role::Admin,
            RoleScope::Mayor { .. } => Role::Mayor,
            RoleScope::Farmer { .. } => Role::Farmer,
        }
    }

    /// Reassemble a scope from loosely typed token fields
    ///
    /// Returns `None` when the role string is unmapped or a farmer claim
    /// is missing its village. A mayor with no villages is still a valid
    /// mayor scope; village count never affects routing.
    pub fn from_parts(
        role: &str,
        villages: Option<Vec<String>>,
        village: Option<String>,
    ) -> Option<Self> {
        match Role::parse(role)? {
            Role::Admin => Some(RoleScope::Admin),
            Role::Mayor => Some(RoleScope::Mayor {
                villages: villages.unwrap_or_default(),
            }),
            Role::Farmer => Some(RoleScope::Farmer { village: village? }),
        }
    }

    /// Split a scope into loosely typed token fields
    pub fn to_parts(&self) -> (Role, Option<Vec<String>>, Option<String>) {
        match self {
            RoleScope::Admin => (Role::Admin, None, None),
            RoleScope::Mayor { villages } => (Role::Mayor, Some(villages.clone()), None),
            RoleScope::Farmer { village } => (Role::Farmer, None, Some(village.clone())),
        }
    }

    /// Villages visible to this scope, in stored order
    pub fn villages(&self) -> &[String] {
        match self {
            RoleScope::Admin => &[],
            RoleScope::Mayor { villages } => villages,
            RoleScope::Farmer { village } => std::slice::from_ref(village),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::Mayor.as_str(), "mayor");
        assert_eq!(Role::Farmer.as_str(), "farmer");

        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("mayor"), Some(Role::Mayor));
        assert_eq!(Role::parse("farmer"), Some(Role::Farmer));
        assert_eq!(Role::parse("administrator"), None);
        assert_eq!(Role::parse("Mayor"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_dashboard_paths() {
        assert_eq!(Role::Admin.dashboard_path(), "/admin/dashboard");
        assert_eq!(Role::Mayor.dashboard_path(), "/mayor/dashboard");
        assert_eq!(Role::Farmer.dashboard_path(), "/farmer/dashboard");
    }

    #[test]
    fn test_scope_serde_layout() {
        let mayor = RoleScope::Mayor {
            villages: vec!["Alba".to_string(), "Borgo".to_string()],
        };
        let json = serde_json::to_value(&mayor).unwrap();
        assert_eq!(json["role"], "mayor");
        assert_eq!(json["villages"][0], "Alba");
        assert!(json.get("village").is_none());

        let farmer = RoleScope::Farmer {
            village: "Alba".to_string(),
        };
        let json = serde_json::to_value(&farmer).unwrap();
        assert_eq!(json["role"], "farmer");
        assert_eq!(json["village"], "Alba");
        assert!(json.get("villages").is_none());

        let admin = serde_json::to_value(&RoleScope::Admin).unwrap();
        assert_eq!(admin["role"], "admin");
    }

    #[test]
    fn test_scope_from_parts() {
        let scope = RoleScope::from_parts("mayor", Some(vec!["Alba".to_string()]), None).unwrap();
        assert_eq!(scope.role(), Role::Mayor);
        assert_eq!(scope.villages(), ["Alba".to_string()]);

        // A mayor with no managed villages is still a mayor.
        let scope = RoleScope::from_parts("mayor", None, None).unwrap();
        assert_eq!(scope.role(), Role::Mayor);
        assert!(scope.villages().is_empty());

        // A farmer claim must carry its village.
        assert_eq!(RoleScope::from_parts("farmer", None, None), None);

        // Unmapped roles stay unmapped instead of failing hard.
        assert_eq!(RoleScope::from_parts("auditor", None, None), None);
    }

    #[test]
    fn test_scope_round_trip_preserves_village_order() {
        let villages = vec!["Zagora".to_string(), "Alba".to_string(), "Mira".to_string()];
        let scope = RoleScope::Mayor {
            villages: villages.clone(),
        };
        let (role, out_villages, out_village) = scope.to_parts();
        assert_eq!(role, Role::Mayor);
        assert_eq!(out_villages.as_deref(), Some(villages.as_slice()));
        assert_eq!(out_village, None);

        let back = RoleScope::from_parts(role.as_str(), out_villages, out_village).unwrap();
        assert_eq!(back.villages(), villages.as_slice());
    }
}
