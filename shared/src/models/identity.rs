//! Caller identity

use serde::{Deserialize, Serialize};

/// Resolved identity of the caller behind an opaque credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    /// Administrator account (manages restaurants, staff and shifts)
    Admin { id: i64 },
    /// Staff member mapped to an employee record
    Employee { id: i64 },
    Unauthenticated,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Admin { .. })
    }

    /// Employee record backing this identity, if any
    pub fn employee_id(&self) -> Option<i64> {
        match self {
            Identity::Employee { id } => Some(*id),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Identity::Unauthenticated)
    }
}

/// Admin account (stored in the `admin` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Admin {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub hash_pass: String,
    pub created_at: i64,
}

/// Login request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub identity: Identity,
    /// Seconds until the token expires
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_serde_tagged() {
        let json = serde_json::to_string(&Identity::Employee { id: 7 }).unwrap();
        assert_eq!(json, r#"{"kind":"employee","id":7}"#);
        let id: Identity = serde_json::from_str(r#"{"kind":"unauthenticated"}"#).unwrap();
        assert_eq!(id, Identity::Unauthenticated);
    }

    #[test]
    fn test_identity_accessors() {
        assert!(Identity::Admin { id: 1 }.is_admin());
        assert_eq!(Identity::Admin { id: 1 }.employee_id(), None);
        assert_eq!(Identity::Employee { id: 3 }.employee_id(), Some(3));
        assert!(!Identity::Unauthenticated.is_authenticated());
    }
}
