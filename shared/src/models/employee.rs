//! Employee Model

use super::role::Role;
use serde::{Deserialize, Serialize};

/// Employee entity
///
/// `roles` is stored as a JSON array in a TEXT column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub roles: Vec<Role>,
    /// Login name, present once an account has been created
    pub username: Option<String>,
    #[serde(skip_serializing, default)]
    pub hash_pass: Option<String>,
    pub created_at: i64,
}

impl Employee {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_account(&self) -> bool {
        self.username.is_some() && self.hash_pass.is_some()
    }
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub roles: Vec<Role>,
    /// Optional login account created together with the employee
    pub username: Option<String>,
    pub password: Option<String>,
    /// Restaurants to link on creation, at least one is required
    #[serde(default)]
    pub restaurant_ids: Vec<i64>,
    /// Which of `restaurant_ids` is the primary location (defaults to the first)
    pub primary_restaurant_id: Option<i64>,
}

/// Set login credentials for an employee without an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeAccountSet {
    pub username: String,
    pub password: String,
}

/// Employee-Restaurant link ("works at")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EmployeeRestaurant {
    pub employee_id: i64,
    pub restaurant_id: i64,
    pub primary_location: bool,
    pub created_at: i64,
}

/// Link payload (`POST /api/employees/{id}/restaurants/{restaurant_id}`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkRequest {
    #[serde(default)]
    pub primary_location: bool,
}

/// Result of removing an employee-restaurant link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlinkOutcome {
    /// Only the link (and the employee's shifts at that restaurant) was removed
    LinkRemoved,
    /// That was the last link, the employee and all their shifts are gone
    EmployeeDeleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> Employee {
        Employee {
            id: 1,
            name: "Jane".to_string(),
            email: None,
            phone: None,
            roles: vec![Role::Server],
            username: Some("jane".to_string()),
            hash_pass: Some("$argon2id$...".to_string()),
            created_at: 0,
        }
    }

    #[test]
    fn test_hash_pass_never_serialized() {
        let json = serde_json::to_value(jane()).unwrap();
        assert!(json.get("hash_pass").is_none());
        assert_eq!(json["roles"], serde_json::json!(["server"]));
    }

    #[test]
    fn test_has_role_and_account() {
        let mut e = jane();
        assert!(e.has_role(Role::Server));
        assert!(!e.has_role(Role::Door));
        assert!(e.has_account());
        e.hash_pass = None;
        assert!(!e.has_account());
    }

    #[test]
    fn test_create_payload_defaults() {
        let c: EmployeeCreate =
            serde_json::from_str(r#"{"name":"Jane","roles":["server"]}"#).unwrap();
        assert!(c.restaurant_ids.is_empty());
        assert!(c.username.is_none());
        assert!(c.primary_restaurant_id.is_none());
    }
}
