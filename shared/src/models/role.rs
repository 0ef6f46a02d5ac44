//! Role Model (station an employee is qualified to work)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version of the role enumeration.
///
/// Bump when a variant is added or removed so stored role sets can be
/// migrated.
pub const ROLE_SET_VERSION: u32 = 1;

/// Shift role / employee qualification
///
/// Stored and serialized as lowercase text (`"door"`, `"gelato"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Door,
    Gelato,
    Server,
    /// Generic fallback for stations outside the canonical set
    General,
}

impl Role {
    /// All roles, in display order
    pub const ALL: [Role; 4] = [Role::Door, Role::Gelato, Role::Server, Role::General];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Door => "door",
            Role::Gelato => "gelato",
            Role::Server => "server",
            Role::General => "general",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Role::Door => "Door",
            Role::Gelato => "Gelato",
            Role::Server => "Server",
            Role::General => "General",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "door" => Ok(Role::Door),
            "gelato" => Ok(Role::Gelato),
            "server" => Ok(Role::Server),
            "general" => Ok(Role::General),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Door".parse::<Role>(), Ok(Role::Door));
        assert_eq!(" gelato ".parse::<Role>(), Ok(Role::Gelato));
        assert_eq!("SERVER".parse::<Role>(), Ok(Role::Server));
        assert!("chef".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Gelato).unwrap(), "\"gelato\"");
        let roles: Vec<Role> = serde_json::from_str(r#"["door","server"]"#).unwrap();
        assert_eq!(roles, vec![Role::Door, Role::Server]);
    }

    #[test]
    fn test_display_matches_as_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string(), role.as_str());
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }
}
