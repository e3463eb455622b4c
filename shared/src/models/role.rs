//! Role Model

use serde::{Deserialize, Serialize};

use super::permission::Permission;

/// Minimum role name length
pub const MIN_ROLE_NAME_LEN: usize = 3;

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Role {
    pub id: i64,
    pub name: String,
}

impl Role {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.chars().count() < MIN_ROLE_NAME_LEN {
            return Err(format!(
                "role name must be at least {MIN_ROLE_NAME_LEN} characters"
            ));
        }
        Ok(())
    }
}

/// Role with its attached, ordered permissions
///
/// A caller's effective permission set is the plain union of the
/// permissions of every role assigned to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

impl RoleWithPermissions {
    pub fn new(role: Role, permissions: Vec<Permission>) -> Self {
        Self { role, permissions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PermissionScope;

    #[test]
    fn test_role_name_length() {
        let ok = Role {
            id: 1,
            name: "ops".into(),
        };
        assert!(ok.validate().is_ok());

        let short = Role {
            id: 2,
            name: "ab".into(),
        };
        assert!(short.validate().is_err());
    }

    #[test]
    fn test_role_with_permissions_flattens() {
        let role = RoleWithPermissions::new(
            Role {
                id: 1,
                name: "admin".into(),
            },
            vec![Permission::new(10, "*", PermissionScope::Admin)],
        );
        let json = serde_json::to_value(&role).unwrap();
        assert_eq!(json["name"], "admin");
        assert_eq!(json["permissions"][0]["value"], "*");
    }
}
