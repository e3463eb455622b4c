//! Role aggregation
//!
//! A caller's effective permission set is the plain union of the
//! permissions across all of its roles.

use shared::models::RoleWithPermissions;

use super::matcher;

/// True when any permission of any role covers `requested`.
pub fn has_permission(roles: &[RoleWithPermissions], requested: &str) -> bool {
    roles
        .iter()
        .flat_map(|r| r.permissions.iter())
        .any(|p| matcher::matches(p, requested))
}

/// Distinct permission values across `roles`, in first-seen order.
pub fn effective_permissions(roles: &[RoleWithPermissions]) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for p in roles.iter().flat_map(|r| r.permissions.iter()) {
        if !values.contains(&p.value) {
            values.push(p.value.clone());
        }
    }
    values
}
