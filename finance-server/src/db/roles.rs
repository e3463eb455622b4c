//! Role resolution from the role tables

use std::collections::BTreeMap;

use async_trait::async_trait;
use shared::models::{Permission, PermissionScope, Role, RoleWithPermissions};
use sqlx::PgPool;

use super::{RepoError, RepoResult};
use crate::auth::{CurrentUser, ResolveError, RoleResolver};

#[derive(sqlx::FromRow)]
struct RolePermissionRow {
    role_id: i64,
    role_name: String,
    permission_id: Option<i64>,
    value: Option<String>,
    scope: Option<String>,
    description: Option<String>,
}

/// Resolves roles through `user_roles` → `roles` → `role_permissions`
#[derive(Clone)]
pub struct PgRoleResolver {
    pool: PgPool,
}

impl PgRoleResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Assign a role by name; a no-op when it is already assigned
    pub async fn grant_role(&self, user_id: i64, role_name: &str) -> RepoResult<()> {
        let role_id: Option<i64> = sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
            .bind(role_name)
            .fetch_optional(&self.pool)
            .await?;
        let role_id = role_id.ok_or_else(|| RepoError::NotFound(format!("role {role_name}")))?;

        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RoleResolver for PgRoleResolver {
    async fn resolve(&self, user: &CurrentUser) -> Result<Vec<RoleWithPermissions>, ResolveError> {
        let rows = sqlx::query_as::<_, RolePermissionRow>(
            r#"
            SELECT r.id AS role_id, r.name AS role_name,
                   p.id AS permission_id, p.value, p.scope, p.description
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            LEFT JOIN role_permissions rp ON rp.role_id = r.id
            LEFT JOIN permissions p ON p.id = rp.permission_id
            WHERE ur.user_id = $1
            ORDER BY r.id, rp.position
            "#,
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ResolveError::Lookup(e.to_string()))?;

        group_rows(rows)
    }
}

fn group_rows(rows: Vec<RolePermissionRow>) -> Result<Vec<RoleWithPermissions>, ResolveError> {
    let mut roles: BTreeMap<i64, RoleWithPermissions> = BTreeMap::new();

    for row in rows {
        if !roles.contains_key(&row.role_id) {
            let role = Role {
                id: row.role_id,
                name: row.role_name,
            };
            role.validate().map_err(ResolveError::Invalid)?;
            roles.insert(row.role_id, RoleWithPermissions::new(role, Vec::new()));
        }

        let (Some(id), Some(value), Some(scope)) = (row.permission_id, row.value, row.scope) else {
            continue;
        };
        let scope = scope
            .parse::<PermissionScope>()
            .map_err(|e| ResolveError::Invalid(e.to_string()))?;
        let permission = Permission {
            id,
            value,
            scope,
            description: row.description,
        };
        permission.validate().map_err(ResolveError::Invalid)?;

        if let Some(entry) = roles.get_mut(&row.role_id) {
            entry.permissions.push(permission);
        }
    }

    Ok(roles.into_values().collect())
}
