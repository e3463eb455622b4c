//! Authorization gate
//!
//! Invoked before every privileged mutation. Roles are resolved per request
//! and the gate fails closed: a resolution error is a denial.

use std::sync::Arc;

use async_trait::async_trait;
use shared::models::RoleWithPermissions;
use shared::{AppError, AppResult, ErrorCode};
use thiserror::Error;

use super::jwt::CurrentUser;
use super::roles;
use crate::security_log;

/// Role resolution failure
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("role lookup failed: {0}")]
    Lookup(String),

    #[error("role data is invalid: {0}")]
    Invalid(String),
}

/// Identity collaborator: returns the caller's roles with their permissions
#[async_trait]
pub trait RoleResolver: Send + Sync {
    async fn resolve(&self, user: &CurrentUser) -> Result<Vec<RoleWithPermissions>, ResolveError>;
}

/// Pre-check for privileged handlers
#[derive(Clone)]
pub struct PermissionGate {
    resolver: Arc<dyn RoleResolver>,
}

impl PermissionGate {
    pub fn new(resolver: Arc<dyn RoleResolver>) -> Self {
        Self { resolver }
    }

    /// Allow `action` for `user` or return a permission-denied error.
    ///
    /// Never retried: an authorization failure is terminal for the request.
    pub async fn check_permission(&self, user: &CurrentUser, action: &str) -> AppResult<()> {
        let roles = match self.resolver.resolve(user).await {
            Ok(roles) => roles,
            Err(e) => {
                security_log!(
                    "WARN",
                    "role_resolution_failed",
                    user_id = user.id,
                    required_permission = action,
                    error = e.to_string()
                );
                return Err(AppError::with_message(
                    ErrorCode::RoleResolutionFailed,
                    format!("Permission denied: {action}"),
                ));
            }
        };

        if !roles::has_permission(&roles, action) {
            security_log!(
                "WARN",
                "permission_denied",
                user_id = user.id,
                username = user.username.clone(),
                required_permission = action,
                held_permissions = roles::effective_permissions(&roles).join(",")
            );
            return Err(AppError::forbidden(format!("Permission denied: {action}"))
                .with_detail("permission", action));
        }

        Ok(())
    }
}
