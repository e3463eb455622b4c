//! Permission Model

use serde::{Deserialize, Serialize};

/// Coarse class of protected actions a permission applies to (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionScope {
    Admin,
    All,
}

impl PermissionScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionScope::Admin => "admin",
            PermissionScope::All => "all",
        }
    }
}

impl std::fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scope string outside the known set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission scope '{0}'")]
pub struct UnknownScope(pub String);

impl std::str::FromStr for PermissionScope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(PermissionScope::Admin),
            "all" => Ok(PermissionScope::All),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}

impl TryFrom<String> for PermissionScope {
    type Error = UnknownScope;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Permission entity
///
/// `value` is a dotted action string, optionally ending in `*`
/// (e.g. `"broker.*"`), or the bare `"*"` which covers every action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Permission {
    pub id: i64,
    pub value: String,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub scope: PermissionScope,
    pub description: Option<String>,
}

impl Permission {
    pub fn new(id: i64, value: impl Into<String>, scope: PermissionScope) -> Self {
        Self {
            id,
            value: value.into(),
            scope,
            description: None,
        }
    }

    /// Check the issuance invariants: non-empty value.
    ///
    /// The scope is already constrained by its type.
    pub fn validate(&self) -> Result<(), String> {
        if self.value.trim().is_empty() {
            return Err("permission value must not be empty".into());
        }
        Ok(())
    }
}
