//! Storage adapters
//!
//! One trait per entity with a PostgreSQL implementation (sqlx) and an
//! in-process implementation ([`memory::MemoryStore`]). Services only see
//! the traits.

pub mod broker_images;
pub mod broker_users;
pub mod brokers;
pub mod memory;
pub mod roles;
pub mod transactions;

use std::sync::Arc;

use shared::{AppError, ErrorCode};
use sqlx::PgPool;
use thiserror::Error;

pub use broker_images::{BrokerImageRepository, PgBrokerImageRepository};
pub use broker_users::{BrokerUserRepository, PgBrokerUserRepository};
pub use brokers::{BrokerRepository, PgBrokerRepository};
pub use memory::MemoryStore;
pub use roles::PgRoleResolver;
pub use transactions::{NewTransaction, PgTransactionRepository, TransactionRepository};

use crate::auth::RoleResolver;

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

// Uniqueness constraints that carry a domain meaning. Any other duplicate
// (an id collision) is an internal fault.
pub const BROKER_NAME_KEY: &str = "brokers_name_key";
pub const BROKER_IMAGE_BROKER_KEY: &str = "broker_images_broker_id_key";
pub const BROKER_USER_KEY: &str = "broker_users_pkey";

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected the write; carries the constraint name
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// `Update`/`Delete` matched no row
    #[error("No rows affected: {0}")]
    NoRowsAffected(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl RepoError {
    /// True when a write was rejected by the named uniqueness constraint
    pub fn is_duplicate_of(&self, constraint: &str) -> bool {
        matches!(self, RepoError::Duplicate(name) if name == constraint)
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error()
            && db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
        {
            return RepoError::Duplicate(
                db_err
                    .constraint()
                    .map(str::to_string)
                    .unwrap_or_else(|| db_err.message().to_string()),
            );
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) | RepoError::NoRowsAffected(msg) => {
                AppError::with_message(ErrorCode::NotFound, msg)
            }
            RepoError::Duplicate(constraint) => {
                tracing::error!(
                    target: "invariant",
                    constraint = %constraint,
                    "Unexpected uniqueness violation"
                );
                AppError::internal(format!("Unexpected duplicate on {constraint}"))
                    .with_detail("constraint", constraint)
            }
            RepoError::Database(msg) => {
                tracing::error!(target: "invariant", error = %msg, "Storage call failed");
                AppError::database(msg)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Map `rows_affected` to the "no rows affected" condition
pub(crate) fn expect_one_row(rows: u64, what: impl FnOnce() -> String) -> RepoResult<()> {
    if rows == 0 {
        return Err(RepoError::NoRowsAffected(what()));
    }
    Ok(())
}

/// The full set of adapters a running server needs
#[derive(Clone)]
pub struct Repositories {
    pub brokers: Arc<dyn BrokerRepository>,
    pub broker_images: Arc<dyn BrokerImageRepository>,
    pub broker_users: Arc<dyn BrokerUserRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub roles: Arc<dyn RoleResolver>,
}

impl Repositories {
    /// PostgreSQL-backed adapters sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            brokers: Arc::new(PgBrokerRepository::new(pool.clone())),
            broker_images: Arc::new(PgBrokerImageRepository::new(pool.clone())),
            broker_users: Arc::new(PgBrokerUserRepository::new(pool.clone())),
            transactions: Arc::new(PgTransactionRepository::new(pool.clone())),
            roles: Arc::new(PgRoleResolver::new(pool)),
        }
    }

    /// Every adapter served by one in-process store
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            brokers: store.clone(),
            broker_images: store.clone(),
            broker_users: store.clone(),
            transactions: store.clone(),
            roles: store,
        }
    }
}
