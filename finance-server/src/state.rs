//! Shared application state

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use crate::auth::{JwtConfig, JwtService, PermissionGate};
use crate::config::Config;
use crate::db::{MemoryStore, PgRoleResolver, Repositories};
use crate::services::{BrokerImageService, BrokerService, BrokerUserService, TransactionService};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Role granted to `ADMIN_USER_ID` at startup
const ADMIN_ROLE: &str = "admin";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtService>,
    pub gate: PermissionGate,
    pub brokers: BrokerService,
    pub broker_images: BrokerImageService,
    pub broker_users: BrokerUserService,
    pub transactions: TransactionService,
}

impl AppState {
    /// Connect storage and wire every service
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let repos = match config.database_url.as_deref() {
            Some(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.database_max_connections)
                    .connect(url)
                    .await?;
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("Connected to PostgreSQL, migrations applied");

                if let Some(user_id) = config.admin_user_id {
                    PgRoleResolver::new(pool.clone())
                        .grant_role(user_id, ADMIN_ROLE)
                        .await?;
                    tracing::info!(user_id, "Granted admin role");
                }
                Repositories::postgres(pool)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-process store (data is not persisted)");
                let store = Arc::new(MemoryStore::new());
                if let Some(user_id) = config.admin_user_id {
                    store.grant_builtin_role(user_id, ADMIN_ROLE);
                    tracing::info!(user_id, "Granted admin role");
                }
                Repositories::memory(store)
            }
        };

        Ok(Self::from_repositories(JwtService::with_config(JwtConfig::from(config)), repos))
    }

    /// Wire services over an explicit set of adapters
    pub fn from_repositories(jwt: JwtService, repos: Repositories) -> Self {
        Self {
            jwt: Arc::new(jwt),
            gate: PermissionGate::new(repos.roles),
            brokers: BrokerService::new(repos.brokers.clone()),
            broker_images: BrokerImageService::new(repos.brokers.clone(), repos.broker_images),
            broker_users: BrokerUserService::new(repos.brokers, repos.broker_users),
            transactions: TransactionService::new(repos.transactions),
        }
    }
}
