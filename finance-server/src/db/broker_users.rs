//! Broker User (link) Repository

use async_trait::async_trait;
use shared::models::{Broker, BrokerUser};
use sqlx::PgPool;

use super::{RepoResult, expect_one_row};

#[async_trait]
pub trait BrokerUserRepository: Send + Sync {
    /// `Duplicate` when the link already exists
    async fn create(&self, user_id: i64, broker_id: i64) -> RepoResult<()>;
    async fn exists(&self, user_id: i64, broker_id: i64) -> RepoResult<bool>;
    async fn delete(&self, user_id: i64, broker_id: i64) -> RepoResult<()>;
    /// Every link of a user, joined with the current broker row
    async fn get_all(&self, user_id: i64) -> RepoResult<Vec<BrokerUser>>;
}

#[derive(Clone)]
pub struct PgBrokerUserRepository {
    pool: PgPool,
}

impl PgBrokerUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BrokerUserRepository for PgBrokerUserRepository {
    async fn create(&self, user_id: i64, broker_id: i64) -> RepoResult<()> {
        sqlx::query("INSERT INTO broker_users (user_id, broker_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(broker_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn exists(&self, user_id: i64, broker_id: i64) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM broker_users WHERE user_id = $1 AND broker_id = $2)",
        )
        .bind(user_id)
        .bind(broker_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn delete(&self, user_id: i64, broker_id: i64) -> RepoResult<()> {
        let rows = sqlx::query("DELETE FROM broker_users WHERE user_id = $1 AND broker_id = $2")
            .bind(user_id)
            .bind(broker_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        expect_one_row(rows, || format!("link user {user_id} broker {broker_id}"))
    }

    async fn get_all(&self, user_id: i64) -> RepoResult<Vec<BrokerUser>> {
        let brokers = sqlx::query_as::<_, Broker>(
            r#"
            SELECT b.id, b.name, b.image_id, b.disabled
            FROM broker_users bu
            JOIN brokers b ON b.id = bu.broker_id
            WHERE bu.user_id = $1
            ORDER BY b.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(brokers
            .into_iter()
            .map(|broker| BrokerUser { user_id, broker })
            .collect())
    }
}
