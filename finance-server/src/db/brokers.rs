//! Broker Repository

use async_trait::async_trait;
use shared::models::Broker;
use shared::util::snowflake_id;
use sqlx::PgPool;

use super::{RepoError, RepoResult, expect_one_row};

#[async_trait]
pub trait BrokerRepository: Send + Sync {
    /// Insert an enabled broker without image; returns the new id
    async fn create(&self, name: &str) -> RepoResult<i64>;
    async fn get(&self, id: i64) -> RepoResult<Option<Broker>>;
    async fn get_all(&self) -> RepoResult<Vec<Broker>>;
    /// Write `name` and `disabled`; the image reference is left alone
    async fn update(&self, broker: &Broker) -> RepoResult<()>;
    async fn delete(&self, id: i64) -> RepoResult<()>;
    async fn exists(&self, id: i64) -> RepoResult<bool>;
    async fn exists_by_name(&self, name: &str) -> RepoResult<bool>;
    /// `NotFound` when the broker itself does not exist
    async fn has_image(&self, id: i64) -> RepoResult<bool>;
    async fn set_image(&self, id: i64, image_id: i64) -> RepoResult<()>;
    async fn clear_image(&self, id: i64) -> RepoResult<()>;
}

#[derive(Clone)]
pub struct PgBrokerRepository {
    pool: PgPool,
}

impl PgBrokerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BrokerRepository for PgBrokerRepository {
    async fn create(&self, name: &str) -> RepoResult<i64> {
        let id = snowflake_id();
        sqlx::query("INSERT INTO brokers (id, name, image_id, disabled) VALUES ($1, $2, NULL, FALSE)")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Broker>> {
        let broker = sqlx::query_as::<_, Broker>(
            "SELECT id, name, image_id, disabled FROM brokers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(broker)
    }

    async fn get_all(&self) -> RepoResult<Vec<Broker>> {
        let brokers = sqlx::query_as::<_, Broker>(
            "SELECT id, name, image_id, disabled FROM brokers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(brokers)
    }

    async fn update(&self, broker: &Broker) -> RepoResult<()> {
        let rows = sqlx::query("UPDATE brokers SET name = $2, disabled = $3 WHERE id = $1")
            .bind(broker.id)
            .bind(&broker.name)
            .bind(broker.disabled)
            .execute(&self.pool)
            .await?
            .rows_affected();
        expect_one_row(rows, || format!("broker {}", broker.id))
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let rows = sqlx::query("DELETE FROM brokers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        expect_one_row(rows, || format!("broker {id}"))
    }

    async fn exists(&self, id: i64) -> RepoResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM brokers WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn exists_by_name(&self, name: &str) -> RepoResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM brokers WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn has_image(&self, id: i64) -> RepoResult<bool> {
        let image_id: Option<Option<i64>> =
            sqlx::query_scalar("SELECT image_id FROM brokers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        match image_id {
            Some(image_id) => Ok(image_id.is_some()),
            None => Err(RepoError::NotFound(format!("broker {id}"))),
        }
    }

    async fn set_image(&self, id: i64, image_id: i64) -> RepoResult<()> {
        let rows = sqlx::query("UPDATE brokers SET image_id = $2 WHERE id = $1")
            .bind(id)
            .bind(image_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        expect_one_row(rows, || format!("broker {id}"))
    }

    async fn clear_image(&self, id: i64) -> RepoResult<()> {
        let rows = sqlx::query("UPDATE brokers SET image_id = NULL WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        expect_one_row(rows, || format!("broker {id}"))
    }
}
