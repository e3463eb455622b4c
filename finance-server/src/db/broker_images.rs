//! Broker Image Repository

use async_trait::async_trait;
use shared::models::BrokerImage;
use shared::util::snowflake_id;
use sqlx::PgPool;

use super::{RepoResult, expect_one_row};

#[async_trait]
pub trait BrokerImageRepository: Send + Sync {
    /// `Duplicate` when the broker already owns an image row
    async fn create(&self, broker_id: i64, name: &str, data: &[u8]) -> RepoResult<i64>;
    async fn get(&self, id: i64) -> RepoResult<Option<BrokerImage>>;
    async fn get_by_broker(&self, broker_id: i64) -> RepoResult<Vec<BrokerImage>>;
    /// Replace name and data of the row bound to `(broker_id, id)`
    async fn update(&self, image: &BrokerImage) -> RepoResult<()>;
    async fn delete(&self, id: i64) -> RepoResult<()>;
    /// Is `id` an image row bound to `broker_id`?
    async fn exists(&self, broker_id: i64, id: i64) -> RepoResult<bool>;
}

#[derive(Clone)]
pub struct PgBrokerImageRepository {
    pool: PgPool,
}

impl PgBrokerImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BrokerImageRepository for PgBrokerImageRepository {
    async fn create(&self, broker_id: i64, name: &str, data: &[u8]) -> RepoResult<i64> {
        let id = snowflake_id();
        sqlx::query("INSERT INTO broker_images (id, broker_id, name, data) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(broker_id)
            .bind(name)
            .bind(data)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<BrokerImage>> {
        let image = sqlx::query_as::<_, BrokerImage>(
            "SELECT id, broker_id, name, data FROM broker_images WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(image)
    }

    async fn get_by_broker(&self, broker_id: i64) -> RepoResult<Vec<BrokerImage>> {
        let images = sqlx::query_as::<_, BrokerImage>(
            "SELECT id, broker_id, name, data FROM broker_images WHERE broker_id = $1 ORDER BY id",
        )
        .bind(broker_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(images)
    }

    async fn update(&self, image: &BrokerImage) -> RepoResult<()> {
        let rows = sqlx::query(
            "UPDATE broker_images SET name = $3, data = $4 WHERE id = $1 AND broker_id = $2",
        )
        .bind(image.id)
        .bind(image.broker_id)
        .bind(&image.name)
        .bind(&image.data)
        .execute(&self.pool)
        .await?
        .rows_affected();
        expect_one_row(rows, || format!("broker image {}", image.id))
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let rows = sqlx::query("DELETE FROM broker_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        expect_one_row(rows, || format!("broker image {id}"))
    }

    async fn exists(&self, broker_id: i64, id: i64) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM broker_images WHERE id = $1 AND broker_id = $2)",
        )
        .bind(id)
        .bind(broker_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
