//! Transaction Repository

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::{Transaction, TransactionType};
use shared::util::snowflake_id;
use sqlx::PgPool;

use super::{RepoResult, expect_one_row};

/// Validated transaction fields, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub user_id: i64,
    pub broker_id: i64,
    pub date: i64,
    pub tx_type: TransactionType,
    pub asset: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub price_unit: String,
    pub fee: Decimal,
}

impl NewTransaction {
    pub fn into_transaction(self, id: i64) -> Transaction {
        Transaction {
            id,
            user_id: self.user_id,
            broker_id: self.broker_id,
            date: self.date,
            tx_type: self.tx_type,
            asset: self.asset,
            quantity: self.quantity,
            price: self.price,
            price_unit: self.price_unit,
            fee: self.fee,
        }
    }
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn create(&self, tx: &NewTransaction) -> RepoResult<i64>;
    async fn get(&self, id: i64) -> RepoResult<Option<Transaction>>;
    /// Transactions of one user, newest first, optionally for one broker
    async fn get_all(&self, user_id: i64, broker_id: Option<i64>) -> RepoResult<Vec<Transaction>>;
    async fn update(&self, tx: &Transaction) -> RepoResult<()>;
    async fn delete(&self, id: i64) -> RepoResult<()>;
    /// Remove every transaction referencing a broker, across all users
    async fn delete_by_broker(&self, broker_id: i64) -> RepoResult<u64>;
}

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, broker_id, date, tx_type, asset, quantity, price, price_unit, fee FROM transactions";

#[derive(Clone)]
pub struct PgTransactionRepository {
    pool: PgPool,
}

impl PgTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PgTransactionRepository {
    async fn create(&self, tx: &NewTransaction) -> RepoResult<i64> {
        let id = snowflake_id();
        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, user_id, broker_id, date, tx_type, asset, quantity, price, price_unit, fee)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(id)
        .bind(tx.user_id)
        .bind(tx.broker_id)
        .bind(tx.date)
        .bind(tx.tx_type.as_str())
        .bind(&tx.asset)
        .bind(tx.quantity)
        .bind(tx.price)
        .bind(&tx.price_unit)
        .bind(tx.fee)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Transaction>> {
        let tx = sqlx::query_as::<_, Transaction>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tx)
    }

    async fn get_all(&self, user_id: i64, broker_id: Option<i64>) -> RepoResult<Vec<Transaction>> {
        let txs = sqlx::query_as::<_, Transaction>(&format!(
            "{SELECT_COLUMNS} WHERE user_id = $1 AND ($2::BIGINT IS NULL OR broker_id = $2) ORDER BY date DESC, id DESC"
        ))
        .bind(user_id)
        .bind(broker_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(txs)
    }

    async fn update(&self, tx: &Transaction) -> RepoResult<()> {
        let rows = sqlx::query(
            r#"
            UPDATE transactions
            SET broker_id = $2, date = $3, tx_type = $4, asset = $5,
                quantity = $6, price = $7, price_unit = $8, fee = $9
            WHERE id = $1
            "#,
        )
        .bind(tx.id)
        .bind(tx.broker_id)
        .bind(tx.date)
        .bind(tx.tx_type.as_str())
        .bind(&tx.asset)
        .bind(tx.quantity)
        .bind(tx.price)
        .bind(&tx.price_unit)
        .bind(tx.fee)
        .execute(&self.pool)
        .await?
        .rows_affected();
        expect_one_row(rows, || format!("transaction {}", tx.id))
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let rows = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        expect_one_row(rows, || format!("transaction {id}"))
    }

    async fn delete_by_broker(&self, broker_id: i64) -> RepoResult<u64> {
        let rows = sqlx::query("DELETE FROM transactions WHERE broker_id = $1")
            .bind(broker_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows)
    }
}
