//! Transaction lifecycle
//!
//! Every transaction belongs to exactly one user. Only that user may read,
//! update or delete it; the bulk delete-by-broker is the one exception and
//! is gated separately.

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::{Transaction, TransactionInput, TransactionType};
use shared::util::now_millis;
use shared::{AppError, AppResult, ErrorCode};

use super::read_after_write_fault;
use crate::db::{NewTransaction, RepoError, TransactionRepository};
use crate::validation::{MAX_SHORT_TEXT_LEN, validate_id, validate_required_text};

#[derive(Clone)]
pub struct TransactionService {
    transactions: Arc<dyn TransactionRepository>,
}

fn tx_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::TransactionNotFound).with_detail("transaction_id", id)
}

fn out_of_range(field: &str, rule: &str) -> AppError {
    AppError::with_message(ErrorCode::ValueOutOfRange, format!("{field} must be {rule}"))
        .with_detail("field", field)
}

/// Check a create/update payload and turn it into writable fields.
pub fn validate_input(user_id: i64, input: TransactionInput) -> AppResult<NewTransaction> {
    validate_id(input.broker_id, "broker_id")?;

    if input.date <= 0 {
        return Err(AppError::with_message(ErrorCode::RequiredField, "date must be set")
            .with_detail("field", "date"));
    }
    if input.date > now_millis() {
        return Err(AppError::new(ErrorCode::TransactionDateInFuture).with_detail("date", input.date));
    }

    let tx_type = input.tx_type.parse::<TransactionType>().map_err(|e| {
        AppError::new(ErrorCode::TransactionInvalidType).with_detail("type", e.0)
    })?;

    let asset = input.asset.trim();
    validate_required_text(asset, "asset", MAX_SHORT_TEXT_LEN)?;
    let price_unit = input.price_unit.trim();
    validate_required_text(price_unit, "price_unit", MAX_SHORT_TEXT_LEN)?;

    if input.quantity <= Decimal::ZERO {
        return Err(out_of_range("quantity", "greater than zero"));
    }
    if input.price <= Decimal::ZERO {
        return Err(out_of_range("price", "greater than zero"));
    }
    if input.fee < Decimal::ZERO {
        return Err(out_of_range("fee", "zero or more"));
    }

    Ok(NewTransaction {
        user_id,
        broker_id: input.broker_id,
        date: input.date,
        tx_type,
        asset: asset.to_string(),
        quantity: input.quantity,
        price: input.price,
        price_unit: price_unit.to_string(),
        fee: input.fee,
    })
}

impl TransactionService {
    pub fn new(transactions: Arc<dyn TransactionRepository>) -> Self {
        Self { transactions }
    }

    /// Load a row and make sure `user_id` owns it
    async fn owned(&self, user_id: i64, id: i64) -> AppResult<Transaction> {
        let tx = self
            .transactions
            .get(id)
            .await?
            .ok_or_else(|| tx_not_found(id))?;
        if tx.user_id != user_id {
            crate::security_log!(
                "WARN",
                "not_owner",
                user_id = user_id,
                transaction_id = id
            );
            return Err(AppError::new(ErrorCode::NotOwner).with_detail("transaction_id", id));
        }
        Ok(tx)
    }

    pub async fn get(&self, user_id: i64, id: i64) -> AppResult<Transaction> {
        self.owned(user_id, id).await
    }

    pub async fn list(&self, user_id: i64, broker_id: Option<i64>) -> AppResult<Vec<Transaction>> {
        Ok(self.transactions.get_all(user_id, broker_id).await?)
    }

    pub async fn create(&self, user_id: i64, input: TransactionInput) -> AppResult<Transaction> {
        let new_tx = validate_input(user_id, input)?;
        let id = self.transactions.create(&new_tx).await?;

        self.transactions
            .get(id)
            .await?
            .ok_or_else(|| read_after_write_fault("transaction", id))
    }

    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        input: TransactionInput,
    ) -> AppResult<Transaction> {
        let new_tx = validate_input(user_id, input)?;
        let current = self.owned(user_id, id).await?;

        let tx = NewTransaction {
            user_id: current.user_id,
            ..new_tx
        }
        .into_transaction(id);
        self.transactions.update(&tx).await.map_err(|e| match e {
            RepoError::NoRowsAffected(_) => tx_not_found(id),
            other => other.into(),
        })?;

        self.transactions
            .get(id)
            .await?
            .ok_or_else(|| read_after_write_fault("transaction", id))
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> AppResult<()> {
        self.owned(user_id, id).await?;

        self.transactions.delete(id).await.map_err(|e| match e {
            RepoError::NoRowsAffected(_) => tx_not_found(id),
            other => other.into(),
        })
    }

    /// Remove every transaction of every user that references `broker_id`.
    ///
    /// Returns the number of rows removed.
    pub async fn delete_by_broker(&self, broker_id: i64) -> AppResult<u64> {
        Ok(self.transactions.delete_by_broker(broker_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use shared::ErrorKind;
    use std::str::FromStr;

    const ALICE: i64 = 1;
    const BOB: i64 = 2;

    fn service() -> TransactionService {
        TransactionService::new(Arc::new(MemoryStore::new()))
    }

    fn input(broker_id: i64) -> TransactionInput {
        TransactionInput {
            broker_id,
            date: now_millis() - 86_400_000,
            tx_type: "BUY".into(),
            asset: "VWCE".into(),
            quantity: Decimal::from(10),
            price: Decimal::from_str("102.34").unwrap(),
            price_unit: "EUR".into(),
            fee: Decimal::from_str("1.50").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let svc = service();
        let tx = svc.create(ALICE, input(10)).await.unwrap();
        assert_eq!(tx.user_id, ALICE);
        assert_eq!(tx.tx_type, TransactionType::Buy);
        assert_eq!(svc.get(ALICE, tx.id).await.unwrap(), tx);
    }

    #[tokio::test]
    async fn test_validation_rules() {
        let svc = service();

        let mut future = input(10);
        future.date = now_millis() + 3_600_000;
        let err = svc.create(ALICE, future).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TransactionDateInFuture);
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let mut zero_date = input(10);
        zero_date.date = 0;
        assert_eq!(
            svc.create(ALICE, zero_date).await.unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );

        let mut bad_type = input(10);
        bad_type.tx_type = "HOLD".into();
        assert_eq!(
            svc.create(ALICE, bad_type).await.unwrap_err().code,
            ErrorCode::TransactionInvalidType
        );

        let mut zero_qty = input(10);
        zero_qty.quantity = Decimal::ZERO;
        assert_eq!(
            svc.create(ALICE, zero_qty).await.unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );

        let mut neg_price = input(10);
        neg_price.price = Decimal::from(-1);
        assert!(svc.create(ALICE, neg_price).await.is_err());

        let mut neg_fee = input(10);
        neg_fee.fee = Decimal::from(-1);
        assert!(svc.create(ALICE, neg_fee).await.is_err());

        let mut zero_fee = input(10);
        zero_fee.fee = Decimal::ZERO;
        assert!(svc.create(ALICE, zero_fee).await.is_ok());

        assert_eq!(
            svc.create(ALICE, input(0)).await.unwrap_err().code,
            ErrorCode::InvalidId
        );

        assert_eq!(svc.list(ALICE, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_owner_update_leaves_row_unchanged() {
        let svc = service();
        let tx = svc.create(ALICE, input(10)).await.unwrap();

        let mut change = input(10);
        change.tx_type = "SELL".into();
        let err = svc.update(BOB, tx.id, change.clone()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotOwner);
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(svc.get(ALICE, tx.id).await.unwrap(), tx);

        let updated = svc.update(ALICE, tx.id, change).await.unwrap();
        assert_eq!(updated.tx_type, TransactionType::Sell);
        assert_eq!(updated.user_id, ALICE);
    }

    #[tokio::test]
    async fn test_non_owner_delete_and_get() {
        let svc = service();
        let tx = svc.create(ALICE, input(10)).await.unwrap();

        assert_eq!(
            svc.delete(BOB, tx.id).await.unwrap_err().code,
            ErrorCode::NotOwner
        );
        assert_eq!(
            svc.get(BOB, tx.id).await.unwrap_err().code,
            ErrorCode::NotOwner
        );
        assert_eq!(svc.get(ALICE, tx.id).await.unwrap(), tx);

        svc.delete(ALICE, tx.id).await.unwrap();
        assert_eq!(
            svc.get(ALICE, tx.id).await.unwrap_err().code,
            ErrorCode::TransactionNotFound
        );
    }

    #[tokio::test]
    async fn test_update_missing() {
        let svc = service();
        let err = svc.update(ALICE, 999, input(10)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TransactionNotFound);
    }

    #[tokio::test]
    async fn test_list_filters_by_owner_and_broker() {
        let svc = service();
        svc.create(ALICE, input(10)).await.unwrap();
        svc.create(ALICE, input(20)).await.unwrap();
        svc.create(BOB, input(10)).await.unwrap();

        assert_eq!(svc.list(ALICE, None).await.unwrap().len(), 2);
        assert_eq!(svc.list(ALICE, Some(20)).await.unwrap().len(), 1);
        assert_eq!(svc.list(BOB, Some(20)).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_delete_by_broker_spans_users() {
        let svc = service();
        svc.create(ALICE, input(10)).await.unwrap();
        svc.create(BOB, input(10)).await.unwrap();
        let kept = svc.create(BOB, input(20)).await.unwrap();

        assert_eq!(svc.delete_by_broker(10).await.unwrap(), 2);
        assert_eq!(svc.delete_by_broker(10).await.unwrap(), 0);
        assert_eq!(svc.list(BOB, None).await.unwrap(), vec![kept]);
    }
}
