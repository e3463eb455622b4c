//! Transaction Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction type string other than BUY / SELL
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction type '{0}'")]
pub struct UnknownTransactionType(pub String);

impl std::str::FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(TransactionType::Buy),
            "SELL" => Ok(TransactionType::Sell),
            other => Err(UnknownTransactionType(other.to_string())),
        }
    }
}

impl TryFrom<String> for TransactionType {
    type Error = UnknownTransactionType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Transaction entity, owned exclusively by `user_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub broker_id: i64,
    /// Trade date (Unix millis)
    pub date: i64,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub tx_type: TransactionType,
    pub asset: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub price_unit: String,
    pub fee: Decimal,
}

/// Create / update transaction payload
///
/// `type` is kept as a raw string so that an unknown value is reported as a
/// field validation failure rather than a body decoding error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    pub broker_id: i64,
    pub date: i64,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub asset: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub price_unit: String,
    #[serde(default)]
    pub fee: Decimal,
}
