//! Broker Model

use serde::{Deserialize, Serialize};

/// Broker entity
///
/// `image_id` is set iff a broker image currently references this broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Broker {
    pub id: i64,
    pub name: String,
    pub image_id: Option<i64>,
    pub disabled: bool,
}

impl Broker {
    pub fn has_image(&self) -> bool {
        self.image_id.is_some()
    }
}

/// Create broker payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerCreate {
    pub name: String,
}

/// Update broker payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrokerUpdate {
    pub name: Option<String>,
    pub disabled: Option<bool>,
}
