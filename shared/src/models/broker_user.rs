//! Broker User (link) Model

use serde::{Deserialize, Serialize};

use super::broker::Broker;

/// Association between a user and a broker
///
/// Links survive later disablement of the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerUser {
    pub user_id: i64,
    pub broker: Broker,
}
