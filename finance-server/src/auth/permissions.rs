//! Well-known action strings checked by the permission gate
//!
//! Held permissions may cover several of these through a trailing `*`
//! (`broker.*` covers every broker and broker image action).

pub const BROKER_CREATE: &str = "broker.create";
pub const BROKER_UPDATE: &str = "broker.update";
pub const BROKER_DELETE: &str = "broker.delete";

pub const BROKER_IMAGE_CREATE: &str = "broker.image.create";
pub const BROKER_IMAGE_UPDATE: &str = "broker.image.update";
pub const BROKER_IMAGE_DELETE: &str = "broker.image.delete";

pub const TRANSACTION_DELETE_BY_BROKER: &str = "transaction.delete_by_broker";
