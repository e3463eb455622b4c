//! Entity invariant protocols
//!
//! Each service runs one entity's mutating operations as an ordered
//! sequence of storage calls: read current state, check preconditions,
//! write, then re-read for the authoritative result. No step is atomic with
//! the next and no step is retried; the first failure ends the operation.

pub mod broker;
pub mod broker_image;
pub mod broker_user;
pub mod transaction;

pub use broker::BrokerService;
pub use broker_image::BrokerImageService;
pub use broker_user::BrokerUserService;
pub use transaction::TransactionService;

use shared::AppError;

/// A write reported success but the row cannot be read back.
///
/// Indicates a store inconsistency rather than a caller mistake.
pub(crate) fn read_after_write_fault(entity: &'static str, id: i64) -> AppError {
    tracing::error!(
        target: "invariant",
        entity,
        id,
        "Row missing on read-after-write"
    );
    AppError::internal(format!("{entity} {id} missing after write"))
        .with_detail("entity", entity)
        .with_detail("id", id)
}
