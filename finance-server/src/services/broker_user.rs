//! User–broker linking
//!
//! A link can only be created against an existing, enabled broker. Links
//! outlive a later disablement of the broker.

use std::sync::Arc;

use shared::models::BrokerUser;
use shared::{AppError, AppResult, ErrorCode};

use crate::db::{BROKER_USER_KEY, BrokerRepository, BrokerUserRepository, RepoError};

#[derive(Clone)]
pub struct BrokerUserService {
    brokers: Arc<dyn BrokerRepository>,
    links: Arc<dyn BrokerUserRepository>,
}

fn link_exists(user_id: i64, broker_id: i64) -> AppError {
    AppError::new(ErrorCode::BrokerUserExists)
        .with_detail("user_id", user_id)
        .with_detail("broker_id", broker_id)
}

fn link_not_found(user_id: i64, broker_id: i64) -> AppError {
    AppError::new(ErrorCode::BrokerUserNotFound)
        .with_detail("user_id", user_id)
        .with_detail("broker_id", broker_id)
}

impl BrokerUserService {
    pub fn new(brokers: Arc<dyn BrokerRepository>, links: Arc<dyn BrokerUserRepository>) -> Self {
        Self { brokers, links }
    }

    pub async fn list(&self, user_id: i64) -> AppResult<Vec<BrokerUser>> {
        Ok(self.links.get_all(user_id).await?)
    }

    /// Link `broker_id` to `user_id`; the result is taken from a fresh
    /// listing of the user's links.
    pub async fn create(&self, user_id: i64, broker_id: i64) -> AppResult<BrokerUser> {
        let broker = self.brokers.get(broker_id).await?.ok_or_else(|| {
            AppError::new(ErrorCode::BrokerNotFound).with_detail("broker_id", broker_id)
        })?;
        if broker.disabled {
            return Err(AppError::new(ErrorCode::BrokerDisabled).with_detail("broker_id", broker_id));
        }

        if self.links.exists(user_id, broker_id).await? {
            return Err(link_exists(user_id, broker_id));
        }

        self.links
            .create(user_id, broker_id)
            .await
            .map_err(|e| match e {
                e if e.is_duplicate_of(BROKER_USER_KEY) => link_exists(user_id, broker_id),
                other => other.into(),
            })?;

        self.links
            .get_all(user_id)
            .await?
            .into_iter()
            .find(|link| link.broker.id == broker_id)
            .ok_or_else(|| {
                tracing::error!(
                    target: "invariant",
                    user_id,
                    broker_id,
                    "Link missing from listing after create"
                );
                AppError::internal("Link missing after create")
                    .with_detail("user_id", user_id)
                    .with_detail("broker_id", broker_id)
            })
    }

    pub async fn delete(&self, user_id: i64, broker_id: i64) -> AppResult<()> {
        if !self.links.exists(user_id, broker_id).await? {
            return Err(link_not_found(user_id, broker_id));
        }

        self.links
            .delete(user_id, broker_id)
            .await
            .map_err(|e| match e {
                RepoError::NoRowsAffected(_) => link_not_found(user_id, broker_id),
                other => other.into(),
            })
    }
}
