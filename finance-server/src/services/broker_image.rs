//! Broker image lifecycle
//!
//! A broker owns at most one image. Creating an image is a two-step write:
//! insert the image row, then point the broker at it. When the second step
//! fails the new row is deleted again so no unreferenced image is left
//! behind. Deleting an image also clears the broker's reference.

use std::sync::Arc;

use shared::models::{BrokerImage, BrokerImageCreate, BrokerImageUpdate};
use shared::{AppError, AppResult, ErrorCode};

use super::read_after_write_fault;
use crate::db::{
    BROKER_IMAGE_BROKER_KEY, BrokerImageRepository, BrokerRepository, RepoError,
};
use crate::validation::{
    MAX_IMAGE_NAME_LEN, MIN_IMAGE_NAME_LEN, validate_non_empty_bytes, validate_text_range,
};

#[derive(Clone)]
pub struct BrokerImageService {
    brokers: Arc<dyn BrokerRepository>,
    images: Arc<dyn BrokerImageRepository>,
}

fn image_not_found(broker_id: i64, image_id: i64) -> AppError {
    AppError::new(ErrorCode::BrokerImageNotFound)
        .with_detail("broker_id", broker_id)
        .with_detail("image_id", image_id)
}

fn has_image(broker_id: i64) -> AppError {
    AppError::new(ErrorCode::BrokerHasImage).with_detail("broker_id", broker_id)
}

fn validate_fields(name: &str, data: &[u8]) -> AppResult<()> {
    validate_text_range(name, "name", MIN_IMAGE_NAME_LEN, MAX_IMAGE_NAME_LEN)?;
    validate_non_empty_bytes(data, "data")
}

impl BrokerImageService {
    pub fn new(brokers: Arc<dyn BrokerRepository>, images: Arc<dyn BrokerImageRepository>) -> Self {
        Self { brokers, images }
    }

    /// Image `image_id` if it is bound to `broker_id`
    pub async fn get(&self, broker_id: i64, image_id: i64) -> AppResult<BrokerImage> {
        self.images
            .get(image_id)
            .await?
            .filter(|image| image.broker_id == broker_id)
            .ok_or_else(|| image_not_found(broker_id, image_id))
    }

    pub async fn list(&self, broker_id: i64) -> AppResult<Vec<BrokerImage>> {
        Ok(self.images.get_by_broker(broker_id).await?)
    }

    pub async fn create(&self, broker_id: i64, input: BrokerImageCreate) -> AppResult<BrokerImage> {
        let name = input.name.trim();
        validate_fields(name, &input.data)?;

        let already = self.brokers.has_image(broker_id).await.map_err(|e| match e {
            RepoError::NotFound(_) => {
                AppError::new(ErrorCode::BrokerNotFound).with_detail("broker_id", broker_id)
            }
            other => other.into(),
        })?;
        if already {
            return Err(has_image(broker_id));
        }

        let image_id = self
            .images
            .create(broker_id, name, &input.data)
            .await
            .map_err(|e| match e {
                e if e.is_duplicate_of(BROKER_IMAGE_BROKER_KEY) => has_image(broker_id),
                other => other.into(),
            })?;

        let image = self
            .images
            .get(image_id)
            .await?
            .ok_or_else(|| read_after_write_fault("broker image", image_id))?;

        if let Err(bind_err) = self.brokers.set_image(broker_id, image_id).await {
            return Err(self.compensate_unbound(broker_id, image_id, bind_err).await);
        }

        Ok(image)
    }

    /// Undo the image insert after the broker reference could not be set
    async fn compensate_unbound(
        &self,
        broker_id: i64,
        image_id: i64,
        bind_err: RepoError,
    ) -> AppError {
        match self.images.delete(image_id).await {
            Ok(()) => {
                tracing::error!(
                    target: "invariant",
                    broker_id,
                    image_id,
                    error = %bind_err,
                    "Binding image to broker failed; image row removed"
                );
                AppError::internal("Failed to attach image to broker")
                    .with_detail("broker_id", broker_id)
            }
            Err(cleanup_err) => {
                tracing::error!(
                    target: "invariant",
                    broker_id,
                    image_id,
                    error = %bind_err,
                    cleanup_error = %cleanup_err,
                    "Binding image to broker failed and the image row could not be removed"
                );
                AppError::internal("Failed to attach image to broker")
                    .with_detail("broker_id", broker_id)
                    .with_detail("orphan_image_id", image_id)
            }
        }
    }

    pub async fn update(
        &self,
        broker_id: i64,
        image_id: i64,
        input: BrokerImageUpdate,
    ) -> AppResult<BrokerImage> {
        let name = input.name.trim();
        validate_fields(name, &input.data)?;

        if !self.images.exists(broker_id, image_id).await? {
            return Err(image_not_found(broker_id, image_id));
        }

        let image = BrokerImage {
            id: image_id,
            broker_id,
            name: name.to_string(),
            data: input.data,
        };
        self.images.update(&image).await.map_err(|e| match e {
            RepoError::NoRowsAffected(_) => image_not_found(broker_id, image_id),
            other => other.into(),
        })?;

        self.images
            .get(image_id)
            .await?
            .ok_or_else(|| read_after_write_fault("broker image", image_id))
    }

    /// Delete the image row, then clear the broker's reference to it.
    ///
    /// A broker that no longer exists has nothing to clear.
    pub async fn delete(&self, broker_id: i64, image_id: i64) -> AppResult<()> {
        if !self.images.exists(broker_id, image_id).await? {
            return Err(image_not_found(broker_id, image_id));
        }

        self.images.delete(image_id).await.map_err(|e| match e {
            RepoError::NoRowsAffected(_) => image_not_found(broker_id, image_id),
            other => other.into(),
        })?;

        match self.brokers.clear_image(broker_id).await {
            Ok(()) => Ok(()),
            Err(RepoError::NoRowsAffected(_)) | Err(RepoError::NotFound(_)) => {
                tracing::warn!(broker_id, image_id, "Deleted image of a missing broker");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    target: "invariant",
                    broker_id,
                    image_id,
                    error = %e,
                    "Image deleted but broker reference not cleared"
                );
                Err(AppError::internal("Failed to clear broker image reference")
                    .with_detail("broker_id", broker_id))
            }
        }
    }
}
