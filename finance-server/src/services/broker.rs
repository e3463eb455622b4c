//! Broker lifecycle
//!
//! Name uniqueness is checked before every write and backed by the store's
//! unique constraint, so a create racing another create with the same name
//! still ends in `BrokerNameExists` instead of a second row.

use std::sync::Arc;

use shared::models::{Broker, BrokerCreate, BrokerUpdate};
use shared::{AppError, AppResult, ErrorCode};

use super::read_after_write_fault;
use crate::db::{BROKER_NAME_KEY, BrokerRepository, RepoError};
use crate::validation::{MAX_NAME_LEN, validate_required_text};

#[derive(Clone)]
pub struct BrokerService {
    brokers: Arc<dyn BrokerRepository>,
}

fn broker_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::BrokerNotFound).with_detail("broker_id", id)
}

fn name_exists(name: &str) -> AppError {
    AppError::new(ErrorCode::BrokerNameExists).with_detail("name", name)
}

impl BrokerService {
    pub fn new(brokers: Arc<dyn BrokerRepository>) -> Self {
        Self { brokers }
    }

    pub async fn get(&self, id: i64) -> AppResult<Broker> {
        self.brokers
            .get(id)
            .await?
            .ok_or_else(|| broker_not_found(id))
    }

    pub async fn list(&self) -> AppResult<Vec<Broker>> {
        Ok(self.brokers.get_all().await?)
    }

    pub async fn create(&self, input: BrokerCreate) -> AppResult<Broker> {
        let name = input.name.trim();
        validate_required_text(name, "name", MAX_NAME_LEN)?;

        if self.brokers.exists_by_name(name).await? {
            return Err(name_exists(name));
        }

        let id = self.brokers.create(name).await.map_err(|e| {
            if e.is_duplicate_of(BROKER_NAME_KEY) {
                name_exists(name)
            } else {
                e.into()
            }
        })?;

        self.brokers
            .get(id)
            .await?
            .ok_or_else(|| read_after_write_fault("broker", id))
    }

    pub async fn update(&self, id: i64, input: BrokerUpdate) -> AppResult<Broker> {
        let mut broker = self.get(id).await?;

        if let Some(name) = input.name.as_deref() {
            let name = name.trim();
            validate_required_text(name, "name", MAX_NAME_LEN)?;
            // Keeping the current name is not a conflict
            if name != broker.name && self.brokers.exists_by_name(name).await? {
                return Err(name_exists(name));
            }
            broker.name = name.to_string();
        }
        if let Some(disabled) = input.disabled {
            broker.disabled = disabled;
        }

        self.brokers.update(&broker).await.map_err(|e| match e {
            e if e.is_duplicate_of(BROKER_NAME_KEY) => name_exists(&broker.name),
            RepoError::NoRowsAffected(_) => broker_not_found(id),
            other => other.into(),
        })?;

        self.brokers
            .get(id)
            .await?
            .ok_or_else(|| read_after_write_fault("broker", id))
    }

    pub async fn enable(&self, id: i64) -> AppResult<Broker> {
        self.set_disabled(id, false).await
    }

    pub async fn disable(&self, id: i64) -> AppResult<Broker> {
        self.set_disabled(id, true).await
    }

    async fn set_disabled(&self, id: i64, disabled: bool) -> AppResult<Broker> {
        self.update(
            id,
            BrokerUpdate {
                name: None,
                disabled: Some(disabled),
            },
        )
        .await
    }

    /// Remove the broker row only. Links, images and transactions that
    /// reference it are cleaned up by their own operations.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.brokers.exists(id).await? {
            return Err(broker_not_found(id));
        }

        self.brokers.delete(id).await.map_err(|e| match e {
            RepoError::NoRowsAffected(_) => broker_not_found(id),
            other => other.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use async_trait::async_trait;
    use shared::ErrorKind;

    fn service() -> (BrokerService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (BrokerService::new(store.clone()), store)
    }

    fn create(name: &str) -> BrokerCreate {
        BrokerCreate { name: name.into() }
    }

    #[tokio::test]
    async fn test_create_returns_stored_row() {
        let (svc, _) = service();
        let broker = svc.create(create("Acme")).await.unwrap();
        assert_eq!(broker.name, "Acme");
        assert!(!broker.disabled);
        assert!(broker.image_id.is_none());
        assert_eq!(svc.get(broker.id).await.unwrap(), broker);
    }

    #[tokio::test]
    async fn test_duplicate_name_creates_nothing() {
        let (svc, _) = service();
        svc.create(create("Acme")).await.unwrap();
        let err = svc.create(create("Acme")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BrokerNameExists);
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(svc.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let (svc, _) = service();
        let err = svc.create(create("  ")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(svc.list().await.unwrap().is_empty());
    }

    /// Adapter whose name check always says "free", so only the store
    /// constraint can catch the conflict. `create_conflict` makes every
    /// create fail on the given constraint.
    struct BlindNameCheck(Arc<MemoryStore>, Option<&'static str>);

    #[async_trait]
    impl BrokerRepository for BlindNameCheck {
        async fn create(&self, name: &str) -> crate::db::RepoResult<i64> {
            if let Some(constraint) = self.1 {
                return Err(RepoError::Duplicate(constraint.into()));
            }
            BrokerRepository::create(self.0.as_ref(), name).await
        }
        async fn get(&self, id: i64) -> crate::db::RepoResult<Option<Broker>> {
            BrokerRepository::get(self.0.as_ref(), id).await
        }
        async fn get_all(&self) -> crate::db::RepoResult<Vec<Broker>> {
            BrokerRepository::get_all(self.0.as_ref()).await
        }
        async fn update(&self, broker: &Broker) -> crate::db::RepoResult<()> {
            BrokerRepository::update(self.0.as_ref(), broker).await
        }
        async fn delete(&self, id: i64) -> crate::db::RepoResult<()> {
            BrokerRepository::delete(self.0.as_ref(), id).await
        }
        async fn exists(&self, id: i64) -> crate::db::RepoResult<bool> {
            BrokerRepository::exists(self.0.as_ref(), id).await
        }
        async fn exists_by_name(&self, _: &str) -> crate::db::RepoResult<bool> {
            Ok(false)
        }
        async fn has_image(&self, id: i64) -> crate::db::RepoResult<bool> {
            self.0.has_image(id).await
        }
        async fn set_image(&self, id: i64, image_id: i64) -> crate::db::RepoResult<()> {
            self.0.set_image(id, image_id).await
        }
        async fn clear_image(&self, id: i64) -> crate::db::RepoResult<()> {
            self.0.clear_image(id).await
        }
    }

    #[tokio::test]
    async fn test_store_constraint_closes_check_then_create_race() {
        let store = Arc::new(MemoryStore::new());
        let svc = BrokerService::new(Arc::new(BlindNameCheck(store.clone(), None)));

        svc.create(create("Acme")).await.unwrap();
        let err = svc.create(create("Acme")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BrokerNameExists);
        assert_eq!(BrokerRepository::get_all(store.as_ref()).await.unwrap().len(), 1);

        let other = svc.create(create("Globex")).await.unwrap();
        let err = svc
            .update(
                other.id,
                BrokerUpdate {
                    name: Some("Acme".into()),
                    disabled: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BrokerNameExists);
    }

    #[tokio::test]
    async fn test_id_collision_is_internal_not_name_conflict() {
        let store = Arc::new(MemoryStore::new());
        let svc = BrokerService::new(Arc::new(BlindNameCheck(store, Some("brokers_pkey"))));

        let err = svc.create(create("Acme")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_ne!(err.code, ErrorCode::BrokerNameExists);
    }

    #[tokio::test]
    async fn test_concurrent_creates_with_same_name() {
        let (svc, _) = service();
        let a = svc.clone();
        let b = svc.clone();
        let (ra, rb) = tokio::join!(
            tokio::spawn(async move { a.create(create("Acme")).await }),
            tokio::spawn(async move { b.create(create("Acme")).await })
        );
        let results = [ra.unwrap(), rb.unwrap()];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(svc.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_rename_and_keep_own_name() {
        let (svc, _) = service();
        let acme = svc.create(create("Acme")).await.unwrap();
        svc.create(create("Globex")).await.unwrap();

        // Same name again is allowed
        let same = svc
            .update(
                acme.id,
                BrokerUpdate {
                    name: Some("Acme".into()),
                    disabled: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(same.name, "Acme");

        let err = svc
            .update(
                acme.id,
                BrokerUpdate {
                    name: Some("Globex".into()),
                    disabled: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BrokerNameExists);

        let renamed = svc
            .update(
                acme.id,
                BrokerUpdate {
                    name: Some("Acme Corp".into()),
                    disabled: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Acme Corp");
    }

    #[tokio::test]
    async fn test_update_missing_broker() {
        let (svc, _) = service();
        let err = svc.update(42, BrokerUpdate::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BrokerNotFound);
    }

    #[tokio::test]
    async fn test_enable_disable() {
        let (svc, _) = service();
        let broker = svc.create(create("Acme")).await.unwrap();
        assert!(svc.disable(broker.id).await.unwrap().disabled);
        assert!(!svc.enable(broker.id).await.unwrap().disabled);
    }

    #[tokio::test]
    async fn test_delete() {
        let (svc, _) = service();
        let broker = svc.create(create("Acme")).await.unwrap();
        svc.delete(broker.id).await.unwrap();
        assert_eq!(
            svc.get(broker.id).await.unwrap_err().code,
            ErrorCode::BrokerNotFound
        );
        assert_eq!(
            svc.delete(broker.id).await.unwrap_err().code,
            ErrorCode::BrokerNotFound
        );
    }
}
