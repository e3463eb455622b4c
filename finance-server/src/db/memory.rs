//! In-process store
//!
//! Implements every adapter trait over plain maps guarded by one mutex.
//! Uniqueness constraints mirror the PostgreSQL schema and are checked under
//! the same lock as the write, so they hold under concurrent callers.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{
    Broker, BrokerImage, BrokerUser, Permission, PermissionScope, Role, RoleWithPermissions,
    Transaction,
};
use shared::util::snowflake_id;

use super::{
    BROKER_IMAGE_BROKER_KEY, BROKER_NAME_KEY, BROKER_USER_KEY, BrokerImageRepository,
    BrokerRepository, BrokerUserRepository, NewTransaction, RepoError, RepoResult,
    TransactionRepository, expect_one_row,
};
use crate::auth::{CurrentUser, ResolveError, RoleResolver};

#[derive(Default)]
struct Tables {
    brokers: BTreeMap<i64, Broker>,
    images: BTreeMap<i64, BrokerImage>,
    /// (user_id, broker_id)
    links: BTreeSet<(i64, i64)>,
    transactions: BTreeMap<i64, Transaction>,
    user_roles: HashMap<i64, Vec<RoleWithPermissions>>,
}

/// Allocate a snowflake id not yet used in `map`
fn next_id<V>(map: &BTreeMap<i64, V>) -> i64 {
    loop {
        let id = snowflake_id();
        if !map.contains_key(&id) {
            return id;
        }
    }
}

/// Roles seeded by the initial migration
pub fn builtin_roles() -> Vec<RoleWithPermissions> {
    vec![
        RoleWithPermissions::new(
            Role {
                id: 1,
                name: "admin".into(),
            },
            vec![Permission::new(1, "*", PermissionScope::Admin)],
        ),
        RoleWithPermissions::new(
            Role {
                id: 2,
                name: "broker-manager".into(),
            },
            vec![
                Permission::new(2, "broker.*", PermissionScope::Admin),
                Permission::new(3, "transaction.delete_by_broker", PermissionScope::Admin),
            ],
        ),
    ]
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign one of the [`builtin_roles`] by name; false if unknown
    pub fn grant_builtin_role(&self, user_id: i64, role_name: &str) -> bool {
        let Some(role) = builtin_roles().into_iter().find(|r| r.role.name == role_name) else {
            return false;
        };
        let mut tables = self.tables.lock();
        let roles = tables.user_roles.entry(user_id).or_default();
        if !roles.iter().any(|r| r.role.id == role.role.id) {
            roles.push(role);
        }
        true
    }
}

#[async_trait]
impl BrokerRepository for MemoryStore {
    async fn create(&self, name: &str) -> RepoResult<i64> {
        let mut tables = self.tables.lock();
        if tables.brokers.values().any(|b| b.name == name) {
            return Err(RepoError::Duplicate(BROKER_NAME_KEY.into()));
        }
        let id = next_id(&tables.brokers);
        tables.brokers.insert(
            id,
            Broker {
                id,
                name: name.to_string(),
                image_id: None,
                disabled: false,
            },
        );
        Ok(id)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Broker>> {
        Ok(self.tables.lock().brokers.get(&id).cloned())
    }

    async fn get_all(&self) -> RepoResult<Vec<Broker>> {
        let mut brokers: Vec<Broker> = self.tables.lock().brokers.values().cloned().collect();
        brokers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(brokers)
    }

    async fn update(&self, broker: &Broker) -> RepoResult<()> {
        let mut tables = self.tables.lock();
        if tables
            .brokers
            .values()
            .any(|b| b.id != broker.id && b.name == broker.name)
        {
            return Err(RepoError::Duplicate(BROKER_NAME_KEY.into()));
        }
        match tables.brokers.get_mut(&broker.id) {
            Some(row) => {
                row.name = broker.name.clone();
                row.disabled = broker.disabled;
                Ok(())
            }
            None => Err(RepoError::NoRowsAffected(format!("broker {}", broker.id))),
        }
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let removed = self.tables.lock().brokers.remove(&id);
        expect_one_row(removed.is_some() as u64, || format!("broker {id}"))
    }

    async fn exists(&self, id: i64) -> RepoResult<bool> {
        Ok(self.tables.lock().brokers.contains_key(&id))
    }

    async fn exists_by_name(&self, name: &str) -> RepoResult<bool> {
        Ok(self.tables.lock().brokers.values().any(|b| b.name == name))
    }

    async fn has_image(&self, id: i64) -> RepoResult<bool> {
        match self.tables.lock().brokers.get(&id) {
            Some(b) => Ok(b.has_image()),
            None => Err(RepoError::NotFound(format!("broker {id}"))),
        }
    }

    async fn set_image(&self, id: i64, image_id: i64) -> RepoResult<()> {
        match self.tables.lock().brokers.get_mut(&id) {
            Some(b) => {
                b.image_id = Some(image_id);
                Ok(())
            }
            None => Err(RepoError::NoRowsAffected(format!("broker {id}"))),
        }
    }

    async fn clear_image(&self, id: i64) -> RepoResult<()> {
        match self.tables.lock().brokers.get_mut(&id) {
            Some(b) => {
                b.image_id = None;
                Ok(())
            }
            None => Err(RepoError::NoRowsAffected(format!("broker {id}"))),
        }
    }
}

#[async_trait]
impl BrokerImageRepository for MemoryStore {
    async fn create(&self, broker_id: i64, name: &str, data: &[u8]) -> RepoResult<i64> {
        let mut tables = self.tables.lock();
        if tables.images.values().any(|i| i.broker_id == broker_id) {
            return Err(RepoError::Duplicate(BROKER_IMAGE_BROKER_KEY.into()));
        }
        let id = next_id(&tables.images);
        tables.images.insert(
            id,
            BrokerImage {
                id,
                broker_id,
                name: name.to_string(),
                data: data.to_vec(),
            },
        );
        Ok(id)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<BrokerImage>> {
        Ok(self.tables.lock().images.get(&id).cloned())
    }

    async fn get_by_broker(&self, broker_id: i64) -> RepoResult<Vec<BrokerImage>> {
        Ok(self
            .tables
            .lock()
            .images
            .values()
            .filter(|i| i.broker_id == broker_id)
            .cloned()
            .collect())
    }

    async fn update(&self, image: &BrokerImage) -> RepoResult<()> {
        match self
            .tables
            .lock()
            .images
            .get_mut(&image.id)
            .filter(|row| row.broker_id == image.broker_id)
        {
            Some(row) => {
                row.name = image.name.clone();
                row.data = image.data.clone();
                Ok(())
            }
            None => Err(RepoError::NoRowsAffected(format!("broker image {}", image.id))),
        }
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let removed = self.tables.lock().images.remove(&id);
        expect_one_row(removed.is_some() as u64, || format!("broker image {id}"))
    }

    async fn exists(&self, broker_id: i64, id: i64) -> RepoResult<bool> {
        Ok(self
            .tables
            .lock()
            .images
            .get(&id)
            .is_some_and(|i| i.broker_id == broker_id))
    }
}

#[async_trait]
impl BrokerUserRepository for MemoryStore {
    async fn create(&self, user_id: i64, broker_id: i64) -> RepoResult<()> {
        if !self.tables.lock().links.insert((user_id, broker_id)) {
            return Err(RepoError::Duplicate(BROKER_USER_KEY.into()));
        }
        Ok(())
    }

    async fn exists(&self, user_id: i64, broker_id: i64) -> RepoResult<bool> {
        Ok(self.tables.lock().links.contains(&(user_id, broker_id)))
    }

    async fn delete(&self, user_id: i64, broker_id: i64) -> RepoResult<()> {
        let removed = self.tables.lock().links.remove(&(user_id, broker_id));
        expect_one_row(removed as u64, || {
            format!("link user {user_id} broker {broker_id}")
        })
    }

    async fn get_all(&self, user_id: i64) -> RepoResult<Vec<BrokerUser>> {
        let tables = self.tables.lock();
        let mut links: Vec<BrokerUser> = tables
            .links
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .filter_map(|(_, broker_id)| tables.brokers.get(broker_id))
            .map(|broker| BrokerUser {
                user_id,
                broker: broker.clone(),
            })
            .collect();
        links.sort_by(|a, b| a.broker.name.cmp(&b.broker.name));
        Ok(links)
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn create(&self, tx: &NewTransaction) -> RepoResult<i64> {
        let mut tables = self.tables.lock();
        let id = next_id(&tables.transactions);
        tables
            .transactions
            .insert(id, tx.clone().into_transaction(id));
        Ok(id)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Transaction>> {
        Ok(self.tables.lock().transactions.get(&id).cloned())
    }

    async fn get_all(&self, user_id: i64, broker_id: Option<i64>) -> RepoResult<Vec<Transaction>> {
        let mut txs: Vec<Transaction> = self
            .tables
            .lock()
            .transactions
            .values()
            .filter(|t| t.user_id == user_id && broker_id.is_none_or(|b| t.broker_id == b))
            .cloned()
            .collect();
        txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(txs)
    }

    async fn update(&self, tx: &Transaction) -> RepoResult<()> {
        match self.tables.lock().transactions.get_mut(&tx.id) {
            Some(row) => {
                // The owner never changes
                *row = Transaction {
                    user_id: row.user_id,
                    ..tx.clone()
                };
                Ok(())
            }
            None => Err(RepoError::NoRowsAffected(format!("transaction {}", tx.id))),
        }
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let removed = self.tables.lock().transactions.remove(&id);
        expect_one_row(removed.is_some() as u64, || format!("transaction {id}"))
    }

    async fn delete_by_broker(&self, broker_id: i64) -> RepoResult<u64> {
        let mut tables = self.tables.lock();
        let before = tables.transactions.len();
        tables.transactions.retain(|_, t| t.broker_id != broker_id);
        Ok((before - tables.transactions.len()) as u64)
    }
}

#[async_trait]
impl RoleResolver for MemoryStore {
    async fn resolve(&self, user: &CurrentUser) -> Result<Vec<RoleWithPermissions>, ResolveError> {
        Ok(self
            .tables
            .lock()
            .user_roles
            .get(&user.id)
            .cloned()
            .unwrap_or_default())
    }
}
