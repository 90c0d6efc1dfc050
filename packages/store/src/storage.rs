//! # Storage: typed record families on an abstract key-value store
//!
//! This module is the persistence core of the app. [`Storage`] turns a flat,
//! string-keyed [`KeyValueStore`] into typed read/write operations for the three
//! record families the app keeps on-device. All reads and writes go through the
//! trait, so the same logic runs against an in-memory store (tests), the
//! filesystem (desktop/mobile) or IndexedDB (web).
//!
//! ## [`KeyValueStore`] trait
//!
//! An async interface with three methods, `get_item`/`set_item`/`remove_item` on
//! UTF-8 values. Implementations live in sibling modules ([`crate::memory`],
//! [`crate::file_store`], and `crate::idb` on the web).
//!
//! ## Key layout
//!
//! | Key | Value | Notes |
//! |-----|-------|-------|
//! | `{prefix}users` | JSON array of [`User`] | whole-collection overwrite |
//! | `{prefix}session` | raw user id | absent = logged out |
//! | `{prefix}tasks_{user_id}` | JSON array of [`Task`] | whole-collection overwrite, one key per user |
//!
//! The prefix defaults to `@tm_` (see [`crate::StorageConfig`]).
//!
//! ## Write pattern
//!
//! Every collection write replaces the stored value in a single `set_item` call.
//! Callers load the full collection, transform it in memory and save it back.
//! Collections are personal task lists, so this stays small.
//!
//! ## Errors
//!
//! Adapter failures are [`KvError`]. [`Storage`] wraps them in a
//! [`StorageError::Read`] or [`StorageError::Write`] carrying the key. A stored
//! value that fails to decode is a read failure, never an empty default.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::StorageConfig;
use crate::models::{Task, User, UserId};

/// Failure reported by a [`KeyValueStore`] backend or by record (de)serialisation.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Failure of a typed persistence operation.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read `{key}`: {source}")]
    Read {
        key: String,
        #[source]
        source: KvError,
    },
    #[error("failed to write `{key}`: {source}")]
    Write {
        key: String,
        #[source]
        source: KvError,
    },
}

impl StorageError {
    fn read(key: &str, source: impl Into<KvError>) -> Self {
        Self::Read {
            key: key.to_string(),
            source: source.into(),
        }
    }

    fn write(key: &str, source: impl Into<KvError>) -> Self {
        Self::Write {
            key: key.to_string(),
            source: source.into(),
        }
    }
}

/// Async string-keyed storage with durable get/set/remove.
pub trait KeyValueStore {
    fn get_item(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, KvError>>;
    fn set_item(
        &self,
        key: &str,
        value: String,
    ) -> impl std::future::Future<Output = Result<(), KvError>>;
    fn remove_item(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), KvError>>;
}

/// The concrete key names for one storage namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn users(&self) -> String {
        format!("{}users", self.prefix)
    }

    pub fn session(&self) -> String {
        format!("{}session", self.prefix)
    }

    pub fn tasks(&self, user_id: &UserId) -> String {
        format!("{}tasks_{}", self.prefix, user_id)
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(StorageConfig::default().key_prefix)
    }
}

/// Typed persistence operations backed by a [`KeyValueStore`].
#[derive(Clone, Debug)]
pub struct Storage<S: KeyValueStore> {
    store: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> Storage<S> {
    /// Storage using the default key prefix.
    pub fn new(store: S) -> Self {
        Self::with_keys(store, StorageKeys::default())
    }

    pub fn with_keys(store: S, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// All accounts; empty when nothing has been stored yet.
    pub async fn load_users(&self) -> Result<Vec<User>, StorageError> {
        self.load_collection(&self.keys.users()).await
    }

    /// Overwrite the whole account collection.
    pub async fn save_users(&self, users: &[User]) -> Result<(), StorageError> {
        self.save_collection(&self.keys.users(), users).await
    }

    /// Id of the signed-in user, if any.
    pub async fn active_session_id(&self) -> Result<Option<UserId>, StorageError> {
        let key = self.keys.session();
        let raw = self
            .store
            .get_item(&key)
            .await
            .map_err(|e| StorageError::read(&key, e))?;
        Ok(raw.filter(|id| !id.is_empty()).map(UserId))
    }

    pub async fn set_active_session_id(&self, user_id: &UserId) -> Result<(), StorageError> {
        let key = self.keys.session();
        self.store
            .set_item(&key, user_id.to_string())
            .await
            .map_err(|e| StorageError::write(&key, e))
    }

    pub async fn clear_active_session_id(&self) -> Result<(), StorageError> {
        let key = self.keys.session();
        self.store
            .remove_item(&key)
            .await
            .map_err(|e| StorageError::write(&key, e))
    }

    /// Task list of one user; empty when the user has none stored.
    pub async fn load_tasks(&self, user_id: &UserId) -> Result<Vec<Task>, StorageError> {
        self.load_collection(&self.keys.tasks(user_id)).await
    }

    /// Overwrite the whole task list of one user.
    pub async fn save_tasks(&self, user_id: &UserId, tasks: &[Task]) -> Result<(), StorageError> {
        self.save_collection(&self.keys.tasks(user_id), tasks).await
    }

    /// Drop the stored task list of one user.
    pub async fn remove_tasks(&self, user_id: &UserId) -> Result<(), StorageError> {
        let key = self.keys.tasks(user_id);
        self.store
            .remove_item(&key)
            .await
            .map_err(|e| StorageError::write(&key, e))
    }

    async fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StorageError> {
        let raw = self
            .store
            .get_item(key)
            .await
            .map_err(|e| StorageError::read(key, e))?;
        match raw {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::read(key, e)),
            None => Ok(Vec::new()),
        }
    }

    async fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items).map_err(|e| StorageError::write(key, e))?;
        tracing::debug!(key, bytes = raw.len(), "writing collection");
        self.store
            .set_item(key, raw)
            .await
            .map_err(|e| StorageError::write(key, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::Task;
    use chrono::Utc;

    /// Adapter whose every call fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        async fn get_item(&self, _key: &str) -> Result<Option<String>, KvError> {
            Err(KvError::Backend("disk unavailable".to_string()))
        }

        async fn set_item(&self, _key: &str, _value: String) -> Result<(), KvError> {
            Err(KvError::Backend("disk full".to_string()))
        }

        async fn remove_item(&self, _key: &str) -> Result<(), KvError> {
            Err(KvError::Backend("disk full".to_string()))
        }
    }

    #[test]
    fn test_default_keys() {
        let keys = StorageKeys::default();
        assert_eq!(keys.users(), "@tm_users");
        assert_eq!(keys.session(), "@tm_session");
        assert_eq!(keys.tasks(&UserId::from("u1")), "@tm_tasks_u1");
    }

    #[tokio::test]
    async fn test_empty_store_yields_empty_collections() {
        let storage = Storage::new(MemoryStore::new());

        assert!(storage.load_users().await.unwrap().is_empty());
        assert!(storage.active_session_id().await.unwrap().is_none());
        assert!(storage
            .load_tasks(&UserId::from("nobody"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_users_roundtrip() {
        let storage = Storage::new(MemoryStore::new());
        let users = vec![
            User::new("Ada", "ada@x.com", "secret1", Utc::now()),
            User::new("Grace", "grace@x.com", "cobol!", Utc::now()),
        ];

        storage.save_users(&users).await.unwrap();
        assert_eq!(storage.load_users().await.unwrap(), users);
    }

    #[tokio::test]
    async fn test_session_pointer() {
        let storage = Storage::new(MemoryStore::new());
        let id = UserId::from("u1");

        storage.set_active_session_id(&id).await.unwrap();
        assert_eq!(storage.active_session_id().await.unwrap(), Some(id));

        storage.clear_active_session_id().await.unwrap();
        assert!(storage.active_session_id().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tasks_roundtrip_preserves_order() {
        let storage = Storage::new(MemoryStore::new());
        let user = UserId::from("u1");
        let tasks = vec![
            Task::new("Buy seeds", Some("tomatoes"), Utc::now()),
            Task::new("Water plants", None, Utc::now()),
            Task::new("Weed beds", None, Utc::now()),
        ];

        storage.save_tasks(&user, &tasks).await.unwrap();
        assert_eq!(storage.load_tasks(&user).await.unwrap(), tasks);
    }

    #[tokio::test]
    async fn test_tasks_are_scoped_per_user() {
        let storage = Storage::new(MemoryStore::new());
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");

        storage
            .save_tasks(&alice, &[Task::new("Alice's", None, Utc::now())])
            .await
            .unwrap();

        assert_eq!(storage.load_tasks(&alice).await.unwrap().len(), 1);
        assert!(storage.load_tasks(&bob).await.unwrap().is_empty());

        storage.remove_tasks(&alice).await.unwrap();
        assert!(storage.load_tasks(&alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_read_error() {
        let store = MemoryStore::new();
        store.set_item("@tm_users", "{not json".to_string()).await.unwrap();
        let storage = Storage::new(store);

        match storage.load_users().await {
            Err(StorageError::Read { key, source }) => {
                assert_eq!(key, "@tm_users");
                assert!(matches!(source, KvError::Json(_)));
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_backend_failures_are_surfaced() {
        let storage = Storage::new(BrokenStore);

        assert!(matches!(
            storage.load_users().await,
            Err(StorageError::Read { .. })
        ));
        assert!(matches!(
            storage.active_session_id().await,
            Err(StorageError::Read { .. })
        ));
        assert!(matches!(
            storage.save_users(&[]).await,
            Err(StorageError::Write { .. })
        ));
        assert!(matches!(
            storage.clear_active_session_id().await,
            Err(StorageError::Write { .. })
        ));
    }

    #[tokio::test]
    async fn test_custom_prefix() {
        let store = MemoryStore::new();
        let storage = Storage::with_keys(store.clone(), StorageKeys::new("test:"));

        storage.save_users(&[]).await.unwrap();
        assert_eq!(store.get_item("test:users").await.unwrap().as_deref(), Some("[]"));
        assert!(store.get_item("@tm_users").await.unwrap().is_none());
    }
}
