//! # IndexedDB key-value store: browser-side persistence
//!
//! [`IdbStore`] is the [`KeyValueStore`] implementation used on the **web platform**.
//! It persists stored values into the browser's IndexedDB via the [`rexie`]
//! crate, so accounts and tasks survive page reloads.
//!
//! ## Database schema
//!
//! A single IndexedDB database named `"dailytask"` (version 1) with one object store:
//!
//! | IndexedDB store | Key | Value |
//! |-----------------|-----|-------|
//! | `"kv"` | storage key (e.g. `"@tm_users"`) | the stored string |
//!
//! ## Connection management
//!
//! `IdbStore` only holds the database name and opens a fresh [`Rexie`]
//! connection on every operation; `Rexie` does not implement `Clone` and the
//! browser caches IndexedDB connections internally.
//!
//! ## Error handling
//!
//! Every rexie or conversion failure becomes [`KvError::Backend`] and is
//! returned to the caller.

use crate::storage::{KeyValueStore, KvError};
use rexie::{ObjectStore as RexieObjectStore, Rexie, TransactionMode};
use wasm_bindgen::JsValue;

const DEFAULT_DB_NAME: &str = "dailytask";
const DB_VERSION: u32 = 1;
const KV_STORE: &str = "kv";

fn backend(e: impl std::fmt::Display) -> KvError {
    KvError::Backend(e.to_string())
}

/// IndexedDB-backed KeyValueStore for web platform.
///
/// When a namespace is provided, the database is named `"dailytask-<namespace>"`.
#[derive(Clone)]
pub struct IdbStore {
    db_name: String,
}

impl IdbStore {
    /// Create a store using the default `"dailytask"` database.
    pub fn new() -> Self {
        Self::with_namespace(None)
    }

    /// Create a store scoped to an optional namespace.
    pub fn with_namespace(namespace: Option<&str>) -> Self {
        let db_name = match namespace {
            Some(ns) => format!("{DEFAULT_DB_NAME}-{ns}"),
            None => DEFAULT_DB_NAME.to_string(),
        };
        Self { db_name }
    }

    async fn open_db(&self) -> Result<Rexie, KvError> {
        Rexie::builder(&self.db_name)
            .version(DB_VERSION)
            .add_object_store(RexieObjectStore::new(KV_STORE))
            .build()
            .await
            .map_err(backend)
    }
}

impl Default for IdbStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for IdbStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KvError> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[KV_STORE], TransactionMode::ReadOnly)
            .map_err(backend)?;
        let store = tx.store(KV_STORE).map_err(backend)?;

        let value = store.get(JsValue::from_str(key)).await.map_err(backend)?;
        match value {
            Some(js_val) if !js_val.is_undefined() => {
                let raw: String = serde_wasm_bindgen::from_value(js_val).map_err(backend)?;
                Ok(Some(raw))
            }
            _ => Ok(None),
        }
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), KvError> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[KV_STORE], TransactionMode::ReadWrite)
            .map_err(backend)?;
        let store = tx.store(KV_STORE).map_err(backend)?;

        let js_key = JsValue::from_str(key);
        let js_value = JsValue::from_str(&value);
        store.put(&js_value, Some(&js_key)).await.map_err(backend)?;
        tx.done().await.map_err(backend)?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), KvError> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[KV_STORE], TransactionMode::ReadWrite)
            .map_err(backend)?;
        let store = tx.store(KV_STORE).map_err(backend)?;

        store.delete(JsValue::from_str(key)).await.map_err(backend)?;
        tx.done().await.map_err(backend)?;
        Ok(())
    }
}
