use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::storage::{KeyValueStore, KvError};

/// In-memory KeyValueStore for testing and ephemeral sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, KvError> {
        self.items
            .lock()
            .map_err(|_| KvError::Backend("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.items()?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), KvError> {
        self.items()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), KvError> {
        self.items()?.remove(key);
        Ok(())
    }
}
