pub mod config;
pub mod models;
pub mod storage;

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod idb;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use idb::IdbStore;

pub use config::{AppConfig, ConfigError, StorageConfig, ValidationConfig};
pub use models::{normalize_email, normalize_notes, Task, TaskId, User, UserId};
pub use storage::{KeyValueStore, KvError, Storage, StorageError, StorageKeys};
