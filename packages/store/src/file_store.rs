//! # Filesystem-backed key-value store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that persists every key
//! as its own file under a base directory. It is used on desktop and mobile
//! platforms to retain accounts and tasks across app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── kv/
//!     └── <hex(key)>.json     # the raw stored value
//! ```
//!
//! Keys are hex-encoded so that prefixes like `@tm_` and user ids never clash
//! with path rules on any platform.
//!
//! ## Atomic writes
//!
//! `set_item` writes to `<file>.tmp` and renames it over the target, so a
//! reader sees either the old value or the new one, never a torn write.
//!
//! ## Platform data directories
//!
//! Use [`dirs::data_dir()`] to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS / iOS | `~/Library/Application Support/dailytask/` |
//! | Linux | `~/.local/share/dailytask/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\dailytask\` |
//! | Android | App-internal storage (via `dirs`) |

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::storage::{KeyValueStore, KvError};

/// Filesystem-backed KeyValueStore for desktop and mobile persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn items_dir(&self) -> PathBuf {
        self.base.join("kv")
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.items_dir().join(format!("{}.json", hex::encode(key)))
    }
}

impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KvError> {
        match std::fs::read_to_string(self.item_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), KvError> {
        let path = self.item_path(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), KvError> {
        match std::fs::remove_file(self.item_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, User, UserId};
    use crate::storage::Storage;
    use chrono::Utc;

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();

        let storage = Storage::new(FileStore::new(dir.path().to_path_buf()));
        let user = User::new("Ada", "ada@x.com", "secret1", Utc::now());
        storage.save_users(std::slice::from_ref(&user)).await.unwrap();
        storage.set_active_session_id(&user.id).await.unwrap();
        storage
            .save_tasks(&user.id, &[Task::new("Buy seeds", None, Utc::now())])
            .await
            .unwrap();

        // Re-open from same directory
        let storage2 = Storage::new(FileStore::new(dir.path().to_path_buf()));

        assert_eq!(storage2.load_users().await.unwrap(), vec![user.clone()]);
        assert_eq!(storage2.active_session_id().await.unwrap(), Some(user.id.clone()));
        let tasks = storage2.load_tasks(&user.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy seeds");
    }

    #[tokio::test]
    async fn test_missing_and_removed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());

        assert!(store.get_item("@tm_session").await.unwrap().is_none());
        store.remove_item("@tm_session").await.unwrap();

        store.set_item("@tm_session", "u1".to_string()).await.unwrap();
        assert_eq!(store.get_item("@tm_session").await.unwrap().as_deref(), Some("u1"));

        store.remove_item("@tm_session").await.unwrap();
        assert!(store.get_item("@tm_session").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_keys_with_separators_stay_inside_base() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        let storage = Storage::new(store.clone());
        let odd = UserId::from("../../etc/passwd");

        storage.save_tasks(&odd, &[]).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("kv"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with(dir.path()));
        assert!(storage.load_tasks(&odd).await.unwrap().is_empty());
    }
}
