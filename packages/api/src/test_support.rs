//! Test doubles shared by the service tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use store::{KeyValueStore, KvError, MemoryStore};

/// A [`MemoryStore`] whose reads or writes can be switched to fail.
#[derive(Clone, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool) -> Result<(), KvError> {
        if flag.load(Ordering::SeqCst) {
            Err(KvError::Backend("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for FailingStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KvError> {
        Self::check(&self.fail_reads)?;
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), KvError> {
        Self::check(&self.fail_writes)?;
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), KvError> {
        Self::check(&self.fail_writes)?;
        self.inner.remove_item(key).await
    }
}
