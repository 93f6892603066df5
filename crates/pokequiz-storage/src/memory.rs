//! In-memory backend for tests and for runs without any writable location.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use pokequiz_core::error::StoreError;
use pokequiz_core::traits::DurableStore;

/// A backend that keeps the document in memory. Reads and writes can be
/// made to fail on demand.
pub struct MemoryStore {
    name: String,
    document: Mutex<Option<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicU32,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: Mutex::new(None),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            writes: AtomicU32::new(0),
        }
    }

    /// Start with `document` already stored.
    pub fn with_document(name: impl Into<String>, document: impl Into<String>) -> Self {
        let store = Self::new(name);
        store.set_document(Some(document.into()));
        store
    }

    pub fn document(&self) -> Option<String> {
        self.document.lock().ok().and_then(|doc| doc.clone())
    }

    pub fn set_document(&self, document: Option<String>) {
        if let Ok(mut doc) = self.document.lock() {
            *doc = document;
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Number of successful writes.
    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable(format!("{}: read refused", self.name)).into());
        }
        Ok(self.document())
    }

    async fn write(&self, contents: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable(format!("{}: write refused", self.name)).into());
        }
        self.set_document(Some(contents.to_string()));
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failure_switches() {
        let store = MemoryStore::with_document("memory", "[]");
        assert_eq!(store.read().await.unwrap().as_deref(), Some("[]"));

        store.fail_reads(true);
        assert!(store.read().await.is_err());

        store.fail_writes(true);
        assert!(store.write("[1]").await.is_err());
        assert_eq!(store.writes(), 0);

        store.fail_writes(false);
        store.write("[1]").await.unwrap();
        assert_eq!(store.document().as_deref(), Some("[1]"));
        assert_eq!(store.writes(), 1);
    }
}
