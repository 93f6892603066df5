//! Secondary backend: a small key-value file.
//!
//! All keys live in one JSON object on disk. The leaderboard occupies a
//! single key, so other values written by the application survive a score
//! update.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::warn;

use pokequiz_core::error::StoreError;
use pokequiz_core::traits::DurableStore;

use crate::file::write_atomic;

/// Name of the key-value file inside its directory.
pub const KV_FILE_NAME: &str = "local-storage.json";

type KvMap = BTreeMap<String, String>;

pub struct KvStore {
    path: PathBuf,
    key: String,
}

impl KvStore {
    /// A store holding `key` in the key-value file under `dir`.
    pub fn new(dir: impl AsRef<Path>, key: impl Into<String>) -> Self {
        Self {
            path: dir.as_ref().join(KV_FILE_NAME),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn read_map(&self) -> Result<Option<KvMap>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io(e))
                    .with_context(|| format!("failed to read {}", self.path.display()))
            }
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        let map = serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
            backend: self.name().to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(map))
    }
}

#[async_trait]
impl DurableStore for KvStore {
    fn name(&self) -> &str {
        "local-storage"
    }

    async fn read(&self) -> Result<Option<String>> {
        Ok(self
            .read_map()
            .await?
            .and_then(|mut map| map.remove(&self.key))
            .filter(|value| !value.trim().is_empty()))
    }

    async fn write(&self, contents: &str) -> Result<()> {
        let mut map = match self.read_map().await {
            Ok(map) => map.unwrap_or_default(),
            Err(e) => {
                warn!(path = %self.path.display(), "replacing unreadable key-value file: {e:#}");
                KvMap::new()
            }
        };
        map.insert(self.key.clone(), contents.to_string());

        let serialized =
            serde_json::to_string_pretty(&map).context("failed to serialize key-value file")?;
        write_atomic(&self.path, &serialized).await
    }
}
