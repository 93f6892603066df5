//! Primary backend: one JSON document on the local filesystem.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use pokequiz_core::error::StoreError;
use pokequiz_core::traits::DurableStore;

/// The leaderboard as a JSON file, replaced as a whole on every write.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write `contents` next to `path` and rename it into place.
pub(crate) async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(StoreError::Io)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, contents)
        .await
        .map_err(StoreError::Io)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(StoreError::Io)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl DurableStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn read(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e))
                .with_context(|| format!("failed to read {}", self.path.display())),
        }
    }

    async fn write(&self, contents: &str) -> Result<()> {
        write_atomic(&self.path, contents).await
    }
}
