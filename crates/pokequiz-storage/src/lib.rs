//! pokequiz-storage — Persistence backends for the leaderboard.
//!
//! The primary backend is a JSON file in the platform data directory. The
//! secondary backend is a key-value file that is always available, used
//! when native file storage is disabled or fails.

pub mod file;
pub mod kv;
pub mod memory;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use pokequiz_core::config::StorageConfig;
use pokequiz_core::scores::ScoreStore;
use pokequiz_core::traits::DurableStore;

pub use file::FileStore;
pub use kv::KvStore;
pub use memory::MemoryStore;

const APP_DIR: &str = "pokequiz";

/// The backends selected for this environment.
pub struct Backends {
    pub primary: Option<Arc<dyn DurableStore>>,
    pub secondary: Arc<dyn DurableStore>,
}

/// Directory of the primary document.
pub fn data_dir(config: &StorageConfig) -> Option<PathBuf> {
    config
        .data_dir
        .clone()
        .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
}

/// Directory of the key-value file.
pub fn kv_dir(config: &StorageConfig) -> PathBuf {
    config
        .kv_dir
        .clone()
        .or_else(|| dirs::cache_dir().map(|d| d.join(APP_DIR)))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR))
}

/// Check that files can be created in `dir`.
fn is_writable(dir: &Path) -> bool {
    let probe = dir.join(".pokequiz-probe");
    let result = std::fs::create_dir_all(dir)
        .and_then(|()| std::fs::write(&probe, b""))
        .and_then(|()| std::fs::remove_file(&probe));
    match result {
        Ok(()) => true,
        Err(e) => {
            debug!(dir = %dir.display(), "storage directory is not writable: {e}");
            false
        }
    }
}

/// Pick the primary and secondary backends.
///
/// File storage is the primary backend only when enabled and its directory
/// accepts writes. The key-value backend is always present.
pub fn detect_backends(config: &StorageConfig) -> Backends {
    let primary: Option<Arc<dyn DurableStore>> = if !config.native_files {
        info!("native file storage disabled");
        None
    } else {
        match data_dir(config) {
            Some(dir) if is_writable(&dir) => {
                let path = dir.join(&config.file_name);
                debug!(path = %path.display(), "using file storage");
                Some(Arc::new(FileStore::new(path)))
            }
            Some(dir) => {
                warn!(dir = %dir.display(), "file storage unavailable, using key-value storage");
                None
            }
            None => {
                warn!("no data directory on this platform, using key-value storage");
                None
            }
        }
    };

    let secondary = KvStore::new(kv_dir(config), config.file_name.clone());
    debug!(path = %secondary.path().display(), "key-value storage");

    Backends {
        primary,
        secondary: Arc::new(secondary),
    }
}

/// Build a score store over the detected backends. The leaderboard is not
/// loaded yet.
pub fn open_score_store(config: &StorageConfig) -> ScoreStore {
    let Backends { primary, secondary } = detect_backends(config);
    ScoreStore::new(primary, secondary).with_io_timeout(Duration::from_millis(config.io_timeout_ms))
}
