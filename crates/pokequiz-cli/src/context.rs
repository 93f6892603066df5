//! Startup shared by the commands: config, connectivity, catalog, scores.

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use pokequiz_catalog::{NetworkMonitor, RemoteCatalog};
use pokequiz_core::config::{load_config_from, QuizConfig};
use pokequiz_core::scores::{LoadSource, ScoreStore};

/// Load the configuration, forcing offline mode when asked to.
pub fn load(config_path: Option<&Path>, force_offline: bool) -> Result<QuizConfig> {
    let mut config = load_config_from(config_path)?;
    if force_offline {
        config.catalog.offline = true;
    }
    debug!(
        base_url = %config.catalog.base_url,
        offline = config.catalog.offline,
        "configuration loaded"
    );
    Ok(config)
}

/// Open the score store and load the leaderboard.
pub async fn open_scores(config: &QuizConfig) -> (ScoreStore, LoadSource) {
    let mut scores = pokequiz_storage::open_score_store(&config.storage);
    let source = scores.load().await;
    (scores, source)
}

/// Probe the network and build a catalog that knows the result.
///
/// Offline mode skips the probe.
pub async fn connect_catalog(config: &QuizConfig) -> Result<(NetworkMonitor, RemoteCatalog)> {
    let mut monitor = NetworkMonitor::new(&config.catalog)?;
    if !config.catalog.offline {
        monitor.check_connection().await;
    }
    info!(status = ?monitor.status(), "network status");

    let mut catalog = RemoteCatalog::new(&config.catalog)?;
    catalog.set_offline(!monitor.is_online());
    monitor.add_listener(|status| debug!(%status, "network status changed"));

    Ok((monitor, catalog))
}
