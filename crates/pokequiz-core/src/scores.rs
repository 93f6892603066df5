//! Ranked, persisted leaderboard.
//!
//! The store keeps the leaderboard in memory and writes the whole document
//! after every mutation. Writes go to the primary backend and fall back to
//! the secondary one; loads read whichever backend answers first. The two
//! backends are never merged.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{QuizError, StoreError};
use crate::model::{Leaderboard, ScoreEntry};
use crate::traits::DurableStore;

/// Default timeout applied to every backend call.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the leaderboard was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    Primary,
    Secondary,
    /// Neither backend had a readable document.
    Empty,
}

/// Where the latest mutation was persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Durability {
    Primary,
    Secondary,
    /// Both backends failed; the change is lost on restart.
    MemoryOnly,
}

impl Durability {
    pub fn is_persisted(self) -> bool {
        self != Durability::MemoryOnly
    }
}

/// A newly recorded score and where it was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedScore {
    pub entry: ScoreEntry,
    pub durability: Durability,
}

/// The leaderboard and its persistence backends.
pub struct ScoreStore {
    primary: Option<Arc<dyn DurableStore>>,
    secondary: Arc<dyn DurableStore>,
    leaderboard: Leaderboard,
    io_timeout: Duration,
    last_id: u64,
}

impl ScoreStore {
    /// Create an empty store. `primary` is `None` when the environment has
    /// no native file storage.
    pub fn new(primary: Option<Arc<dyn DurableStore>>, secondary: Arc<dyn DurableStore>) -> Self {
        Self {
            primary,
            secondary,
            leaderboard: Leaderboard::new(),
            io_timeout: DEFAULT_IO_TIMEOUT,
            last_id: 0,
        }
    }

    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Backend names, primary first.
    pub fn backend_names(&self) -> (Option<&str>, &str) {
        (self.primary.as_deref().map(|p| p.name()), self.secondary.name())
    }

    /// Load the leaderboard: primary, then secondary, then empty.
    pub async fn load(&mut self) -> LoadSource {
        let mut source = LoadSource::Empty;
        let mut board = Leaderboard::new();

        if let Some(primary) = &self.primary {
            match self.read_from(primary.as_ref()).await {
                Ok(loaded) => {
                    board = loaded;
                    source = LoadSource::Primary;
                }
                Err(e) => warn!(backend = primary.name(), "failed to load scores: {e:#}"),
            }
        }

        if source == LoadSource::Empty {
            match self.read_from(self.secondary.as_ref()).await {
                Ok(loaded) => {
                    board = loaded;
                    source = LoadSource::Secondary;
                }
                Err(e) => {
                    warn!(
                        backend = self.secondary.name(),
                        "failed to load scores, starting empty: {e:#}"
                    )
                }
            }
        }

        info!(?source, entries = board.len(), "leaderboard loaded");
        self.last_id = self.last_id.max(board.max_id().unwrap_or(0));
        self.leaderboard = board;
        source
    }

    async fn read_from(&self, backend: &dyn DurableStore) -> anyhow::Result<Leaderboard> {
        let contents = with_timeout(backend.name(), self.io_timeout, backend.read())
            .await?
            .ok_or_else(|| StoreError::Unavailable(format!("{}: no document", backend.name())))?;
        let board = Leaderboard::from_json(&contents).map_err(|e| StoreError::Corrupt {
            backend: backend.name().to_string(),
            message: e.to_string(),
        })?;
        Ok(board)
    }

    /// Record a result, keep the board ranked and capped, and persist it.
    ///
    /// The entry is returned even when neither backend accepted the write;
    /// `durability` tells the caller whether it survives a restart.
    pub async fn add_score(
        &mut self,
        player_name: &str,
        score: u32,
        time_secs: u64,
    ) -> Result<SavedScore, QuizError> {
        self.add_score_at(player_name, score, time_secs, Utc::now())
            .await
    }

    /// [`ScoreStore::add_score`] with an explicit creation time.
    pub async fn add_score_at(
        &mut self,
        player_name: &str,
        score: u32,
        time_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<SavedScore, QuizError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(QuizError::EmptyPlayerName);
        }

        let timestamp = now.timestamp_millis();
        let id = self.next_id(timestamp);
        self.last_id = self.last_id.max(id);

        let entry = ScoreEntry {
            id,
            player_name: player_name.to_string(),
            score,
            time: time_secs,
            date: DateTime::from_timestamp_millis(timestamp).unwrap_or(now),
            timestamp,
        };

        let evicted = self.leaderboard.insert(entry.clone());
        if !evicted.is_empty() {
            debug!(count = evicted.len(), "evicted entries beyond capacity");
        }

        let durability = self.persist().await;
        Ok(SavedScore { entry, durability })
    }

    /// Creation time in milliseconds, bumped past the last issued id.
    ///
    /// Once ids reach `u64::MAX`, falls back to the first id from the
    /// timestamp upward that is not on the board.
    fn next_id(&self, timestamp: i64) -> u64 {
        let base = timestamp.max(0) as u64;
        match self.last_id.checked_add(1) {
            Some(next) => base.max(next),
            None => {
                let taken = |id: &u64| self.leaderboard.entries().iter().any(|e| e.id == *id);
                (base..=u64::MAX)
                    .chain(0..base)
                    .find(|id| !taken(id))
                    .unwrap_or(base)
            }
        }
    }

    /// The best `limit` entries.
    pub fn top(&self, limit: usize) -> &[ScoreEntry] {
        self.leaderboard.top(limit)
    }

    /// A copy of the full leaderboard.
    pub fn all(&self) -> Vec<ScoreEntry> {
        self.leaderboard.entries().to_vec()
    }

    /// Best entry for a player, matching the name case-insensitively.
    pub fn best_for(&self, player_name: &str) -> Option<&ScoreEntry> {
        self.leaderboard.best_for(player_name)
    }

    pub fn len(&self) -> usize {
        self.leaderboard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaderboard.is_empty()
    }

    /// Empty the leaderboard and persist the empty document.
    pub async fn clear(&mut self) -> Durability {
        self.leaderboard.clear();
        self.persist().await
    }

    async fn persist(&self) -> Durability {
        let document = match self.leaderboard.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to serialize leaderboard: {e}");
                return Durability::MemoryOnly;
            }
        };

        if let Some(primary) = &self.primary {
            match with_timeout(primary.name(), self.io_timeout, primary.write(&document)).await {
                Ok(()) => return Durability::Primary,
                Err(e) => warn!(
                    backend = primary.name(),
                    "failed to save scores, trying fallback: {e:#}"
                ),
            }
        }

        match with_timeout(
            self.secondary.name(),
            self.io_timeout,
            self.secondary.write(&document),
        )
        .await
        {
            Ok(()) => Durability::Secondary,
            Err(e) => {
                warn!(
                    backend = self.secondary.name(),
                    "failed to save scores, kept in memory only: {e:#}"
                );
                Durability::MemoryOnly
            }
        }
    }
}

/// Run a backend call under a timeout; a timeout counts as a failure.
async fn with_timeout<T>(
    backend: &str,
    timeout: Duration,
    call: impl Future<Output = anyhow::Result<T>>,
) -> anyhow::Result<T> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            backend: backend.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
        .into()),
    }
}
