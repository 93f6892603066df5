//! Mock catalog for testing.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use pokequiz_core::model::CatalogEntry;
use pokequiz_core::traits::Catalog;

/// A catalog over a fixed list, for exercising round building without a
/// network.
pub struct MockCatalog {
    entries: Vec<CatalogEntry>,
    rng: StdRng,
    /// Number of `load_all` calls made.
    load_calls: AtomicU32,
    /// Number of `pick_random` calls made.
    draws: AtomicU32,
}

impl MockCatalog {
    /// Create a mock drawing from `entries` with a fixed seed.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self::with_seed(entries, 0)
    }

    pub fn with_seed(entries: Vec<CatalogEntry>, seed: u64) -> Self {
        Self {
            entries,
            rng: StdRng::seed_from_u64(seed),
            load_calls: AtomicU32::new(0),
            draws: AtomicU32::new(0),
        }
    }

    pub fn load_calls(&self) -> u32 {
        self.load_calls.load(Ordering::Relaxed)
    }

    pub fn draws(&self) -> u32 {
        self.draws.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn load_all(&mut self) -> Vec<CatalogEntry> {
        self.load_calls.fetch_add(1, Ordering::Relaxed);
        self.entries.clone()
    }

    async fn get_by_id(&mut self, id: u32) -> Option<CatalogEntry> {
        self.entries.iter().find(|e| e.id == id).cloned()
    }

    fn pick_random(&mut self) -> Option<CatalogEntry> {
        self.draws.fetch_add(1, Ordering::Relaxed);
        self.entries.choose(&mut self.rng).cloned()
    }
}
