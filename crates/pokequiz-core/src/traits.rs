//! Capability traits for catalogs and persistence backends.
//!
//! These async traits are implemented by the `pokequiz-catalog` and
//! `pokequiz-storage` crates respectively.

use async_trait::async_trait;

use crate::model::CatalogEntry;

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// A source of Pokémon entries for building rounds.
///
/// Implementations absorb their own failures: every method answers with
/// cached or fallback data instead of an error.
#[async_trait]
pub trait Catalog: Send {
    /// Load the full collection, caching it for later calls.
    async fn load_all(&mut self) -> Vec<CatalogEntry>;

    /// Look up a single entry by Pokédex number.
    async fn get_by_id(&mut self, id: u32) -> Option<CatalogEntry>;

    /// Draw one entry uniformly at random, or `None` if nothing is available.
    fn pick_random(&mut self) -> Option<CatalogEntry>;
}

// ---------------------------------------------------------------------------
// Durable store trait
// ---------------------------------------------------------------------------

/// A whole-document store addressed by a single logical key.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Human-readable backend name (e.g. "file").
    fn name(&self) -> &str;

    /// Read the stored document, `None` if nothing has been stored yet.
    async fn read(&self) -> anyhow::Result<Option<String>>;

    /// Replace the stored document.
    async fn write(&self, contents: &str) -> anyhow::Result<()>;
}
