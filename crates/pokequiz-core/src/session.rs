//! Round construction.
//!
//! A round is drawn at random from a [`Catalog`]. Each slot gets a bounded
//! number of random draws to find an unused entry; when those all miss, the
//! loaded list is swept once so small catalogs still terminate promptly.

use std::collections::HashSet;

use tracing::debug;

use crate::model::{CatalogEntry, Language};
use crate::traits::Catalog;

/// Random draws allowed per slot before sweeping the loaded list.
pub const MAX_DRAW_ATTEMPTS: u32 = 20;

/// The ordered, distinct entries of one quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizRound {
    entries: Vec<CatalogEntry>,
}

impl QuizRound {
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.entries
    }
}

/// Build a round of up to `count` distinct entries with a usable name.
///
/// The round is shorter than `count` only when the catalog does not hold
/// `count` distinct entries named in `language`.
pub async fn build_round<C>(catalog: &mut C, count: usize, language: Language) -> QuizRound
where
    C: Catalog + ?Sized,
{
    let loaded = catalog.load_all().await;
    let mut used = HashSet::new();
    let mut entries = Vec::with_capacity(count);

    let usable = |entry: &CatalogEntry, used: &HashSet<u32>| -> bool {
        !used.contains(&entry.id) && entry.display_name(language).is_some()
    };

    while entries.len() < count {
        let mut picked = None;
        for _ in 0..MAX_DRAW_ATTEMPTS {
            match catalog.pick_random() {
                Some(entry) if usable(&entry, &used) => {
                    picked = Some(entry);
                    break;
                }
                Some(_) => continue,
                None => break,
            }
        }

        if picked.is_none() {
            debug!(
                slot = entries.len(),
                "random draws exhausted, sweeping loaded catalog"
            );
            picked = loaded.iter().find(|e| usable(*e, &used)).cloned();
        }

        let Some(entry) = picked else {
            debug!(
                requested = count,
                built = entries.len(),
                "catalog exhausted before round was full"
            );
            break;
        };

        used.insert(entry.id);
        entries.push(entry);
    }

    QuizRound { entries }
}
