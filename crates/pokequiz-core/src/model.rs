//! Core data model types for pokequiz.
//!
//! Catalog entries are read-only reference data from the remote API. Score
//! entries are owned by the leaderboard, which keeps them ranked and capped.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept on the leaderboard.
pub const LEADERBOARD_CAPACITY: usize = 50;

/// Number of questions in a default round.
pub const DEFAULT_QUIZ_LENGTH: usize = 10;

/// Language used to pick a Pokémon's display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
    Jp,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Fr => write!(f, "fr"),
            Language::En => write!(f, "en"),
            Language::Jp => write!(f, "jp"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fr" | "french" => Ok(Language::Fr),
            "en" | "english" => Ok(Language::En),
            "jp" | "ja" | "japanese" => Ok(Language::Jp),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// Localized names of a Pokémon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    #[serde(default)]
    pub fr: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub jp: Option<String>,
}

impl LocalizedName {
    /// Name in the given language, if present and not blank.
    pub fn get(&self, language: Language) -> Option<&str> {
        let name = match language {
            Language::Fr => self.fr.as_deref(),
            Language::En => self.en.as_deref(),
            Language::Jp => self.jp.as_deref(),
        };
        name.map(str::trim).filter(|n| !n.is_empty())
    }
}

/// Image references for a Pokémon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub regular: Option<String>,
    #[serde(default)]
    pub shiny: Option<String>,
}

/// A Pokémon record from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Pokédex number.
    #[serde(alias = "pokedex_id")]
    pub id: u32,
    /// Localized names.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: LocalizedName,
    /// Image references.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sprites: Sprites,
    /// Generation the Pokémon was introduced in.
    #[serde(default)]
    pub generation: Option<u32>,
    /// Species category (e.g. "Pokémon Souris").
    #[serde(default)]
    pub category: Option<String>,
}

// The API sends `null` instead of an object for some placeholder entries.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CatalogEntry {
    /// Display name in the given language, if the entry has a usable one.
    pub fn display_name(&self, language: Language) -> Option<&str> {
        self.name.get(language)
    }

    /// Image shown for the question.
    pub fn image(&self) -> Option<&str> {
        self.sprites.regular.as_deref()
    }
}

/// A persisted quiz result.
///
/// Serialized as `{id, playerName, score, time, date, timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    /// Unique identifier, derived from the creation time in milliseconds.
    pub id: u64,
    /// Trimmed player display name.
    pub player_name: String,
    /// Number of correct answers.
    pub score: u32,
    /// Elapsed time in seconds.
    pub time: u64,
    /// Creation date, for display.
    pub date: DateTime<Utc>,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Ranking rule: higher score first, then faster time.
pub fn rank_order(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    b.score.cmp(&a.score).then_with(|| a.time.cmp(&b.time))
}

/// A capped, ranked sequence of score entries.
///
/// Always sorted by [`rank_order`] with a stable sort, so entries that tie
/// on both score and time keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    capacity: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::with_capacity(LEADERBOARD_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Build a leaderboard from arbitrary entries: sorts them, drops
    /// duplicate ids (keeping the better ranked) and applies the cap.
    pub fn from_entries(entries: Vec<ScoreEntry>) -> Self {
        let mut board = Self::new();
        board.entries = entries;
        board.normalize();
        board
    }

    fn normalize(&mut self) {
        self.entries.sort_by(rank_order);
        let mut seen = HashSet::new();
        self.entries.retain(|e| seen.insert(e.id));
        self.entries.truncate(self.capacity);
    }

    /// Insert an entry and return the entries evicted by the cap.
    ///
    /// An existing entry with the same id is replaced.
    pub fn insert(&mut self, entry: ScoreEntry) -> Vec<ScoreEntry> {
        self.entries.retain(|e| e.id != entry.id);
        self.entries.push(entry);
        self.entries.sort_by(rank_order);
        if self.entries.len() > self.capacity {
            self.entries.split_off(self.capacity)
        } else {
            Vec::new()
        }
    }

    /// The first `limit` entries.
    pub fn top(&self, limit: usize) -> &[ScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Best entry for a player, matching the name case-insensitively.
    pub fn best_for(&self, player_name: &str) -> Option<&ScoreEntry> {
        let wanted = player_name.trim().to_lowercase();
        // Sorted, so the first match is the best by the ranking rule.
        self.entries
            .iter()
            .find(|e| e.player_name.to_lowercase() == wanted)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Largest id on the board, if any.
    pub fn max_id(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.id).max()
    }

    /// Serialize the full sequence as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }

    /// Parse a JSON array of entries and normalize it.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries: Vec<ScoreEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, name: &str, score: u32, time: u64) -> ScoreEntry {
        let timestamp = 1_700_000_000_000 + id as i64;
        ScoreEntry {
            id,
            player_name: name.into(),
            score,
            time,
            date: DateTime::from_timestamp_millis(timestamp).unwrap(),
            timestamp,
        }
    }

    fn is_sorted(board: &Leaderboard) -> bool {
        board
            .entries()
            .windows(2)
            .all(|w| rank_order(&w[0], &w[1]) != Ordering::Greater)
    }

    #[test]
    fn language_display_and_parse() {
        assert_eq!(Language::Fr.to_string(), "fr");
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("ja".parse::<Language>().unwrap(), Language::Jp);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn catalog_entry_accepts_pokedex_id() {
        let json = r#"{
            "pokedex_id": 25,
            "generation": 1,
            "category": "Pokémon Souris",
            "name": {"fr": "Pikachu", "en": "Pikachu", "jp": "ピカチュウ"},
            "sprites": {"regular": "https://img/25.png", "shiny": null, "gmax": {"regular": "x", "shiny": "y"}},
            "types": [{"name": "Électrik", "image": "z"}]
        }"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, 25);
        assert_eq!(entry.display_name(Language::Fr), Some("Pikachu"));
        assert_eq!(entry.image(), Some("https://img/25.png"));
        assert_eq!(entry.generation, Some(1));
    }

    #[test]
    fn null_name_and_sprites_deserialize_as_empty() {
        let json = r#"{"pokedex_id": 0, "name": null, "sprites": null}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.display_name(Language::En), None);
        assert_eq!(entry.image(), None);
    }

    #[test]
    fn blank_name_is_not_usable() {
        let entry = CatalogEntry {
            id: 1,
            name: LocalizedName {
                fr: Some("  ".into()),
                en: Some("Bulbasaur".into()),
                jp: None,
            },
            sprites: Sprites::default(),
            generation: None,
            category: None,
        };
        assert_eq!(entry.display_name(Language::Fr), None);
        assert_eq!(entry.display_name(Language::En), Some("Bulbasaur"));
        assert_eq!(entry.display_name(Language::Jp), None);
    }

    #[test]
    fn score_entry_wire_shape() {
        let e = entry(1, "Ash", 7, 42);
        let value = serde_json::to_value(&e).unwrap();
        let obj = value.as_object().unwrap();
        for key in ["id", "playerName", "score", "time", "date", "timestamp"] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj.len(), 6);
    }

    #[test]
    fn insert_keeps_ranking() {
        let mut board = Leaderboard::new();
        board.insert(entry(1, "a", 5, 100));
        board.insert(entry(2, "b", 8, 200));
        board.insert(entry(3, "c", 8, 150));
        board.insert(entry(4, "d", 2, 10));

        let ids: Vec<u64> = board.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);
        assert!(is_sorted(&board));
    }

    #[test]
    fn full_ties_keep_insertion_order() {
        let mut board = Leaderboard::new();
        board.insert(entry(1, "first", 5, 60));
        board.insert(entry(2, "second", 5, 60));
        let ids: Vec<u64> = board.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn cap_evicts_lowest_ranked() {
        let mut board = Leaderboard::new();
        for i in 0..LEADERBOARD_CAPACITY as u64 {
            let evicted = board.insert(entry(i + 1, "p", 5, 100 + i));
            assert!(evicted.is_empty());
        }
        assert_eq!(board.len(), LEADERBOARD_CAPACITY);

        let worst = board.entries().last().unwrap().clone();
        let evicted = board.insert(entry(1000, "q", 9, 1));
        assert_eq!(evicted, vec![worst]);
        assert_eq!(board.len(), LEADERBOARD_CAPACITY);
        assert_eq!(board.entries()[0].id, 1000);
        assert!(is_sorted(&board));
    }

    #[test]
    fn overflow_entry_can_evict_itself() {
        let mut board = Leaderboard::with_capacity(2);
        board.insert(entry(1, "a", 9, 10));
        board.insert(entry(2, "b", 8, 10));
        let evicted = board.insert(entry(3, "c", 1, 10));
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].id, 3);
    }

    #[test]
    fn top_is_prefix() {
        let mut board = Leaderboard::new();
        for i in 0..8u64 {
            board.insert(entry(i + 1, "p", (i % 4) as u32, 50 - i));
        }
        let top = board.top(5);
        assert_eq!(top.len(), 5);
        assert_eq!(top, &board.entries()[..5]);
        assert_eq!(board.top(100).len(), 8);
        assert!(board.top(0).is_empty());
    }

    #[test]
    fn best_for_is_case_insensitive() {
        let mut board = Leaderboard::new();
        board.insert(entry(1, "Ash", 6, 90));
        board.insert(entry(2, "ash", 8, 120));
        board.insert(entry(3, "ASH", 8, 80));
        board.insert(entry(4, "Misty", 10, 30));

        let best = board.best_for("Ash").unwrap();
        assert_eq!(best.id, 3);
        assert!(board.best_for("Brock").is_none());
    }

    #[test]
    fn from_entries_normalizes() {
        let board = Leaderboard::from_entries(vec![
            entry(1, "a", 1, 10),
            entry(2, "b", 9, 10),
            entry(2, "b-dup", 0, 10),
        ]);
        let ids: Vec<u64> = board.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(board.entries()[0].player_name, "b");
    }

    #[test]
    fn json_roundtrip_preserves_order() {
        let mut board = Leaderboard::new();
        board.insert(entry(1, "Ash", 3, 100));
        board.insert(entry(2, "Misty", 7, 80));
        board.insert(entry(3, "Brock", 7, 95));

        let json = board.to_json().unwrap();
        let restored = Leaderboard::from_json(&json).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn reads_documents_written_by_browsers() {
        let json = r#"[{"id":1700000000000,"playerName":"Sacha","score":9,"time":61,"date":"2023-11-14T22:13:20.000Z","timestamp":1700000000000}]"#;
        let board = Leaderboard::from_json(json).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board.entries()[0].player_name, "Sacha");
        assert_eq!(board.entries()[0].date.timestamp_millis(), 1_700_000_000_000);
    }
}
