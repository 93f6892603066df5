//! pokequiz-core — Game model, name matching, round building and scoring.
//!
//! This crate defines the data model, the capability traits implemented by
//! `pokequiz-catalog` and `pokequiz-storage`, and the ranked leaderboard
//! that the rest of pokequiz builds on.

pub mod config;
pub mod error;
pub mod format;
pub mod game;
pub mod matcher;
pub mod model;
pub mod scores;
pub mod session;
pub mod traits;
