//! The `pokequiz best` command.

use std::path::PathBuf;

use anyhow::Result;

use pokequiz_core::format::{format_date, format_time};

use crate::context;

pub async fn execute(config_path: Option<PathBuf>, player: String) -> Result<()> {
    let config = context::load(config_path.as_deref(), false)?;
    let (scores, _) = context::open_scores(&config).await;

    match scores.best_for(&player) {
        Some(best) => println!(
            "Best score for {}: {} pts in {} on {}",
            best.player_name,
            best.score,
            format_time(best.time),
            format_date(&best.date)
        ),
        None => println!("No scores recorded for {player}."),
    }
    Ok(())
}
