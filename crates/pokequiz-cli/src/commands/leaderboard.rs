//! The `pokequiz leaderboard` command.

use std::path::PathBuf;

use anyhow::{bail, Result};
use comfy_table::{Cell, Table};

use pokequiz_core::format::{format_date, format_time, medal};
use pokequiz_core::model::ScoreEntry;

use crate::context;

pub async fn execute(
    config_path: Option<PathBuf>,
    limit: Option<usize>,
    format: String,
) -> Result<()> {
    let config = context::load(config_path.as_deref(), false)?;
    let (scores, _) = context::open_scores(&config).await;
    let limit = limit.unwrap_or(config.quiz.leaderboard_size);
    let top = scores.top(limit);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(top)?),
        "table" => print_scores(top),
        other => bail!("unknown format: {other} (expected table or json)"),
    }
    Ok(())
}

/// Print ranked entries, or a notice when there are none.
pub fn print_scores(entries: &[ScoreEntry]) {
    if entries.is_empty() {
        println!("No scores yet. Play a round with `pokequiz play`.");
    } else {
        println!("{}", scores_table(entries));
    }
}

pub fn scores_table(entries: &[ScoreEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Player", "Score", "Time", "Date"]);

    for (rank, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(format!("{} {}", medal(rank), rank + 1)),
            Cell::new(&entry.player_name),
            Cell::new(format!("{} pts", entry.score)),
            Cell::new(format_time(entry.time)),
            Cell::new(format_date(&entry.date)),
        ]);
    }
    table
}
