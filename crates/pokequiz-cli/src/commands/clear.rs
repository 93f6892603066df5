//! The `pokequiz clear` command.

use std::path::PathBuf;

use anyhow::Result;

use pokequiz_core::scores::Durability;

use crate::context;
use crate::prompt::Prompt;

pub async fn execute(config_path: Option<PathBuf>, yes: bool) -> Result<()> {
    let config = context::load(config_path.as_deref(), false)?;
    let (mut scores, _) = context::open_scores(&config).await;

    if scores.is_empty() {
        println!("Leaderboard is already empty.");
        return Ok(());
    }

    if !yes {
        let question = format!("Delete all {} recorded scores?", scores.len());
        if !Prompt::stdin().confirm(&question).await? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    match scores.clear().await {
        Durability::MemoryOnly => {
            anyhow::bail!("leaderboard could not be saved; scores will reappear on restart")
        }
        _ => println!("Leaderboard cleared."),
    }
    Ok(())
}
