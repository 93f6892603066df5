//! The `pokequiz status` command.

use std::path::PathBuf;

use anyhow::Result;

use pokequiz_core::scores::LoadSource;

use crate::context;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = context::load(config_path.as_deref(), false)?;
    let (monitor, _) = context::connect_catalog(&config).await?;

    println!("Network:  {}", monitor.status());
    println!("Catalog:  {}", config.catalog.base_url);
    println!("Language: {}", config.catalog.language);

    let (scores, source) = context::open_scores(&config).await;
    let (primary, secondary) = scores.backend_names();
    println!("Storage:  {} (fallback: {secondary})", primary.unwrap_or("none"));

    let origin = match source {
        LoadSource::Primary => primary.unwrap_or("primary"),
        LoadSource::Secondary => secondary,
        LoadSource::Empty => "nothing stored yet",
    };
    println!("Scores:   {} ({origin})", scores.len());
    Ok(())
}
