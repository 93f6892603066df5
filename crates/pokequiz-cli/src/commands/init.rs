//! The `pokequiz init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    let path = Path::new("pokequiz.toml");
    if path.exists() {
        println!("pokequiz.toml already exists, skipping.");
        return Ok(());
    }

    std::fs::write(path, SAMPLE_CONFIG).context("failed to write pokequiz.toml")?;
    println!("Created pokequiz.toml");

    println!("\nNext steps:");
    println!("  1. Pick the name language in pokequiz.toml (fr, en or jp)");
    println!("  2. Run: pokequiz play");
    println!("  3. Run: pokequiz leaderboard");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# pokequiz configuration

[catalog]
base_url = "https://tyradex.vercel.app/api/v1/pokemon"
request_timeout_secs = 10
probe_timeout_secs = 5
language = "fr"
offline = false

[quiz]
length = 10
leaderboard_size = 5

[storage]
# data_dir = "${HOME}/.local/share/pokequiz"
file_name = "pokemon_quiz_scores.json"
native_files = true
io_timeout_ms = 5000
"#;
