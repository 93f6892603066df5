//! The `pokequiz play` command.

use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::warn;

use pokequiz_core::error::QuizError;
use pokequiz_core::format::format_time;
use pokequiz_core::game::QuizGame;
use pokequiz_core::scores::Durability;
use pokequiz_core::session::build_round;

use crate::commands::leaderboard::print_scores;
use crate::context;
use crate::prompt::Prompt;

pub async fn execute(
    config_path: Option<PathBuf>,
    length: Option<usize>,
    player: Option<String>,
    offline: bool,
) -> Result<()> {
    if player.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(QuizError::EmptyPlayerName.into());
    }

    let config = context::load(config_path.as_deref(), offline)?;
    let (monitor, mut catalog) = context::connect_catalog(&config).await?;
    let (mut scores, _) = context::open_scores(&config).await;

    let language = config.catalog.language;
    let length = length.unwrap_or(config.quiz.length);

    println!("{}", monitor.status());
    let round = build_round(&mut catalog, length, language).await;
    if round.is_empty() {
        bail!("no Pokémon available to build a round");
    }
    if round.len() < length {
        warn!(requested = length, got = round.len(), "round is shorter than requested");
    }

    let mut prompt = Prompt::stdin();
    let mut game = QuizGame::start(round, language);

    while let Some(entry) = game.current() {
        println!();
        println!(
            "Question {}/{} ({}%)",
            game.position(),
            game.len(),
            game.progress_percent()
        );
        match entry.image() {
            Some(image) => println!("Who's that Pokémon? {image}"),
            None => println!("Who's that Pokémon? (no picture, #{})", entry.id),
        }

        let guess = prompt.ask_non_empty("> ").await?;
        match game.submit(&guess) {
            Ok(outcome) if outcome.correct => println!("✅ Correct! It's {}.", outcome.expected),
            Ok(outcome) => println!("❌ Incorrect. It was {}.", outcome.expected),
            Err(QuizError::EmptyGuess) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let result = game.finish();
    println!();
    println!("Score: {}/{}", result.score, result.total);
    println!("Time: {}", format_time(result.time_secs));

    let saved = loop {
        let name = match &player {
            Some(name) => name.clone(),
            None => prompt.ask_non_empty("Your name: ").await?,
        };
        match scores.add_score(&name, result.score, result.time_secs).await {
            Ok(saved) => break saved,
            Err(QuizError::EmptyPlayerName) if player.is_none() => continue,
            Err(e) => return Err(e.into()),
        }
    };

    match saved.durability {
        Durability::MemoryOnly => {
            eprintln!("Warning: score could not be saved and will be lost when the game closes.")
        }
        _ => println!("Score saved for {}.", saved.entry.player_name),
    }

    println!();
    print_scores(scores.top(config.quiz.leaderboard_size));
    Ok(())
}
