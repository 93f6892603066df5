//! pokequiz CLI — guess the Pokémon, keep the leaderboard.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod context;
mod prompt;

#[derive(Parser)]
#[command(name = "pokequiz", version, about = "Guess the Pokémon from its picture")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a round
    Play {
        /// Number of questions (default: from config)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        length: Option<u16>,

        /// Player name to record the score under
        #[arg(long)]
        player: Option<String>,

        /// Play from the built-in list without touching the network
        #[arg(long)]
        offline: bool,
    },

    /// Show the best scores
    Leaderboard {
        /// Number of entries to show (default: from config)
        #[arg(long)]
        limit: Option<usize>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show a player's best score
    Best {
        /// Player name (case-insensitive)
        #[arg(long)]
        player: String,
    },

    /// Delete every recorded score
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Check connectivity and storage backends
    Status,

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pokequiz=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Play {
            length,
            player,
            offline,
        } => commands::play::execute(config, length.map(usize::from), player, offline).await,
        Commands::Leaderboard { limit, format } => {
            commands::leaderboard::execute(config, limit, format).await
        }
        Commands::Best { player } => commands::best::execute(config, player).await,
        Commands::Clear { yes } => commands::clear::execute(config, yes).await,
        Commands::Status => commands::status::execute(config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
