//! Terminal front end for the learning assistant.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use learn_core::model::Difficulty;

mod commands;
mod db;

#[derive(Parser)]
#[command(name = "learn", version, about = "AI-assisted study companion")]
struct Cli {
    /// SQLite database URL or path
    #[arg(long, global = true, env = "LEARN_DB_URL", default_value = db::DEFAULT_DB_URL)]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote of the day, stats and recent activity
    Dashboard,

    /// Full progress overview and quiz history
    Progress,

    /// Explain a topic and mark it as learned
    Explain {
        topic: String,

        /// easy, medium or advanced
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
    },

    /// Take a five-question quiz
    Quiz { topic: String },

    /// Study a generated flashcard deck
    Flashcards { topic: String },

    /// Summarize text from a file or stdin
    Summarize {
        /// Read text from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,

        /// Save the summary to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        process::exit(2);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let services = commands::connect(&cli.db).await?;

    match cli.command {
        Commands::Dashboard => commands::dashboard(&services).await,
        Commands::Progress => {
            commands::progress(&services);
            Ok(())
        }
        Commands::Explain { topic, difficulty } => {
            commands::explain(&services, &topic, difficulty).await
        }
        Commands::Quiz { topic } => commands::quiz(&services, &topic).await,
        Commands::Flashcards { topic } => commands::flashcards(&services, &topic).await,
        Commands::Summarize { file, out } => {
            commands::summarize(&services, file.as_deref(), out.as_deref()).await
        }
    }
}
