mod chat;
mod export;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "jobhound")]
#[command(about = "Collect job-search criteria and aggregate hh.ru vacancies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive step-by-step dialogue (/start, /cancel, /quit)
    Chat {
        /// Session identifier; stands in for a chat id
        #[arg(long, default_value = "local")]
        session: String,
    },
    /// One-shot search from a free-text request, e.g. "python от 120000 удаленка в Москве"
    Search {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Print the preview only, without writing a CSV file
        #[arg(long)]
        no_export: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = jobhound_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat { session } => chat::run_chat(&config, session.into()).await,
        Commands::Search { text, no_export } => {
            search::run_search(&config, &text.join(" "), !no_export).await
        }
    }
}
