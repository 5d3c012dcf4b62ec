//! sweeper CLI - train a shared Q-table across a population of minesweepers

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sweeper")]
#[command(version, about = "Shared-table Q-learning for grid minesweepers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train sweepers on a generated minefield
    Train(sweeper::cli::commands::train::TrainArgs),

    /// Print or write the default controller configuration
    Config(sweeper::cli::commands::config::ConfigArgs),
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => sweeper::cli::commands::train::execute(args),
        Commands::Config(args) => sweeper::cli::commands::config::execute(args),
    }
}
