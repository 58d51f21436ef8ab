//! Tic-tac-toe Q-learning CLI
//!
//! - `train`: bootstrap pretraining plus self-play or play against random moves
//! - `evaluate`: greedy games against a random opponent or another table
//! - `play`: a console game against a trained table
//! - `dataset`: write a sample historical data file

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "ttt-qlearn")]
#[command(version, about = "Tabular Q-learning for tic-tac-toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train Q-learning agents
    Train(Box<ttt_qlearn::cli::commands::train::TrainArgs>),

    /// Evaluate a trained agent
    Evaluate(ttt_qlearn::cli::commands::evaluate::EvaluateArgs),

    /// Play against a trained agent
    Play(ttt_qlearn::cli::commands::play::PlayArgs),

    /// Generate a sample historical data file
    Dataset(ttt_qlearn::cli::commands::dataset::DatasetArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => ttt_qlearn::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => ttt_qlearn::cli::commands::evaluate::execute(args),
        Commands::Play(args) => ttt_qlearn::cli::commands::play::execute(args),
        Commands::Dataset(args) => ttt_qlearn::cli::commands::dataset::execute(args),
    }
}
