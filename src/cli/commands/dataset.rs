//! Dataset command - write random finished games in UCI tic-tac-toe format

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::CsvSampleSource,
    cli::output::{format_number, format_percent, print_kv, print_section},
    pipeline::synthetic_samples,
    ports::SampleLabel,
    q_learning::agent::build_rng,
};

#[derive(Parser, Debug)]
#[command(about = "Generate a sample historical data file")]
pub struct DatasetArgs {
    /// Output CSV file
    #[arg(long, short = 'O', default_value = "tic-tac-toe.data")]
    pub output: PathBuf,

    /// Number of random games to record
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: DatasetArgs) -> Result<()> {
    let mut rng = build_rng(args.seed);
    let samples = synthetic_samples(args.games, &mut rng)?;
    CsvSampleSource::new(&args.output)
        .write_samples(&samples)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let wins = samples
        .iter()
        .filter(|s| s.label == SampleLabel::Win)
        .count();
    print_section("Dataset");
    print_kv("File", &args.output.display().to_string());
    print_kv("Games", &format_number(samples.len()));
    print_kv(
        "X wins",
        &format!("{} ({})", format_number(wins), format_percent(wins, samples.len())),
    );
    Ok(())
}
