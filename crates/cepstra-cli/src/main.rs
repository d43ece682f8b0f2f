//! Cepstra CLI - extract low-level audio features from WAV files.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cepstra")]
#[command(author, version, about = "Cepstra feature extraction CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract MFCC, spectral RMS, roll-off and zero-crossing rate
    Extract(commands::extract::ExtractArgs),

    /// List available algorithms and their parameters
    Algorithms(commands::algorithms::AlgorithmsArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so extracted features can be piped from stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract(args) => commands::extract::run(args),
        Commands::Algorithms(args) => commands::algorithms::run(args),
    }
}
