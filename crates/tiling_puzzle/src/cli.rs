//! Command-line interface for tiling_puzzle.

use clap::Parser;
use std::path::PathBuf;

/// Tiling Puzzle - swap tiles until the picture is whole again
#[derive(Parser, Debug)]
#[command(name = "tiling_puzzle")]
#[command(about = "Swap-style tile puzzle in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./tiling_puzzle.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for reproducible shuffles (defaults to the system clock)
    #[arg(long)]
    pub seed: Option<u64>,

    /// File that receives log output
    #[arg(long, default_value = "tiling_puzzle.log")]
    pub log_file: PathBuf,
}
