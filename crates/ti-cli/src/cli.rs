//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Fixed-interval time range walker.
///
/// Splits a time range into equal buckets and summarizes timestamped samples
/// per bucket.
#[derive(Debug, Parser)]
#[command(name = "ti", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the buckets a time range splits into.
    Buckets(RangeArgs),

    /// Aggregate samples from a JSONL file per bucket.
    Aggregate(AggregateArgs),
}

/// The range to walk.
#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// Start of the range (ISO 8601, "now", or relative like "7 days ago").
    /// Defaults to the configured start.
    #[arg(long)]
    pub start: Option<String>,

    /// End of the range (ISO 8601, "now", or relative like "2 hours ago").
    /// Defaults to the configured end, or now.
    #[arg(long)]
    pub end: Option<String>,

    /// Interval length in seconds. Defaults to the configured interval.
    #[arg(long)]
    pub interval: Option<u64>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct AggregateArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// JSONL file of samples (`{"timestamp": ..., "value": ...}`), or `-` for stdin.
    #[arg(long)]
    pub input: PathBuf,

    /// Aggregation function: count, sum, mean, min, max.
    #[arg(long)]
    pub function: Option<String>,
}
