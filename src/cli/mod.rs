pub mod commands;

use crate::scoring::ClampPolicy;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "podscore")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Rank inference pods by KV cache utilization and queue depth", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Scoring config file (YAML)")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Score and rank pods from a JSON array")]
    Rank {
        #[arg(short, long, help = "Input file, '-' or omitted for stdin")]
        input: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        #[arg(long, help = "Clamp policy (upper-bound, forced-constant)")]
        clamp: Option<ClampPolicy>,

        #[arg(long, help = "Score through the raw-bytes decoding path")]
        decode_path: bool,

        #[arg(long, help = "Print Prometheus metrics to stderr afterwards")]
        metrics: bool,
    },
    #[command(about = "Generate a synthetic pod fleet as JSON")]
    Generate {
        #[arg(short, long, default_value = "30", help = "Number of pods")]
        pods: usize,

        #[arg(short, long, default_value = "30", help = "Adapters per pod")]
        adapters: usize,

        #[arg(long, default_value = "10", help = "Exclusive upper bound for queue counts")]
        max_queue: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
