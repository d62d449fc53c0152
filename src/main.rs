//! Command-line interface for hashkey-fuzz
//!
//! # Usage Examples
//!
//! ```bash
//! # Produce a job
//! hashkey-fuzz produce --seed nightly-42 --out job.jsonl --ops 2000
//!
//! # Produce a job from an options file, overriding one setting
//! hashkey-fuzz produce --seed nightly-42 --out job.jsonl \
//!   --config fuzz.yaml --keyspace 500
//!
//! # Compare the results of two implementations
//! hashkey-fuzz compare --a ext.results.jsonl --b native.results.jsonl \
//!   --job job.jsonl --outdir artifacts/
//! ```
//!
//! ## Exit Status
//! - `0`: result streams match (or the job was written)
//! - `1`: result streams diverge, or the job could not be produced
//! - `2`: invalid arguments
//! - `3`: a stream could not be loaded or an artifact could not be written

use clap::{Parser, Subcommand};
use hashkey_fuzz::harness::{self, EXIT_INFRA, EXIT_MATCH, EXIT_MISMATCH};
use job_producer::ProduceArgs;
use result_compare::CompareArgs;

#[derive(Parser)]
#[command(name = "hashkey-fuzz")]
#[command(about = "Differential fuzzing harness for numeric-string keys and hash fields")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce a deterministic job stream
    Produce {
        #[command(flatten)]
        args: ProduceArgs,
    },

    /// Compare two result streams and explain the first divergence
    Compare {
        #[command(flatten)]
        args: CompareArgs,
    },
}

#[tokio::main]
async fn main() {
    std::process::exit(run().await)
}

async fn run() -> i32 {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Produce { args } => match harness::run_produce(&args).await {
            Ok(_) => 0,
            Err(e) => {
                eprintln!("Error: {e:#}");
                1
            }
        },
        Commands::Compare { args } => match harness::run_compare(&args).await {
            Ok(run) => {
                print!("{}", run.report);
                if let Some(artifacts) = &run.artifacts {
                    eprintln!("Report written to {}", artifacts.diff.display());
                }
                if run.outcome.matched {
                    EXIT_MATCH
                } else {
                    EXIT_MISMATCH
                }
            }
            Err(e) => {
                eprintln!("Error: {e:#}");
                EXIT_INFRA
            }
        },
    }
}
