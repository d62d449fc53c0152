//! CLI argument definitions for the result comparator.

use crate::compare::DEFAULT_SAMPLE_LIMIT;
use clap::Args;
use std::path::PathBuf;

/// Arguments for comparing two result streams.
#[derive(Args, Clone, Debug)]
pub struct CompareArgs {
    /// Result stream of the first implementation
    #[arg(long)]
    pub a: PathBuf,

    /// Result stream of the second implementation
    #[arg(long)]
    pub b: PathBuf,

    /// Job stream both results were produced from
    #[arg(long)]
    pub job: Option<PathBuf>,

    /// Directory for mismatch artifacts
    #[arg(long)]
    pub outdir: Option<PathBuf>,

    /// Number of leading positions to include in the summary
    #[arg(long, default_value_t = DEFAULT_SAMPLE_LIMIT)]
    pub samples: usize,
}
