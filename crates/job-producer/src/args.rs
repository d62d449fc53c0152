//! CLI argument definitions for the job producer.

use crate::options::{OptionsError, ProducerOptions};
use clap::Args;
use std::path::PathBuf;

/// Arguments for producing a job stream.
///
/// Flags override the options file, which overrides the defaults. The seed
/// has no default: it comes from `--seed` (or `FUZZ_SEED`) or from the file.
#[derive(Args, Clone, Debug)]
pub struct ProduceArgs {
    /// Seed text the whole job is derived from
    #[arg(long, env = "FUZZ_SEED")]
    pub seed: Option<String>,

    /// Path of the job stream to write
    #[arg(long, short = 'o')]
    pub out: PathBuf,

    /// Path to a YAML options file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of operations
    #[arg(long)]
    pub ops: Option<u64>,

    /// Size of the key pool
    #[arg(long)]
    pub keyspace: Option<usize>,

    /// Size of the hash-name pool
    #[arg(long)]
    pub hashspace: Option<usize>,

    /// Size of the field-name pool
    #[arg(long)]
    pub fields: Option<usize>,

    /// Size of the value pool
    #[arg(long)]
    pub values: Option<usize>,

    /// Upper bound of keys per bulk read
    #[arg(long)]
    pub max_keys_per_op: Option<u32>,

    /// Upper bound of fields per hash read
    #[arg(long)]
    pub max_fields_per_op: Option<u32>,

    /// Upper bound of pairs per write
    #[arg(long)]
    pub max_set_per_op: Option<u32>,
}

impl ProduceArgs {
    /// Resolve the effective producer options.
    pub fn to_options(&self) -> Result<ProducerOptions, OptionsError> {
        let mut options = match &self.config {
            Some(path) => ProducerOptions::from_file(path)?,
            None => ProducerOptions::default(),
        };

        if let Some(seed) = &self.seed {
            options.seed = seed.clone();
        } else if options.seed.is_empty() {
            return Err(OptionsError::MissingSeed);
        }
        if let Some(ops) = self.ops {
            options.ops = ops;
        }
        if let Some(keyspace) = self.keyspace {
            options.keyspace = keyspace;
        }
        if let Some(hashspace) = self.hashspace {
            options.hashspace = hashspace;
        }
        if let Some(fields) = self.fields {
            options.fields = fields;
        }
        if let Some(values) = self.values {
            options.values = values;
        }
        if let Some(max) = self.max_keys_per_op {
            options.max_keys_per_op = max;
        }
        if let Some(max) = self.max_fields_per_op {
            options.max_fields_per_op = max;
        }
        if let Some(max) = self.max_set_per_op {
            options.max_set_per_op = max;
        }

        Ok(options)
    }
}
