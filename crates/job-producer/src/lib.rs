//! Deterministic job producer for the hashkey-fuzz differential harness.
//!
//! A job is a replayable sequence of key-value store operations aimed at the
//! corners of numeric-string handling: keys and fields like `"01"`, `"1e3"`,
//! `" 1"` or `"１２３"`. Every decision is drawn from a [`DeterministicRng`]
//! derived from the seed text, so the same seed and options always yield the
//! same byte stream.
//!
//! # Architecture
//!
//! ```text
//! ProducerOptions (flags / YAML)
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │     JobProducer      │
//! │                      │
//! │  - rng (LCG)         │
//! │  - pools             │
//! │  - known registry    │
//! │  - index             │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!    {"t":"meta",...}
//!    {"t":"op","i":0,"op":"HMSET","args":{...}}
//!    ...
//! ```
//!
//! # Example
//!
//! ```rust
//! use job_producer::{JobProducer, ProducerOptions};
//!
//! let mut options = ProducerOptions::with_seed("nightly-42");
//! options.ops = 10;
//!
//! let mut out = Vec::new();
//! JobProducer::new(options).unwrap().produce(&mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap().lines().count(), 11);
//! ```
//!
//! [`DeterministicRng`]: fuzz_core::DeterministicRng

pub mod args;
pub mod generators;
pub mod options;
pub mod producer;
pub mod registry;

// Re-exports for convenience
pub use args::ProduceArgs;
pub use generators::{generate_numeric_string, generate_value};
pub use options::{OptionsError, ProducerOptions, SelectionBias};
pub use producer::{GeneratorError, JobProducer, OperationIterator, Pools};
pub use registry::{token, KnownRegistry};
