//! Core types for the hashkey-fuzz differential harness.
//!
//! This crate provides the foundational pieces shared by the job producer and
//! the result comparator:
//!
//! - [`DeterministicRng`] - Seeded draw source; every generated job is a pure
//!   function of its draw sequence
//! - [`Reply`] - Closed value model for store replies
//! - [`normalize`] - Canonicalization of replies into a comparable form
//! - [`JobLine`] / [`ResultLine`] - Typed records of the line-delimited streams
//! - [`stream`] - Strict loaders for Job and Result streams
//!
//! # Architecture
//!
//! ```text
//! fuzz-core (this crate)
//!    │
//!    ├─── job-producer    (draws from DeterministicRng, emits JobLine records)
//!    │
//!    └─── result-compare  (loads ResultRecord streams, diffs Reply trees)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fuzz_core::{normalize, Reply};
//!
//! let native = Reply::Float(42.0);
//! assert_eq!(normalize(&native), Reply::Text("42".to_string()));
//! ```

pub mod normalize;
pub mod record;
pub mod reply;
pub mod rng;
pub mod stream;

// Re-exports for convenience
pub use normalize::{format_float, normalize};
pub use record::{
    Command, ErrorDescriptor, HashReadArgs, HashWriteArgs, JobLine, JobMeta, KeyArgs, Opcode,
    Operation, PairArgs, PingArgs, ResultLine, ResultMeta, ResultRecord, TypeArgs,
};
pub use reply::{MapKey, Reply};
pub use rng::{seed_from_text, DeterministicRng, RngError};
pub use stream::{load_job, load_job_file, load_results, load_results_file, Job, StreamLoadError};
