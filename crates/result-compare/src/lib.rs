//! Result stream comparator for the hashkey-fuzz differential harness.
//!
//! Two implementations replay the same job and write normalized result
//! streams. This crate decides whether the streams agree, and when they
//! don't, explains the first divergence:
//!
//! - [`compare`] finds the first diverging position
//! - [`explain`] / [`explain_records`] list leaf differences by path
//! - [`summarize`] pairs up the first few positions of both streams
//! - [`render_report`] turns all of that into a plain-text report
//!
//! # Example
//!
//! ```rust
//! use fuzz_core::{Opcode, Reply, ResultRecord};
//! use result_compare::compare;
//!
//! let a = vec![ResultRecord::success(0, Opcode::BulkRead, Reply::text("3"))];
//! let b = vec![ResultRecord::success(0, Opcode::BulkRead, Reply::text("03"))];
//!
//! let outcome = compare(&a, &b);
//! assert!(!outcome.matched);
//! assert_eq!(outcome.index, Some(0));
//! ```

pub mod args;
pub mod artifacts;
pub mod compare;
pub mod diff;
pub mod report;

pub use args::CompareArgs;
pub use artifacts::{write_artifacts, ArtifactError, Artifacts, DIFF_FILE, JOB_FILE};
pub use compare::{compare, summarize, ComparisonOutcome, SamplePair, SampleSummary, DEFAULT_SAMPLE_LIMIT};
pub use diff::{explain, explain_records, Difference, Side, MAX_DEPTH};
pub use report::render_report;
