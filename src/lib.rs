//! Differential fuzzing harness for numeric-string key handling.
//!
//! The harness produces a deterministic job of key-value store operations,
//! lets two implementations replay it, and compares their normalized result
//! streams. The pieces live in their own crates:
//!
//! - [`fuzz_core`] - RNG, reply model, normalizer and stream records
//! - [`job_producer`] - Deterministic job generation
//! - [`result_compare`] - Comparison and divergence explanation
//!
//! This crate only wires them to the command line.

pub mod harness;

pub use fuzz_core;
pub use job_producer;
pub use result_compare;
