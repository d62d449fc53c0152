//! Command handlers.
//!
//! Handlers return their results to `main`, which renders them and picks the
//! process exit status.

pub mod compare;
pub mod produce;

pub use compare::{run_compare, CompareRun};
pub use produce::run_produce;

/// Exit status when both result streams agree.
pub const EXIT_MATCH: i32 = 0;
/// Exit status when the result streams diverge.
pub const EXIT_MISMATCH: i32 = 1;
/// Exit status when a stream cannot be loaded or an artifact cannot be
/// written. Usage errors exit with 2 from the argument parser.
pub const EXIT_INFRA: i32 = 3;
