//! Candidate string generators.
//!
//! Both generators are pure functions of the draws they take from the
//! [`DeterministicRng`]; they hold no state of their own.

pub mod numeric;
pub mod value;

use fuzz_core::{DeterministicRng, RngError};

pub use numeric::generate_numeric_string;
pub use value::generate_value;

/// A string of `min..=max` random decimal digits.
///
/// An empty draw renders as `"0"`.
pub(crate) fn digits(rng: &mut DeterministicRng, min: i64, max: i64) -> Result<String, RngError> {
    let length = rng.next_int(min, max)?;
    let mut out = String::with_capacity(usize::try_from(length).unwrap_or(0));
    for _ in 0..length {
        let digit = rng.next_int(0, 9)?;
        out.push(char::from(b'0' + digit as u8));
    }

    if out.is_empty() {
        out.push('0');
    }
    Ok(out)
}

/// A run of `0`s whose length is drawn from `min..=max`.
pub(crate) fn zeros(rng: &mut DeterministicRng, min: i64, max: i64) -> Result<String, RngError> {
    let count = rng.next_int(min, max)?;
    Ok("0".repeat(usize::try_from(count).unwrap_or(0)))
}
