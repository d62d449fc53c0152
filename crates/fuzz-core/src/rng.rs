//! Deterministic random draw source.
//!
//! A 31-bit linear congruential generator. The constants and the mapping from
//! state to ranges are fixed so that independent implementations replay the
//! exact same draw sequence for the same seed.

use sha2::{Digest, Sha256};

const STATE_MASK: u64 = 0x7FFF_FFFF;
const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;
/// 2^31, the exclusive upper bound of the state.
const MODULUS: f64 = 2_147_483_648.0;

/// Error type for draw operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RngError {
    /// Lower bound exceeds upper bound
    #[error("min ({min}) must not exceed max ({max})")]
    InvalidRange { min: i64, max: i64 },

    /// Nothing to choose from
    #[error("cannot pick from an empty set")]
    EmptyChoice,
}

/// Reduce an opaque seed text to a nonzero 64-bit integer.
///
/// The first eight bytes of the SHA-256 digest are read big-endian; a zero
/// result is replaced by one.
pub fn seed_from_text(seed: &str) -> u64 {
    let digest = Sha256::digest(seed.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    match u64::from_be_bytes(bytes) {
        0 => 1,
        value => value,
    }
}

/// Seeded pseudo-random draw source.
///
/// Every draw advances the state exactly once, so the draw sequence depends
/// only on the seed and on the order of calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// Create a generator from a numeric seed. Only the low 31 bits are used.
    pub fn new(seed: u64) -> Self {
        let state = seed & STATE_MASK;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    /// Create a generator from a seed text, see [`seed_from_text`].
    pub fn from_seed_text(seed: &str) -> Self {
        Self::new(seed_from_text(seed))
    }

    /// Current state, mostly useful for diagnostics.
    pub fn state(&self) -> u64 {
        self.state
    }

    fn advance(&mut self) {
        self.state = MULTIPLIER
            .wrapping_mul(self.state)
            .wrapping_add(INCREMENT)
            & STATE_MASK;
    }

    /// Draw a uniform integer in `min..=max`.
    pub fn next_int(&mut self, min: i64, max: i64) -> Result<i64, RngError> {
        if min > max {
            return Err(RngError::InvalidRange { min, max });
        }

        self.advance();
        let span = (i128::from(max) - i128::from(min) + 1) as f64;
        let offset = (self.state as f64 / MODULUS * span).floor() as i128;
        // Huge spans lose precision in f64; never step past the upper bound.
        Ok((i128::from(min) + offset).min(i128::from(max)) as i64)
    }

    /// Draw a float in `[0, 1)`.
    pub fn next_float(&mut self) -> f64 {
        self.advance();
        self.state as f64 / MODULUS
    }

    /// Return true with the given probability.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_float() < probability
    }

    /// Draw an index into a collection of `len` elements.
    pub fn pick_index(&mut self, len: usize) -> Result<usize, RngError> {
        if len == 0 {
            return Err(RngError::EmptyChoice);
        }
        let last = i64::try_from(len - 1).unwrap_or(i64::MAX);
        let index = self.next_int(0, last)?;
        Ok(index as usize)
    }

    /// Pick one element of a slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, RngError> {
        let index = self.pick_index(items.len())?;
        Ok(&items[index])
    }

    /// Weighted discrete choice over `(item, weight)` entries.
    ///
    /// Draws a target in `1..=sum` and returns the first entry whose running
    /// weight reaches it, walking the table in order.
    pub fn weighted<'a, T>(&mut self, table: &'a [(T, u32)]) -> Result<&'a T, RngError> {
        let sum: i64 = table.iter().map(|(_, weight)| i64::from(*weight)).sum();
        if sum == 0 {
            return Err(RngError::EmptyChoice);
        }

        let target = self.next_int(1, sum)?;
        let mut acc = 0i64;
        for (item, weight) in table {
            acc += i64::from(*weight);
            if target <= acc {
                return Ok(item);
            }
        }

        // target <= sum, so the loop always returns
        Ok(&table[0].0)
    }
}
