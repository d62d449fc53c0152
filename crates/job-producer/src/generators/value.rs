//! General value generator.

use super::numeric::generate_numeric_string;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fuzz_core::{DeterministicRng, RngError};

const PHRASES: [&str; 8] = [
    "alpha",
    "beta",
    "gamma",
    "delta",
    "epsilon",
    "numeric-string",
    "fuzz",
    "redis",
];

/// Generate one value candidate.
///
/// Printable ASCII, numeric strings and base64 blobs are equally likely;
/// short phrases take the remaining two fifths.
pub fn generate_value(rng: &mut DeterministicRng) -> Result<String, RngError> {
    match rng.next_int(0, 4)? {
        0 => random_ascii(rng),
        1 => generate_numeric_string(rng),
        2 => binaryish(rng),
        _ => short_phrase(rng),
    }
}

fn random_ascii(rng: &mut DeterministicRng) -> Result<String, RngError> {
    let length = rng.next_int(1, 32)?;
    let mut out = String::with_capacity(length as usize);
    for _ in 0..length {
        out.push(char::from(rng.next_int(32, 126)? as u8));
    }
    Ok(out)
}

fn binaryish(rng: &mut DeterministicRng) -> Result<String, RngError> {
    let length = rng.next_int(1, 16)?;
    let bytes = (0..length)
        .map(|_| rng.next_int(0, 255).map(|b| b as u8))
        .collect::<Result<Vec<u8>, _>>()?;
    Ok(STANDARD.encode(bytes))
}

fn short_phrase(rng: &mut DeterministicRng) -> Result<String, RngError> {
    let index = rng.next_int(0, PHRASES.len() as i64 - 1)?;
    let mut phrase = PHRASES[index as usize].to_string();
    if rng.chance(0.3) {
        phrase.push(':');
        phrase.push_str(&rng.next_int(0, 10_000)?.to_string());
    }
    Ok(phrase)
}
