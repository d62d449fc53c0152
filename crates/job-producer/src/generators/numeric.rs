//! Numeric-string generator.
//!
//! Produces strings that sit on the edges of numeric-string coercion: leading
//! zeros, explicit signs, integer width boundaries, exponents, padded
//! decimals, hex look-alikes, whitespace, junk suffixes, empty strings,
//! non-ASCII digits, and namespaced prefixes over all of the above.

use super::{digits, zeros};
use fuzz_core::{DeterministicRng, RngError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    LeadingZero,
    Signed,
    Large,
    Exponent,
    Decimal,
    Hexish,
    Whitespace,
    Junk,
    Emptyish,
    Utf8Digits,
    Prefixed,
}

/// Category weights. The order is part of the draw contract.
const CATEGORY_WEIGHTS: [(Category, u32); 11] = [
    (Category::LeadingZero, 12),
    (Category::Signed, 8),
    (Category::Large, 6),
    (Category::Exponent, 6),
    (Category::Decimal, 6),
    (Category::Hexish, 3),
    (Category::Whitespace, 2),
    (Category::Junk, 4),
    (Category::Emptyish, 1),
    (Category::Utf8Digits, 1),
    (Category::Prefixed, 5),
];

const SIGNS: [&str; 2] = ["+", "-"];

/// 32/64-bit signed and unsigned boundaries and their neighbours.
const BOUNDARIES: [&str; 5] = [
    "2147483647",
    "2147483648",
    "9223372036854775807",
    "9223372036854775808",
    "18446744073709551615",
];

const HEX_PREFIXES: [&str; 4] = ["0x", "0X", "00x", "00X"];
const SPACES: [&str; 3] = [" ", "\t", "\n"];
const JUNK_SAMPLES: [&str; 8] = [
    "01a", "1a", "1_000", "00-1", "1+1", "0e123foo", "xyz", "k:0e123",
];
const JUNK_SUFFIXES: [&str; 4] = ["a", "_foo", "-bar", "+baz"];
const UTF8_DIGITS: [&str; 4] = ["１２３", "١٢٣", "𝟘𝟙𝟚", "𝟢𝟣𝟤"];
const NAMESPACES: [&str; 5] = ["user:", "tweet:", "hash:", "ns:", "key:"];

/// Generate one numeric-string candidate.
///
/// The prefixed category prepends a namespace to a freshly generated
/// candidate. Its nesting depth follows from its weight alone; the loop below
/// walks the chain without recursing, taking the same draws in the same order.
pub fn generate_numeric_string(rng: &mut DeterministicRng) -> Result<String, RngError> {
    let mut out = String::new();
    loop {
        let tail = match *rng.weighted(&CATEGORY_WEIGHTS)? {
            Category::Prefixed => {
                out.push_str(rng.pick(&NAMESPACES)?);
                continue;
            }
            Category::LeadingZero => leading_zero(rng)?,
            Category::Signed => signed(rng)?,
            Category::Large => large(rng)?,
            Category::Exponent => exponent(rng)?,
            Category::Decimal => decimal(rng)?,
            Category::Hexish => hexish(rng)?,
            Category::Whitespace => whitespace(rng)?,
            Category::Junk => junk(rng)?,
            Category::Emptyish => (if rng.chance(0.5) { "" } else { " " }).to_string(),
            Category::Utf8Digits => rng.pick(&UTF8_DIGITS)?.to_string(),
        };

        out.push_str(&tail);
        return Ok(out);
    }
}

fn leading_zero(rng: &mut DeterministicRng) -> Result<String, RngError> {
    let padding = zeros(rng, 1, 8)?;
    Ok(padding + &digits(rng, 1, 6)?)
}

fn signed(rng: &mut DeterministicRng) -> Result<String, RngError> {
    let sign = rng.pick(&SIGNS)?;
    let padding = if rng.chance(0.5) {
        zeros(rng, 0, 4)?
    } else {
        String::new()
    };
    Ok(format!("{sign}{padding}{}", digits(rng, 1, 6)?))
}

fn large(rng: &mut DeterministicRng) -> Result<String, RngError> {
    if rng.chance(0.3) {
        return Ok(rng.pick(&BOUNDARIES)?.to_string());
    }
    digits(rng, 8, 20)
}

fn exponent(rng: &mut DeterministicRng) -> Result<String, RngError> {
    let sign = if rng.chance(0.5) { *rng.pick(&SIGNS)? } else { "" };
    let base = if rng.chance(0.2) {
        "0".to_string()
    } else {
        rng.next_int(0, 9)?.to_string()
    };
    let mantissa = if rng.chance(0.5) {
        format!(".{}", digits(rng, 1, 3)?)
    } else {
        String::new()
    };
    let exp_sign = if rng.chance(0.3) { *rng.pick(&SIGNS)? } else { "" };
    let marker = rng.pick(&["e", "E"])?;
    let exp_digits = digits(rng, 1, 4)?;
    Ok(format!("{sign}{base}{mantissa}{marker}{exp_sign}{exp_digits}"))
}

fn decimal(rng: &mut DeterministicRng) -> Result<String, RngError> {
    let left = if rng.chance(0.4) {
        String::new()
    } else {
        digits(rng, 1, 3)?
    };
    let right = digits(rng, 1, 4)?;
    let pad_left = if rng.chance(0.5) {
        zeros(rng, 0, 3)?
    } else {
        String::new()
    };
    let pad_right = if rng.chance(0.5) {
        zeros(rng, 0, 3)?
    } else {
        String::new()
    };
    // Both entries are the same separator, the draw still counts
    let dot = rng.pick(&[".", "."])?;
    Ok(format!("{pad_left}{left}{dot}{right}{pad_right}"))
}

fn hexish(rng: &mut DeterministicRng) -> Result<String, RngError> {
    let prefix = rng.pick(&HEX_PREFIXES)?;
    Ok(format!("{prefix}{}", digits(rng, 1, 4)?))
}

fn whitespace(rng: &mut DeterministicRng) -> Result<String, RngError> {
    let space = rng.pick(&SPACES)?;
    let leading = if rng.chance(0.5) { *space } else { "" };
    let body = digits(rng, 1, 3)?;
    let trailing = if rng.chance(0.5) { *space } else { "" };
    Ok(format!("{leading}{body}{trailing}"))
}

fn junk(rng: &mut DeterministicRng) -> Result<String, RngError> {
    if rng.chance(0.4) {
        return Ok(rng.pick(&JUNK_SAMPLES)?.to_string());
    }
    let core = digits(rng, 1, 4)?;
    Ok(format!("{core}{}", rng.pick(&JUNK_SUFFIXES)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_deterministic_generation() {
        let mut rng1 = DeterministicRng::from_seed_text("numeric");
        let mut rng2 = DeterministicRng::from_seed_text("numeric");

        for _ in 0..500 {
            assert_eq!(
                generate_numeric_string(&mut rng1).unwrap(),
                generate_numeric_string(&mut rng2).unwrap()
            );
        }
        assert_eq!(rng1, rng2);
    }

    #[test]
    fn test_category_weights_total() {
        let total: u32 = CATEGORY_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert_eq!(total, 54);
    }

    #[test]
    fn test_covers_interesting_shapes() {
        let mut rng = DeterministicRng::from_seed_text("shapes");
        let values: Vec<String> = (0..5000)
            .map(|_| generate_numeric_string(&mut rng).unwrap())
            .collect();

        assert!(values
            .iter()
            .any(|v| v.len() > 1 && v.starts_with('0') && v.chars().all(|c| c.is_ascii_digit())));
        assert!(values.iter().any(|v| v.starts_with('+') || v.starts_with('-')));
        assert!(values.iter().any(|v| v.contains('e') || v.contains('E')));
        assert!(values.iter().any(|v| v.contains('.')));
        assert!(values.iter().any(|v| v.contains("0x") || v.contains("0X")));
        assert!(values.iter().any(|v| v.trim() != v.as_str()));
        assert!(values.iter().any(|v| v.is_empty() || v == " "));
        assert!(values.iter().any(|v| !v.is_ascii()));
        assert!(values
            .iter()
            .any(|v| NAMESPACES.iter().any(|ns| v.starts_with(ns))));
        assert!(values.iter().any(|v| BOUNDARIES.contains(&v.as_str())));
    }

    #[test]
    fn test_prefixed_chains_nest() {
        let mut rng = DeterministicRng::from_seed_text("nesting");
        let nested = (0..20_000)
            .map(|_| generate_numeric_string(&mut rng).unwrap())
            .filter(|v| {
                NAMESPACES
                    .iter()
                    .filter_map(|ns| v.strip_prefix(ns))
                    .any(|rest| NAMESPACES.iter().any(|ns| rest.starts_with(ns)))
            })
            .count();
        assert!(nested > 0);
    }

    #[test]
    fn test_produces_many_distinct_values() {
        let mut rng = DeterministicRng::new(42);
        let distinct: HashSet<String> = (0..1000)
            .map(|_| generate_numeric_string(&mut rng).unwrap())
            .collect();
        assert!(distinct.len() > 500);
    }
}
