//! Reply normalization.
//!
//! Two client implementations may pick different native representations for
//! the same logical answer (an integer count vs. its text, a float vs. an
//! integer). Normalizing maps every [`Reply`] onto a canonical subset
//! (null, bool, text, sequence, text-keyed mapping) so that those choices do
//! not register as divergences.

use crate::reply::{MapKey, Reply};

/// Significant digits used for float rendering.
const FLOAT_PRECISION: i32 = 17;

/// Normalize a reply.
///
/// Pure, total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(value: &Reply) -> Reply {
    match value {
        Reply::Null => Reply::Null,
        Reply::Bool(b) => Reply::Bool(*b),
        Reply::Integer(i) => Reply::Text(i.to_string()),
        Reply::Float(f) => Reply::Text(format_float(*f)),
        Reply::Text(s) => Reply::Text(s.clone()),
        Reply::Sequence(items) => Reply::Sequence(items.iter().map(normalize).collect()),
        Reply::Mapping(entries) => Reply::Mapping(
            entries
                .iter()
                .map(|(key, value)| (MapKey::Text(key.to_text()), normalize(value)))
                .collect(),
        ),
    }
}

/// Render a float with 17 significant digits, `%g` style.
///
/// Trailing fractional zeros and a dangling decimal point are removed from
/// the mantissa; an empty result collapses to `"0"`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    // Scientific rendering fixes the decimal exponent after rounding
    let scientific = format!("{:.*e}", (FLOAT_PRECISION - 1) as usize, value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let rendered = if (-4..FLOAT_PRECISION).contains(&exponent) {
        let decimals = (FLOAT_PRECISION - 1 - exponent) as usize;
        strip_fraction(&format!("{value:.decimals$}"))
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    };

    if rendered.is_empty() {
        "0".to_string()
    } else {
        rendered
    }
}

fn strip_fraction(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
