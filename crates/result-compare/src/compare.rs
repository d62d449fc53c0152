//! Positional comparison of two result streams.

use fuzz_core::ResultRecord;
use serde::Serialize;

/// Number of leading positions shown in a sample summary by default.
pub const DEFAULT_SAMPLE_LIMIT: usize = 3;

/// Outcome of comparing two result streams.
///
/// A mismatch is data, not an error: it carries the first diverging position
/// and both records found there (`None` when one stream ended early).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonOutcome {
    #[serde(rename = "match")]
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<ResultRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<ResultRecord>,
}

impl ComparisonOutcome {
    fn agreement() -> Self {
        Self {
            matched: true,
            index: None,
            a: None,
            b: None,
        }
    }
}

/// Compare two streams position by position.
///
/// Records are equal when index, opcode, success flag, error descriptor and
/// reply value all agree. Streams of different length never match.
pub fn compare(a: &[ResultRecord], b: &[ResultRecord]) -> ComparisonOutcome {
    let len = a.len().max(b.len());
    for i in 0..len {
        let (left, right) = (a.get(i), b.get(i));
        if left != right {
            return ComparisonOutcome {
                matched: false,
                index: Some(i),
                a: left.cloned(),
                b: right.cloned(),
            };
        }
    }
    ComparisonOutcome::agreement()
}

/// One aligned position of a sample summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplePair {
    pub index: usize,
    pub a: ResultRecord,
    pub b: ResultRecord,
}

/// Lengths of both streams and their first few aligned positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSummary {
    #[serde(rename = "countA")]
    pub count_a: usize,
    #[serde(rename = "countB")]
    pub count_b: usize,
    pub samples: Vec<SamplePair>,
}

/// Summarize the first `min(limit, len a, len b)` positions, matching or not.
pub fn summarize(a: &[ResultRecord], b: &[ResultRecord], limit: usize) -> SampleSummary {
    let samples = a
        .iter()
        .zip(b)
        .take(limit)
        .enumerate()
        .map(|(index, (a, b))| SamplePair {
            index,
            a: a.clone(),
            b: b.clone(),
        })
        .collect();

    SampleSummary {
        count_a: a.len(),
        count_b: b.len(),
        samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzz_core::{ErrorDescriptor, Opcode, Reply};

    fn stream(values: &[&str]) -> Vec<ResultRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ResultRecord::success(i as u64, Opcode::BulkRead, Reply::text(*v)))
            .collect()
    }

    #[test]
    fn test_identical_streams_agree() {
        let a = stream(&["1", "2", "3"]);
        let outcome = compare(&a, &a.clone());

        assert!(outcome.matched);
        assert_eq!(outcome.index, None);
        assert_eq!(outcome.a, None);
    }

    #[test]
    fn test_empty_streams_agree() {
        assert!(compare(&[], &[]).matched);
    }

    #[test]
    fn test_first_divergence() {
        let a = stream(&["1", "2", "3", "4", "5"]);
        let b = stream(&["1", "2", "03", "4", "5"]);
        let outcome = compare(&a, &b);

        assert!(!outcome.matched);
        assert_eq!(outcome.index, Some(2));
        assert_eq!(outcome.a.unwrap().ret, Reply::text("3"));
        assert_eq!(outcome.b.unwrap().ret, Reply::text("03"));
    }

    #[test]
    fn test_short_stream() {
        let a = stream(&["1", "2", "3", "4", "5"]);
        let b = stream(&["1", "2", "3"]);
        let outcome = compare(&a, &b);

        assert!(!outcome.matched);
        assert_eq!(outcome.index, Some(3));
        assert_eq!(outcome.a.unwrap().ret, Reply::text("4"));
        assert_eq!(outcome.b, None);

        let reversed = compare(&b, &a);
        assert_eq!(reversed.index, Some(3));
        assert_eq!(reversed.a, None);
    }

    #[test]
    fn test_error_descriptor_participates() {
        let err = |msg: &str| ErrorDescriptor {
            kind: "RedisException".to_string(),
            msg: msg.to_string(),
            code: 0,
        };
        let a = vec![ResultRecord::failure(0, Opcode::HashWrite, err("WRONGTYPE"))];
        let b = vec![ResultRecord::failure(0, Opcode::HashWrite, err("ERR"))];

        assert_eq!(compare(&a, &b).index, Some(0));
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_value(compare(&[], &[])).unwrap();
        assert_eq!(json, serde_json::json!({"match": true}));

        let a = stream(&["1"]);
        let json = serde_json::to_value(compare(&a, &[])).unwrap();
        assert_eq!(json["match"], false);
        assert_eq!(json["index"], 0);
        assert_eq!(json["a"]["ret"], "1");
        assert!(json.get("b").is_none());
    }

    #[test]
    fn test_summary_limits() {
        let a = stream(&["1", "2", "3", "4", "5"]);
        let b = stream(&["1", "x"]);

        let summary = summarize(&a, &b, DEFAULT_SAMPLE_LIMIT);
        assert_eq!(summary.count_a, 5);
        assert_eq!(summary.count_b, 2);
        assert_eq!(summary.samples.len(), 2);
        assert_eq!(summary.samples[1].b.ret, Reply::text("x"));

        assert_eq!(summarize(&a, &a, 4).samples.len(), 4);
        assert!(summarize(&a, &a, 0).samples.is_empty());
    }
}
