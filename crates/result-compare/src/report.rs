//! Plain-text divergence report.

use crate::compare::{ComparisonOutcome, SampleSummary};
use crate::diff::{compact, explain_records};
use fuzz_core::{JobLine, Operation, ResultRecord};
use std::fmt::Write as _;

fn pretty(record: Option<&ResultRecord>) -> String {
    match record {
        Some(record) => serde_json::to_string_pretty(record)
            .unwrap_or_else(|e| format!("<unencodable: {e}>")),
        None => "(end of stream)".to_string(),
    }
}

/// Render a human-readable report of a comparison.
///
/// `operation` is the job operation at the diverging index, when the job
/// stream is at hand.
#[must_use]
pub fn render_report(
    outcome: &ComparisonOutcome,
    summary: &SampleSummary,
    operation: Option<&Operation>,
) -> String {
    let mut report = String::new();

    match outcome.index {
        None => {
            let _ = writeln!(report, "MATCH: {} records agree", summary.count_a);
        }
        Some(index) => {
            let _ = writeln!(report, "MISMATCH at index {index}");
            let _ = writeln!(report);
            let _ = writeln!(report, "A:\n{}", pretty(outcome.a.as_ref()));
            let _ = writeln!(report, "B:\n{}", pretty(outcome.b.as_ref()));

            if let Some(operation) = operation {
                let line = serde_json::to_string(&JobLine::Op(operation.clone()))
                    .unwrap_or_else(|e| format!("<unencodable: {e}>"));
                let _ = writeln!(report);
                let _ = writeln!(report, "Operation: {line}");
            }

            let differences = explain_records(outcome.a.as_ref(), outcome.b.as_ref());
            let _ = writeln!(report);
            let _ = writeln!(report, "{} difference(s):", differences.len());
            for (i, difference) in differences.iter().enumerate() {
                let _ = writeln!(report, "  {}. {difference}", i + 1);
            }
        }
    }

    let _ = writeln!(report);
    let _ = writeln!(
        report,
        "Samples (countA={}, countB={}):",
        summary.count_a, summary.count_b
    );
    for sample in &summary.samples {
        let _ = writeln!(
            report,
            "  #{} {}: A={} B={}",
            sample.index,
            sample.a.op,
            compact(&sample.a.ret),
            compact(&sample.b.ret)
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{compare, summarize};
    use fuzz_core::{Command, KeyArgs, Opcode, Reply};

    fn records(values: &[&str]) -> Vec<ResultRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ResultRecord::success(i as u64, Opcode::BulkRead, Reply::from(vec![*v])))
            .collect()
    }

    #[test]
    fn test_match_report() {
        let a = records(&["1", "2"]);
        let report = render_report(&compare(&a, &a), &summarize(&a, &a, 3), None);

        assert!(report.starts_with("MATCH: 2 records agree"));
        assert!(report.contains("Samples (countA=2, countB=2):"));
        assert!(report.contains(r#"#1 MGET: A=["2"] B=["2"]"#));
    }

    #[test]
    fn test_mismatch_report() {
        let a = records(&["1", "2", "3"]);
        let b = records(&["1", "2", "03"]);
        let operation = Operation::new(
            2,
            Command::BulkRead(KeyArgs {
                keys: vec!["03".to_string()],
            }),
        );

        let report = render_report(&compare(&a, &b), &summarize(&a, &b, 3), Some(&operation));

        assert!(report.starts_with("MISMATCH at index 2"));
        assert!(report.contains(r#"Operation: {"t":"op","i":2,"op":"MGET","args":{"keys":["03"]}}"#));
        assert!(report.contains("1 difference(s):"));
        assert!(report.contains(r#"1. [changed] ret[0]: A="3" B="03""#));
    }

    #[test]
    fn test_reordered_hash_reply_report() {
        let a = fuzz_core::load_results(
            r#"{"t":"res","i":0,"op":"HMGET","ok":true,"ret":{"f1":"1","f2":"2"},"err":null}"#
                .as_bytes(),
            "a",
        )
        .unwrap();
        let b = fuzz_core::load_results(
            r#"{"t":"res","i":0,"op":"HMGET","ok":true,"ret":{"f2":"2","f1":"1"},"err":null}"#
                .as_bytes(),
            "b",
        )
        .unwrap();

        let outcome = compare(&a, &b);
        assert_eq!(outcome.index, Some(0));

        let report = render_report(&outcome, &summarize(&a, &b, 3), None);
        assert!(report.contains("1 difference(s):"), "{report}");
        assert!(report.contains(r#"1. [order] ret: A=["f1","f2"] B=["f2","f1"]"#));
    }

    #[test]
    fn test_truncated_stream_report() {
        let a = records(&["1", "2"]);
        let b = records(&["1"]);
        let report = render_report(&compare(&a, &b), &summarize(&a, &b, 3), None);

        assert!(report.contains("B:\n(end of stream)"));
        assert!(report.contains("[missing on B] (root): A="));
    }
}
