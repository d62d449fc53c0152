//! Divergence explainer.
//!
//! Walks two reply trees side by side and reports every leaf where they
//! disagree, addressed by a path: mapping keys are joined with `.`, sequence
//! positions are written as `[i]`. The root path is empty.
//!
//! Mapping equality is order-sensitive. Two mappings holding the same entries
//! in a different order are reported once, at the mapping itself, with both
//! key orders.

use fuzz_core::{MapKey, Reply, ResultRecord};
use serde::Serialize;
use std::fmt;

/// Nesting depth beyond which unequal subtrees are reported whole.
pub const MAX_DEPTH: usize = 64;

/// One of the two compared streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// A single difference between two replies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Difference {
    /// Both sides hold a value at `path` and the values differ.
    Changed { path: String, a: Reply, b: Reply },
    /// `side` has nothing at `path`; `present` is the other side's value.
    Missing {
        path: String,
        side: Side,
        present: Reply,
    },
    /// Same entries on both sides, in a different order.
    Reordered {
        path: String,
        a_keys: Vec<String>,
        b_keys: Vec<String>,
    },
}

impl Difference {
    pub fn path(&self) -> &str {
        match self {
            Self::Changed { path, .. }
            | Self::Missing { path, .. }
            | Self::Reordered { path, .. } => path,
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Changed { path, a, b } => write!(
                f,
                "[changed] {}: A={} B={}",
                display_path(path),
                compact(a),
                compact(b)
            ),
            Self::Missing {
                path,
                side,
                present,
            } => {
                let other = match side {
                    Side::A => Side::B,
                    Side::B => Side::A,
                };
                write!(
                    f,
                    "[missing on {side}] {}: {other}={}",
                    display_path(path),
                    compact(present)
                )
            }
            Self::Reordered {
                path,
                a_keys,
                b_keys,
            } => write!(
                f,
                "[order] {}: A={} B={}",
                display_path(path),
                key_list(a_keys),
                key_list(b_keys)
            ),
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}

fn key_list(keys: &[String]) -> String {
    serde_json::to_string(keys).unwrap_or_else(|e| format!("<unencodable: {e}>"))
}

fn keys_of(entries: &[(MapKey, Reply)]) -> Vec<String> {
    entries.iter().map(|(key, _)| key.to_text()).collect()
}

/// Single-line JSON rendering of a reply.
pub(crate) fn compact(reply: &Reply) -> String {
    serde_json::to_string(reply).unwrap_or_else(|e| format!("<unencodable: {e}>"))
}

/// Explain how two replies differ. Equal replies yield no differences.
pub fn explain(a: &Reply, b: &Reply) -> Vec<Difference> {
    let mut differences = Vec::new();
    walk(a, b, "", 0, &mut differences);
    differences
}

/// Explain how two optional result records differ.
///
/// Records are viewed as mappings of their wire fields. A record missing on
/// one side is a single root-level difference.
pub fn explain_records(a: Option<&ResultRecord>, b: Option<&ResultRecord>) -> Vec<Difference> {
    match (a, b) {
        (Some(a), Some(b)) => explain(&a.to_reply(), &b.to_reply()),
        (Some(a), None) => vec![Difference::Missing {
            path: String::new(),
            side: Side::B,
            present: a.to_reply(),
        }],
        (None, Some(b)) => vec![Difference::Missing {
            path: String::new(),
            side: Side::A,
            present: b.to_reply(),
        }],
        (None, None) => Vec::new(),
    }
}

fn key_path(path: &str, key: &MapKey) -> String {
    if path.is_empty() {
        key.to_text()
    } else {
        format!("{path}.{key}")
    }
}

fn lookup<'a>(entries: &'a [(MapKey, Reply)], key: &MapKey) -> Option<&'a Reply> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn walk(a: &Reply, b: &Reply, path: &str, depth: usize, out: &mut Vec<Difference>) {
    if a == b {
        return;
    }

    let changed = || Difference::Changed {
        path: path.to_string(),
        a: a.clone(),
        b: b.clone(),
    };
    if depth >= MAX_DEPTH {
        out.push(changed());
        return;
    }

    match (a, b) {
        (Reply::Sequence(left), Reply::Sequence(right)) => {
            for i in 0..left.len().max(right.len()) {
                let child = format!("{path}[{i}]");
                match (left.get(i), right.get(i)) {
                    (Some(l), Some(r)) => walk(l, r, &child, depth + 1, out),
                    (Some(l), None) => out.push(Difference::Missing {
                        path: child,
                        side: Side::B,
                        present: l.clone(),
                    }),
                    (None, Some(r)) => out.push(Difference::Missing {
                        path: child,
                        side: Side::A,
                        present: r.clone(),
                    }),
                    (None, None) => {}
                }
            }
        }
        (Reply::Mapping(left), Reply::Mapping(right)) => {
            let before = out.len();
            for (key, l) in left {
                let child = key_path(path, key);
                match lookup(right, key) {
                    Some(r) => walk(l, r, &child, depth + 1, out),
                    None => out.push(Difference::Missing {
                        path: child,
                        side: Side::B,
                        present: l.clone(),
                    }),
                }
            }
            for (key, r) in right {
                if lookup(left, key).is_none() {
                    out.push(Difference::Missing {
                        path: key_path(path, key),
                        side: Side::A,
                        present: r.clone(),
                    });
                }
            }
            // Unequal, yet every key and value matched up
            if out.len() == before {
                out.push(Difference::Reordered {
                    path: path.to_string(),
                    a_keys: keys_of(left),
                    b_keys: keys_of(right),
                });
            }
        }
        _ => out.push(changed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzz_core::Opcode;

    #[test]
    fn test_equal_replies() {
        let reply = Reply::mapping([("a", Reply::from(vec!["1", "2"]))]);
        assert!(explain(&reply, &reply.clone()).is_empty());
    }

    #[test]
    fn test_nested_path() {
        let a = Reply::mapping([("a", Reply::mapping([("b", Reply::Integer(1))]))]);
        let b = Reply::mapping([("a", Reply::mapping([("b", Reply::Integer(2))]))]);

        let differences = explain(&a, &b);
        assert_eq!(
            differences,
            vec![Difference::Changed {
                path: "a.b".to_string(),
                a: Reply::Integer(1),
                b: Reply::Integer(2),
            }]
        );
    }

    #[test]
    fn test_sequence_paths() {
        let a = Reply::mapping([("ret", Reply::from(vec!["1", "2"]))]);
        let b = Reply::mapping([("ret", Reply::from(vec!["1", "02", "3"]))]);

        let differences = explain(&a, &b);
        assert_eq!(differences.len(), 2);
        assert_eq!(differences[0].path(), "ret[1]");
        assert_eq!(
            differences[1],
            Difference::Missing {
                path: "ret[2]".to_string(),
                side: Side::A,
                present: Reply::text("3"),
            }
        );
    }

    #[test]
    fn test_root_sequence_path() {
        let differences = explain(&Reply::from(vec!["x"]), &Reply::from(vec!["y"]));
        assert_eq!(differences[0].path(), "[0]");
    }

    #[test]
    fn test_key_presence_is_missing_not_changed() {
        let a = Reply::mapping([("x", Reply::text("1")), ("y", Reply::text("2"))]);
        let b = Reply::mapping([("z", Reply::text("3")), ("x", Reply::text("1"))]);

        let differences = explain(&a, &b);
        assert_eq!(
            differences,
            vec![
                Difference::Missing {
                    path: "y".to_string(),
                    side: Side::B,
                    present: Reply::text("2"),
                },
                Difference::Missing {
                    path: "z".to_string(),
                    side: Side::A,
                    present: Reply::text("3"),
                },
            ]
        );
    }

    #[test]
    fn test_kind_mismatch_is_changed() {
        let a = Reply::mapping([("ret", Reply::from(vec!["1"]))]);
        let b = Reply::mapping([("ret", Reply::text("1"))]);

        let differences = explain(&a, &b);
        assert_eq!(differences.len(), 1);
        assert!(matches!(&differences[0], Difference::Changed { path, .. } if path == "ret"));
    }

    #[test]
    fn test_reordered_mapping() {
        let a = Reply::mapping([(
            "ret",
            Reply::mapping([("f1", Reply::text("1")), ("f2", Reply::text("2"))]),
        )]);
        let b = Reply::mapping([(
            "ret",
            Reply::mapping([("f2", Reply::text("2")), ("f1", Reply::text("1"))]),
        )]);

        let differences = explain(&a, &b);
        assert_eq!(
            differences,
            vec![Difference::Reordered {
                path: "ret".to_string(),
                a_keys: vec!["f1".to_string(), "f2".to_string()],
                b_keys: vec!["f2".to_string(), "f1".to_string()],
            }]
        );
        assert_eq!(
            differences[0].to_string(),
            r#"[order] ret: A=["f1","f2"] B=["f2","f1"]"#
        );
    }

    #[test]
    fn test_reorder_not_reported_beside_value_change() {
        let a = Reply::mapping([("f1", Reply::text("1")), ("f2", Reply::text("2"))]);
        let b = Reply::mapping([("f2", Reply::text("02")), ("f1", Reply::text("1"))]);

        let differences = explain(&a, &b);
        assert_eq!(differences.len(), 1);
        assert_eq!(differences[0].path(), "f2");
    }

    #[test]
    fn test_depth_bound() {
        fn nest(depth: usize, leaf: &str) -> Reply {
            (0..depth).fold(Reply::text(leaf), |inner, _| Reply::from(vec![inner]))
        }

        let a = nest(100, "a");
        let b = nest(100, "b");
        let differences = explain(&a, &b);

        assert_eq!(differences.len(), 1);
        let path = differences[0].path();
        assert_eq!(path.matches("[0]").count(), MAX_DEPTH);
    }

    #[test]
    fn test_records_missing_side() {
        let record = ResultRecord::success(4, Opcode::Ping, Reply::Bool(true));

        let differences = explain_records(Some(&record), None);
        assert_eq!(differences.len(), 1);
        assert!(matches!(
            &differences[0],
            Difference::Missing { path, side: Side::B, .. } if path.is_empty()
        ));
        assert!(explain_records(None, None).is_empty());
    }

    #[test]
    fn test_records_ret_path() {
        let a = ResultRecord::success(2, Opcode::BulkRead, Reply::from(vec!["3"]));
        let b = ResultRecord::success(2, Opcode::BulkRead, Reply::from(vec!["03"]));

        let differences = explain_records(Some(&a), Some(&b));
        assert_eq!(differences.len(), 1);
        assert_eq!(differences[0].path(), "ret[0]");
        assert_eq!(
            differences[0].to_string(),
            r#"[changed] ret[0]: A="3" B="03""#
        );
    }
}
