//! Producer options.
//!
//! Options are plain data: the same options and seed always produce the same
//! job. They can be built in code, loaded from YAML, or assembled from CLI
//! flags (see [`ProduceArgs`](crate::ProduceArgs)).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for loading options.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// Error reading options file
    #[error("Failed to read options file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Neither the flags nor the options file name a seed
    #[error("No seed given: pass --seed or set `seed` in the options file")]
    MissingSeed,
}

/// Options of one job-generation run.
///
/// # Example YAML
///
/// ```yaml
/// seed: nightly-42
/// ops: 2000
/// keyspace: 500
/// bias:
///   write_reuse: 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerOptions {
    /// Seed text; the whole job is a function of it
    pub seed: String,
    /// Number of operations to emit
    pub ops: u64,
    /// Size of the key pool
    pub keyspace: usize,
    /// Size of the hash-name pool
    pub hashspace: usize,
    /// Size of the field-name pool
    pub fields: usize,
    /// Size of the value pool
    pub values: usize,
    /// Upper bound of keys per bulk read
    pub max_keys_per_op: u32,
    /// Upper bound of fields per hash read
    pub max_fields_per_op: u32,
    /// Upper bound of pairs per write (and of keys per delete, capped at 16)
    pub max_set_per_op: u32,
    /// Selection probabilities
    pub bias: SelectionBias,
}

impl Default for ProducerOptions {
    fn default() -> Self {
        Self {
            seed: String::new(),
            ops: 500,
            keyspace: 200,
            hashspace: 50,
            fields: 50,
            values: 200,
            max_keys_per_op: 32,
            max_fields_per_op: 32,
            max_set_per_op: 32,
            bias: SelectionBias::default(),
        }
    }
}

impl ProducerOptions {
    /// Default options with the given seed.
    pub fn with_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            ..Self::default()
        }
    }

    /// Load options from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OptionsError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse options from a YAML string. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, OptionsError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Probabilities and thresholds steering argument synthesis.
///
/// Percentages are compared against a draw in `0..=99`: a slot takes a known
/// entry below the first threshold, a pool entry below the sum of both, and a
/// freshly generated (almost certainly missing) entry otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionBias {
    /// Chance that a write pair reuses a key/field already in the same call
    pub write_reuse: f64,
    /// Chance that a hash write targets a plain key instead of a hash name
    pub hash_write_key_confusion: f64,
    /// Chance that a hash read targets a plain key instead of a hash name
    pub hash_read_key_confusion: f64,
    /// Chance that a key selection repeats an already selected key
    pub key_duplicate: f64,
    /// Chance that a field selection repeats an already selected field
    pub field_duplicate: f64,
    /// Share of key slots drawn from the known-key registry
    pub known_key_percent: i64,
    /// Share of key slots drawn from the key pool
    pub pool_key_percent: i64,
    /// Share of field slots drawn from the hash's known fields
    pub known_field_percent: i64,
    /// Share of field slots drawn from the field pool
    pub pool_field_percent: i64,
    /// Chance that a type introspection targets a known key
    pub type_known_key: f64,
}

impl Default for SelectionBias {
    fn default() -> Self {
        Self {
            write_reuse: 0.2,
            hash_write_key_confusion: 0.2,
            hash_read_key_confusion: 0.3,
            key_duplicate: 0.15,
            field_duplicate: 0.2,
            known_key_percent: 50,
            pool_key_percent: 30,
            known_field_percent: 40,
            pool_field_percent: 30,
            type_known_key: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = ProducerOptions::with_seed("abc");
        assert_eq!(options.seed, "abc");
        assert_eq!(options.ops, 500);
        assert_eq!(options.keyspace, 200);
        assert_eq!(options.hashspace, 50);
        assert_eq!(options.fields, 50);
        assert_eq!(options.values, 200);
        assert_eq!(options.max_keys_per_op, 32);
        assert_eq!(options.bias.known_key_percent, 50);
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r#"
seed: nightly
ops: 20
keyspace: 5
bias:
  write_reuse: 0.9
"#;
        let options = ProducerOptions::from_yaml(yaml).unwrap();
        assert_eq!(options.seed, "nightly");
        assert_eq!(options.ops, 20);
        assert_eq!(options.keyspace, 5);
        assert_eq!(options.hashspace, 50);
        assert_eq!(options.bias.write_reuse, 0.9);
        assert_eq!(options.bias.key_duplicate, 0.15);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed: from-file\nvalues: 3").unwrap();

        let options = ProducerOptions::from_file(file.path()).unwrap();
        assert_eq!(options.seed, "from-file");
        assert_eq!(options.values, 3);
    }

    #[test]
    fn test_invalid_yaml() {
        let result = ProducerOptions::from_yaml("ops: [not, a, number]");
        assert!(matches!(result, Err(OptionsError::YamlError(_))));
    }
}
