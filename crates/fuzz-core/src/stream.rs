//! Strict loaders for Job and Result streams.
//!
//! A line that cannot be parsed fails the whole load: silently skipping it
//! could hide a real divergence. Blank lines and unknown record kinds are
//! skipped.

use crate::record::{JobLine, JobMeta, Operation, ResultLine, ResultRecord};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Error type for stream loading.
#[derive(Debug, thiserror::Error)]
pub enum StreamLoadError {
    /// Error opening or reading a stream file
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line is not a valid record
    #[error("Invalid record in {source_name} at line {line}: {source}")]
    Parse {
        source_name: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Job stream without a metadata record
    #[error("Job stream {source_name} has no metadata record")]
    MissingMeta { source_name: String },
}

/// A job read back from its stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub meta: JobMeta,
    pub operations: Vec<Operation>,
}

impl Job {
    /// Find the operation with the given index.
    pub fn operation(&self, index: u64) -> Option<&Operation> {
        self.operations.iter().find(|op| op.index == index)
    }
}

/// Parse every non-blank line of a reader.
fn read_lines<R, T>(reader: R, source_name: &str) -> Result<Vec<T>, StreamLoadError>
where
    R: BufRead,
    T: DeserializeOwned,
{
    let mut records = Vec::new();
    for (line_number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| StreamLoadError::Io {
            path: PathBuf::from(source_name),
            source: e,
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record = serde_json::from_str(line).map_err(|e| StreamLoadError::Parse {
            source_name: source_name.to_string(),
            line: line_number + 1,
            source: e,
        })?;
        records.push(record);
    }
    Ok(records)
}

fn open(path: &Path) -> Result<BufReader<File>, StreamLoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| StreamLoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Load the result records of a result stream, in stream order.
///
/// Metadata records are skipped.
pub fn load_results<R: BufRead>(
    reader: R,
    source_name: &str,
) -> Result<Vec<ResultRecord>, StreamLoadError> {
    let records: Vec<ResultRecord> = read_lines::<_, ResultLine>(reader, source_name)?
        .into_iter()
        .filter_map(|line| match line {
            ResultLine::Res(record) => Some(record),
            ResultLine::Meta(_) | ResultLine::Unknown => None,
        })
        .collect();

    debug!("Loaded {} result records from {}", records.len(), source_name);
    Ok(records)
}

/// Load a result stream file.
pub fn load_results_file<P: AsRef<Path>>(path: P) -> Result<Vec<ResultRecord>, StreamLoadError> {
    let path = path.as_ref();
    load_results(open(path)?, &path.display().to_string())
}

/// Load a job stream.
///
/// The last metadata record wins if a stream carries several.
pub fn load_job<R: BufRead>(reader: R, source_name: &str) -> Result<Job, StreamLoadError> {
    let mut meta = None;
    let mut operations = Vec::new();

    for line in read_lines::<_, JobLine>(reader, source_name)? {
        match line {
            JobLine::Meta(m) => meta = Some(m),
            JobLine::Op(op) => operations.push(op),
            JobLine::Unknown => {}
        }
    }

    let meta = meta.ok_or_else(|| StreamLoadError::MissingMeta {
        source_name: source_name.to_string(),
    })?;

    debug!(
        "Loaded job with {} operations from {} (seed {:?})",
        operations.len(),
        source_name,
        meta.seed
    );
    Ok(Job { meta, operations })
}

/// Load a job stream file.
pub fn load_job_file<P: AsRef<Path>>(path: P) -> Result<Job, StreamLoadError> {
    let path = path.as_ref();
    load_job(open(path)?, &path.display().to_string())
}
