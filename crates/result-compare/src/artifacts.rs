//! Mismatch artifacts written next to a failed comparison.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the rendered report.
pub const DIFF_FILE: &str = "diff.txt";
/// File name of the copied job stream.
pub const JOB_FILE: &str = "mismatch.job.jsonl";

/// Error type for writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to write artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Paths of the artifacts that were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub diff: PathBuf,
    pub job: Option<PathBuf>,
}

/// Write the report, and a copy of the job when one is given, into `outdir`.
///
/// The directory is created when missing.
pub fn write_artifacts(
    outdir: &Path,
    report: &str,
    job: Option<&Path>,
) -> Result<Artifacts, ArtifactError> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ArtifactError::Io { path, source }
    };

    fs::create_dir_all(outdir).map_err(io_error(outdir))?;

    let diff = outdir.join(DIFF_FILE);
    fs::write(&diff, report).map_err(io_error(&diff))?;

    let job = match job {
        Some(source) => {
            let target = outdir.join(JOB_FILE);
            fs::copy(source, &target).map_err(io_error(source))?;
            Some(target)
        }
        None => None,
    };

    info!("Wrote mismatch artifacts to {}", outdir.display());
    Ok(Artifacts { diff, job })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_report_and_job() {
        let dir = tempfile::tempdir().unwrap();
        let job = dir.path().join("job.jsonl");
        fs::write(&job, "{\"t\":\"meta\"}\n").unwrap();
        let outdir = dir.path().join("out/nested");

        let artifacts = write_artifacts(&outdir, "MISMATCH at index 0\n", Some(&job)).unwrap();

        assert_eq!(
            fs::read_to_string(&artifacts.diff).unwrap(),
            "MISMATCH at index 0\n"
        );
        let copied = artifacts.job.unwrap();
        assert_eq!(copied, outdir.join(JOB_FILE));
        assert_eq!(fs::read_to_string(copied).unwrap(), "{\"t\":\"meta\"}\n");
    }

    #[test]
    fn test_missing_job_source() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.jsonl");

        let result = write_artifacts(dir.path(), "report", Some(&missing));
        assert!(matches!(result, Err(ArtifactError::Io { path, .. }) if path == missing));
    }
}
