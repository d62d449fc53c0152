//! `compare` command handler.

use anyhow::Context;
use fuzz_core::{load_job_file, load_results_file, Job, ResultRecord};
use result_compare::{
    compare, render_report, summarize, write_artifacts, Artifacts, CompareArgs, ComparisonOutcome,
};
use std::path::PathBuf;

/// Everything a comparison run produced.
#[derive(Debug)]
pub struct CompareRun {
    pub outcome: ComparisonOutcome,
    pub report: String,
    /// Written only on mismatch, and only when an output directory is set
    pub artifacts: Option<Artifacts>,
}

async fn load_stream(path: PathBuf) -> anyhow::Result<Vec<ResultRecord>> {
    let task_path = path.clone();
    let records = tokio::task::spawn_blocking(move || load_results_file(task_path))
        .await
        .context("Stream loader task panicked")?
        .with_context(|| format!("Failed to load result stream {path:?}"))?;

    tracing::debug!("Loaded {} records from {:?}", records.len(), path);
    Ok(records)
}

async fn load_job(path: PathBuf) -> anyhow::Result<Job> {
    let task_path = path.clone();
    tokio::task::spawn_blocking(move || load_job_file(task_path))
        .await
        .context("Job loader task panicked")?
        .with_context(|| format!("Failed to load job stream {path:?}"))
}

/// Compare two result streams.
///
/// Both streams are loaded concurrently; a load failure aborts the run. A
/// mismatch is a successful run with a non-matching outcome.
pub async fn run_compare(args: &CompareArgs) -> anyhow::Result<CompareRun> {
    let (a, b) = tokio::try_join!(load_stream(args.a.clone()), load_stream(args.b.clone()))?;

    let outcome = compare(&a, &b);
    let summary = summarize(&a, &b, args.samples);

    let job = match (&args.job, outcome.index) {
        (Some(path), Some(_)) => Some(load_job(path.clone()).await?),
        _ => None,
    };
    let operation = outcome
        .index
        .and_then(|index| job.as_ref()?.operation(index as u64));

    let report = render_report(&outcome, &summary, operation);

    let artifacts = match (&args.outdir, outcome.matched) {
        (Some(outdir), false) => Some(
            write_artifacts(outdir, &report, args.job.as_deref())
                .context("Failed to write mismatch artifacts")?,
        ),
        _ => None,
    };

    match outcome.index {
        None => tracing::info!("Result streams match ({} records)", a.len()),
        Some(index) => tracing::warn!(
            "Result streams diverge at index {} (A has {} records, B has {})",
            index,
            a.len(),
            b.len()
        ),
    }

    Ok(CompareRun {
        outcome,
        report,
        artifacts,
    })
}
