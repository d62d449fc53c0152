//! `produce` command handler.

use anyhow::Context;
use fuzz_core::JobMeta;
use job_producer::{JobProducer, ProduceArgs};

/// Generate a job stream and write it to `args.out`.
pub async fn run_produce(args: &ProduceArgs) -> anyhow::Result<JobMeta> {
    let options = args
        .to_options()
        .with_context(|| format!("Failed to resolve producer options (config={:?})", args.config))?;

    tracing::info!(
        "Producing job (seed={:?}, ops={}, keyspace={}, hashspace={}, fields={}, values={})",
        options.seed,
        options.ops,
        options.keyspace,
        options.hashspace,
        options.fields,
        options.values
    );

    let producer = JobProducer::new(options).context("Failed to build candidate pools")?;
    let meta = producer.meta();

    let out = args.out.clone();
    tokio::task::spawn_blocking(move || producer.produce_to_file(out))
        .await
        .context("Job producer task panicked")?
        .with_context(|| format!("Failed to write job to {:?}", args.out))?;

    tracing::info!("Wrote {} operations to {:?}", meta.ops, args.out);
    Ok(meta)
}
