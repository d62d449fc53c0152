//! End-to-end tests of the command handlers over temporary files.

use hashkey_fuzz::harness::{run_compare, run_produce};
use job_producer::ProduceArgs;
use result_compare::{CompareArgs, DIFF_FILE, JOB_FILE};
use std::fs;
use std::path::{Path, PathBuf};

fn produce_args(seed: &str, out: PathBuf) -> ProduceArgs {
    ProduceArgs {
        seed: Some(seed.to_string()),
        out,
        config: None,
        ops: Some(150),
        keyspace: Some(30),
        hashspace: Some(8),
        fields: Some(12),
        values: Some(25),
        max_keys_per_op: None,
        max_fields_per_op: None,
        max_set_per_op: Some(8),
    }
}

fn compare_args(a: PathBuf, b: PathBuf) -> CompareArgs {
    CompareArgs {
        a,
        b,
        job: None,
        outdir: None,
        samples: 3,
    }
}

fn write_results(path: &Path, rets: &[&str]) {
    let mut content =
        String::from("{\"t\":\"meta\",\"seed\":\"s\",\"ext\":\"x\",\"runtimeVersion\":\"1\",\"storeVersion\":\"7\",\"db\":9}\n");
    for (i, ret) in rets.iter().enumerate() {
        content.push_str(&format!(
            "{{\"t\":\"res\",\"i\":{i},\"op\":\"MGET\",\"ok\":true,\"ret\":[{ret}],\"err\":null}}\n"
        ));
    }
    fs::write(path, content).unwrap();
}

#[tokio::test]
async fn test_produce_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.jsonl");
    let second = dir.path().join("second.jsonl");

    let meta = run_produce(&produce_args("nightly-42", first.clone()))
        .await
        .unwrap();
    run_produce(&produce_args("nightly-42", second.clone()))
        .await
        .unwrap();

    assert_eq!(meta.ops, 150);
    let bytes = fs::read(&first).unwrap();
    assert_eq!(bytes, fs::read(&second).unwrap());

    let job = fuzz_core::load_job_file(&first).unwrap();
    assert_eq!(job.meta.seed, "nightly-42");
    assert_eq!(job.operations.len(), 150);
}

#[tokio::test]
async fn test_produce_reads_options_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("fuzz.yaml");
    fs::write(&config, "ops: 12\nkeyspace: 5\n").unwrap();

    let mut args = produce_args("yaml", dir.path().join("job.jsonl"));
    args.config = Some(config);
    args.ops = None;

    let meta = run_produce(&args).await.unwrap();
    assert_eq!(meta.ops, 12);

    let text = fs::read_to_string(&args.out).unwrap();
    assert_eq!(text.lines().count(), 13);
}

#[tokio::test]
async fn test_produce_seed_from_options_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("fuzz.yaml");
    fs::write(&config, "seed: nightly-42\n").unwrap();

    let from_flag = produce_args("nightly-42", dir.path().join("flag.jsonl"));
    let mut from_file = produce_args("unused", dir.path().join("file.jsonl"));
    from_file.seed = None;
    from_file.config = Some(config);

    run_produce(&from_flag).await.unwrap();
    let meta = run_produce(&from_file).await.unwrap();
    assert_eq!(meta.seed, "nightly-42");
    assert_eq!(
        fs::read(&from_flag.out).unwrap(),
        fs::read(&from_file.out).unwrap()
    );
}

#[tokio::test]
async fn test_produce_without_seed_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = produce_args("unused", dir.path().join("job.jsonl"));
    args.seed = None;

    assert!(run_produce(&args).await.is_err());
    assert!(!args.out.exists());
}

#[tokio::test]
async fn test_compare_matching_streams() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.jsonl");
    let b = dir.path().join("b.jsonl");
    write_results(&a, &["\"1\"", "\"2\""]);
    write_results(&b, &["\"1\"", "\"2\""]);

    let mut args = compare_args(a, b);
    args.outdir = Some(dir.path().join("out"));
    let run = run_compare(&args).await.unwrap();

    assert!(run.outcome.matched);
    assert!(run.artifacts.is_none());
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn test_compare_mismatch_writes_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let job = dir.path().join("job.jsonl");
    run_produce(&produce_args("mismatch", job.clone()))
        .await
        .unwrap();

    let a = dir.path().join("a.jsonl");
    let b = dir.path().join("b.jsonl");
    write_results(&a, &["\"1\"", "\"2\"", "\"3\"", "\"4\"", "\"5\""]);
    write_results(&b, &["\"1\"", "\"2\"", "\"03\"", "\"4\"", "\"5\""]);

    let outdir = dir.path().join("artifacts");
    let mut args = compare_args(a, b);
    args.job = Some(job.clone());
    args.outdir = Some(outdir.clone());

    let run = run_compare(&args).await.unwrap();
    assert!(!run.outcome.matched);
    assert_eq!(run.outcome.index, Some(2));

    let diff = fs::read_to_string(outdir.join(DIFF_FILE)).unwrap();
    assert_eq!(diff, run.report);
    assert!(diff.starts_with("MISMATCH at index 2"));
    assert!(diff.contains("Operation: {\"t\":\"op\",\"i\":2,"));
    assert!(diff.contains("ret[0]"));
    assert_eq!(
        fs::read(outdir.join(JOB_FILE)).unwrap(),
        fs::read(&job).unwrap()
    );
}

#[tokio::test]
async fn test_compare_truncated_stream() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.jsonl");
    let b = dir.path().join("b.jsonl");
    write_results(&a, &["\"1\"", "\"2\"", "\"3\"", "\"4\"", "\"5\""]);
    write_results(&b, &["\"1\"", "\"2\"", "\"3\""]);

    let run = run_compare(&compare_args(a, b)).await.unwrap();

    assert_eq!(run.outcome.index, Some(3));
    assert!(run.outcome.b.is_none());
    let json = serde_json::to_value(&run.outcome).unwrap();
    assert_eq!(json["a"]["i"], 3);
}

#[tokio::test]
async fn test_compare_rejects_malformed_stream() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.jsonl");
    let b = dir.path().join("b.jsonl");
    write_results(&a, &["\"1\""]);
    fs::write(&b, "{\"t\":\"res\",\"i\":0,\"op\":\"MGET\",\"ok\":true,\"ret\":[\"1\"],\"err\":null}\nnot json\n").unwrap();

    let error = run_compare(&compare_args(a, b)).await.unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("b.jsonl"), "{message}");
    assert!(message.contains("line 2"), "{message}");
}

#[tokio::test]
async fn test_compare_missing_stream() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.jsonl");
    write_results(&a, &["\"1\""]);

    let result = run_compare(&compare_args(a, dir.path().join("absent.jsonl"))).await;
    assert!(result.is_err());
}
