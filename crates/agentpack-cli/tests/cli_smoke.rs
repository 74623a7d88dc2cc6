use agentpack_kernel::Corpus;
use agentpack_kernel::fixtures::sample_corpus;
use agentpack_kernel::pack::{EVAL_HARNESS, GOVERNANCE, ROUTER, WORKFLOWS};
use agentpack_store::{CORPUS_LOCK_FILE, write_corpus};
use serde_json::{Value, json};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_agentpack<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_agentpack");
    Command::new(bin)
        .args(args)
        .env_remove("AGENTPACK_LOG")
        .output()
        .expect("agentpack command should execute")
}

fn assert_exit(output: &Output, expected: i32) {
    if output.status.code() != Some(expected) {
        panic!(
            "expected exit {expected}, got {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn parse_stdout(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be json")
}

fn seeded_root(corpus: &Corpus) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    write_corpus(dir.path(), corpus).expect("seed corpus should be written");
    dir
}

fn drifted_corpus() -> Corpus {
    let mut corpus = sample_corpus();
    corpus
        .content_mut(EVAL_HARNESS)
        .expect("eval harness should exist")["thresholds"]["hallucination_max"] = json!(0.10);
    corpus
}

fn write_overlay(dir: &Path) -> String {
    let path = dir.join("approvals.json");
    let overlay = json!({
        "apply": ["operations", "align_workflow_refs"],
        "operations": [{"upsert": {
            "target": WORKFLOWS,
            "patch": {"approvals": {"required": true, "approvers": ["ap-lead"]}}
        }}]
    });
    fs::write(&path, overlay.to_string()).expect("overlay should be written");
    path.display().to_string()
}

fn read_pack(root: &Path, name: &str) -> Value {
    let bytes = fs::read(root.join(name)).expect("pack should be readable");
    serde_json::from_slice(&bytes).expect("pack should be json")
}

#[test]
fn check_passes_on_consistent_corpus() {
    let root = seeded_root(&sample_corpus());
    let output = run_agentpack(["check", "--root", &root.path().display().to_string(), "--json"]);
    assert_exit(&output, 0);

    let report = parse_stdout(&output);
    assert_eq!(report["status"], json!("ok"));
    assert_eq!(report["parity_ok"], json!(true));
    assert_eq!(report["objectives"]["status"], json!("explicit"));
}

#[test]
fn check_fails_on_parity_drift_with_deltas() {
    let root = seeded_root(&drifted_corpus());
    let output = run_agentpack(["check", "--root", &root.path().display().to_string(), "--json"]);
    assert_exit(&output, 1);

    let report = parse_stdout(&output);
    assert_eq!(report["status"], json!("ok"));
    assert_eq!(
        report["parity_deltas"]["eval_harness_vs_kpi_targets"],
        json!({"HAL_max": [0.1, 0.02]})
    );
}

#[test]
fn check_human_output_names_failed_pairs() {
    let root = seeded_root(&drifted_corpus());
    let output = run_agentpack(["check", "--root", &root.path().display().to_string()]);
    assert_exit(&output, 1);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("eval_harness_vs_governance: FAIL"));
    assert!(stdout.contains("Verdict: FAIL"));
}

#[test]
fn config_registry_resolves_relative_to_config_file() {
    let root = seeded_root(&sample_corpus());
    fs::create_dir_all(root.path().join("schema")).expect("schema dir should be created");
    fs::write(
        root.path().join("schema/keys.json"),
        json!({ROUTER: ["routes", "owner"]}).to_string(),
    )
    .expect("registry should be written");
    fs::write(
        root.path().join("agentpack.toml"),
        "[schema]\nrequired_keys = \"schema/keys.json\"\n",
    )
    .expect("config should be written");

    let output = run_agentpack(["check", "--root", &root.path().display().to_string(), "--json"]);
    assert_exit(&output, 1);
    let report = parse_stdout(&output);
    assert_eq!(report["missing_keys"], json!({ROUTER: ["owner"]}));
}

#[test]
fn overlay_commits_consistent_changes() {
    let root = seeded_root(&sample_corpus());
    let overlay = write_overlay(root.path());
    let output = run_agentpack([
        "overlay",
        "--root",
        &root.path().display().to_string(),
        "--overlay",
        &overlay,
        "--json",
    ]);
    assert_exit(&output, 0);

    let summary = parse_stdout(&output);
    assert_eq!(summary["rolled_back"], json!(false));
    assert_eq!(summary["touched_documents"], json!([WORKFLOWS]));
    let workflows = read_pack(root.path(), WORKFLOWS);
    assert_eq!(workflows["approvals"]["required"], json!(true));
    assert_eq!(workflows["refs"]["entry_node"], json!("intake"));
    assert!(!root.path().join(CORPUS_LOCK_FILE).exists());
}

#[test]
fn overlay_rolls_back_when_parity_is_broken() {
    let root = seeded_root(&drifted_corpus());
    let before = fs::read(root.path().join(WORKFLOWS)).expect("workflows should be readable");
    let overlay = write_overlay(root.path());
    let output = run_agentpack([
        "overlay",
        "--root",
        &root.path().display().to_string(),
        "--overlay",
        &overlay,
        "--json",
    ]);
    assert_exit(&output, 1);

    let summary = parse_stdout(&output);
    assert_eq!(summary["rolled_back"], json!(true));
    assert_eq!(
        fs::read(root.path().join(WORKFLOWS)).expect("workflows should be readable"),
        before
    );
    assert!(read_pack(root.path(), WORKFLOWS).get("approvals").is_none());
}

#[test]
fn overlay_dry_run_leaves_packs_untouched() {
    let root = seeded_root(&sample_corpus());
    let before = fs::read(root.path().join(WORKFLOWS)).expect("workflows should be readable");
    let overlay = write_overlay(root.path());
    let output = run_agentpack([
        "overlay",
        "--root",
        &root.path().display().to_string(),
        "--overlay",
        &overlay,
        "--dry-run",
    ]);
    assert_exit(&output, 0);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Outcome: would commit"));
    assert_eq!(
        fs::read(root.path().join(WORKFLOWS)).expect("workflows should be readable"),
        before
    );
}

#[test]
fn overlay_fails_fast_when_corpus_is_locked() {
    let root = seeded_root(&sample_corpus());
    fs::write(root.path().join(CORPUS_LOCK_FILE), "pid=1\n").expect("lock should be written");
    let overlay = write_overlay(root.path());
    let output = run_agentpack([
        "overlay",
        "--root",
        &root.path().display().to_string(),
        "--overlay",
        &overlay,
    ]);
    assert_exit(&output, 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("corpus lock busy"));
    assert!(read_pack(root.path(), WORKFLOWS).get("approvals").is_none());
}

#[test]
fn normalize_rewrites_only_non_canonical_packs() {
    let root = seeded_root(&sample_corpus());
    fs::write(
        root.path().join(GOVERNANCE),
        r#"{"schema_version":1,"go_no_go":{"gates":{"PRI_min":0.95,"hallucination_max":0.02,"AUD_min":0.9}}}"#,
    )
    .expect("governance should be rewritten");

    let output = run_agentpack(["normalize", "--root", &root.path().display().to_string(), "--json"]);
    assert_exit(&output, 0);
    let summary = parse_stdout(&output);
    assert_eq!(summary["rewritten"], json!([GOVERNANCE]));
    assert_eq!(summary["unchanged"].as_array().map(Vec::len), Some(19));

    let text = fs::read_to_string(root.path().join(GOVERNANCE)).expect("governance readable");
    assert!(text.starts_with("{\n  \"go_no_go\": {"));
}

#[test]
fn missing_root_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let missing = dir.path().join("nope");
    let output = run_agentpack(["check", "--root", &missing.display().to_string()]);
    assert_exit(&output, 2);
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error:"));
}
