use crate::support::{self, pass_fail};
use agentpack_overlay::{OverlayConfig, OverlayRunSummary, preview_overlay, run_overlay_transaction};
use agentpack_store::{DirectoryStore, with_corpus_lock};
use std::path::Path;

pub struct Args {
    pub root: String,
    pub overlay: String,
    pub config: Option<String>,
    pub dry_run: bool,
    pub json: bool,
    pub log_level: Option<String>,
}

pub fn run(args: Args) {
    let session =
        support::open_session(&args.root, args.config.as_deref(), args.log_level.as_deref());

    let overlay = OverlayConfig::load(Path::new(&args.overlay)).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(2);
    });
    let store = DirectoryStore::new(&session.root);

    let result = if args.dry_run {
        preview_overlay(&store, &overlay, &session.ctx)
    } else {
        with_corpus_lock(&session.root, || {
            run_overlay_transaction(&store, &overlay, &session.ctx)
        })
    };
    let summary = result.unwrap_or_else(|err| {
        eprintln!("error: overlay failed: {err}");
        std::process::exit(2);
    });

    if args.json {
        support::print_json_or_exit(&summary, "overlay summary");
    } else {
        print_human_summary(&summary, &args.overlay);
    }

    if summary.rolled_back {
        std::process::exit(1);
    }
}

fn print_human_summary(summary: &OverlayRunSummary, overlay_path: &str) {
    let mode = if summary.dry_run { "dry run" } else { "transaction" };
    println!("agentpack overlay ({mode})");
    println!("  Overlay: {overlay_path}");
    println!("  Applied: {}", summary.applied.join(", "));
    if !summary.skipped.is_empty() {
        println!("  Skipped: {}", summary.skipped.join(", "));
    }
    println!("  Touched:");
    for (document, deltas) in &summary.deltas {
        let keys: Vec<&str> = deltas.keys().map(String::as_str).collect();
        println!("    - {document}: {}", keys.join(", "));
    }
    println!("  Digest Before: {}", summary.corpus_digest_before);
    println!("  Digest After: {}", summary.corpus_digest_after);
    println!("  Parity: {}", pass_fail(summary.report.parity_ok));
    for error in &summary.report.errors {
        println!("  Error: {error}");
    }
    let outcome = match (summary.dry_run, summary.rolled_back) {
        (false, false) => "committed",
        (false, true) => "rolled back",
        (true, false) => "would commit",
        (true, true) => "would roll back",
    };
    println!("  Outcome: {outcome}");
}
