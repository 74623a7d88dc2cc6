use crate::support;
use agentpack_store::{load_corpus, with_corpus_lock, write_corpus};
use serde::Serialize;
use std::fs;

#[derive(Debug, Serialize)]
struct NormalizeSummary {
    root: String,
    rewritten: Vec<String>,
    unchanged: Vec<String>,
}

pub fn run(root: String, json_output: bool, log_level: Option<String>) {
    let session = support::open_session(&root, None, log_level.as_deref());

    let summary = with_corpus_lock(&session.root, || {
        let corpus = load_corpus(&session.root)?;
        let mut rewritten = Vec::new();
        let mut unchanged = Vec::new();
        for document in corpus.documents() {
            let on_disk = fs::read(session.root.join(document.name())).ok();
            if on_disk.as_deref() == Some(document.canonical_text().as_bytes()) {
                unchanged.push(document.name().to_string());
            } else {
                rewritten.push(document.name().to_string());
            }
        }
        if !rewritten.is_empty() {
            write_corpus(&session.root, &corpus)?;
        }
        tracing::info!(rewritten = rewritten.len(), "normalized corpus");
        Ok(NormalizeSummary {
            root: session.root.display().to_string(),
            rewritten,
            unchanged,
        })
    })
    .unwrap_or_else(|err| {
        eprintln!("error: normalize failed: {err}");
        std::process::exit(2);
    });

    if json_output {
        support::print_json_or_exit(&summary, "normalize summary");
        return;
    }
    println!("agentpack normalize");
    println!("  Root: {}", summary.root);
    println!("  Rewritten: {}", summary.rewritten.len());
    for name in &summary.rewritten {
        println!("    - {name}");
    }
    println!("  Unchanged: {}", summary.unchanged.len());
}
