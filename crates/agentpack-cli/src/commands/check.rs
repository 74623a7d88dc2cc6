use crate::support::{self, pass_fail};
use agentpack_coherence::{Report, run_invariant_check};
use agentpack_store::load_corpus;
use std::collections::BTreeMap;
use std::path::Path;

pub fn run(root: String, config: Option<String>, json_output: bool, log_level: Option<String>) {
    let session = support::open_session(&root, config.as_deref(), log_level.as_deref());

    let corpus = load_corpus(&session.root).unwrap_or_else(|err| {
        eprintln!("error: check failed: {err}");
        std::process::exit(2);
    });
    let report = run_invariant_check(&corpus, &session.ctx);

    if json_output {
        support::print_json_or_exit(&report, "check report");
    } else {
        print_human_summary(&report, &session.root);
    }

    if !report.exit_ok() {
        std::process::exit(1);
    }
}

fn print_listing(title: &str, entries: &BTreeMap<String, Vec<String>>) {
    if entries.is_empty() {
        return;
    }
    println!("  {title}:");
    for (document, items) in entries {
        println!("    - {document}: {}", items.join(", "));
    }
}

fn print_lines(title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    println!("  {title} ({}):", lines.len());
    for line in lines {
        println!("    - {line}");
    }
}

fn print_human_summary(report: &Report, root: &Path) {
    println!("agentpack check");
    println!("  Root: {}", root.display());
    println!("  Status: {:?}", report.status);
    println!("  Checks:");
    for (name, passed) in &report.checks {
        println!("    - {name}: {}", pass_fail(*passed));
    }
    println!("  Parity:");
    for (pair, equal) in &report.parity {
        let detail = report
            .parity_deltas
            .get(pair)
            .map(|deltas| {
                let rendered: Vec<String> = deltas
                    .iter()
                    .map(|(gate, (a, b))| format!("{gate} {a:?} vs {b:?}"))
                    .collect();
                format!(" [{}]", rendered.join("; "))
            })
            .unwrap_or_default();
        println!("    - {pair}: {}{detail}", pass_fail(*equal));
    }
    println!(
        "  Objectives: {:?}{}",
        report.objectives.status,
        if report.objectives.generic { " (generic)" } else { "" }
    );
    print_listing("Missing Keys", &report.missing_keys);
    print_listing("Missing Sections", &report.missing_sections);
    print_lines("Missing Packs", &report.missing_packs);
    print_lines("Linkage", &report.linkage_errors);
    print_lines("Errors", &report.errors);
    print_lines("Warnings", &report.warnings);
    println!("  Verdict: {}", pass_fail(report.exit_ok()));
}
