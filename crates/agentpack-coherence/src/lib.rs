//! Cross-pack invariant checker.
//!
//! [`run_invariant_check`] evaluates a [`Corpus`] against the invariants the
//! packs share and returns a [`Report`]. Each check returns its outcome as
//! a value and the outcomes are aggregated once; nothing here fails or
//! panics on malformed documents.

mod contract;
mod crossref;
mod linkage;
mod objectives;
mod parity;
mod report;
mod secrets;
mod sections;

pub use linkage::collect_identifiers;
pub use objectives::{
    GENERIC_OBJECTIVE_PHRASES, ObjectivesStatus, ObjectivesSummary, is_generic_objective,
    normalize_objective,
};
pub use parity::read_gates;
pub use report::{GateDelta, Report, ReportStatus};
pub use secrets::FORBIDDEN_SECRET_KEYS;

use agentpack_kernel::{Corpus, EngineContext};
use std::collections::BTreeMap;

pub const CHECK_KPI_PARITY: &str = "kpi_parity";
pub const CHECK_CROSSREF: &str = "crossref";
pub const CHECK_SECTIONS: &str = "sections";
pub const CHECK_LINKAGE: &str = "linkage";
pub const CHECK_SECRETS: &str = "secrets";
pub const CHECK_SCHEMA_CONTRACT: &str = "schema_contract";
pub const CHECK_OBJECTIVES: &str = "objectives";
pub const CHECK_PACKS_PRESENT: &str = "packs_present";

pub fn run_invariant_check(corpus: &Corpus, ctx: &EngineContext) -> Report {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for document in corpus.documents() {
        if !document.content().is_object() {
            warnings.push(format!("{}: root is not an object", document.name()));
        }
    }

    let parity = parity::check_parity(corpus);
    let crossref = crossref::check_crossrefs(corpus);
    let sections = sections::check_sections(corpus);
    let linkage_errors = linkage::check_linkage(corpus);
    let secrets = secrets::check_secrets(corpus);
    let missing_keys = contract::check_schema_contract(corpus, &ctx.required_keys);
    let (objectives, objective_warnings) = objectives::classify_objectives(corpus);

    let parity_ok = parity.all_equal();
    let crossref_ok = crossref.errors.is_empty();
    let packs_complete = sections.complete();
    let contract_ok = missing_keys.is_empty();
    let secrets_ok = secrets.errors.is_empty();

    let checks = BTreeMap::from([
        (CHECK_KPI_PARITY.to_string(), parity_ok),
        (CHECK_CROSSREF.to_string(), crossref_ok),
        (
            CHECK_SECTIONS.to_string(),
            sections.missing_sections.is_empty(),
        ),
        (CHECK_LINKAGE.to_string(), linkage_errors.is_empty()),
        (CHECK_SECRETS.to_string(), secrets_ok),
        (CHECK_SCHEMA_CONTRACT.to_string(), contract_ok),
        (CHECK_OBJECTIVES.to_string(), objectives.passes()),
        (
            CHECK_PACKS_PRESENT.to_string(),
            sections.missing_packs.is_empty(),
        ),
    ]);

    warnings.extend(parity.warnings);
    errors.extend(crossref.errors);
    warnings.extend(crossref.warnings);
    errors.extend(secrets.errors);
    warnings.extend(secrets.warnings);
    warnings.extend(objective_warnings);

    let status = if errors.is_empty() {
        ReportStatus::Ok
    } else {
        ReportStatus::Error
    };

    let report = Report {
        status,
        checks,
        errors,
        warnings,
        parity: parity.pairs,
        parity_deltas: parity.deltas,
        missing_keys,
        missing_sections: sections.missing_sections,
        missing_packs: sections.missing_packs,
        linkage_errors,
        objectives,
        contract_ok,
        crossref_ok,
        parity_ok,
        packs_complete,
    };
    tracing::debug!(
        documents = corpus.len(),
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        failed = ?report.failed_checks(),
        "invariant check finished"
    );
    report
}
