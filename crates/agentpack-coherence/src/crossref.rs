//! Manifest hub → companion filename pointers.

use agentpack_kernel::pack::MANIFEST;
use agentpack_kernel::{COMPANION_ROLES, Corpus};
use serde_json::Value;

const COMPANIONS_FIELD: &str = "companions";

#[derive(Debug, Default)]
pub(crate) struct CrossrefOutcome {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub(crate) fn check_crossrefs(corpus: &Corpus) -> CrossrefOutcome {
    let mut outcome = CrossrefOutcome::default();
    let Some(companions) = corpus
        .object(MANIFEST)
        .and_then(|manifest| manifest.get(COMPANIONS_FIELD))
        .and_then(Value::as_object)
    else {
        outcome
            .errors
            .push(format!("crossref unreadable: {MANIFEST} `{COMPANIONS_FIELD}`"));
        return outcome;
    };

    for (role, expected) in COMPANION_ROLES {
        match companions.get(role) {
            Some(Value::String(actual)) if actual == expected => {}
            Some(Value::String(actual)) => outcome.errors.push(format!(
                "crossref mismatch: {MANIFEST} {COMPANIONS_FIELD}.{role} = `{actual}`, expected `{expected}`"
            )),
            Some(_) => outcome.errors.push(format!(
                "crossref mismatch: {MANIFEST} {COMPANIONS_FIELD}.{role} is not a filename, expected `{expected}`"
            )),
            None => outcome.errors.push(format!(
                "crossref missing: {MANIFEST} {COMPANIONS_FIELD}.{role}, expected `{expected}`"
            )),
        }
    }

    for role in companions.keys() {
        if !COMPANION_ROLES.iter().any(|(known, _)| known == role) {
            outcome.warnings.push(format!(
                "{MANIFEST}: {COMPANIONS_FIELD}.{role} is not a known companion role"
            ));
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentpack_kernel::fixtures::sample_corpus;
    use serde_json::json;

    #[test]
    fn consistent_manifest_has_no_errors() {
        let outcome = check_crossrefs(&sample_corpus());
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn every_mismatch_is_reported() {
        let mut corpus = sample_corpus();
        let manifest = corpus.content_mut(MANIFEST).expect("manifest should exist");
        manifest["companions"]["kpi"] = json!("kpis.json");
        manifest["companions"]["eval"] = json!("Eval_Harness.json");
        manifest["companions"]
            .as_object_mut()
            .expect("companions should be an object")
            .remove("router");
        manifest["companions"]["legacy"] = json!("old.json");

        let outcome = check_crossrefs(&corpus);
        assert_eq!(outcome.errors.len(), 3, "{:?}", outcome.errors);
        assert!(outcome.errors.iter().any(|e| e.contains("companions.kpi = `kpis.json`")));
        assert!(outcome.errors.iter().any(|e| e.starts_with("crossref missing") && e.contains("router")));
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn missing_field_is_recorded_not_fatal() {
        let corpus = Corpus::from_contents([(MANIFEST, json!({"schema_version": 1}))]);
        let outcome = check_crossrefs(&corpus);
        assert_eq!(
            outcome.errors,
            vec!["crossref unreadable: manifest.json `companions`".to_string()]
        );
    }
}
