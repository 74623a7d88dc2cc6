//! Objectives heuristic over `agent_profile.json`.
//!
//! A profile whose objectives are all boilerplate ("help users", "provide
//! support") is flagged. The result is advisory: it only ever produces
//! warnings.

use agentpack_kernel::Corpus;
use agentpack_kernel::pack::AGENT_PROFILE;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

pub const GENERIC_OBJECTIVE_PHRASES: [&str; 8] = [
    "help users",
    "answer questions",
    "provide support",
    "assist customers",
    "be helpful",
    "provide information",
    "improve efficiency",
    "customer support",
];

const MAX_GENERIC_WORDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectivesStatus {
    Missing,
    Explicit,
    Derived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectivesSummary {
    pub status: ObjectivesStatus,
    pub generic: bool,
}

impl ObjectivesSummary {
    pub fn passes(&self) -> bool {
        self.status != ObjectivesStatus::Missing && !self.generic
    }
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex must compile"))
}

fn singularize(word: &str) -> &str {
    if word.chars().count() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        &word[..word.len() - 1]
    } else {
        word
    }
}

/// Lower-case, collapse whitespace, drop trailing punctuation and strip a
/// plural `s` from longer words.
pub fn normalize_objective(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let collapsed = whitespace_re().replace_all(lowered.trim(), " ");
    let trimmed = collapsed.trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    trimmed
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(singularize)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn is_generic_objective(raw: &str) -> bool {
    let normalized = normalize_objective(raw);
    let words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();
    if words.is_empty() {
        return true;
    }

    GENERIC_OBJECTIVE_PHRASES.iter().any(|phrase| {
        let phrase = normalize_objective(phrase);
        let phrase_words: Vec<&str> = phrase.split(' ').collect();
        if words == phrase_words {
            return true;
        }
        words.len() <= MAX_GENERIC_WORDS
            && (words.starts_with(&phrase_words)
                || words.ends_with(&phrase_words)
                || phrase_words.starts_with(&words)
                || phrase_words.ends_with(&words))
    })
}

pub(crate) fn classify_objectives(corpus: &Corpus) -> (ObjectivesSummary, Vec<String>) {
    let mut warnings = Vec::new();
    let profile = corpus.object(AGENT_PROFILE);

    let objectives: Vec<&str> = match profile.and_then(|p| p.get("objectives")) {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_str)
            .filter(|entry| !entry.trim().is_empty())
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            warnings.push(format!("{AGENT_PROFILE}: `objectives` is not a list"));
            Vec::new()
        }
    };

    if objectives.is_empty() {
        warnings.push(format!("{AGENT_PROFILE}: no objectives declared"));
        let summary = ObjectivesSummary {
            status: ObjectivesStatus::Missing,
            generic: false,
        };
        return (summary, warnings);
    }

    let derived = profile
        .and_then(|p| p.get("objectives_source"))
        .and_then(Value::as_str)
        .is_some_and(|source| source.trim().eq_ignore_ascii_case("derived"));
    let generic = objectives.iter().all(|entry| is_generic_objective(entry));
    if generic {
        warnings.push(format!(
            "{AGENT_PROFILE}: all {} objectives are generic; state what this agent is for",
            objectives.len()
        ));
    }

    let status = if derived {
        ObjectivesStatus::Derived
    } else {
        ObjectivesStatus::Explicit
    };
    (ObjectivesSummary { status, generic }, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentpack_kernel::fixtures::sample_corpus;
    use serde_json::json;

    fn profile(content: Value) -> Corpus {
        Corpus::from_contents([(AGENT_PROFILE, content)])
    }

    #[test]
    fn normalization_folds_case_space_punctuation_and_plurals() {
        assert_eq!(normalize_objective("  Help   USERS!! "), "help user");
        assert_eq!(normalize_objective("Process invoices."), "process invoice");
        assert_eq!(normalize_objective("Assess access gaps"), "assess access gap");
        assert_eq!(normalize_objective("Fix bus"), "fix bus");
    }

    #[test]
    fn generic_detection_matches_prefixes_and_suffixes_of_short_entries() {
        assert!(is_generic_objective("Help users."));
        assert!(is_generic_objective("Help users quickly"));
        assert!(is_generic_objective("Always be helpful"));
        assert!(is_generic_objective("support"));
        assert!(!is_generic_objective("Reconcile vendor invoices against purchase orders"));
        assert!(!is_generic_objective(
            "Help users reconcile vendor invoices against purchase orders"
        ));
    }

    #[test]
    fn sample_profile_is_explicit_and_specific() {
        let (summary, warnings) = classify_objectives(&sample_corpus());
        assert_eq!(
            summary,
            ObjectivesSummary {
                status: ObjectivesStatus::Explicit,
                generic: false
            }
        );
        assert!(summary.passes());
        assert!(warnings.is_empty());
    }

    #[test]
    fn derived_source_is_case_insensitive() {
        let (summary, _) = classify_objectives(&profile(json!({
            "objectives": ["Triage inbound vendor disputes"],
            "objectives_source": "Derived"
        })));
        assert_eq!(summary.status, ObjectivesStatus::Derived);
    }

    #[test]
    fn generic_list_and_missing_list_only_warn() {
        let (summary, warnings) = classify_objectives(&profile(json!({
            "objectives": ["Help users", "Answer questions!", "customer support"]
        })));
        assert!(summary.generic);
        assert!(!summary.passes());
        assert_eq!(warnings.len(), 1);

        let (summary, warnings) = classify_objectives(&profile(json!({"objectives": []})));
        assert_eq!(summary.status, ObjectivesStatus::Missing);
        assert_eq!(warnings.len(), 1);

        let (summary, warnings) = classify_objectives(&profile(json!({"objectives": "help"})));
        assert_eq!(summary.status, ObjectivesStatus::Missing);
        assert_eq!(warnings.len(), 2);
    }
}
