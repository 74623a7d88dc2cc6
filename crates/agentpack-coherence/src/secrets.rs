//! Secrets guard: the registry may hold references, never secret material.

use agentpack_kernel::pack::SECRETS_REGISTRY;
use agentpack_kernel::{Corpus, is_empty_value};
use serde_json::Value;

pub const FORBIDDEN_SECRET_KEYS: [&str; 4] = ["value", "token", "password", "secret"];

#[derive(Debug, Default)]
pub(crate) struct SecretsOutcome {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub(crate) fn check_secrets(corpus: &Corpus) -> SecretsOutcome {
    let mut outcome = SecretsOutcome::default();
    let Some(raw) = corpus
        .object(SECRETS_REGISTRY)
        .and_then(|registry| registry.get("secrets"))
    else {
        return outcome;
    };
    let Some(entries) = raw.as_array() else {
        outcome
            .warnings
            .push(format!("{SECRETS_REGISTRY}: `secrets` is not a list"));
        return outcome;
    };

    for (index, entry) in entries.iter().enumerate() {
        let Some(fields) = entry.as_object() else {
            outcome.warnings.push(format!(
                "{SECRETS_REGISTRY}: secrets[{index}] is not an object"
            ));
            continue;
        };
        let name = fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>");
        // Messages name the entry and the key, never the value.
        for key in FORBIDDEN_SECRET_KEYS {
            if fields.get(key).is_some_and(|value| !is_empty_value(value)) {
                outcome.errors.push(format!(
                    "{SECRETS_REGISTRY}: secrets[{index}] (`{name}`) carries an inline `{key}`; store a vault reference instead"
                ));
            }
        }
    }
    outcome
}
