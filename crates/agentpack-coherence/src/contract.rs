//! Schema key contract: required top-level keys per document.

use agentpack_kernel::Corpus;
use std::collections::BTreeMap;

/// Top-level keys each document must carry, per the context registry.
/// Only documents with at least one missing key appear in the result.
pub(crate) fn check_schema_contract(
    corpus: &Corpus,
    required_keys: &BTreeMap<String, Vec<String>>,
) -> BTreeMap<String, Vec<String>> {
    let mut missing = BTreeMap::new();
    for (document, keys) in required_keys {
        let object = corpus.object(document);
        let absent: Vec<String> = keys
            .iter()
            .filter(|key| !object.is_some_and(|object| object.contains_key(key.as_str())))
            .cloned()
            .collect();
        if !absent.is_empty() {
            missing.insert(document.clone(), absent);
        }
    }
    missing
}
