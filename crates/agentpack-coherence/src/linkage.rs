//! Referential integrity: identifiers used in one pack must exist in the
//! pack that owns them.

use agentpack_kernel::pack::{MODULE_REGISTRY, ROUTER, TOOL_CATALOG, WORKFLOWS, pack_stem};
use agentpack_kernel::Corpus;
use serde_json::Value;
use std::collections::BTreeSet;

/// `source.collection[].field` must name some `catalog.catalog_collection[].catalog_key`.
struct LinkRule {
    source: &'static str,
    collection: &'static str,
    field: &'static str,
    catalog: &'static str,
    catalog_collection: &'static str,
    catalog_key: &'static str,
}

const LINK_RULES: [LinkRule; 3] = [
    LinkRule {
        source: WORKFLOWS,
        collection: "nodes",
        field: "tool",
        catalog: TOOL_CATALOG,
        catalog_collection: "tools",
        catalog_key: "name",
    },
    LinkRule {
        source: WORKFLOWS,
        collection: "nodes",
        field: "module",
        catalog: MODULE_REGISTRY,
        catalog_collection: "modules",
        catalog_key: "id",
    },
    LinkRule {
        source: ROUTER,
        collection: "routes",
        field: "workflow_node",
        catalog: WORKFLOWS,
        catalog_collection: "nodes",
        catalog_key: "id",
    },
];

/// Non-blank string values of `document.collection[].key`.
pub fn collect_identifiers<'a>(
    corpus: &'a Corpus,
    document: &str,
    collection: &str,
    key: &str,
) -> Vec<&'a str> {
    corpus
        .object(document)
        .and_then(|object| object.get(collection))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.get(key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|identifier| !identifier.is_empty())
        .collect()
}

/// Sorted, de-duplicated `{sourceDoc}.{field}_missing:{value}` codes.
pub(crate) fn check_linkage(corpus: &Corpus) -> Vec<String> {
    let mut codes = BTreeSet::new();
    for rule in &LINK_RULES {
        let known: BTreeSet<&str> = collect_identifiers(
            corpus,
            rule.catalog,
            rule.catalog_collection,
            rule.catalog_key,
        )
        .into_iter()
        .collect();
        for reference in collect_identifiers(corpus, rule.source, rule.collection, rule.field) {
            if !known.contains(reference) {
                codes.insert(format!(
                    "{}.{}_missing:{reference}",
                    pack_stem(rule.source),
                    rule.field
                ));
            }
        }
    }
    codes.into_iter().collect()
}
