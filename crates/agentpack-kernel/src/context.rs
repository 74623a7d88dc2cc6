//! Engine context: the registries a check or overlay run consults.
//!
//! Built once per run from [`EngineConfig`] and passed by reference into the
//! checker and the overlay executor. Nothing in the engine loads
//! registries lazily or from globals.

use crate::config::EngineConfig;
use crate::error::KernelError;
use crate::pack::{
    AGENT_PROFILE, DATA_SOURCES, DEPLOYMENT, ESCALATION, EVAL_HARNESS, GOVERNANCE, GUARDRAILS,
    KPI_TARGETS, MANIFEST, MEMORY_POLICY, MODULE_REGISTRY, OBSERVABILITY, OPS_RUNBOOK, PERSONA,
    PROMPT_LIBRARY, ROUTER, SECRETS_REGISTRY, SYSTEM_PROMPT, TOOL_CATALOG, WORKFLOWS,
};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

const SCHEMA_VERSION_KEY: &str = "schema_version";

const REQUIRED_KEYS: &[(&str, &[&str])] = &[
    (AGENT_PROFILE, &["agent_name", "objectives"]),
    (PERSONA, &["traits"]),
    (SYSTEM_PROMPT, &["prompt"]),
    (PROMPT_LIBRARY, &["prompts"]),
    (MANIFEST, &["companions"]),
    (KPI_TARGETS, &["gates"]),
    (EVAL_HARNESS, &["thresholds"]),
    (GOVERNANCE, &["go_no_go"]),
    (OBSERVABILITY, &["slo"]),
    (TOOL_CATALOG, &["tools"]),
    (MODULE_REGISTRY, &["modules"]),
    (WORKFLOWS, &["nodes", "edges"]),
    (ROUTER, &["routes"]),
    (SECRETS_REGISTRY, &["secrets"]),
    (DATA_SOURCES, &["sources"]),
    (MEMORY_POLICY, &["retention"]),
    (GUARDRAILS, &["policies"]),
    (ESCALATION, &["tiers"]),
    (DEPLOYMENT, &["environments"]),
    (OPS_RUNBOOK, &["procedures"]),
];

// Gate blocks, companion pointers and schema versions stay off this list:
// overlays never touch invariant-bearing fields.
const ALLOW_LIST: &[(&str, &[&str])] = &[
    (
        AGENT_PROFILE,
        &["objectives", "objectives_source", "audience", "tone"],
    ),
    (PERSONA, &["traits", "voice"]),
    (SYSTEM_PROMPT, &["addenda"]),
    (PROMPT_LIBRARY, &["prompts"]),
    (MANIFEST, &["notes"]),
    (KPI_TARGETS, &["owners", "notes"]),
    (EVAL_HARNESS, &["datasets", "suites"]),
    (GOVERNANCE, &["approvals", "reviewers", "audit_log", "policies"]),
    (
        OBSERVABILITY,
        &["dashboards", "alerts", "tool_metrics", "log_fields"],
    ),
    (TOOL_CATALOG, &["tools"]),
    (MODULE_REGISTRY, &["modules"]),
    (WORKFLOWS, &["approvals", "refs", "nodes", "edges"]),
    (ROUTER, &["routes", "fallback"]),
    (SECRETS_REGISTRY, &["secrets"]),
    (DATA_SOURCES, &["sources"]),
    (MEMORY_POLICY, &["retention", "pii_handling"]),
    (GUARDRAILS, &["policies", "refusal_styles", "blocked_topics"]),
    (ESCALATION, &["tiers", "contacts"]),
    (DEPLOYMENT, &["environments", "rollout"]),
    (OPS_RUNBOOK, &["procedures", "on_call"]),
];

/// Registries shared by the checker and the overlay executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineContext {
    /// Document → top-level keys the schema contract requires.
    pub required_keys: BTreeMap<String, Vec<String>>,
    /// Document → top-level keys overlays may touch.
    pub allow_list: BTreeMap<String, BTreeSet<String>>,
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EngineContext {
    pub fn builtin() -> Self {
        Self {
            required_keys: builtin_required_keys(),
            allow_list: builtin_allow_list(),
        }
    }

    /// Apply `config` on top of the built-in registries.
    ///
    /// `base_dir` anchors relative paths (normally the config file's
    /// directory).
    pub fn from_config(config: &EngineConfig, base_dir: &Path) -> Result<Self, KernelError> {
        let mut context = Self::builtin();
        if let Some(path) = &config.schema.required_keys {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                base_dir.join(path)
            };
            context.required_keys = load_required_keys(&path)?;
        }
        for (document, keys) in &config.overlay.allow_list {
            context
                .allow_list
                .entry(document.clone())
                .or_default()
                .extend(keys.iter().map(|key| key.trim().to_string()));
        }
        Ok(context)
    }

    /// Whether overlays may touch top-level `key` of `document`.
    pub fn is_allowed(&self, document: &str, key: &str) -> bool {
        self.allow_list
            .get(document)
            .is_some_and(|keys| keys.contains(key))
    }
}

pub fn builtin_required_keys() -> BTreeMap<String, Vec<String>> {
    REQUIRED_KEYS
        .iter()
        .map(|(document, keys)| {
            let mut all = vec![SCHEMA_VERSION_KEY.to_string()];
            all.extend(keys.iter().map(|key| key.to_string()));
            (document.to_string(), all)
        })
        .collect()
}

pub fn builtin_allow_list() -> BTreeMap<String, BTreeSet<String>> {
    ALLOW_LIST
        .iter()
        .map(|(document, keys)| {
            (
                document.to_string(),
                keys.iter().map(|key| key.to_string()).collect(),
            )
        })
        .collect()
}

/// Read a `{doc: [key, ...]}` JSON registry.
pub fn load_required_keys(path: &Path) -> Result<BTreeMap<String, Vec<String>>, KernelError> {
    let display = path.display().to_string();
    let raw = fs::read(path).map_err(|source| KernelError::ReadFile {
        path: display.clone(),
        source,
    })?;
    let value: Value = serde_json::from_slice(&raw).map_err(|source| KernelError::ParseJson {
        path: display.clone(),
        source,
    })?;
    let Some(object) = value.as_object() else {
        return Err(KernelError::InvalidRegistry {
            path: display,
            message: "root must be an object".to_string(),
        });
    };

    let mut registry = BTreeMap::new();
    for (document, keys) in object {
        let Some(items) = keys.as_array() else {
            return Err(KernelError::InvalidRegistry {
                path: display,
                message: format!("`{document}` must map to an array of key names"),
            });
        };
        let mut names = Vec::with_capacity(items.len());
        for item in items {
            match item.as_str().map(str::trim) {
                Some(name) if !name.is_empty() => names.push(name.to_string()),
                _ => {
                    return Err(KernelError::InvalidRegistry {
                        path: display,
                        message: format!("`{document}` contains a non-string or blank key"),
                    });
                }
            }
        }
        registry.insert(document.clone(), names);
    }
    Ok(registry)
}
