//! The canonical pack table.
//!
//! A generated agent configuration always consists of the same twenty
//! packs. Checks and overlays refer to them through these constants.

use serde_json::Value;

pub const AGENT_PROFILE: &str = "agent_profile.json";
pub const PERSONA: &str = "persona.json";
pub const SYSTEM_PROMPT: &str = "system_prompt.json";
pub const PROMPT_LIBRARY: &str = "prompt_library.json";
pub const MANIFEST: &str = "manifest.json";
pub const KPI_TARGETS: &str = "kpi_targets.json";
pub const EVAL_HARNESS: &str = "eval_harness.json";
pub const GOVERNANCE: &str = "governance.json";
pub const OBSERVABILITY: &str = "observability.json";
pub const TOOL_CATALOG: &str = "tool_catalog.json";
pub const MODULE_REGISTRY: &str = "module_registry.json";
pub const WORKFLOWS: &str = "workflows.json";
pub const ROUTER: &str = "router.json";
pub const SECRETS_REGISTRY: &str = "secrets_registry.json";
pub const DATA_SOURCES: &str = "data_sources.json";
pub const MEMORY_POLICY: &str = "memory_policy.json";
pub const GUARDRAILS: &str = "guardrails.json";
pub const ESCALATION: &str = "escalation.json";
pub const DEPLOYMENT: &str = "deployment.json";
pub const OPS_RUNBOOK: &str = "ops_runbook.json";

pub const CANONICAL_PACKS: [&str; 20] = [
    AGENT_PROFILE,
    PERSONA,
    SYSTEM_PROMPT,
    PROMPT_LIBRARY,
    MANIFEST,
    KPI_TARGETS,
    EVAL_HARNESS,
    GOVERNANCE,
    OBSERVABILITY,
    TOOL_CATALOG,
    MODULE_REGISTRY,
    WORKFLOWS,
    ROUTER,
    SECRETS_REGISTRY,
    DATA_SOURCES,
    MEMORY_POLICY,
    GUARDRAILS,
    ESCALATION,
    DEPLOYMENT,
    OPS_RUNBOOK,
];

/// Companion roles the manifest hub must point at, with the expected file.
pub const COMPANION_ROLES: [(&str, &str); 10] = [
    ("profile", AGENT_PROFILE),
    ("kpi", KPI_TARGETS),
    ("eval", EVAL_HARNESS),
    ("governance", GOVERNANCE),
    ("observability", OBSERVABILITY),
    ("tools", TOOL_CATALOG),
    ("modules", MODULE_REGISTRY),
    ("workflows", WORKFLOWS),
    ("router", ROUTER),
    ("secrets", SECRETS_REGISTRY),
];

/// `workflows.json` → `workflows`.
pub fn pack_stem(name: &str) -> &str {
    name.strip_suffix(".json").unwrap_or(name)
}

/// Shape a required section must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    List,
    Map,
}

impl SectionKind {
    /// Present, of the right kind, and non-empty.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::List => value.as_array().is_some_and(|items| !items.is_empty()),
            Self::Map => value.as_object().is_some_and(|map| !map.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredSection {
    pub document: &'static str,
    pub section: &'static str,
    pub kind: SectionKind,
}

const fn section(
    document: &'static str,
    section: &'static str,
    kind: SectionKind,
) -> RequiredSection {
    RequiredSection {
        document,
        section,
        kind,
    }
}

pub const REQUIRED_SECTIONS: &[RequiredSection] = &[
    section(WORKFLOWS, "nodes", SectionKind::List),
    section(WORKFLOWS, "edges", SectionKind::List),
    section(TOOL_CATALOG, "tools", SectionKind::List),
    section(MODULE_REGISTRY, "modules", SectionKind::List),
    section(GUARDRAILS, "policies", SectionKind::List),
    section(GUARDRAILS, "refusal_styles", SectionKind::Map),
    section(ESCALATION, "tiers", SectionKind::List),
    section(ESCALATION, "contacts", SectionKind::Map),
    section(OPS_RUNBOOK, "procedures", SectionKind::List),
    section(OPS_RUNBOOK, "on_call", SectionKind::Map),
    section(DATA_SOURCES, "sources", SectionKind::List),
    section(MEMORY_POLICY, "retention", SectionKind::Map),
];
