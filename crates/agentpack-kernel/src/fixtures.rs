//! A complete, consistent reference corpus.
//!
//! Every check passes against [`sample_corpus`]; tests break one invariant
//! at a time from here.

use crate::document::Corpus;
use crate::pack::{
    AGENT_PROFILE, DATA_SOURCES, DEPLOYMENT, ESCALATION, EVAL_HARNESS, GOVERNANCE, GUARDRAILS,
    KPI_TARGETS, MANIFEST, MEMORY_POLICY, MODULE_REGISTRY, OBSERVABILITY, OPS_RUNBOOK, PERSONA,
    PROMPT_LIBRARY, ROUTER, SECRETS_REGISTRY, SYSTEM_PROMPT, TOOL_CATALOG, WORKFLOWS,
};
use serde_json::json;

pub fn sample_corpus() -> Corpus {
    Corpus::from_contents([
        (
            AGENT_PROFILE,
            json!({
                "schema_version": 1,
                "agent_name": "Ledger Concierge",
                "objectives": [
                    "Reconcile vendor invoices against purchase orders",
                    "Flag duplicate payments before the weekly payment run"
                ],
                "objectives_source": "intake",
                "audience": "accounts payable team"
            }),
        ),
        (
            PERSONA,
            json!({"schema_version": 1, "traits": ["precise", "calm"]}),
        ),
        (
            SYSTEM_PROMPT,
            json!({"schema_version": 1, "prompt": "You reconcile invoices for the AP team."}),
        ),
        (
            PROMPT_LIBRARY,
            json!({
                "schema_version": 1,
                "prompts": [{"id": "reconcile", "text": "Match the invoice to its PO."}]
            }),
        ),
        (
            MANIFEST,
            json!({
                "schema_version": 1,
                "companions": {
                    "profile": AGENT_PROFILE,
                    "kpi": KPI_TARGETS,
                    "eval": EVAL_HARNESS,
                    "governance": GOVERNANCE,
                    "observability": OBSERVABILITY,
                    "tools": TOOL_CATALOG,
                    "modules": MODULE_REGISTRY,
                    "workflows": WORKFLOWS,
                    "router": ROUTER,
                    "secrets": SECRETS_REGISTRY
                }
            }),
        ),
        (
            KPI_TARGETS,
            json!({
                "schema_version": 1,
                "gates": {"PRI_min": 0.95, "HAL_max": 0.02, "AUD_min": 0.90}
            }),
        ),
        (
            EVAL_HARNESS,
            json!({
                "schema_version": 1,
                "thresholds": {
                    "precision_min": 0.95,
                    "hallucination_max": 0.02,
                    "audit_min": 0.90
                }
            }),
        ),
        (
            GOVERNANCE,
            json!({
                "schema_version": 1,
                "go_no_go": {
                    "gates": {"PRI_min": 0.95, "hallucination_max": 0.02, "AUD_min": 0.90}
                }
            }),
        ),
        (
            OBSERVABILITY,
            json!({
                "schema_version": 1,
                "slo": {
                    "kpi_gates": {"pri_min": 0.95, "hal_max": 0.02, "audit_score_min": 0.90}
                }
            }),
        ),
        (
            TOOL_CATALOG,
            json!({
                "schema_version": 1,
                "tools": [{"name": "erp_lookup"}, {"name": "invoice_parser"}]
            }),
        ),
        (
            MODULE_REGISTRY,
            json!({
                "schema_version": 1,
                "modules": [{"id": "ap_core"}, {"id": "fraud_screen"}]
            }),
        ),
        (
            WORKFLOWS,
            json!({
                "schema_version": 1,
                "entry_node": "intake",
                "tool_catalog": TOOL_CATALOG,
                "escalation_policy": ESCALATION,
                "nodes": [
                    {"id": "intake", "tool": "invoice_parser", "module": "ap_core"},
                    {"id": "match", "tool": "erp_lookup", "module": "ap_core"},
                    {"id": "screen", "module": "fraud_screen"}
                ],
                "edges": [
                    {"from": "intake", "to": "match"},
                    {"from": "match", "to": "screen"}
                ]
            }),
        ),
        (
            ROUTER,
            json!({
                "schema_version": 1,
                "routes": [{"intent": "invoice", "workflow_node": "intake"}]
            }),
        ),
        (
            SECRETS_REGISTRY,
            json!({
                "schema_version": 1,
                "secrets": [{"name": "ERP_API_KEY", "ref": "vault://ap/erp"}]
            }),
        ),
        (
            DATA_SOURCES,
            json!({"schema_version": 1, "sources": [{"id": "erp"}]}),
        ),
        (
            MEMORY_POLICY,
            json!({"schema_version": 1, "retention": {"days": 30}}),
        ),
        (
            GUARDRAILS,
            json!({
                "schema_version": 1,
                "policies": ["never initiate payments"],
                "refusal_styles": {"default": "brief"}
            }),
        ),
        (
            ESCALATION,
            json!({
                "schema_version": 1,
                "tiers": [{"level": 1, "team": "ap-leads"}],
                "contacts": {"ap-leads": "ap-leads@example.com"}
            }),
        ),
        (
            DEPLOYMENT,
            json!({"schema_version": 1, "environments": ["staging", "prod"]}),
        ),
        (
            OPS_RUNBOOK,
            json!({
                "schema_version": 1,
                "procedures": [{"id": "restart"}],
                "on_call": {"primary": "ap-oncall"}
            }),
        ),
    ])
}
