use agentpack_coherence::Report;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `[before, after]` for one key path; `null` stands for an absent value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDelta(pub Option<Value>, pub Option<Value>);

impl KeyDelta {
    pub fn before(&self) -> Option<&Value> {
        self.0.as_ref()
    }

    pub fn after(&self) -> Option<&Value> {
        self.1.as_ref()
    }
}

/// What one executor run did to its working copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayDiff {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    /// Document → key path → change.
    pub deltas: BTreeMap<String, BTreeMap<String, KeyDelta>>,
}

impl OverlayDiff {
    /// No document changed. `applied` and `skipped` may still be populated.
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn touched_documents(&self) -> Vec<String> {
        self.deltas.keys().cloned().collect()
    }

    pub fn document_deltas(&self, document: &str) -> Option<&BTreeMap<String, KeyDelta>> {
        self.deltas.get(document)
    }

    pub(crate) fn skip(&mut self, entry: String) {
        tracing::warn!(skipped = %entry, "overlay step skipped");
        self.skipped.push(entry);
    }
}

/// Outcome of a transaction or a dry run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayRunSummary {
    pub applied: Vec<String>,
    pub touched_documents: Vec<String>,
    pub skipped: Vec<String>,
    pub deltas: BTreeMap<String, BTreeMap<String, KeyDelta>>,
    /// For a dry run: whether a real run would have rolled back.
    pub rolled_back: bool,
    pub report: Report,
    pub corpus_digest_before: String,
    pub corpus_digest_after: String,
    pub dry_run: bool,
}

impl OverlayRunSummary {
    pub(crate) fn new(
        diff: OverlayDiff,
        report: Report,
        corpus_digest_before: String,
        corpus_digest_after: String,
        rolled_back: bool,
        dry_run: bool,
    ) -> Self {
        Self {
            touched_documents: diff.touched_documents(),
            applied: diff.applied,
            skipped: diff.skipped,
            deltas: diff.deltas,
            rolled_back,
            report,
            corpus_digest_before,
            corpus_digest_after,
            dry_run,
        }
    }
}
