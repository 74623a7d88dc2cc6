//! The checker's output.

use crate::objectives::ObjectivesSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `(value in left document, value in right document)`, rounded to four
/// decimal places; `None` when the gate could not be read.
pub type GateDelta = (Option<f64>, Option<f64>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Ok,
    Error,
}

/// Result of one invariant-check run.
///
/// `status` only reflects `errors`. The `*_ok` flags and `packs_complete`
/// are computed from their own sub-results; callers gate on those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub status: ReportStatus,
    pub checks: BTreeMap<String, bool>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub parity: BTreeMap<String, bool>,
    pub parity_deltas: BTreeMap<String, BTreeMap<String, GateDelta>>,
    pub missing_keys: BTreeMap<String, Vec<String>>,
    pub missing_sections: BTreeMap<String, Vec<String>>,
    pub missing_packs: Vec<String>,
    pub linkage_errors: Vec<String>,
    pub objectives: ObjectivesSummary,
    pub contract_ok: bool,
    pub crossref_ok: bool,
    pub parity_ok: bool,
    pub packs_complete: bool,
}

impl Report {
    /// Whether a transaction may keep the state this report describes.
    pub fn is_committable(&self) -> bool {
        self.parity_ok && self.errors.is_empty()
    }

    /// Conservative CLI verdict: every required flag holds and nothing is
    /// missing, regardless of `status`.
    pub fn exit_ok(&self) -> bool {
        self.contract_ok
            && self.crossref_ok
            && self.parity_ok
            && self.packs_complete
            && self.missing_keys.is_empty()
            && self.missing_sections.is_empty()
    }

    pub fn failed_checks(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|(_, passed)| !**passed)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
