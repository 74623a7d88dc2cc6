//! Governance gates and the alias table that names them.
//!
//! Three numeric go/no-go thresholds are restated in four packs, each pack
//! using its own key spelling. [`Gate::aliases`] lists every spelling
//! a pack may use for a gate.

use crate::pack::{EVAL_HARNESS, GOVERNANCE, KPI_TARGETS, OBSERVABILITY};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Gate {
    #[serde(rename = "PRI_min")]
    Precision,
    #[serde(rename = "HAL_max")]
    Hallucination,
    #[serde(rename = "AUD_min")]
    Audit,
}

/// Every accepted spelling, canonical spelling first per gate.
const GATE_ALIASES: &[(&str, Gate)] = &[
    ("PRI_min", Gate::Precision),
    ("precision_min", Gate::Precision),
    ("pri_min", Gate::Precision),
    ("HAL_max", Gate::Hallucination),
    ("hallucination_max", Gate::Hallucination),
    ("hal_max", Gate::Hallucination),
    ("AUD_min", Gate::Audit),
    ("audit_min", Gate::Audit),
    ("aud_min", Gate::Audit),
    ("audit_score_min", Gate::Audit),
];

impl Gate {
    pub const ALL: [Gate; 3] = [Gate::Precision, Gate::Hallucination, Gate::Audit];

    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::Precision => "PRI_min",
            Self::Hallucination => "HAL_max",
            Self::Audit => "AUD_min",
        }
    }

    /// All spellings of this gate, canonical first.
    pub fn aliases(self) -> impl Iterator<Item = &'static str> {
        GATE_ALIASES
            .iter()
            .filter(move |(_, gate)| *gate == self)
            .map(|(alias, _)| *alias)
    }
}

/// Where a pack keeps its gate block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateLocation {
    pub document: &'static str,
    pub block_path: &'static [&'static str],
}

pub const GATE_LOCATIONS: [GateLocation; 4] = [
    GateLocation {
        document: KPI_TARGETS,
        block_path: &["gates"],
    },
    GateLocation {
        document: EVAL_HARNESS,
        block_path: &["thresholds"],
    },
    GateLocation {
        document: GOVERNANCE,
        block_path: &["go_no_go", "gates"],
    },
    GateLocation {
        document: OBSERVABILITY,
        block_path: &["slo", "kpi_gates"],
    },
];

pub fn gate_location(document: &str) -> Option<&'static GateLocation> {
    GATE_LOCATIONS
        .iter()
        .find(|location| location.document == document)
}

/// One required parity comparison; deltas report `(left, right)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParityPair {
    pub name: &'static str,
    pub left: &'static str,
    pub right: &'static str,
}

pub const PARITY_PAIRS: [ParityPair; 4] = [
    ParityPair {
        name: "eval_harness_vs_kpi_targets",
        left: EVAL_HARNESS,
        right: KPI_TARGETS,
    },
    ParityPair {
        name: "governance_vs_kpi_targets",
        left: GOVERNANCE,
        right: KPI_TARGETS,
    },
    ParityPair {
        name: "observability_vs_kpi_targets",
        left: OBSERVABILITY,
        right: KPI_TARGETS,
    },
    ParityPair {
        name: "eval_harness_vs_governance",
        left: EVAL_HARNESS,
        right: GOVERNANCE,
    },
];
