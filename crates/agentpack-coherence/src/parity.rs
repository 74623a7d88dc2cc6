//! KPI gate parity across the four packs that restate the gates.

use crate::report::GateDelta;
use agentpack_kernel::{Corpus, GATE_LOCATIONS, Gate, GateLocation, PARITY_PAIRS, get_path};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub(crate) struct ParityOutcome {
    pub pairs: BTreeMap<String, bool>,
    pub deltas: BTreeMap<String, BTreeMap<String, GateDelta>>,
    pub warnings: Vec<String>,
}

impl ParityOutcome {
    pub fn all_equal(&self) -> bool {
        self.pairs.values().all(|equal| *equal)
    }
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn gate_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Read the gate block of one pack, resolving every alias spelling.
///
/// When two spellings of the same gate disagree the first in alias-table
/// order wins and a warning is recorded.
pub fn read_gates(corpus: &Corpus, location: &GateLocation) -> BTreeMap<Gate, f64> {
    read_gates_with_warnings(corpus, location, &mut Vec::new())
}

fn read_gates_with_warnings(
    corpus: &Corpus,
    location: &GateLocation,
    warnings: &mut Vec<String>,
) -> BTreeMap<Gate, f64> {
    let mut gates = BTreeMap::new();
    let Some(content) = corpus.content(location.document) else {
        return gates;
    };
    let block_path = location.block_path.join(".");
    let Some(block) = get_path(content, location.block_path).and_then(Value::as_object) else {
        warnings.push(format!(
            "{}: gate block `{block_path}` is missing or not an object",
            location.document
        ));
        return gates;
    };

    for gate in Gate::ALL {
        let mut chosen: Option<(&str, f64)> = None;
        for alias in gate.aliases() {
            let Some(raw) = block.get(alias) else {
                continue;
            };
            let Some(number) = gate_number(raw) else {
                warnings.push(format!(
                    "{}: `{block_path}.{alias}` is not numeric",
                    location.document
                ));
                continue;
            };
            match chosen {
                None => chosen = Some((alias, number)),
                Some((first, kept)) if kept != number => warnings.push(format!(
                    "{}: `{block_path}.{alias}` ({number}) disagrees with `{first}` ({kept}); using `{first}`",
                    location.document
                )),
                Some(_) => {}
            }
        }
        if let Some((_, number)) = chosen {
            gates.insert(gate, number);
        }
    }
    gates
}

pub(crate) fn check_parity(corpus: &Corpus) -> ParityOutcome {
    let mut outcome = ParityOutcome::default();
    let per_document: BTreeMap<&str, BTreeMap<Gate, f64>> = GATE_LOCATIONS
        .iter()
        .map(|location| {
            (
                location.document,
                read_gates_with_warnings(corpus, location, &mut outcome.warnings),
            )
        })
        .collect();
    let empty = BTreeMap::new();

    for pair in PARITY_PAIRS {
        let left = per_document.get(pair.left).unwrap_or(&empty);
        let right = per_document.get(pair.right).unwrap_or(&empty);

        let mut delta = BTreeMap::new();
        for gate in Gate::ALL {
            let a = left.get(&gate).copied();
            let b = right.get(&gate).copied();
            let equal = matches!((a, b), (Some(a), Some(b)) if a == b);
            if !equal {
                delta.insert(
                    gate.canonical_name().to_string(),
                    (a.map(round4), b.map(round4)),
                );
            }
        }

        outcome.pairs.insert(pair.name.to_string(), delta.is_empty());
        if !delta.is_empty() {
            outcome.deltas.insert(pair.name.to_string(), delta);
        }
    }
    outcome
}
