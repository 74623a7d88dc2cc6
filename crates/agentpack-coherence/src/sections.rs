//! Pack presence and required-section completeness.

use agentpack_kernel::{CANONICAL_PACKS, Corpus, REQUIRED_SECTIONS};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub(crate) struct SectionsOutcome {
    pub missing_sections: BTreeMap<String, Vec<String>>,
    pub missing_packs: Vec<String>,
}

impl SectionsOutcome {
    pub fn complete(&self) -> bool {
        self.missing_sections.is_empty() && self.missing_packs.is_empty()
    }
}

pub(crate) fn check_sections(corpus: &Corpus) -> SectionsOutcome {
    let missing_packs = CANONICAL_PACKS
        .iter()
        .filter(|name| !corpus.contains(name))
        .map(|name| name.to_string())
        .collect();

    let mut missing_sections: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for required in REQUIRED_SECTIONS {
        let present = corpus
            .object(required.document)
            .and_then(|object| object.get(required.section))
            .is_some_and(|value| required.kind.accepts(value));
        if !present {
            missing_sections
                .entry(required.document.to_string())
                .or_default()
                .push(required.section.to_string());
        }
    }

    SectionsOutcome {
        missing_sections,
        missing_packs,
    }
}
