//! Overlay executor.
//!
//! Runs the steps of an [`OverlayConfig`] against a clone of the corpus and
//! reports what changed. It never fails: anything it cannot apply is
//! recorded in [`OverlayDiff::skipped`] and the run continues.
//!
//! Every write is additive. A key is only replaced when an operation names
//! it explicitly, and every top-level key a step touches must be on the
//! context allow-list for its document.

use crate::config::{
    MustIncludeBlock, OverlayConfig, OverlayOperation, RequiredFieldsPresent,
    STEP_ALIGN_OBSERVABILITY_BLOCKS, STEP_ALIGN_WORKFLOW_REFS, STEP_OPERATIONS,
};
use crate::summary::{KeyDelta, OverlayDiff};
use agentpack_coherence::collect_identifiers;
use agentpack_kernel::pack::{OBSERVABILITY, TOOL_CATALOG, WORKFLOWS};
use agentpack_kernel::{
    Corpus, EngineContext, deep_merge, get_path, is_empty_value, join_path, set_path,
};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

const WORKFLOW_REF_FIELDS: [&str; 3] = ["entry_node", "tool_catalog", "escalation_policy"];

/// Where a run is. Transitions are strictly forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Pending,
    /// Executing the step at this position in the expanded step sequence.
    Applying(usize),
    AllOperationsApplied,
    PostConditionsApplied,
    Done,
}

/// Apply `config` to a clone of `corpus`.
pub fn apply_overlay(
    corpus: &Corpus,
    config: &OverlayConfig,
    ctx: &EngineContext,
) -> (Corpus, OverlayDiff) {
    let mut run = OverlayRun::new(corpus, ctx);
    run.execute(config);
    (run.corpus, run.diff)
}

struct OverlayRun<'a> {
    ctx: &'a EngineContext,
    original: &'a Corpus,
    corpus: Corpus,
    diff: OverlayDiff,
    /// Document → joined key path → segments written during the run.
    touched: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    phase: RunPhase,
    steps_started: usize,
}

impl<'a> OverlayRun<'a> {
    fn new(original: &'a Corpus, ctx: &'a EngineContext) -> Self {
        Self {
            ctx,
            original,
            corpus: original.clone(),
            diff: OverlayDiff::default(),
            touched: BTreeMap::new(),
            phase: RunPhase::Pending,
            steps_started: 0,
        }
    }

    fn enter(&mut self, next: RunPhase) {
        tracing::debug!(from = ?self.phase, to = ?next, "overlay phase");
        self.phase = next;
    }

    fn begin_step(&mut self) {
        let position = self.steps_started;
        self.steps_started += 1;
        self.enter(RunPhase::Applying(position));
    }

    fn execute(&mut self, config: &OverlayConfig) {
        for step in &config.apply {
            match step.as_str() {
                STEP_OPERATIONS => {
                    for index in 0..config.operations.len() {
                        self.begin_step();
                        self.run_operation(config, index);
                    }
                }
                STEP_ALIGN_WORKFLOW_REFS => {
                    self.begin_step();
                    if self.align_workflow_refs() {
                        self.diff.applied.push(STEP_ALIGN_WORKFLOW_REFS.to_string());
                    }
                }
                STEP_ALIGN_OBSERVABILITY_BLOCKS => {
                    self.begin_step();
                    if self.align_observability_blocks() {
                        self.diff
                            .applied
                            .push(STEP_ALIGN_OBSERVABILITY_BLOCKS.to_string());
                    }
                }
                unknown => self.diff.skip(format!("step:{unknown}")),
            }
        }
        self.enter(RunPhase::AllOperationsApplied);

        for directive in &config.integrity_checks.must_include_block {
            self.must_include_block(directive);
        }
        for directive in &config.integrity_checks.required_fields_present {
            self.required_fields_present(directive);
        }
        self.enter(RunPhase::PostConditionsApplied);

        self.settle_deltas();
        tracing::debug!(
            applied = self.diff.applied.len(),
            skipped = self.diff.skipped.len(),
            touched = self.diff.deltas.len(),
            "overlay run finished"
        );
        self.enter(RunPhase::Done);
    }

    fn touch(&mut self, document: &str, segments: &[String]) {
        self.touched
            .entry(document.to_string())
            .or_default()
            .insert(join_path(segments), segments.to_vec());
    }

    /// Deltas compare the original corpus with the final one, so writes
    /// that later steps undo leave no entry.
    fn settle_deltas(&mut self) {
        for (document, paths) in std::mem::take(&mut self.touched) {
            for (joined, segments) in paths {
                let read = |corpus: &Corpus| {
                    corpus
                        .content(&document)
                        .and_then(|content| get_path(content, &segments))
                        .cloned()
                };
                let before = read(self.original);
                let after = read(&self.corpus);
                if before != after {
                    self.diff
                        .deltas
                        .entry(document.clone())
                        .or_default()
                        .insert(joined, KeyDelta(before, after));
                }
            }
        }
    }

    /// Gate for writing `document.key`; records the skip when refused.
    fn may_touch(&mut self, document: &str, key: &str) -> bool {
        let writable = self.ctx.is_allowed(document, key)
            && self
                .corpus
                .content(document)
                .is_some_and(Value::is_object);
        if !writable {
            self.diff.skip(format!("{document}:{key}"));
        }
        writable
    }

    fn root_mut(&mut self, document: &str) -> Option<&mut Map<String, Value>> {
        self.corpus
            .content_mut(document)
            .and_then(Value::as_object_mut)
    }

    fn run_operation(&mut self, config: &OverlayConfig, index: usize) {
        let label = format!("operations[{index}]");
        let applied = match config.operation(index) {
            Some(OverlayOperation::InjectBlock {
                target,
                path,
                value,
            }) => {
                let segments = path.segments();
                if segments.is_empty() {
                    self.diff.skip(format!("{label}:malformed"));
                    return;
                }
                self.inject_block(&target, &segments, value)
            }
            Some(OverlayOperation::Upsert { target, patch }) => self.upsert(&target, &patch),
            None => {
                self.diff.skip(format!("{label}:malformed"));
                return;
            }
        };
        tracing::debug!(operation = %label, applied, "overlay operation");
        if applied {
            self.diff.applied.push(label);
        }
    }

    /// Set the leaf at `segments`. Refuses when an existing intermediate
    /// is not an object.
    fn inject_block(&mut self, document: &str, segments: &[String], value: Value) -> bool {
        if !self.may_touch(document, &segments[0]) {
            return false;
        }
        let joined = join_path(segments);
        let Some(content) = self.corpus.content_mut(document) else {
            return false;
        };
        match set_path(content, segments, value) {
            Ok(_) => {
                self.touch(document, segments);
                true
            }
            Err(error) => {
                tracing::debug!(document, path = %joined, %error, "inject_block refused");
                self.diff.skip(format!("{document}:{joined}"));
                false
            }
        }
    }

    /// Deep-merge each allowed top-level key of `patch`; disallowed keys
    /// are dropped individually.
    fn upsert(&mut self, document: &str, patch: &Map<String, Value>) -> bool {
        let mut any_applied = patch.is_empty() && self.corpus.contains(document);
        for (key, patch_value) in patch {
            if !self.may_touch(document, key) {
                continue;
            }
            let Some(root) = self.root_mut(document) else {
                continue;
            };
            match root.get_mut(key) {
                Some(existing) => deep_merge(existing, patch_value),
                None => {
                    root.insert(key.clone(), patch_value.clone());
                }
            }
            self.touch(document, std::slice::from_ref(key));
            any_applied = true;
        }
        any_applied
    }

    /// Mirror the workflow's top-level pointers into `refs` without
    /// overwriting anything already there.
    fn align_workflow_refs(&mut self) -> bool {
        const REFS: &str = "refs";
        if !self.may_touch(WORKFLOWS, REFS) {
            return false;
        }
        let Some(root) = self.root_mut(WORKFLOWS) else {
            return false;
        };
        let existing = match root.get(REFS) {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                self.diff.skip(format!("{WORKFLOWS}:{REFS}"));
                return false;
            }
        };

        let mut additions = Vec::new();
        for field in WORKFLOW_REF_FIELDS {
            let Some(value) = root.get(field).filter(|value| !is_empty_value(value)) else {
                continue;
            };
            if existing.get(field).is_none_or(Value::is_null) {
                additions.push((field, value.clone()));
            }
        }
        if additions.is_empty() {
            return true;
        }

        let mut refs = existing;
        for (field, value) in &additions {
            refs.insert(field.to_string(), value.clone());
        }
        root.insert(REFS.to_string(), Value::Object(refs));
        for (field, _) in additions {
            self.touch(WORKFLOWS, &[REFS.to_string(), field.to_string()]);
        }
        true
    }

    /// Ensure the observability scaffolding exists and seed `tool_metrics`
    /// from the tool catalog while it is still empty.
    fn align_observability_blocks(&mut self) -> bool {
        let tool_names: Vec<Value> = collect_identifiers(&self.corpus, TOOL_CATALOG, "tools", "name")
            .into_iter()
            .map(|name| Value::String(name.to_string()))
            .collect();
        let blocks = [
            ("dashboards", json!({})),
            ("alerts", json!([])),
            ("tool_metrics", json!([])),
        ];

        let mut ran = false;
        for (key, scaffold) in blocks {
            if !self.may_touch(OBSERVABILITY, key) {
                continue;
            }
            let Some(root) = self.root_mut(OBSERVABILITY) else {
                continue;
            };
            ran = true;
            if root.get(key).is_none_or(Value::is_null) {
                root.insert(key.to_string(), scaffold);
            }
            if key == "tool_metrics"
                && !tool_names.is_empty()
                && root
                    .get(key)
                    .and_then(Value::as_array)
                    .is_some_and(Vec::is_empty)
            {
                root.insert(key.to_string(), Value::Array(tool_names.clone()));
            }
            self.touch(OBSERVABILITY, &[key.to_string()]);
        }
        ran
    }

    fn must_include_block(&mut self, directive: &MustIncludeBlock) {
        let segments = directive.path.segments();
        let joined = join_path(&segments);
        let label = format!("must_include_block:{}:{joined}", directive.file);
        if segments.is_empty() {
            self.diff.skip(format!("{label}:malformed"));
            return;
        }
        if !self.may_touch(&directive.file, &segments[0]) {
            return;
        }
        let Some(content) = self.corpus.content_mut(&directive.file) else {
            return;
        };
        if get_path(content, &segments).is_some_and(|value| !value.is_null()) {
            self.diff.applied.push(label);
            return;
        }
        match set_path(content, &segments, json!({})) {
            Ok(_) => {
                self.touch(&directive.file, &segments);
                self.diff.applied.push(label);
            }
            Err(_) => self.diff.skip(format!("{}:{joined}", directive.file)),
        }
    }

    fn required_fields_present(&mut self, directive: &RequiredFieldsPresent) {
        let field = directive.field.trim();
        let label = format!("required_fields_present:{}:{field}", directive.file);
        if field.is_empty() {
            self.diff.skip(format!("{label}:malformed"));
            return;
        }
        if !self.may_touch(&directive.file, field) {
            return;
        }
        let Some(root) = self.root_mut(&directive.file) else {
            return;
        };
        if root.get(field).is_none_or(Value::is_null) {
            root.insert(field.to_string(), json!([]));
            self.touch(&directive.file, &[field.to_string()]);
        }
        self.diff.applied.push(label);
    }
}
