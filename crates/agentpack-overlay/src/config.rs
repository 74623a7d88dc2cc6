//! Declarative overlay documents.
//!
//! ```json
//! {
//!   "apply": ["operations", "align_workflow_refs"],
//!   "operations": [
//!     {"upsert": {"target": "workflows.json", "patch": {"approvals": {"required": true}}}},
//!     {"inject_block": {"target": "observability.json", "path": "dashboards.ap", "value": {}}}
//!   ],
//!   "integrity_checks": {
//!     "must_include_block": [{"file": "governance.json", "path": "approvals"}],
//!     "required_fields_present": [{"file": "observability.json", "field": "alerts"}]
//!   }
//! }
//! ```
//!
//! `operations` entries stay raw JSON until the executor parses them one
//! by one, so a single malformed entry cannot reject the whole overlay.

use crate::error::OverlayError;
use agentpack_kernel::split_path;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub const STEP_OPERATIONS: &str = "operations";
pub const STEP_ALIGN_WORKFLOW_REFS: &str = "align_workflow_refs";
pub const STEP_ALIGN_OBSERVABILITY_BLOCKS: &str = "align_observability_blocks";

fn default_apply() -> Vec<String> {
    vec![STEP_OPERATIONS.to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayConfig {
    #[serde(default = "default_apply")]
    pub apply: Vec<String>,
    #[serde(default)]
    pub operations: Vec<Value>,
    #[serde(default)]
    pub integrity_checks: IntegrityChecks,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            apply: default_apply(),
            operations: Vec::new(),
            integrity_checks: IntegrityChecks::default(),
        }
    }
}

impl OverlayConfig {
    pub fn from_json_str(raw: &str, origin: &str) -> Result<Self, OverlayError> {
        serde_json::from_str(raw).map_err(|source| OverlayError::ParseJson {
            path: origin.to_string(),
            source,
        })
    }

    pub fn from_toml_str(raw: &str, origin: &str) -> Result<Self, OverlayError> {
        toml::from_str(raw).map_err(|source| OverlayError::ParseToml {
            path: origin.to_string(),
            source,
        })
    }

    /// Load an overlay file; `.toml` files are read as TOML, anything else
    /// as JSON.
    pub fn load(path: &Path) -> Result<Self, OverlayError> {
        let origin = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| OverlayError::Read {
            path: origin.clone(),
            source,
        })?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&raw, &origin)
        } else {
            Self::from_json_str(&raw, &origin)
        }
    }

    /// Typed view of `operations[index]`; `None` when the entry is not
    /// exactly one well-formed operation.
    pub fn operation(&self, index: usize) -> Option<OverlayOperation> {
        let raw = self.operations.get(index)?;
        serde_json::from_value(raw.clone()).ok()
    }
}

/// A key path written either as `"a.b.c"` or `["a", "b", "c"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSpec {
    Dotted(String),
    Segments(Vec<String>),
}

impl PathSpec {
    pub fn segments(&self) -> Vec<String> {
        match self {
            Self::Dotted(path) => split_path(path),
            Self::Segments(segments) => segments
                .iter()
                .map(|segment| segment.trim())
                .filter(|segment| !segment.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum OverlayOperation {
    InjectBlock {
        target: String,
        path: PathSpec,
        value: Value,
    },
    Upsert {
        target: String,
        patch: Map<String, Value>,
    },
}

impl OverlayOperation {
    pub fn target(&self) -> &str {
        match self {
            Self::InjectBlock { target, .. } | Self::Upsert { target, .. } => target,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrityChecks {
    pub must_include_block: Vec<MustIncludeBlock>,
    pub required_fields_present: Vec<RequiredFieldsPresent>,
}

impl IntegrityChecks {
    pub fn is_empty(&self) -> bool {
        self.must_include_block.is_empty() && self.required_fields_present.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MustIncludeBlock {
    pub file: String,
    pub path: PathSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredFieldsPresent {
    pub file: String,
    pub field: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn apply_defaults_to_operations() {
        let config = OverlayConfig::from_json_str("{}", "inline").expect("empty overlay parses");
        assert_eq!(config.apply, vec![STEP_OPERATIONS.to_string()]);
        assert!(config.operations.is_empty());
        assert!(config.integrity_checks.is_empty());
        assert_eq!(config, OverlayConfig::default());
    }

    #[test]
    fn operations_parse_individually() {
        let config = OverlayConfig::from_json_str(
            r#"{
                "operations": [
                    {"upsert": {"target": "workflows.json", "patch": {"approvals": {}}}},
                    {"inject_block": {"target": "observability.json", "path": ["dashboards", "ap"], "value": 1}},
                    {"upsert": {"target": "x.json", "patch": {}}, "inject_block": {}},
                    {"delete": {"target": "router.json"}},
                    {"upsert": {"target": "workflows.json", "patch": [1, 2]}}
                ]
            }"#,
            "inline",
        )
        .expect("overlay parses");

        assert_eq!(
            config.operation(0).map(|op| op.target().to_string()),
            Some("workflows.json".to_string())
        );
        match config.operation(1) {
            Some(OverlayOperation::InjectBlock { path, .. }) => {
                assert_eq!(path.segments(), vec!["dashboards", "ap"]);
            }
            other => panic!("expected inject_block, got {other:?}"),
        }
        assert_eq!(config.operation(2), None);
        assert_eq!(config.operation(3), None);
        assert_eq!(config.operation(4), None);
        assert_eq!(config.operation(5), None);
    }

    #[test]
    fn toml_overlays_share_the_shape() {
        let config = OverlayConfig::from_toml_str(
            r#"
apply = ["operations", "align_workflow_refs"]

[[operations]]
[operations.upsert]
target = "workflows.json"
patch = { approvals = { required = true } }

[[integrity_checks.required_fields_present]]
file = "observability.json"
field = "alerts"
"#,
            "overlay.toml",
        )
        .expect("toml overlay parses");

        assert_eq!(config.apply.len(), 2);
        assert_eq!(
            config.operation(0),
            Some(OverlayOperation::Upsert {
                target: "workflows.json".to_string(),
                patch: json!({"approvals": {"required": true}})
                    .as_object()
                    .cloned()
                    .expect("patch literal is an object"),
            })
        );
        assert_eq!(config.integrity_checks.required_fields_present.len(), 1);
    }

    #[test]
    fn dotted_paths_drop_blank_segments() {
        assert_eq!(
            PathSpec::Dotted("slo..kpi_gates ".to_string()).segments(),
            vec!["slo", "kpi_gates"]
        );
    }

    #[test]
    fn unknown_top_level_fields_are_rejected() {
        assert!(matches!(
            OverlayConfig::from_json_str(r#"{"aply": []}"#, "inline"),
            Err(OverlayError::ParseJson { .. })
        ));
    }
}
