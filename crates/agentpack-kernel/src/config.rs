//! `agentpack.toml`: optional engine configuration.
//!
//! Every table and field is optional; an empty file is the built-in
//! behaviour.

use crate::error::KernelError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "agentpack.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub logging: LoggingConfig,
    pub schema: SchemaConfig,
    pub overlay: OverlayPolicyConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `agentpack_overlay=debug`.
    pub level: Option<String>,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// JSON registry `{doc: [key, ...]}` replacing the built-in one.
    /// Relative paths resolve against the config file's directory.
    pub required_keys: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayPolicyConfig {
    /// Extra top-level keys overlays may touch, per document.
    pub allow_list: BTreeMap<String, Vec<String>>,
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str, origin: &str) -> Result<Self, KernelError> {
        toml::from_str(raw).map_err(|source| KernelError::ParseToml {
            path: origin.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, KernelError> {
        let raw = fs::read_to_string(path).map_err(|source| KernelError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw, &path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = EngineConfig::from_toml_str("", "inline").expect("empty config should parse");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn parses_all_tables() {
        let raw = r#"
[logging]
level = "debug"
format = "json"

[schema]
required_keys = "schema/required_keys.json"

[overlay.allow_list]
"workflows.json" = ["handoffs"]
"#;
        let config = EngineConfig::from_toml_str(raw, "inline").expect("config should parse");
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.schema.required_keys,
            Some(PathBuf::from("schema/required_keys.json"))
        );
        assert_eq!(
            config.overlay.allow_list.get("workflows.json"),
            Some(&vec!["handoffs".to_string()])
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = EngineConfig::from_toml_str("[logging]\nlevle = \"info\"\n", "inline")
            .expect_err("typo should be rejected");
        assert!(matches!(err, KernelError::ParseToml { .. }));
    }
}
