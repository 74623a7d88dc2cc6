//! Error types for loading engine configuration and registries.

/// Errors raised while building an [`crate::EngineContext`].
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid json at {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The registry parsed but does not have the `{doc: [key, ...]}` shape.
    #[error("invalid required-keys registry at {path}: {message}")]
    InvalidRegistry { path: String, message: String },
}
