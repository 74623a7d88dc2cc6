/// Failures reading an overlay file. Application problems never surface
/// here; they land in the run summary's `skipped` list.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("failed to read overlay {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid overlay json at {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid overlay toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
