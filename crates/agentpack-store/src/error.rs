/// Storage failures. These are never retried inside the engine.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("corpus root is not a directory: {path}")]
    NotADirectory { path: String },

    #[error("failed to read pack: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupted pack: {path}: {message}")]
    Corrupt { path: String, message: String },

    #[error("failed to write pack: {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus lock busy: {lock_path}")]
    LockBusy { lock_path: String },

    #[error("failed to acquire corpus lock {lock_path}: {source}")]
    LockIo {
        lock_path: String,
        #[source]
        source: std::io::Error,
    },
}
