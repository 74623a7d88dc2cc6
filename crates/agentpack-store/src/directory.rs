//! Directory-backed corpus storage.

use crate::error::StoreError;
use agentpack_kernel::{CANONICAL_PACKS, Corpus, Document};
use serde_json::Value;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Where a transaction reads its snapshot and writes its result.
pub trait CorpusStorage {
    /// Human-readable location, for logs and reports.
    fn location(&self) -> String;

    fn load(&self) -> Result<Corpus, StoreError>;

    /// Persist every document of `corpus`. Documents not in `corpus` are
    /// left as they are.
    fn write(&self, corpus: &Corpus) -> Result<(), StoreError>;
}

/// A directory holding one file per canonical pack.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CorpusStorage for DirectoryStore {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn load(&self) -> Result<Corpus, StoreError> {
        load_corpus(&self.root)
    }

    fn write(&self, corpus: &Corpus) -> Result<(), StoreError> {
        write_corpus(&self.root, corpus)
    }
}

/// Read every canonical pack under `root`.
///
/// A missing file is simply absent from the result. Files with
/// non-canonical names are ignored.
pub fn load_corpus(root: &Path) -> Result<Corpus, StoreError> {
    if !root.is_dir() {
        return Err(StoreError::NotADirectory {
            path: root.display().to_string(),
        });
    }

    let mut corpus = Corpus::new();
    for name in CANONICAL_PACKS {
        let path = root.join(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        validate_pack_bytes(&path, &bytes)?;
        let content: Value =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        corpus.insert(Document::new(name, content));
    }
    tracing::debug!(root = %root.display(), packs = corpus.len(), "loaded corpus");
    Ok(corpus)
}

/// Persist every document of `corpus` to `<root>/<name>` in canonical form.
pub fn write_corpus(root: &Path, corpus: &Corpus) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Write {
        path: root.display().to_string(),
        source,
    })?;
    for document in corpus.documents() {
        write_pack(&root.join(document.name()), &document.canonical_text())?;
    }
    sync_dir(root)?;
    tracing::debug!(root = %root.display(), packs = corpus.len(), "wrote corpus");
    Ok(())
}

fn write_pack(path: &Path, text: &str) -> Result<(), StoreError> {
    let tmp_path = tmp_write_path(path);
    let write_error = |source| StoreError::Write {
        path: tmp_path.display().to_string(),
        source,
    };

    let write_result = (|| -> Result<(), StoreError> {
        let mut file = File::create(&tmp_path).map_err(write_error)?;
        file.write_all(text.as_bytes()).map_err(write_error)?;
        file.sync_all().map_err(write_error)?;
        Ok(())
    })();
    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        StoreError::Write {
            path: path.display().to_string(),
            source,
        }
    })
}

fn sync_dir(root: &Path) -> Result<(), StoreError> {
    let sync_error = |source| StoreError::Write {
        path: root.display().to_string(),
        source,
    };
    let dir = File::open(root).map_err(sync_error)?;
    dir.sync_all().map_err(sync_error)
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

fn validate_pack_bytes(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if bytes.contains(&0) {
        return Err(StoreError::Corrupt {
            path: path.display().to_string(),
            message: "contains NUL byte(s)".to_string(),
        });
    }
    if std::str::from_utf8(bytes).is_err() {
        return Err(StoreError::Corrupt {
            path: path.display().to_string(),
            message: "contains non-UTF-8 byte sequence(s)".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_packs_are_absent_not_errors() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        fs::write(dir.path().join("kpi_targets.json"), r#"{"gates": {}}"#)
            .expect("pack should be written");
        fs::write(dir.path().join("notes.json"), "{}").expect("stray file should be written");

        let corpus = load_corpus(dir.path()).expect("corpus should load");
        assert_eq!(corpus.names().collect::<Vec<_>>(), vec!["kpi_targets.json"]);
    }

    #[test]
    fn write_corpus_is_canonical_and_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let corpus = Corpus::from_contents([(
            "workflows.json",
            json!({"nodes": [], "approvals": {"b": 2, "a": 1}}),
        )]);
        write_corpus(dir.path(), &corpus).expect("corpus should be written");

        let text = fs::read_to_string(dir.path().join("workflows.json"))
            .expect("pack should be readable");
        assert_eq!(
            text,
            "{\n  \"approvals\": {\n    \"a\": 1,\n    \"b\": 2\n  },\n  \"nodes\": []\n}\n"
        );
        assert_eq!(load_corpus(dir.path()).expect("corpus should load"), corpus);

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .expect("dir should list")
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn invalid_json_is_a_hard_error() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        fs::write(dir.path().join("router.json"), "{not json").expect("pack should be written");
        let err = load_corpus(dir.path()).expect_err("invalid json must fail");
        assert!(matches!(err, StoreError::Parse { path, .. } if path.ends_with("router.json")));
    }

    #[test]
    fn nul_bytes_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        fs::write(dir.path().join("router.json"), b"{}\0").expect("pack should be written");
        let err = load_corpus(dir.path()).expect_err("NUL payload must fail");
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn missing_root_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let err = load_corpus(&dir.path().join("absent")).expect_err("missing root must fail");
        assert!(matches!(err, StoreError::NotADirectory { .. }));
    }
}
