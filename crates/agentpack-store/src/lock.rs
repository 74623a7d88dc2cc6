//! Advisory corpus lock.
//!
//! The transaction controller takes no lock of its own. Callers that may
//! race (concurrent CLI invocations) hold this lock for the whole
//! load → write → validate → commit-or-rollback sequence.

use crate::error::StoreError;
use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const CORPUS_LOCK_FILE: &str = ".agentpack.lock";

pub fn corpus_lock_path(root: &Path) -> PathBuf {
    root.join(CORPUS_LOCK_FILE)
}

/// Held lock; the lock file is removed on drop.
#[derive(Debug)]
pub struct CorpusLockGuard {
    lock_path: PathBuf,
    _file: File,
}

impl CorpusLockGuard {
    /// Take the lock or fail fast with [`StoreError::LockBusy`].
    pub fn acquire(root: &Path) -> Result<Self, StoreError> {
        let lock_path = corpus_lock_path(root);
        let lock_io = |source| StoreError::LockIo {
            lock_path: lock_path.display().to_string(),
            source,
        };
        if !root.is_dir() {
            return Err(StoreError::NotADirectory {
                path: root.display().to_string(),
            });
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(mut file) => {
                if let Err(err) = writeln!(
                    file,
                    "pid={}\nutc={}",
                    std::process::id(),
                    Utc::now().to_rfc3339()
                ) {
                    drop(file);
                    let _ = fs::remove_file(&lock_path);
                    return Err(lock_io(err));
                }
                tracing::debug!(lock = %lock_path.display(), "acquired corpus lock");
                Ok(Self {
                    lock_path,
                    _file: file,
                })
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Err(StoreError::LockBusy {
                lock_path: lock_path.display().to_string(),
            }),
            Err(err) => Err(lock_io(err)),
        }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for CorpusLockGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Run `body` while holding the corpus lock for `root`.
pub fn with_corpus_lock<T, F>(root: &Path, body: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError>,
{
    let _guard = CorpusLockGuard::acquire(root)?;
    body()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_busy_until_release() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let guard = CorpusLockGuard::acquire(dir.path()).expect("first acquire should succeed");
        assert!(guard.lock_path().exists());

        let err = CorpusLockGuard::acquire(dir.path()).expect_err("second acquire must fail");
        assert!(matches!(err, StoreError::LockBusy { .. }));

        drop(guard);
        assert!(!corpus_lock_path(dir.path()).exists());
        CorpusLockGuard::acquire(dir.path()).expect("acquire after release should succeed");
    }

    #[test]
    fn lock_file_records_holder_metadata() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let guard = CorpusLockGuard::acquire(dir.path()).expect("acquire should succeed");
        let text = fs::read_to_string(guard.lock_path()).expect("lock file should be readable");
        assert!(text.starts_with(&format!("pid={}\n", std::process::id())));
        assert!(text.contains("utc="));
    }

    #[test]
    fn with_corpus_lock_releases_after_body() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let seen = with_corpus_lock(dir.path(), || Ok(corpus_lock_path(dir.path()).exists()))
            .expect("body should run");
        assert!(seen);
        assert!(!corpus_lock_path(dir.path()).exists());
    }

    #[test]
    fn missing_root_is_not_created() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let root = dir.path().join("absent");
        let err = CorpusLockGuard::acquire(&root).expect_err("missing root must fail");
        assert!(matches!(err, StoreError::NotADirectory { .. }));
        assert!(!root.exists());
    }
}
