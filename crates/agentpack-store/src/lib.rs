//! # agentpack-store
//!
//! Durable storage for pack corpora.
//!
//! This crate provides:
//! - `load_corpus` / `write_corpus` over a directory of canonical pack files
//! - the `CorpusStorage` seam the transaction controller writes through
//! - an advisory lock callers hold to serialize transactions
//!
//! ## Data model
//!
//! ```text
//! <root>/<pack>.json (pretty, sorted keys, trailing newline)
//!     ↕  load / write
//! Corpus (canonical name → Document)
//! ```
//!
//! Writes are atomic per file (temp file, fsync, rename) but not across
//! files: a crash between two renames leaves a mixed corpus on disk.

pub mod directory;
pub mod error;
pub mod lock;

pub use directory::{CorpusStorage, DirectoryStore, load_corpus, write_corpus};
pub use error::StoreError;
pub use lock::{CORPUS_LOCK_FILE, CorpusLockGuard, corpus_lock_path, with_corpus_lock};
