//! Documents and the in-memory corpus.
//!
//! A document's name is fixed at construction; only its content mutates.
//! The corpus keys documents by name in a `BTreeMap`, so iteration (and
//! therefore every report and diff derived from it) is deterministic.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// One pack: a canonical file name and its JSON content.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    name: String,
    content: Value,
}

impl Document {
    pub fn new(name: impl Into<String>, content: Value) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Value {
        &mut self.content
    }

    /// Canonical on-disk rendering of this document.
    pub fn canonical_text(&self) -> String {
        canonical_json(&self.content)
    }
}

/// Canonical name → document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    documents: BTreeMap<String, Document>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from `(name, content)` pairs. Later duplicates win.
    pub fn from_contents<I, N>(contents: I) -> Self
    where
        I: IntoIterator<Item = (N, Value)>,
        N: Into<String>,
    {
        let mut corpus = Self::new();
        for (name, content) in contents {
            corpus.insert(Document::new(name, content));
        }
        corpus
    }

    /// Insert or replace a document by name. Returns the previous one.
    pub fn insert(&mut self, document: Document) -> Option<Document> {
        self.documents.insert(document.name.clone(), document)
    }

    pub fn get(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.documents.contains_key(name)
    }

    /// Content of `name`, if loaded.
    pub fn content(&self, name: &str) -> Option<&Value> {
        self.documents.get(name).map(Document::content)
    }

    pub fn content_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.documents.get_mut(name).map(Document::content_mut)
    }

    /// Top-level object of `name`, if loaded and an object.
    pub fn object(&self, name: &str) -> Option<&Map<String, Value>> {
        self.content(name).and_then(Value::as_object)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// SHA-256 over every document's name and canonical text, in name order.
    ///
    /// Two corpora with equal digests serialize to identical files.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for document in self.documents.values() {
            hasher.update(document.name.as_bytes());
            hasher.update([0u8]);
            hasher.update(document.canonical_text().as_bytes());
        }
        let digest = hasher.finalize();
        format!("{digest:x}")
    }
}

/// Pretty-print with sorted keys, two-space indent and a trailing newline.
pub fn canonical_json(value: &Value) -> String {
    format!("{:#}\n", sorted(value))
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered: BTreeMap<&String, Value> =
                map.iter().map(|(key, item)| (key, sorted(item))).collect();
            Value::Object(
                ordered
                    .into_iter()
                    .map(|(key, item)| (key.clone(), item))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
