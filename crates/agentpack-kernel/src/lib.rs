//! # Agentpack Kernel
//!
//! Shared vocabulary for the consistency engine: a generated agent
//! configuration is a corpus of twenty JSON packs, and every other crate
//! reads or mutates that corpus through the types defined here.
//!
//! ## Architecture
//!
//! ```text
//! EngineConfig (agentpack.toml)
//!     │ from_config
//! EngineContext          ← required-keys registry + overlay allow-list
//!     │
//! Corpus ── Document     ← canonical pack name → JSON content
//!     │
//! json_path              ← get_path / set_path / deep_merge
//!     │
//! pack / gate            ← static tables: canonical names, sections,
//!                          companion roles, gate aliases, parity pairs
//! ```

pub mod config;
pub mod context;
pub mod document;
pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod gate;
pub mod json_path;
pub mod pack;

pub use config::{
    DEFAULT_CONFIG_FILE, EngineConfig, LogFormat, LoggingConfig, OverlayPolicyConfig, SchemaConfig,
};
pub use context::{EngineContext, builtin_allow_list, builtin_required_keys, load_required_keys};
pub use document::{Corpus, Document, canonical_json};
pub use error::KernelError;
pub use gate::{GATE_LOCATIONS, Gate, GateLocation, PARITY_PAIRS, ParityPair};
pub use json_path::{
    SetPathError, deep_merge, get_path, is_empty_value, join_path, set_path, split_path,
};
pub use pack::{CANONICAL_PACKS, COMPANION_ROLES, REQUIRED_SECTIONS, RequiredSection, SectionKind};
