//! # agentpack-overlay
//!
//! Declarative, additive mutations over a pack corpus.
//!
//! - [`apply_overlay`] is pure: it runs an [`OverlayConfig`] against a clone
//!   and returns the new corpus with an [`OverlayDiff`].
//! - [`run_overlay_transaction`] persists that result through a
//!   [`agentpack_store::CorpusStorage`] and keeps it only when the reloaded
//!   corpus passes the invariant check; otherwise it restores the snapshot.
//! - [`preview_overlay`] is the dry run.

pub mod config;
pub mod error;
pub mod executor;
pub mod summary;
pub mod transaction;

pub use config::{
    IntegrityChecks, MustIncludeBlock, OverlayConfig, OverlayOperation, PathSpec,
    RequiredFieldsPresent, STEP_ALIGN_OBSERVABILITY_BLOCKS, STEP_ALIGN_WORKFLOW_REFS,
    STEP_OPERATIONS,
};
pub use error::OverlayError;
pub use executor::{RunPhase, apply_overlay};
pub use summary::{KeyDelta, OverlayDiff, OverlayRunSummary};
pub use transaction::{preview_overlay, run_overlay_transaction};
