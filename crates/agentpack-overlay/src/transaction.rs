//! Validate-then-commit controller.
//!
//! ```text
//! load ─► snapshot ─► apply_overlay ─► write ─► reload ─► check
//!                                                          │
//!                              committable ◄───────────────┤
//!                                                          ▼
//!                                      write snapshot ─► reload ─► check
//! ```
//!
//! No lock is taken here; callers that can race hold
//! [`agentpack_store::with_corpus_lock`] around the call.

use crate::config::OverlayConfig;
use crate::executor::apply_overlay;
use crate::summary::OverlayRunSummary;
use agentpack_coherence::run_invariant_check;
use agentpack_kernel::EngineContext;
use agentpack_store::{CorpusStorage, StoreError};

/// Apply `config` and keep the result only if the persisted corpus is
/// committable; otherwise restore the snapshot.
///
/// Storage errors propagate unchanged, including a failed rollback write.
pub fn run_overlay_transaction(
    storage: &impl CorpusStorage,
    config: &OverlayConfig,
    ctx: &EngineContext,
) -> Result<OverlayRunSummary, StoreError> {
    let original = storage.load()?;
    let digest_before = original.digest();
    let (working, diff) = apply_overlay(&original, config, ctx);

    storage.write(&working)?;
    let persisted = storage.load()?;
    let report = run_invariant_check(&persisted, ctx);

    if report.is_committable() {
        tracing::info!(
            location = %storage.location(),
            touched = diff.deltas.len(),
            "overlay committed"
        );
        return Ok(OverlayRunSummary::new(
            diff,
            report,
            digest_before,
            persisted.digest(),
            false,
            false,
        ));
    }

    tracing::info!(
        location = %storage.location(),
        parity_ok = report.parity_ok,
        errors = report.errors.len(),
        "overlay rejected; restoring snapshot"
    );
    storage.write(&original)?;
    let restored = storage.load()?;
    let report = run_invariant_check(&restored, ctx);
    Ok(OverlayRunSummary::new(
        diff,
        report,
        digest_before,
        restored.digest(),
        true,
        false,
    ))
}

/// Dry run: apply and check in memory, write nothing.
pub fn preview_overlay(
    storage: &impl CorpusStorage,
    config: &OverlayConfig,
    ctx: &EngineContext,
) -> Result<OverlayRunSummary, StoreError> {
    let original = storage.load()?;
    let (working, diff) = apply_overlay(&original, config, ctx);
    let report = run_invariant_check(&working, ctx);
    let would_roll_back = !report.is_committable();
    tracing::debug!(
        location = %storage.location(),
        would_roll_back,
        "overlay preview"
    );
    Ok(OverlayRunSummary::new(
        diff,
        report,
        original.digest(),
        working.digest(),
        would_roll_back,
        true,
    ))
}
