//! Error taxonomy for the screening pipeline (spec §7).
//!
//! Every variant names a *kind*, not an implementation detail, so callers can
//! match on stable categories rather than message text.

use thiserror::Error;

/// Errors surfaced by layers 1-4 directly to the caller, or raised internally
/// and converted to `Internal` by the orchestrator (§7 propagation policy).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Length, encoding, or control-character violation (layer 1).
    #[error("input invalid: {0}")]
    InputInvalid(String),

    /// Per-layer soft timeout exceeded.
    #[error("timeout in layer {layer}")]
    Timeout { layer: &'static str },

    /// Search service did not answer in time or returned an error; treated as
    /// zero contribution, not fatal.
    #[error("search unavailable: {0}")]
    SearchUnavailable(String),

    /// Embedding service did not answer; similarity contribution is zero.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// Unexpected failure with no more specific kind; partial results are
    /// discarded and `success=false` is returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Stable machine-readable error code, independent of the Display text.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::InputInvalid(_) => "input_invalid",
            PipelineError::Timeout { .. } => "timeout",
            PipelineError::SearchUnavailable(_) => "search_unavailable",
            PipelineError::EmbeddingUnavailable(_) => "embedding_unavailable",
            PipelineError::Internal(_) => "internal",
        }
    }
}

/// Non-fatal per-token normalization failure; callers degrade to
/// casing-only normalization and record `fallback=true` in the trace
/// rather than aborting (spec §4.1.5, §7 `morphology_unavailable`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeTokenError {
    #[error("morphology analyzer unavailable for token")]
    MorphologyUnavailable,
    #[error("no dictionary entry")]
    DictionaryMiss,
}

pub type PipelineResult<T> = Result<T, PipelineError>;
