use thiserror::Error;

/// Error taxonomy for the chunking pipeline.
///
/// `Clone` so a single failed computation can be fanned out to every caller
/// blocked on the same in-flight cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// Rule rejected before any text is touched. Recoverable: fix the
    /// parameters and retry.
    #[error("invalid chunk rule: {0}")]
    InvalidRule(String),

    /// Normalized content is empty or below the configured minimum.
    #[error("document too short after normalization: {length} chars (minimum {min})")]
    DocumentTooShort { length: usize, min: usize },

    /// Two computations of the same cache key disagreed. Indicates a defect
    /// in the splitter itself; fatal, never swallowed.
    #[error("determinism violation: recomputed chunk tree differs from cached tree for key {key}")]
    DeterminismViolation { key: String },

    /// Caller-imposed deadline hit between parent iterations.
    #[error("chunking deadline exceeded")]
    DeadlineExceeded,
}
