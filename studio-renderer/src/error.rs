//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while drawing, generating or exporting.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The drawing surface could not be acquired or has no pixels.
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A source image could not be read or decoded.
    #[error("Failed to load source image: {0}")]
    SourceImageLoad(String),

    /// A primitive could not be projected.
    #[error("Malformed primitive: {0}")]
    MalformedPrimitive(String),

    /// The fractal traversal exceeded its node budget.
    #[error("Recursion budget exceeded after {nodes} nodes (budget {budget})")]
    RecursionBudgetExceeded {
        /// Nodes visited when the budget tripped.
        nodes: usize,
        /// The budget.
        budget: usize,
    },

    /// Image or metadata encoding failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Filesystem error while exporting.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Model-level error.
    #[error(transparent)]
    Core(#[from] studio_core::StudioError),

    /// Gallery error.
    #[error(transparent)]
    Store(#[from] studio_core::StoreError),
}
