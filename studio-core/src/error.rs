//! Error types for studio model operations.

use thiserror::Error;

/// Result type for studio model operations.
pub type StudioResult<T> = Result<T, StudioError>;

/// Errors that can occur while building or editing the studio model.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Palette violates the size or uniqueness rules.
    #[error("Invalid palette: {0}")]
    InvalidPalette(String),

    /// Complexity outside the accepted range.
    #[error("Complexity must be between {min} and {max}, got {value}")]
    InvalidComplexity {
        /// The rejected value.
        value: i64,
        /// Smallest accepted value.
        min: u8,
        /// Largest accepted value.
        max: u8,
    },

    /// A color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A primitive references vertices that do not exist, or has no geometry.
    #[error("Malformed primitive '{name}': {reason}")]
    MalformedPrimitive {
        /// Primitive name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Style name not recognised.
    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    /// Primitive name not in the catalogue.
    #[error("Unknown primitive: {0}")]
    UnknownPrimitive(String),

    /// Metadata or artifact serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
