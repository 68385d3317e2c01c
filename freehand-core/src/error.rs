//! Error types for stroke operations.

use thiserror::Error;

use crate::registry::StrokeId;

/// Result type for stroke operations.
pub type StrokeResult<T> = Result<T, StrokeError>;

/// Errors that can occur while building or looking up strokes.
#[derive(Debug, Error)]
pub enum StrokeError {
    /// A point was appended to a stroke that has already been completed.
    #[error("stroke is already completed")]
    CompletedStroke,

    /// An operation referenced a stroke id that is not registered.
    #[error("unknown stroke: {0}")]
    UnknownStroke(StrokeId),

    /// Stroke registry serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
