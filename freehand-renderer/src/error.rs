//! Error types for raster and compositing operations.

use thiserror::Error;

use freehand_core::StrokeError;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur in the raster layer.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Two rasters that must stay in lock-step have different dimensions.
    #[error("raster size mismatch: {src_width}x{src_height} vs {dst_width}x{dst_height}")]
    SizeMismatch {
        /// Source raster width.
        src_width: u32,
        /// Source raster height.
        src_height: u32,
        /// Destination raster width.
        dst_width: u32,
        /// Destination raster height.
        dst_height: u32,
    },

    /// Stroke model error surfaced through the scheduler.
    #[error(transparent)]
    Stroke(#[from] StrokeError),
}
