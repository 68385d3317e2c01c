//! # Freehand Core
//!
//! Core model for a pressure-sensitive freehand drawing surface: raw pointer
//! samples, brush snapshots, the spatial partition grid that scopes redraw
//! work, incremental curve smoothing, and the stroke state machine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               freehand-core                 │
//! ├──────────────────┬──────────────────────────┤
//! │  Partition Grid  │  Curve Smoother          │
//! │  - fixed cells   │  - pure control points   │
//! │  - membership    │  - arc-length weighting  │
//! ├──────────────────┼──────────────────────────┤
//! │  Stroke          │  Stroke Registry         │
//! │  - Open/Completed│  - id -> stroke          │
//! │  - touched cells │  - JSON snapshot         │
//! └──────────────────┴──────────────────────────┘
//! ```
//!
//! Rasterization and compositing live in `freehand-renderer`; this crate is
//! pure data and geometry so it can back any raster or vector target.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod brush;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod registry;
pub mod smooth;
pub mod stroke;

pub use brush::{Brush, Color, CompositeMode};
pub use error::{StrokeError, StrokeResult};
pub use geometry::{Point, Rect};
pub use grid::{CellIndex, Partition, PartitionGrid};
pub use registry::{StrokeId, StrokeRegistry};
pub use smooth::{control_points, DEFAULT_SMOOTHING};
pub use stroke::{Stroke, StrokePhase};

/// Freehand core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
