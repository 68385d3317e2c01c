//! # Freehand Renderer
//!
//! CPU raster layer for the freehand ink engine: layered compositing, the
//! pressure-scaled stroke rasterizer, and the partitioned redraw scheduler.
//!
//! ## Layer stack
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              DrawingSurface                 │
//! ├─────────────────────────────────────────────┤
//! │  Scratch    │ live stroke preview (cleared  │
//! │             │ before every re-render)       │
//! │  Committed  │ baked ink, visible baseline   │
//! │  Mirror     │ clean restore source, kept in │
//! │             │ lock-step with Committed      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! A stroke previews live by restoring only its touched partitions from the
//! Mirror, re-rendering into Scratch, and compositing back onto Committed.
//! On completion it is baked into Committed and Mirror together, so the
//! next restore starts from up-to-date pixels.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compositor;
pub mod error;
pub mod paint;
pub mod raster;
pub mod surface;

pub use compositor::{Layer, LayerCompositor};
pub use error::{RenderError, RenderResult};
pub use paint::render_stroke;
pub use raster::Raster;
pub use surface::{DrawingSurface, SurfaceConfig};

/// Freehand renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
