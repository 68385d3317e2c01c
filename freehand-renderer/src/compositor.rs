//! Three-layer raster compositing.
//!
//! The compositor owns three same-size rasters:
//!
//! * **Committed** — the visible baseline holding all baked ink.
//! * **Mirror** — a back-buffer copy of Committed, used as the clean source
//!   when restoring partitions before a live-preview repaint.
//! * **Scratch** — transient layer holding only the stroke currently being
//!   rendered, cleared before each re-render.
//!
//! Mirror must always be updated in lock-step with Committed: a stale
//! mirror means subsequent partition restores repaint wrong pixels. `bake`
//! is structured so committed and mirror are updated together or not at
//! all.

use freehand_core::{CompositeMode, PartitionGrid, Rect, Stroke};

use crate::error::{RenderError, RenderResult};
use crate::paint::render_stroke;
use crate::raster::Raster;

/// Identifies one of the compositor's three rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Final ink, visible baseline.
    Committed,
    /// Back-buffer copy of Committed.
    Mirror,
    /// Transient live-preview layer.
    Scratch,
}

/// Manages the Committed / Mirror / Scratch raster stack.
#[derive(Debug)]
pub struct LayerCompositor {
    committed: Raster,
    mirror: Raster,
    scratch: Raster,
}

impl LayerCompositor {
    /// Create a compositor with three blank rasters of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            committed: Raster::new(width, height),
            mirror: Raster::new(width, height),
            scratch: Raster::new(width, height),
        }
    }

    /// Build a compositor from pre-existing rasters (e.g. a committed layer
    /// restored by a persistence collaborator).
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SizeMismatch`] unless all three rasters have
    /// identical dimensions.
    pub fn from_rasters(committed: Raster, mirror: Raster, scratch: Raster) -> RenderResult<Self> {
        for other in [&mirror, &scratch] {
            if other.width() != committed.width() || other.height() != committed.height() {
                return Err(RenderError::SizeMismatch {
                    src_width: other.width(),
                    src_height: other.height(),
                    dst_width: committed.width(),
                    dst_height: committed.height(),
                });
            }
        }
        Ok(Self {
            committed,
            mirror,
            scratch,
        })
    }

    fn layer(&self, layer: Layer) -> &Raster {
        match layer {
            Layer::Committed => &self.committed,
            Layer::Mirror => &self.mirror,
            Layer::Scratch => &self.scratch,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut Raster {
        match layer {
            Layer::Committed => &mut self.committed,
            Layer::Mirror => &mut self.mirror,
            Layer::Scratch => &mut self.scratch,
        }
    }

    /// Clear one region of a layer to transparent.
    pub fn clear_region(&mut self, layer: Layer, rect: &Rect) {
        self.layer_mut(layer).clear_region(rect);
    }

    /// Clear several regions of a layer to transparent.
    pub fn clear_regions<'a>(&mut self, layer: Layer, rects: impl IntoIterator<Item = &'a Rect>) {
        self.layer_mut(layer).clear_regions(rects);
    }

    /// Copy one rectangle's pixels from one layer to another.
    ///
    /// Copying a layer onto itself is a no-op.
    ///
    /// # Errors
    ///
    /// Layers share one size by construction, so this only fails if the
    /// compositor was built from mismatched rasters (prevented in
    /// [`Self::from_rasters`]); the `Result` keeps the raster contract
    /// visible at the call site.
    pub fn blit(&mut self, src: Layer, dst: Layer, rect: &Rect) -> RenderResult<()> {
        if src == dst {
            return Ok(());
        }
        // Split borrows: temporarily move the destination out.
        let mut dst_raster = std::mem::replace(
            self.layer_mut(dst),
            Raster::new(0, 0),
        );
        let result = dst_raster.blit_from(self.layer(src), rect);
        *self.layer_mut(dst) = dst_raster;
        result
    }

    /// Restore the given committed regions from the mirror back-buffer.
    ///
    /// # Errors
    ///
    /// See [`Self::blit`].
    pub fn restore_committed(&mut self, rects: &[Rect]) -> RenderResult<()> {
        for rect in rects {
            self.blit(Layer::Mirror, Layer::Committed, rect)?;
        }
        Ok(())
    }

    /// Clear scratch and render the stroke into it at full alpha, then apply
    /// the brush's opacity mask so committed ink shows through
    /// semi-transparent strokes.
    pub fn render_stroke_to_scratch(&mut self, stroke: &Stroke, upto: Option<usize>) {
        self.scratch.clear();
        render_stroke(&mut self.scratch, stroke, upto);
        let opacity = stroke.brush().opacity;
        if opacity < 1.0 {
            self.scratch.scale_alpha(opacity);
        }
    }

    /// Composite scratch onto committed within the given regions.
    ///
    /// `DestinationOut` makes the stroke subtractive (eraser): scratch
    /// coverage removes committed ink instead of overlaying color. The mode
    /// applies to this call only.
    ///
    /// # Errors
    ///
    /// See [`Self::blit`].
    pub fn composite_scratch(&mut self, rects: &[Rect], mode: CompositeMode) -> RenderResult<()> {
        self.committed.composite_from(&self.scratch, rects, mode)
    }

    /// Clear the scratch layer entirely.
    pub fn clear_scratch(&mut self) {
        self.scratch.clear();
    }

    /// Bake a completed stroke permanently into committed and mirror.
    ///
    /// Restores the stroke's touched partitions of committed from mirror,
    /// renders the stroke onto committed (through scratch, so opacity and
    /// eraser semantics match the live preview exactly), then copies those
    /// partitions committed -> mirror and clears scratch.
    ///
    /// All inputs are resolved before any raster is mutated, so a failure
    /// cannot leave committed and mirror desynchronized.
    ///
    /// # Errors
    ///
    /// See [`Self::blit`].
    pub fn bake(&mut self, stroke: &Stroke, grid: &PartitionGrid) -> RenderResult<()> {
        let rects = stroke.touched_rects(grid);

        self.restore_committed(&rects)?;
        self.render_stroke_to_scratch(stroke, None);
        self.composite_scratch(&rects, stroke.brush().mode)?;
        for rect in &rects {
            self.blit(Layer::Committed, Layer::Mirror, rect)?;
        }
        self.scratch.clear();

        tracing::debug!(
            cells = rects.len(),
            points = stroke.path().len(),
            "baked stroke"
        );
        Ok(())
    }

    /// The visible committed raster.
    #[must_use]
    pub fn committed(&self) -> &Raster {
        &self.committed
    }

    /// Read-only snapshot of the committed pixels (persistence interface).
    #[must_use]
    pub fn committed_pixels(&self) -> &[u8] {
        self.committed.pixels()
    }

    /// The mirror back-buffer.
    #[must_use]
    pub fn mirror(&self) -> &Raster {
        &self.mirror
    }

    /// The scratch live-preview raster.
    #[must_use]
    pub fn scratch(&self) -> &Raster {
        &self.scratch
    }
}
