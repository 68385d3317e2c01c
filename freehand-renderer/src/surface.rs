//! The drawing surface: stroke lifecycle, partitioned redraw scheduling,
//! and the reentrancy guard.
//!
//! Every operation runs to completion on the calling thread; the only
//! concurrency primitive is the redraw guard's check-and-set flag. A redraw
//! arriving while one is in progress is dropped, never queued: the surface
//! favors drawing the most recent input state over rendering every
//! intermediate frame, so a later input event always produces an up-to-date
//! repaint.

use std::sync::atomic::{AtomicBool, Ordering};

use freehand_core::{
    Brush, PartitionGrid, Point, Stroke, StrokeError, StrokeId, StrokeRegistry, DEFAULT_SMOOTHING,
};

use crate::compositor::LayerCompositor;
use crate::error::RenderResult;

/// Configuration for a drawing surface.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Partition grid columns.
    pub columns: u32,
    /// Partition grid rows.
    pub rows: u32,
    /// Curve smoothing scale in `(0, 1]`.
    pub smoothing: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            columns: 16,
            rows: 16,
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

/// Check-and-set reentrancy flag for redraw work.
///
/// Not a lock: a caller that fails to acquire the flag drops its redraw
/// instead of waiting, relying on a subsequent input event to trigger a
/// later, up-to-date repaint.
#[derive(Debug, Default)]
struct RedrawGuard {
    active: AtomicBool,
}

impl RedrawGuard {
    /// Try to start a redraw pass. `None` means one is already in progress
    /// and the caller must drop its work.
    fn try_begin(&self) -> Option<RedrawPass<'_>> {
        if self.active.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(RedrawPass { guard: self })
        }
    }

    #[cfg(test)]
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// RAII token for an in-progress redraw; releases the flag on drop.
struct RedrawPass<'a> {
    guard: &'a RedrawGuard,
}

impl Drop for RedrawPass<'_> {
    fn drop(&mut self) {
        self.guard.active.store(false, Ordering::Release);
    }
}

/// A pressure-sensitive freehand drawing surface.
///
/// Owns the partition grid, the stroke registry, and the three-layer
/// compositor; exposes the stroke lifecycle the input surface drives
/// (`begin` / `update` / `complete`) plus batched redraw.
#[derive(Debug)]
pub struct DrawingSurface {
    grid: PartitionGrid,
    registry: StrokeRegistry,
    compositor: LayerCompositor,
    guard: RedrawGuard,
    smoothing: f64,
}

impl DrawingSurface {
    /// Create a blank surface from the given configuration.
    #[must_use]
    pub fn new(config: &SurfaceConfig) -> Self {
        Self {
            grid: PartitionGrid::new(
                f64::from(config.width),
                f64::from(config.height),
                config.columns,
                config.rows,
            ),
            registry: StrokeRegistry::new(),
            compositor: LayerCompositor::new(config.width, config.height),
            guard: RedrawGuard::default(),
            smoothing: config.smoothing,
        }
    }

    /// Begin a new stroke under a caller-chosen id, snapshotting the brush
    /// by value.
    ///
    /// Ids must be unique among concurrently open strokes; reusing an id
    /// displaces whatever stroke was registered under it (typically a stale
    /// completed stroke).
    pub fn begin_stroke(&mut self, brush: &Brush, x: f64, y: f64, pressure: f64, id: StrokeId) {
        let stroke = Stroke::begin(brush.clone(), Point::new(x, y, pressure), &self.grid)
            .with_smoothing(self.smoothing);
        self.registry.insert(id, stroke);
        tracing::debug!(%id, brush = %brush.name, "stroke started");
    }

    /// Append a pointer sample to an open stroke and live-preview repaint
    /// its touched partitions.
    ///
    /// The repaint restores the touched committed regions from the mirror,
    /// renders the stroke into scratch, and composites scratch back onto
    /// committed. When a redraw is already in progress the repaint is
    /// dropped (the point append still lands).
    ///
    /// # Errors
    ///
    /// [`StrokeError::UnknownStroke`] if the id is not registered;
    /// [`StrokeError::CompletedStroke`] if the stroke is completed.
    pub fn update_stroke(
        &mut self,
        x: f64,
        y: f64,
        pressure: f64,
        id: StrokeId,
    ) -> RenderResult<()> {
        let stroke = self
            .registry
            .get_mut(id)
            .ok_or(StrokeError::UnknownStroke(id))?;
        stroke.add_point(Point::new(x, y, pressure), &self.grid)?;

        let Some(_pass) = self.guard.try_begin() else {
            tracing::trace!(%id, "redraw in progress, dropping live preview");
            return Ok(());
        };

        let stroke = self
            .registry
            .get(id)
            .ok_or(StrokeError::UnknownStroke(id))?;
        let rects = stroke.touched_rects(&self.grid);
        self.compositor.restore_committed(&rects)?;
        self.compositor.render_stroke_to_scratch(stroke, None);
        self.compositor
            .composite_scratch(&rects, stroke.brush().mode)?;
        Ok(())
    }

    /// Complete an open stroke and bake it permanently into the committed
    /// layer and its mirror.
    ///
    /// # Errors
    ///
    /// [`StrokeError::UnknownStroke`] if the id is not registered.
    pub fn complete_stroke(&mut self, id: StrokeId) -> RenderResult<()> {
        let stroke = self
            .registry
            .get_mut(id)
            .ok_or(StrokeError::UnknownStroke(id))?;
        stroke.complete();

        let stroke = self
            .registry
            .get(id)
            .ok_or(StrokeError::UnknownStroke(id))?;
        self.compositor.bake(stroke, &self.grid)?;
        tracing::debug!(%id, points = stroke.path().len(), "stroke completed");
        Ok(())
    }

    /// Redraw several strokes in one pass.
    ///
    /// Unions the touched partitions of all named strokes, restores that
    /// union from the mirror once, then renders each stroke in the given
    /// order (later strokes paint over earlier ones in the shared region).
    /// Dropped silently when a redraw is already in progress.
    ///
    /// # Errors
    ///
    /// [`StrokeError::UnknownStroke`] if any id is not registered; ids are
    /// validated before any pixel work, so an unknown id repaints nothing.
    pub fn do_strokes(&mut self, ids: &[StrokeId]) -> RenderResult<()> {
        let Some(_pass) = self.guard.try_begin() else {
            tracing::trace!("redraw in progress, dropping batch redraw");
            return Ok(());
        };

        for &id in ids {
            if !self.registry.contains(id) {
                return Err(StrokeError::UnknownStroke(id).into());
            }
        }

        let union: Vec<_> = {
            let mut cells = std::collections::BTreeSet::new();
            for &id in ids {
                if let Some(stroke) = self.registry.get(id) {
                    cells.extend(stroke.touched().iter().copied());
                }
            }
            cells
                .iter()
                .filter_map(|index| self.grid.cell(*index))
                .map(|cell| cell.rect)
                .collect()
        };

        self.compositor.restore_committed(&union)?;
        for &id in ids {
            let stroke = self
                .registry
                .get(id)
                .ok_or(StrokeError::UnknownStroke(id))?;
            let rects = stroke.touched_rects(&self.grid);
            self.compositor.render_stroke_to_scratch(stroke, None);
            self.compositor
                .composite_scratch(&rects, stroke.brush().mode)?;
        }
        self.compositor.clear_scratch();
        tracing::debug!(strokes = ids.len(), cells = union.len(), "batch redraw");
        Ok(())
    }

    /// Evict a stroke from the registry; it will no longer be drawable.
    ///
    /// # Errors
    ///
    /// [`StrokeError::UnknownStroke`] if the id is not registered.
    pub fn discard_stroke(&mut self, id: StrokeId) -> RenderResult<Stroke> {
        Ok(self.registry.remove(id)?)
    }

    /// Look up a registered stroke.
    #[must_use]
    pub fn stroke(&self, id: StrokeId) -> Option<&Stroke> {
        self.registry.get(id)
    }

    /// The partition grid.
    #[must_use]
    pub fn grid(&self) -> &PartitionGrid {
        &self.grid
    }

    /// The layer compositor (read access for inspection and snapshots).
    #[must_use]
    pub fn compositor(&self) -> &LayerCompositor {
        &self.compositor
    }

    /// Read-only snapshot of the committed pixels (persistence interface).
    #[must_use]
    pub fn committed_pixels(&self) -> &[u8] {
        self.compositor.committed_pixels()
    }
}
