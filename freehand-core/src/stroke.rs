//! The stroke accumulator: one in-progress ink path and its derived state.
//!
//! A stroke owns the raw sample path, the incrementally computed spline
//! control points, and the set of grid cells its ink can touch. It is a
//! two-state machine: `Open` while the pointer is down, `Completed` after
//! lift-off. Completed strokes are immutable and stay drawable until their
//! registry entry is evicted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::brush::Brush;
use crate::error::{StrokeError, StrokeResult};
use crate::geometry::{Point, Rect};
use crate::grid::{CellIndex, PartitionGrid};
use crate::smooth::{control_points, DEFAULT_SMOOTHING};

/// Lifecycle state of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokePhase {
    /// Accepting points.
    Open,
    /// Immutable; retained for redraw until evicted.
    Completed,
}

/// One continuous pointer-down-to-pointer-up ink path plus its brush
/// snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stroke {
    brush: Brush,
    path: Vec<Point>,
    /// Flattened `[c1x, c1y, c2x, c2y]` quadruples, one per interior point.
    /// Invariant: `control_points.len() == 4 * max(0, path.len() - 3)`,
    /// maintained by append only, never recomputed from scratch.
    control_points: Vec<f64>,
    touched: BTreeSet<CellIndex>,
    phase: StrokePhase,
    smoothing: f64,
}

impl Stroke {
    /// Begin a new stroke at `first`, snapshotting the brush by value.
    ///
    /// The first point's footprint is registered against the grid
    /// immediately so even a single-dab stroke clears correctly.
    #[must_use]
    pub fn begin(brush: Brush, first: Point, grid: &PartitionGrid) -> Self {
        let mut touched = BTreeSet::new();
        touched.extend(grid.covering(&first, brush.radius()).map(|c| c.index));
        Self {
            brush,
            path: vec![first],
            control_points: Vec::new(),
            touched,
            phase: StrokePhase::Open,
            smoothing: DEFAULT_SMOOTHING,
        }
    }

    /// Override the smoothing scale (default [`DEFAULT_SMOOTHING`]).
    #[must_use]
    pub fn with_smoothing(mut self, scale: f64) -> Self {
        self.smoothing = scale.clamp(f64::MIN_POSITIVE, 1.0);
        self
    }

    /// Append a sample point.
    ///
    /// Updates the touched-cell set from the point's brush footprint and,
    /// once more than three points exist, appends exactly four new control
    /// values derived from the trailing three settled samples. Earlier
    /// control values are never recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::CompletedStroke`] if the stroke has been
    /// completed.
    pub fn add_point(&mut self, point: Point, grid: &PartitionGrid) -> StrokeResult<()> {
        if self.phase == StrokePhase::Completed {
            return Err(StrokeError::CompletedStroke);
        }

        self.path.push(point);
        self.touched
            .extend(grid.covering(&point, self.brush.radius()).map(|c| c.index));

        let n = self.path.len();
        if n > 3 {
            let quad = control_points(
                &self.path[n - 4],
                &self.path[n - 3],
                &self.path[n - 2],
                self.smoothing,
            );
            self.control_points.extend_from_slice(&quad);
        }

        Ok(())
    }

    /// Append a batch of sample points in order.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::CompletedStroke`] if the stroke has been
    /// completed; points before the failure are not rolled back (the phase
    /// check happens before any append, so in practice all or none land).
    pub fn add_points(
        &mut self,
        points: impl IntoIterator<Item = Point>,
        grid: &PartitionGrid,
    ) -> StrokeResult<()> {
        for point in points {
            self.add_point(point, grid)?;
        }
        Ok(())
    }

    /// Transition to `Completed`. Idempotent; no further mutation is
    /// permitted afterwards.
    pub fn complete(&mut self) {
        self.phase = StrokePhase::Completed;
    }

    /// The brush snapshot captured at begin.
    #[must_use]
    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// The raw sample path, in arrival order.
    #[must_use]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Flattened control point values, four per interior point.
    #[must_use]
    pub fn control_points(&self) -> &[f64] {
        &self.control_points
    }

    /// Grid cells this stroke's ink can touch.
    #[must_use]
    pub fn touched(&self) -> &BTreeSet<CellIndex> {
        &self.touched
    }

    /// Resolve the touched cells to their rectangles.
    #[must_use]
    pub fn touched_rects(&self, grid: &PartitionGrid) -> Vec<Rect> {
        self.touched
            .iter()
            .filter_map(|index| grid.cell(*index))
            .map(|cell| cell.rect)
            .collect()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> StrokePhase {
        self.phase
    }

    /// Whether the stroke has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == StrokePhase::Completed
    }
}
