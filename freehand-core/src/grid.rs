//! Static spatial partition grid.
//!
//! The surface is sliced once, at construction, into a fixed grid of equal
//! rectangular cells. Strokes record which cells their ink can touch so the
//! renderer only clears and repaints those regions instead of the whole
//! surface.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Identity of one grid cell: column and row position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CellIndex {
    /// Column (0-based, left to right).
    pub col: u32,
    /// Row (0-based, top to bottom).
    pub row: u32,
}

impl CellIndex {
    /// Create a new cell index.
    #[must_use]
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// One cell of the partition grid: its identity plus its rectangle.
///
/// Cells are created once at surface initialization and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// Grid coordinates of this cell.
    pub index: CellIndex,
    /// The cell's rectangle in surface coordinates.
    pub rect: Rect,
}

impl Partition {
    /// Conservative membership test: could a brush footprint of the given
    /// radius centered at `point` intersect this cell?
    ///
    /// Compares the distance from the point to the cell center against the
    /// cell half-extent plus the radius, per axis. This over-includes near
    /// corners (a box test, not an exact circle test) but never
    /// under-includes: ink painted outside the redrawn region would never be
    /// cleared, so false negatives are rendering bugs while false positives
    /// only cost a little extra repaint work.
    #[must_use]
    pub fn may_contain(&self, point: &Point, radius: f64) -> bool {
        let (cx, cy) = self.rect.center();
        let (hx, hy) = self.rect.half_extents();
        (point.x - cx).abs() < hx + radius && (point.y - cy).abs() < hy + radius
    }
}

/// A fixed `columns x rows` grid of partitions exactly tiling the surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionGrid {
    width: f64,
    height: f64,
    columns: u32,
    rows: u32,
    cells: Vec<Partition>,
}

impl PartitionGrid {
    /// Slice a `width x height` surface into `columns x rows` equal cells.
    ///
    /// The cells cover the surface exactly: no gaps, no overlaps. Zero
    /// dimensions are bumped to one cell so the grid is never empty.
    #[must_use]
    pub fn new(width: f64, height: f64, columns: u32, rows: u32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let cell_width = width / f64::from(columns);
        let cell_height = height / f64::from(rows);

        let mut cells = Vec::with_capacity(columns as usize * rows as usize);
        for row in 0..rows {
            for col in 0..columns {
                cells.push(Partition {
                    index: CellIndex::new(col, row),
                    rect: Rect::new(
                        f64::from(col) * cell_width,
                        f64::from(row) * cell_height,
                        cell_width,
                        cell_height,
                    ),
                });
            }
        }

        Self {
            width,
            height,
            columns,
            rows,
            cells,
        }
    }

    /// All cells, row-major.
    #[must_use]
    pub fn cells(&self) -> &[Partition] {
        &self.cells
    }

    /// Look up a cell by its grid coordinates.
    #[must_use]
    pub fn cell(&self, index: CellIndex) -> Option<&Partition> {
        if index.col >= self.columns || index.row >= self.rows {
            return None;
        }
        self.cells
            .get(index.row as usize * self.columns as usize + index.col as usize)
    }

    /// All cells whose rectangle could intersect a brush footprint of the
    /// given radius centered at `point` (conservative, see
    /// [`Partition::may_contain`]).
    pub fn covering<'a>(
        &'a self,
        point: &'a Point,
        radius: f64,
    ) -> impl Iterator<Item = &'a Partition> {
        self.cells
            .iter()
            .filter(move |cell| cell.may_contain(point, radius))
    }

    /// Number of columns.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Surface width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Surface height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Width of one cell.
    #[must_use]
    pub fn cell_width(&self) -> f64 {
        self.width / f64::from(self.columns)
    }

    /// Height of one cell.
    #[must_use]
    pub fn cell_height(&self) -> f64 {
        self.height / f64::from(self.rows)
    }
}
