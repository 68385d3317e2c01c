//! End-to-end tests for the stroke pipeline: input samples through live
//! preview, bake, and batch redraw.

use freehand_core::{Brush, CellIndex, Color, Rect, StrokeId};
use freehand_renderer::{DrawingSurface, SurfaceConfig};

fn small_config() -> SurfaceConfig {
    SurfaceConfig {
        width: 100,
        height: 100,
        columns: 4,
        rows: 4,
        ..SurfaceConfig::default()
    }
}

fn pen() -> Brush {
    Brush::new("pen", 10.0, Color::BLACK)
}

/// Drive the reference scenario: a size-10 opaque brush drawing four samples
/// inside the top-left 25x25 cell.
fn draw_reference_stroke(surface: &mut DrawingSurface, id: StrokeId) {
    surface.begin_stroke(&pen(), 10.0, 10.0, 1.0, id);
    surface.update_stroke(12.0, 11.0, 0.8, id).expect("open");
    surface.update_stroke(15.0, 13.0, 0.9, id).expect("open");
    surface.update_stroke(20.0, 18.0, 1.0, id).expect("open");
}

#[test]
fn end_to_end_single_cell_scenario() {
    let mut surface = DrawingSurface::new(&small_config());
    let id = StrokeId(1);
    draw_reference_stroke(&mut surface, id);

    let stroke = surface.stroke(id).expect("registered");
    assert_eq!(stroke.path().len(), 4);
    assert_eq!(stroke.control_points().len(), 4);

    // All four samples plus the brush footprint stay inside cell (0, 0).
    let touched: Vec<_> = stroke.touched().iter().copied().collect();
    assert_eq!(touched, vec![CellIndex::new(0, 0)]);

    surface.complete_stroke(id).expect("registered");

    // Ink landed, and only inside the single touched cell's clear region.
    let committed = surface.compositor().committed();
    assert!(!committed.is_blank());
    let cell0 = Rect::new(0.0, 0.0, 25.0, 25.0);
    assert!(!committed.region_is_blank(&cell0));
    for cell in surface.grid().cells() {
        if cell.index != CellIndex::new(0, 0) {
            assert!(
                committed.region_is_blank(&cell.rect),
                "stray ink in cell {:?}",
                cell.index
            );
        }
    }
}

#[test]
fn bake_keeps_committed_and_mirror_identical() {
    let mut surface = DrawingSurface::new(&small_config());
    let id = StrokeId(1);
    draw_reference_stroke(&mut surface, id);
    surface.complete_stroke(id).expect("registered");

    let grid = surface.grid().clone();
    let stroke = surface.stroke(id).expect("retained");
    for rect in stroke.touched_rects(&grid) {
        assert_eq!(
            surface.compositor().committed().region_pixels(&rect),
            surface.compositor().mirror().region_pixels(&rect),
            "committed and mirror diverge in {rect:?}"
        );
    }
    assert!(surface.compositor().scratch().is_blank());
}

#[test]
fn batch_redraw_of_baked_stroke_is_visual_noop() {
    let mut surface = DrawingSurface::new(&small_config());
    let id = StrokeId(1);
    draw_reference_stroke(&mut surface, id);
    surface.complete_stroke(id).expect("registered");

    let before = surface.committed_pixels().to_vec();
    surface.do_strokes(&[id]).expect("registered");
    assert_eq!(surface.committed_pixels(), before.as_slice());
}

#[test]
fn live_preview_does_not_touch_mirror() {
    let mut surface = DrawingSurface::new(&small_config());
    let id = StrokeId(1);
    draw_reference_stroke(&mut surface, id);

    // Preview is visible on the committed surface...
    assert!(!surface.compositor().committed().is_blank());
    // ...but nothing has been baked yet.
    assert!(surface.compositor().mirror().is_blank());
}

#[test]
fn live_preview_coalesces_instead_of_accumulating() {
    let mut surface = DrawingSurface::new(&small_config());
    let id = StrokeId(1);

    // A half-opacity brush makes double compositing detectable: repainting
    // the same preview twice would darken it.
    let marker = pen().with_opacity(0.5);
    surface.begin_stroke(&marker, 10.0, 10.0, 1.0, id);
    surface.update_stroke(12.0, 11.0, 1.0, id).expect("open");
    let after_first = surface.committed_pixels().to_vec();

    // Updates that add no new geometry repaint from the clean mirror, so
    // the result stays identical rather than compounding.
    surface.update_stroke(12.0, 11.0, 1.0, id).expect("open");
    let core_alpha = |pixels: &[u8]| pixels[(11 * 100 + 12) * 4 + 3];
    assert_eq!(
        core_alpha(surface.committed_pixels()),
        core_alpha(&after_first)
    );
}

#[test]
fn eraser_stroke_removes_baked_ink() {
    let mut surface = DrawingSurface::new(&small_config());
    draw_reference_stroke(&mut surface, StrokeId(1));
    surface.complete_stroke(StrokeId(1)).expect("registered");

    let ink_alpha = surface.compositor().committed().pixel(12, 11).map(|px| px[3]);
    assert!(ink_alpha > Some(0), "reference stroke left no ink");

    let eraser = Brush::eraser(10.0);
    surface.begin_stroke(&eraser, 10.0, 10.0, 1.0, StrokeId(2));
    surface.update_stroke(12.0, 11.0, 1.0, StrokeId(2)).expect("open");
    surface.update_stroke(15.0, 13.0, 1.0, StrokeId(2)).expect("open");
    surface.update_stroke(20.0, 18.0, 1.0, StrokeId(2)).expect("open");
    surface.complete_stroke(StrokeId(2)).expect("registered");

    assert_eq!(
        surface.compositor().committed().pixel(12, 11).map(|px| px[3]),
        Some(0),
        "eraser did not remove committed ink"
    );
}

#[test]
fn overlapping_strokes_batch_redraw_in_order() {
    let mut surface = DrawingSurface::new(&small_config());

    // Black stroke, then a white stroke crossing the same cell.
    surface.begin_stroke(&pen(), 10.0, 10.0, 1.0, StrokeId(1));
    surface.update_stroke(20.0, 10.0, 1.0, StrokeId(1)).expect("open");
    surface.complete_stroke(StrokeId(1)).expect("registered");

    let white = Brush::new("pen", 10.0, Color::WHITE);
    surface.begin_stroke(&white, 10.0, 10.0, 1.0, StrokeId(2));
    surface.update_stroke(20.0, 10.0, 1.0, StrokeId(2)).expect("open");
    surface.complete_stroke(StrokeId(2)).expect("registered");

    // Redraw with the white stroke last: it paints over the black one.
    surface.do_strokes(&[StrokeId(1), StrokeId(2)]).expect("registered");
    let px = surface
        .compositor()
        .committed()
        .pixel(12, 10)
        .expect("in bounds");
    assert_eq!(&px[..3], &[255, 255, 255], "later stroke must win: {px:?}");

    // Reversed order: the black stroke wins instead.
    surface.do_strokes(&[StrokeId(2), StrokeId(1)]).expect("registered");
    let px = surface
        .compositor()
        .committed()
        .pixel(12, 10)
        .expect("in bounds");
    assert_eq!(&px[..3], &[0, 0, 0], "later stroke must win: {px:?}");
}

#[test]
fn multiple_concurrent_strokes() {
    let mut surface = DrawingSurface::new(&small_config());

    // Two pointers down at once in different cells.
    surface.begin_stroke(&pen(), 10.0, 10.0, 1.0, StrokeId(1));
    surface.begin_stroke(&pen(), 80.0, 80.0, 1.0, StrokeId(2));
    surface.update_stroke(14.0, 10.0, 1.0, StrokeId(1)).expect("open");
    surface.update_stroke(84.0, 80.0, 1.0, StrokeId(2)).expect("open");
    surface.complete_stroke(StrokeId(1)).expect("registered");
    surface.complete_stroke(StrokeId(2)).expect("registered");

    let committed = surface.compositor().committed();
    assert!(!committed.region_is_blank(&Rect::new(0.0, 0.0, 25.0, 25.0)));
    assert!(!committed.region_is_blank(&Rect::new(75.0, 75.0, 25.0, 25.0)));
}

#[test]
fn committed_snapshot_matches_raster_size() {
    let surface = DrawingSurface::new(&small_config());
    assert_eq!(surface.committed_pixels().len(), 100 * 100 * 4);
}
