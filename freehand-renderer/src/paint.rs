//! Stroke rasterization: spline segments flattened into pressure-scaled
//! round dabs.
//!
//! Each path segment is walked at roughly one-pixel spacing and stamped
//! with a filled round dab whose radius encodes the interpolated stylus
//! pressure (`brush.size * pressure / 2`). Round dabs give the round
//! join/cap behavior of the stroke for free: consecutive overlapping dabs
//! form a continuous line with rounded ends.

use freehand_core::{Point, Stroke};

use crate::raster::Raster;

/// Render a stroke's current path into a raster at full brush alpha.
///
/// `upto` limits rendering to the first `upto` path points (the control
/// point slice is truncated to match, which is valid because control point
/// growth is append-only). `None` renders the whole path.
///
/// Paths of three or fewer samples carry too little data for a meaningful
/// spline and fall back to a single dab at the first point with radius
/// `brush.size / 2 * pressure`.
pub fn render_stroke(raster: &mut Raster, stroke: &Stroke, upto: Option<usize>) {
    let path = stroke.path();
    let n = upto.map_or(path.len(), |limit| limit.min(path.len()));
    if n == 0 {
        return;
    }

    let brush = stroke.brush();
    if n <= 3 {
        let p = &path[0];
        raster.fill_circle(p.x, p.y, brush.size / 2.0 * p.pressure, brush.color);
        return;
    }

    // Interior point m (0-based) is path[m + 1]; its control quadruple is
    // control_points[4m .. 4m + 4] = [c1x, c1y, c2x, c2y].
    let interior = n - 3;
    let cps = &stroke.control_points()[..4 * interior];

    // First segment: only c1 of the first interior point exists for it, so
    // it renders as a quadratic.
    stamp_quad(raster, stroke, &path[0], &path[1], (cps[0], cps[1]));

    // Middle segments: cubic between consecutive interior points, steered
    // by the outgoing c2 of one and the incoming c1 of the next.
    for m in 0..interior - 1 {
        let c2 = (cps[4 * m + 2], cps[4 * m + 3]);
        let c1 = (cps[4 * (m + 1)], cps[4 * (m + 1) + 1]);
        stamp_cubic(raster, stroke, &path[m + 1], &path[m + 2], c2, c1);
    }

    // Tail: quadratic out of the last interior point, then a straight run
    // to the newest sample (its control points do not exist yet).
    let last = 4 * (interior - 1);
    stamp_quad(
        raster,
        stroke,
        &path[interior],
        &path[interior + 1],
        (cps[last + 2], cps[last + 3]),
    );
    stamp_line(raster, stroke, &path[n - 2], &path[n - 1]);
}

fn stamp_quad(raster: &mut Raster, stroke: &Stroke, from: &Point, to: &Point, c: (f64, f64)) {
    stamp_curve(raster, stroke, from, to, |t| {
        let u = 1.0 - t;
        (
            u * u * from.x + 2.0 * u * t * c.0 + t * t * to.x,
            u * u * from.y + 2.0 * u * t * c.1 + t * t * to.y,
        )
    });
}

fn stamp_cubic(
    raster: &mut Raster,
    stroke: &Stroke,
    from: &Point,
    to: &Point,
    c1: (f64, f64),
    c2: (f64, f64),
) {
    stamp_curve(raster, stroke, from, to, |t| {
        let u = 1.0 - t;
        (
            u * u * u * from.x + 3.0 * u * u * t * c1.0 + 3.0 * u * t * t * c2.0 + t * t * t * to.x,
            u * u * u * from.y + 3.0 * u * u * t * c1.1 + 3.0 * u * t * t * c2.1 + t * t * t * to.y,
        )
    });
}

fn stamp_line(raster: &mut Raster, stroke: &Stroke, from: &Point, to: &Point) {
    stamp_curve(raster, stroke, from, to, |t| {
        (
            from.x + (to.x - from.x) * t,
            from.y + (to.y - from.y) * t,
        )
    });
}

/// Walk a parametric segment and stamp pressure-scaled dabs along it.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn stamp_curve(
    raster: &mut Raster,
    stroke: &Stroke,
    from: &Point,
    to: &Point,
    eval: impl Fn(f64) -> (f64, f64),
) {
    let size = stroke.brush().size;
    let color = stroke.brush().color;

    // Roughly one dab per pixel of chord length keeps the line solid without
    // overdrawing short segments.
    let steps = from.distance_to(to).ceil().clamp(2.0, 64.0) as usize;

    for i in 0..=steps {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 / steps as f64;
        let (x, y) = eval(t);
        let pressure = from.pressure + (to.pressure - from.pressure) * t;
        raster.fill_circle(x, y, size * pressure / 2.0, color);
    }
}
