//! Incremental curve smoothing.
//!
//! Raw pointer samples arrive unevenly spaced; rendering them as straight
//! segments produces visible corners. For each interior sample we derive two
//! spline control points that keep the rendered curve tangent-smooth through
//! that sample, weighting by arc length so curvature adapts to uneven
//! spacing.

use crate::geometry::Point;

/// Default smoothing scale used when a surface does not override it.
pub const DEFAULT_SMOOTHING: f64 = 0.3;

/// Compute the two control points steering the curve through `p2`.
///
/// Given three consecutive samples `p1`, `p2`, `p3` and a scale in
/// `(0, 1]`, the returned values are `[c1x, c1y, c2x, c2y]` such that a
/// spline drawn `p1 -> c1 -> p2` and `p2 -> c2 -> p3` is continuous and
/// tangent-smooth at `p2`:
///
/// * `d1 = |p1 p2|`, `d2 = |p2 p3|`
/// * `s1 = scale * d1 / (d1 + d2)`, `s2 = scale - s1`
/// * `c1 = p2 + s1 * (p1 - p3)`, `c2 = p2 - s2 * (p1 - p3)`
///
/// Both control points lie on the line through `p2` parallel to the chord
/// `p1 p3`, offset asymmetrically by the arc-length ratio. Degenerate input
/// (`d1 + d2 == 0`, all three samples coincident) collapses both control
/// points onto `p2`.
///
/// Pure and stateless: callable independent of any stroke.
#[must_use]
pub fn control_points(p1: &Point, p2: &Point, p3: &Point, scale: f64) -> [f64; 4] {
    let d1 = p1.distance_to(p2);
    let d2 = p2.distance_to(p3);

    if d1 + d2 == 0.0 {
        return [p2.x, p2.y, p2.x, p2.y];
    }

    let s1 = scale * d1 / (d1 + d2);
    let s2 = scale - s1;

    let chord_x = p1.x - p3.x;
    let chord_y = p1.y - p3.y;

    [
        p2.x + s1 * chord_x,
        p2.y + s1 * chord_y,
        p2.x - s2 * chord_x,
        p2.y - s2 * chord_y,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y, 1.0)
    }

    #[test]
    fn test_collinear_equal_spacing_symmetric() {
        // Equally spaced collinear samples: control points sit symmetrically
        // about p2 along the line p1-p3.
        let [c1x, c1y, c2x, c2y] =
            control_points(&pt(0.0, 0.0), &pt(10.0, 0.0), &pt(20.0, 0.0), 0.3);

        assert!((c1x - (10.0 - 3.0)).abs() < EPSILON);
        assert!(c1y.abs() < EPSILON);
        assert!((c2x - (10.0 + 3.0)).abs() < EPSILON);
        assert!(c2y.abs() < EPSILON);

        // Symmetry about p2.
        assert!(((c1x + c2x) / 2.0 - 10.0).abs() < EPSILON);
        assert!(((c1y + c2y) / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_uneven_spacing_weights_by_arc_length() {
        // p2 much closer to p1 than to p3: c1 gets the smaller share.
        let p1 = pt(0.0, 0.0);
        let p2 = pt(1.0, 0.0);
        let p3 = pt(10.0, 0.0);
        let [c1x, _, c2x, _] = control_points(&p1, &p2, &p3, 0.3);

        let offset1 = (c1x - p2.x).abs();
        let offset2 = (c2x - p2.x).abs();
        assert!(offset1 < offset2);

        // The two shares always add up to the full scale along the chord.
        let chord = (p1.x - p3.x).abs();
        assert!((offset1 + offset2 - 0.3 * chord).abs() < EPSILON);
    }

    #[test]
    fn test_control_points_parallel_to_chord() {
        let p1 = pt(0.0, 0.0);
        let p2 = pt(8.0, 5.0);
        let p3 = pt(14.0, 2.0);
        let [c1x, c1y, c2x, c2y] = control_points(&p1, &p2, &p3, 0.3);

        // c1 -> c2 must be parallel to p1 -> p3 (cross product zero).
        let cross = (c2x - c1x) * (p3.y - p1.y) - (c2y - c1y) * (p3.x - p1.x);
        assert!(cross.abs() < 1e-9);

        // Both offsets pass through p2's parallel line.
        let cross_c1 = (c1x - p2.x) * (p3.y - p1.y) - (c1y - p2.y) * (p3.x - p1.x);
        assert!(cross_c1.abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_coincident_points() {
        let p = pt(5.0, 5.0);
        let [c1x, c1y, c2x, c2y] = control_points(&p, &p, &p, 0.3);
        assert!((c1x - 5.0).abs() < EPSILON);
        assert!((c1y - 5.0).abs() < EPSILON);
        assert!((c2x - 5.0).abs() < EPSILON);
        assert!((c2y - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_length_first_segment() {
        // p1 == p2: all of the scale goes to the second control point.
        let p = pt(3.0, 3.0);
        let p3 = pt(9.0, 3.0);
        let [c1x, c1y, _, _] = control_points(&p, &p, &p3, 0.3);
        assert!((c1x - p.x).abs() < EPSILON);
        assert!((c1y - p.y).abs() < EPSILON);
    }
}
