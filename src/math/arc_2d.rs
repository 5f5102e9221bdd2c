/// 2D arc math for fillets.
///
/// A fillet arc is tangent to both sides of a corner. Its center lies on the
/// corner bisector, and each half of the arc is approximated by one cubic
/// Bézier segment.
use super::vector_2d::{cross_2d, left_normal, normalize};
use super::{Point2, TOLERANCE};
use crate::error::GeometryError;

/// Computes the center `c` and the midpoint `m` of a fillet arc.
///
/// `anchor` is the sharp corner, `trim_prev`/`trim_next` the tangent points
/// on either side (both `trim` away from the anchor). The center lies on the
/// bisector at `sqrt(radius² + trim²)` from the anchor, since anchor, tangent
/// point and center form a right triangle. The midpoint is `radius` closer.
///
/// # Errors
///
/// Returns `GeometryError::ZeroVector` if the two sides are anti-parallel
/// (the bisector is undefined).
pub fn arc_center_midpoint(
    anchor: &Point2,
    trim_prev: &Point2,
    trim_next: &Point2,
    trim: f64,
    radius: f64,
) -> Result<(Point2, Point2), GeometryError> {
    let a = trim_prev - anchor;
    let b = trim_next - anchor;
    let axis = normalize(&(a + b))?;

    let cdist = (radius * radius + trim * trim).sqrt();
    let center = anchor + axis * cdist;
    let mid = anchor + axis * (cdist - radius);
    Ok((center, mid))
}

/// Returns the point of the arc around `center` halfway between `p1` and `p4`.
///
/// # Errors
///
/// Returns `GeometryError::ZeroVector` if `p1` and `p4` are diametrically
/// opposite.
pub fn arc_midpoint(
    center: &Point2,
    p1: &Point2,
    p4: &Point2,
    radius: f64,
) -> Result<Point2, GeometryError> {
    let dir = normalize(&((p1 - center) + (p4 - center)))?;
    Ok(center + dir * radius)
}

/// Computes the inner control points `(p2, p3)` of a cubic Bézier from `p1`
/// to `p4` approximating the circular arc around `center`.
///
/// Uses the 4/3 tangent-ratio construction: with `a = p1 - c`, `b = p4 - c`,
/// `k = 4/3 (sqrt(2 q1 q2) - q2) / (a × b)` where `q1 = a·a` and
/// `q2 = q1 + a·b`. Both control points land on the arc's tangent lines.
/// Works for either arc direction; the sign of `k` follows `a × b`.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if `p1`, `p4` and `center` are
/// collinear (zero or half-turn arc).
pub fn arc_bezier_handles(
    p1: &Point2,
    p4: &Point2,
    center: &Point2,
) -> Result<(Point2, Point2), GeometryError> {
    let a = p1 - center;
    let b = p4 - center;
    let cross = cross_2d(&a, &b);
    if cross.abs() < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "arc from ({}, {}) to ({}, {}) spans no usable angle",
            p1.x, p1.y, p4.x, p4.y
        )));
    }

    let q1 = a.dot(&a);
    let q2 = q1 + a.dot(&b);
    let k = 4.0 / 3.0 * ((2.0 * q1 * q2).sqrt() - q2) / cross;

    let p2 = center + a + left_normal(&a) * k;
    let p3 = center + b - left_normal(&b) * k;
    Ok((p2, p3))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::vector_2d::{cross_2d, distance};
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-9;

    /// Returns true if `p` is inside triangle `(a, b, c)`, with slack `eps`.
    fn in_triangle(p: &Point2, a: &Point2, b: &Point2, c: &Point2, eps: f64) -> bool {
        let d1 = cross_2d(&(b - a), &(p - a));
        let d2 = cross_2d(&(c - b), &(p - b));
        let d3 = cross_2d(&(a - c), &(p - c));
        let has_neg = d1 < -eps || d2 < -eps || d3 < -eps;
        let has_pos = d1 > eps || d2 > eps || d3 > eps;
        !(has_neg && has_pos)
    }

    #[test]
    fn quarter_circle_handles_use_kappa() {
        // Quarter circle from (1,0) to (0,1) around the origin.
        let kappa = 4.0 / 3.0 * (2.0_f64.sqrt() - 1.0);
        let (p2, p3) = arc_bezier_handles(
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::origin(),
        )
        .unwrap();
        assert_abs_diff_eq!(p2, Point2::new(1.0, kappa), epsilon = TOL);
        assert_abs_diff_eq!(p3, Point2::new(kappa, 1.0), epsilon = TOL);
    }

    #[test]
    fn clockwise_quarter_circle() {
        let kappa = 4.0 / 3.0 * (2.0_f64.sqrt() - 1.0);
        let (p2, p3) = arc_bezier_handles(
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, -1.0),
            &Point2::origin(),
        )
        .unwrap();
        assert_abs_diff_eq!(p2, Point2::new(1.0, -kappa), epsilon = TOL);
        assert_abs_diff_eq!(p3, Point2::new(kappa, -1.0), epsilon = TOL);
    }

    #[test]
    fn collinear_arc_is_degenerate() {
        let result = arc_bezier_handles(
            &Point2::new(1.0, 0.0),
            &Point2::new(-1.0, 0.0),
            &Point2::origin(),
        );
        assert!(matches!(result, Err(GeometryError::Degenerate(_))));
    }

    #[test]
    fn arc_fit_example_corner() {
        // Corner with a horizontal previous side and radius 2.
        let anchor = Point2::new(132.388, 82.3608);
        let trim_prev = Point2::new(140.216_292_828_628_04, 82.3608);
        let trim_next = Point2::new(139.256_975_085_946_44, 78.605_889_897_294_94);
        let trim = 7.828_292_828_628_044;
        let radius = 2.0;

        let (c, m) = arc_center_midpoint(&anchor, &trim_prev, &trim_next, trim, radius).unwrap();

        // Center is tangent-distance away from both trim points.
        assert_abs_diff_eq!(distance(&c, &trim_prev), radius, epsilon = 1e-6);
        assert_abs_diff_eq!(distance(&c, &trim_next), radius, epsilon = 1e-6);
        // Previous side is horizontal, so the center sits straight below its trim point.
        assert_abs_diff_eq!(c.x, trim_prev.x, epsilon = 1e-6);
        assert_abs_diff_eq!(c.y, trim_prev.y - radius, epsilon = 1e-6);
        // The midpoint lies on the arc, between anchor and center.
        assert_abs_diff_eq!(distance(&c, &m), radius, epsilon = 1e-9);
        assert_abs_diff_eq!(
            distance(&anchor, &m) + distance(&m, &c),
            distance(&anchor, &c),
            epsilon = 1e-9
        );

        let (p2, p3) = arc_bezier_handles(&trim_prev, &m, &c).unwrap();
        let (p5, p6) = arc_bezier_handles(&m, &trim_next, &c).unwrap();
        for p in [p2, p3, p5, p6] {
            assert!(
                in_triangle(&p, &trim_prev, &trim_next, &anchor, 1e-9),
                "control point ({}, {}) outside the corner triangle",
                p.x,
                p.y
            );
        }
    }

    #[test]
    fn arc_midpoint_on_bisector() {
        let c = Point2::new(1.0, 1.0);
        let m = arc_midpoint(&c, &Point2::new(1.0, 0.0), &Point2::new(0.0, 1.0), 1.0).unwrap();
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert_abs_diff_eq!(m, Point2::new(1.0 - h, 1.0 - h), epsilon = TOL);
    }

    #[test]
    fn anti_parallel_sides_have_no_center() {
        let anchor = Point2::origin();
        let result = arc_center_midpoint(
            &anchor,
            &Point2::new(1.0, 0.0),
            &Point2::new(-1.0, 0.0),
            1.0,
            1.0,
        );
        assert!(matches!(result, Err(GeometryError::ZeroVector)));
    }
}
