use crate::error::GeometryError;
use crate::math::vector_2d::{cross_2d, normalize};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::{Curve, CurveDomain};

/// A cubic Bézier segment.
///
/// The parametric form is
/// `B(t) = (1-t)³·from + 3(1-t)²t·ctrl1 + 3(1-t)t²·ctrl2 + t³·to`, `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub from: Point2,
    pub ctrl1: Point2,
    pub ctrl2: Point2,
    pub to: Point2,
}

impl CubicBezier {
    /// Creates a new cubic segment from its four control points.
    #[must_use]
    pub fn new(from: Point2, ctrl1: Point2, ctrl2: Point2, to: Point2) -> Self {
        Self {
            from,
            ctrl1,
            ctrl2,
            to,
        }
    }

    /// Creates a straight segment with both handles collapsed onto the ends.
    #[must_use]
    pub fn line(from: Point2, to: Point2) -> Self {
        Self::new(from, from, to, to)
    }

    /// Creates a segment from separate x and y coordinate arrays.
    #[must_use]
    pub fn from_xy(xs: [f64; 4], ys: [f64; 4]) -> Self {
        Self::new(
            Point2::new(xs[0], ys[0]),
            Point2::new(xs[1], ys[1]),
            Point2::new(xs[2], ys[2]),
            Point2::new(xs[3], ys[3]),
        )
    }

    /// Returns the same curve traversed from `to` to `from`.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.to, self.ctrl2, self.ctrl1, self.from)
    }

    /// First derivative at `t`.
    #[must_use]
    pub fn derivative(&self, t: f64) -> Vector2 {
        let mt = 1.0 - t;
        let d0 = self.ctrl1 - self.from;
        let d1 = self.ctrl2 - self.ctrl1;
        let d2 = self.to - self.ctrl2;
        (d0 * (mt * mt) + d1 * (2.0 * mt * t) + d2 * (t * t)) * 3.0
    }

    /// Splits the curve at `t` with de Casteljau's algorithm.
    #[must_use]
    pub fn split(&self, t: f64) -> (Self, Self) {
        let lerp = |a: &Point2, b: &Point2| a + (b - a) * t;

        let p01 = lerp(&self.from, &self.ctrl1);
        let p12 = lerp(&self.ctrl1, &self.ctrl2);
        let p23 = lerp(&self.ctrl2, &self.to);
        let p012 = lerp(&p01, &p12);
        let p123 = lerp(&p12, &p23);
        let split_point = lerp(&p012, &p123);

        (
            Self::new(self.from, p01, p012, split_point),
            Self::new(split_point, p123, p23, self.to),
        )
    }

    /// Returns the part of the curve between parameters `t0` and `t1`,
    /// reparameterized onto `[0, 1]`.
    #[must_use]
    pub fn sub_segment(&self, t0: f64, t1: f64) -> Self {
        if t1 <= TOLERANCE {
            return Self::line(self.from, self.from);
        }
        let (head, _) = self.split(t1);
        head.split(t0 / t1).1
    }

    /// Returns `true` if both control points lie within `tolerance` of the chord,
    /// so the segment renders as a straight line.
    #[must_use]
    pub fn is_line(&self, tolerance: f64) -> bool {
        let chord = self.to - self.from;
        let len = chord.norm();
        if len < TOLERANCE {
            return (self.ctrl1 - self.from).norm() <= tolerance
                && (self.ctrl2 - self.from).norm() <= tolerance;
        }
        let off_chord = |p: &Point2| (cross_2d(&chord, &(p - self.from)) / len).abs();
        off_chord(&self.ctrl1) <= tolerance && off_chord(&self.ctrl2) <= tolerance
    }
}

impl Curve for CubicBezier {
    fn evaluate(&self, t: f64) -> Point2 {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point2::from(
            self.from.coords * a + self.ctrl1.coords * b + self.ctrl2.coords * c + self.to.coords * d,
        )
    }

    /// Falls back to the direction of the next distinct control point when a
    /// handle sits on its anchor and the derivative vanishes.
    fn tangent(&self, t: f64) -> Result<Vector2, GeometryError> {
        if let Ok(dir) = normalize(&self.derivative(t)) {
            return Ok(dir);
        }
        let fallback = if t < 0.5 {
            [self.ctrl2 - self.from, self.to - self.from]
        } else {
            [self.to - self.ctrl1, self.to - self.from]
        };
        fallback
            .iter()
            .find_map(|v| normalize(v).ok())
            .ok_or(GeometryError::ZeroVector)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-12;

    fn s_curve() -> CubicBezier {
        CubicBezier::from_xy([-1.0, 1.0, -1.0, 1.0], [-1.0, -1.0, 1.0, 1.0])
    }

    #[test]
    fn evaluate_end_and_mid_points() {
        let c = s_curve();
        assert_abs_diff_eq!(c.evaluate(0.0), Point2::new(-1.0, -1.0), epsilon = TOL);
        assert_abs_diff_eq!(c.evaluate(1.0), Point2::new(1.0, 1.0), epsilon = TOL);
        assert_abs_diff_eq!(c.evaluate(0.5), Point2::new(0.0, 0.0), epsilon = TOL);
    }

    #[test]
    fn derivative_and_tangent() {
        let c = s_curve();
        assert_abs_diff_eq!(c.derivative(0.0), Vector2::new(6.0, 0.0), epsilon = TOL);
        assert_abs_diff_eq!(c.derivative(0.5), Vector2::new(0.0, 3.0), epsilon = TOL);
        assert_abs_diff_eq!(c.tangent(0.5).unwrap(), Vector2::new(0.0, 1.0), epsilon = TOL);
    }

    #[test]
    fn tangent_falls_back_when_handle_collapsed() {
        // Handle at the start coincides with the anchor: derivative is zero at t=0.
        let c = CubicBezier::new(
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 1.0),
        );
        let t = c.tangent(0.0).unwrap();
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert_abs_diff_eq!(t, Vector2::new(h, h), epsilon = TOL);

        let line = CubicBezier::line(Point2::new(0.0, 0.0), Point2::new(3.0, 0.0));
        assert_abs_diff_eq!(line.tangent(1.0).unwrap(), Vector2::new(1.0, 0.0), epsilon = TOL);
    }

    #[test]
    fn fully_degenerate_curve_has_no_tangent() {
        let p = Point2::new(1.0, 1.0);
        let c = CubicBezier::new(p, p, p, p);
        assert!(matches!(c.tangent(0.3), Err(GeometryError::ZeroVector)));
    }

    #[test]
    fn split_matches_evaluation() {
        let c = s_curve();
        let (a, b) = c.split(0.3);
        assert_abs_diff_eq!(a.to, c.evaluate(0.3), epsilon = TOL);
        assert_abs_diff_eq!(b.from, c.evaluate(0.3), epsilon = TOL);
        assert_abs_diff_eq!(a.evaluate(0.5), c.evaluate(0.15), epsilon = TOL);
        assert_abs_diff_eq!(b.evaluate(0.5), c.evaluate(0.65), epsilon = TOL);
    }

    #[test]
    fn sub_segment_covers_range() {
        let c = s_curve();
        let s = c.sub_segment(0.2, 0.7);
        assert_abs_diff_eq!(s.from, c.evaluate(0.2), epsilon = TOL);
        assert_abs_diff_eq!(s.to, c.evaluate(0.7), epsilon = TOL);
        assert_abs_diff_eq!(s.evaluate(0.5), c.evaluate(0.45), epsilon = TOL);

        let tail = c.sub_segment(0.4, 1.0);
        assert_abs_diff_eq!(tail.to, c.to, epsilon = TOL);
    }

    #[test]
    fn line_classification() {
        let from = Point2::new(0.0, 0.0);
        let to = Point2::new(9.0, 3.0);
        assert!(CubicBezier::line(from, to).is_line(1e-9));

        // Collinear handles still make a line.
        let collinear = CubicBezier::new(from, Point2::new(3.0, 1.0), Point2::new(6.0, 2.0), to);
        assert!(collinear.is_line(1e-9));

        assert!(!s_curve().is_line(1e-6));
    }

    #[test]
    fn reversed_swaps_ends() {
        let c = s_curve();
        let r = c.reversed();
        assert_abs_diff_eq!(r.evaluate(0.25), c.evaluate(0.75), epsilon = TOL);
    }
}
