use crate::geometry::curve::CubicBezier;
use crate::math::vector_2d::coincident;
use crate::math::Point2;

/// One knot of a cubic Bézier subpath: an anchor and its two handles.
///
/// A handle that coincides with the anchor marks the adjoining segment as
/// locally straight at this knot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knot {
    pub handle_in: Point2,
    pub anchor: Point2,
    pub handle_out: Point2,
}

impl Knot {
    /// Creates a knot from its incoming handle, anchor and outgoing handle.
    #[must_use]
    pub fn new(handle_in: Point2, anchor: Point2, handle_out: Point2) -> Self {
        Self {
            handle_in,
            anchor,
            handle_out,
        }
    }

    /// Creates a sharp knot with both handles on the anchor.
    #[must_use]
    pub fn corner(anchor: Point2) -> Self {
        Self::new(anchor, anchor, anchor)
    }
}

/// An ordered run of connected knots.
///
/// A subpath is closed when its first and last anchors coincide: the last
/// knot then duplicates the first and holds the closing segment's incoming
/// handle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subpath {
    pub knots: Vec<Knot>,
}

impl Subpath {
    /// Creates a subpath from its knots.
    #[must_use]
    pub fn new(knots: Vec<Knot>) -> Self {
        Self { knots }
    }

    /// Creates a polygonal subpath of sharp knots.
    ///
    /// When `closed` is set, a duplicate of the first knot is appended.
    #[must_use]
    pub fn from_points(points: &[Point2], closed: bool) -> Self {
        let mut knots: Vec<Knot> = points.iter().copied().map(Knot::corner).collect();
        if closed {
            if let Some(first) = knots.first().copied() {
                knots.push(first);
            }
        }
        Self { knots }
    }

    /// Returns the number of knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.knots.len()
    }

    /// Returns `true` if the subpath has no knots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// Returns `true` if the first and last anchors coincide.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.knots.first(), self.knots.last()) {
            (Some(first), Some(last)) if self.knots.len() >= 2 => {
                coincident(&first.anchor, &last.anchor)
            }
            _ => false,
        }
    }

    /// Returns the anchors in order.
    #[must_use]
    pub fn anchors(&self) -> Vec<Point2> {
        self.knots.iter().map(|k| k.anchor).collect()
    }

    /// Returns the cubic segment from knot `i` to knot `i + 1`, if both exist.
    #[must_use]
    pub fn segment(&self, i: usize) -> Option<CubicBezier> {
        let a = self.knots.get(i)?;
        let b = self.knots.get(i + 1)?;
        Some(CubicBezier::new(a.anchor, a.handle_out, b.handle_in, b.anchor))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn from_points_open() {
        let sp = Subpath::from_points(&square(), false);
        assert_eq!(sp.len(), 4);
        assert!(!sp.is_closed());
        assert_eq!(sp.knots[1].handle_in, sp.knots[1].anchor);
    }

    #[test]
    fn from_points_closed_duplicates_first() {
        let sp = Subpath::from_points(&square(), true);
        assert_eq!(sp.len(), 5);
        assert!(sp.is_closed());
        assert_eq!(sp.knots[4], sp.knots[0]);
    }

    #[test]
    fn single_knot_is_not_closed() {
        let sp = Subpath::from_points(&[Point2::new(1.0, 1.0)], false);
        assert!(!sp.is_closed());
        assert!(Subpath::default().is_empty());
    }

    #[test]
    fn segment_uses_handles() {
        let sp = Subpath::new(vec![
            Knot::new(
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 2.0),
            ),
            Knot::new(
                Point2::new(3.0, 2.0),
                Point2::new(4.0, 0.0),
                Point2::new(4.0, 0.0),
            ),
        ]);
        let seg = sp.segment(0).unwrap();
        assert_eq!(seg.ctrl1, Point2::new(1.0, 2.0));
        assert_eq!(seg.ctrl2, Point2::new(3.0, 2.0));
        assert!(sp.segment(1).is_none());
    }
}
