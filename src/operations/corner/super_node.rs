use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{CornerError, CornerSide, Result};
use crate::geometry::{CubicBezier, Subpath};
use crate::math::vector_2d::angle_between;
use crate::math::{Point2, Vector2, TOLERANCE};

/// One side of a corner, seen from the corner anchor.
#[derive(Debug, Clone, Copy)]
pub struct CornerNeighbor {
    /// Knot index of the neighboring anchor.
    pub index: usize,
    /// Chord vector from the corner anchor to the neighboring anchor.
    pub dir: Vector2,
    /// Length of `dir`.
    pub dist: f64,
    /// Vector from the corner anchor to its own handle on this side.
    /// Equals `dir` when the handle sits on the anchor.
    pub handle: Vector2,
    /// Handle length, clamped to `dist`.
    pub hlen: f64,
    /// The segment on this side, running from the corner (t = 0) to the
    /// neighboring anchor (t = 1).
    pub curve: CubicBezier,
}

impl CornerNeighbor {
    fn new(anchor: Point2, index: usize, curve: CubicBezier) -> Self {
        let dir = curve.to - anchor;
        let dist = dir.norm();
        let own_handle = curve.ctrl1 - anchor;
        let handle = if own_handle.norm() < TOLERANCE {
            dir
        } else {
            own_handle
        };
        Self {
            index,
            dir,
            dist,
            handle,
            hlen: handle.norm(),
            curve,
        }
    }

    fn check(&self, side: CornerSide, radius: f64) -> std::result::Result<(), CornerError> {
        if self.dist < radius {
            return Err(CornerError::NeighborTooClose {
                side,
                distance: self.dist,
                radius,
            });
        }
        Ok(())
    }

    fn check_handle(&self, side: CornerSide, radius: f64) -> std::result::Result<(), CornerError> {
        if self.hlen < radius {
            return Err(CornerError::HandleTooShort {
                side,
                length: self.hlen,
                radius,
            });
        }
        Ok(())
    }
}

/// Geometric description of a corner and its two neighbors.
#[derive(Debug, Clone, Copy)]
pub struct SuperNode {
    /// Knot index of the corner.
    pub index: usize,
    /// Anchor of the corner.
    pub anchor: Point2,
    pub prev: CornerNeighbor,
    pub next: CornerNeighbor,
    /// Unsigned angle between the two handle vectors, in `[0, π]`.
    pub alpha: f64,
}

impl SuperNode {
    /// Builds the corner descriptor for knot `index` of `subpath`.
    ///
    /// # Errors
    ///
    /// Returns `CornerError::InvalidInput` for short subpaths, out-of-range
    /// indices and endpoints of open subpaths, `CornerError::NeighborTooClose`
    /// if a neighboring anchor is closer than `radius`, and
    /// `CornerError::HandleTooShort` if a handle is shorter than `radius`.
    pub fn build(subpath: &Subpath, index: usize, radius: f64) -> Result<Self> {
        let (prev_index, next_index) = neighbor_indices(subpath, index)?;
        let knots = &subpath.knots;
        let anchor = knots[index].anchor;

        // The segment ending at the corner, walked backwards.
        let prev_curve = subpath.segment(prev_index).map_or_else(
            || CubicBezier::line(anchor, knots[prev_index].anchor),
            |seg| seg.reversed(),
        );
        let next_curve = subpath
            .segment(index)
            .filter(|_| next_index == index + 1)
            .unwrap_or_else(|| CubicBezier::line(anchor, knots[next_index].anchor));

        let mut prev = CornerNeighbor::new(anchor, prev_index, prev_curve);
        let mut next = CornerNeighbor::new(anchor, next_index, next_curve);

        prev.check(CornerSide::Prev, radius)?;
        next.check(CornerSide::Next, radius)?;
        prev.check_handle(CornerSide::Prev, radius)?;
        next.check_handle(CornerSide::Next, radius)?;

        prev.hlen = prev.hlen.min(prev.dist);
        next.hlen = next.hlen.min(next.dist);

        Ok(Self {
            index,
            anchor,
            prev,
            next,
            alpha: angle_between(&prev.handle, &next.handle),
        })
    }

    /// X coordinate of the corner anchor.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.anchor.x
    }

    /// Y coordinate of the corner anchor.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.anchor.y
    }

    /// Distance from the anchor, along each handle, at which a circle of
    /// `radius` touches both sides: `radius / tan(alpha / 2)`.
    #[must_use]
    pub fn trim(&self, radius: f64) -> f64 {
        radius / (self.alpha / 2.0).tan()
    }

    /// Returns `true` if both adjoining segments render as straight lines.
    #[must_use]
    pub fn is_straight(&self, tolerance: f64) -> bool {
        self.prev.curve.is_line(tolerance) && self.next.curve.is_line(tolerance)
    }

    /// Rejects angles that fold back (`≈ 0`), run straight through (`≈ π`),
    /// or sit at a right angle (`≈ π/2`), which is left as is.
    ///
    /// # Errors
    ///
    /// Returns `CornerError::DegenerateAngle` for those angles.
    pub fn check_angle(&self, epsilon: f64) -> std::result::Result<(), CornerError> {
        let alpha = self.alpha;
        if alpha < epsilon || (alpha - FRAC_PI_2).abs() < epsilon || (PI - alpha) < epsilon {
            return Err(CornerError::DegenerateAngle { alpha });
        }
        Ok(())
    }
}

/// Returns the `(prev, next)` knot indices around `index`.
///
/// On a closed subpath the previous neighbor of the first knot skips the
/// duplicate seam knot. Endpoints of open subpaths have no corner.
///
/// # Errors
///
/// Returns `CornerError::InvalidInput` if there is no corner at `index`.
pub fn neighbor_indices(subpath: &Subpath, index: usize) -> Result<(usize, usize)> {
    let n = subpath.len();
    if n < 2 {
        return Err(CornerError::InvalidInput(format!(
            "subpath has {n} knots, at least 2 required"
        ))
        .into());
    }
    if index >= n {
        return Err(CornerError::InvalidInput(format!(
            "knot index {index} out of range for {n} knots"
        ))
        .into());
    }

    let last = n - 1;
    let closed = subpath.is_closed();
    let endpoint = || {
        CornerError::InvalidInput(format!("knot {index} is an endpoint of an open subpath"))
    };

    let prev = match index {
        0 if closed => last - 1,
        0 => return Err(endpoint().into()),
        _ => index - 1,
    };
    let next = if index < last {
        index + 1
    } else if closed {
        0
    } else {
        return Err(endpoint().into());
    };
    Ok((prev, next))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FilletError;
    use crate::geometry::Knot;
    use approx::assert_abs_diff_eq;

    fn wedge() -> Subpath {
        // 60° corner at the origin, both sides 10 long.
        let (s, c) = (PI / 3.0).sin_cos();
        Subpath::from_points(
            &[
                Point2::new(10.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(10.0 * c, 10.0 * s),
            ],
            false,
        )
    }

    fn corner_err(result: Result<SuperNode>) -> CornerError {
        match result {
            Err(FilletError::Corner(e)) => e,
            other => panic!("expected a corner error, got {other:?}"),
        }
    }

    #[test]
    fn straight_corner_descriptor() {
        let node = SuperNode::build(&wedge(), 1, 1.0).unwrap();
        assert_eq!(node.prev.index, 0);
        assert_eq!(node.next.index, 2);
        assert_abs_diff_eq!(node.prev.dist, 10.0, epsilon = 1e-12);
        // Collapsed handles fall back to the chords.
        assert_abs_diff_eq!(node.prev.handle, node.prev.dir);
        assert_abs_diff_eq!(node.next.hlen, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(node.alpha, PI / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(node.trim(1.0), 3.0_f64.sqrt(), epsilon = 1e-12);
        assert!(node.is_straight(1e-9));
        assert_abs_diff_eq!(node.x(), 0.0);
        assert_abs_diff_eq!(node.y(), 0.0);
    }

    #[test]
    fn neighbors_of_closed_subpath_skip_seam() {
        let sp = Subpath::from_points(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(5.0, 8.0),
            ],
            true,
        );
        assert_eq!(neighbor_indices(&sp, 0).unwrap(), (2, 1));
        assert_eq!(neighbor_indices(&sp, 2).unwrap(), (1, 3));
        assert_eq!(neighbor_indices(&sp, 3).unwrap(), (2, 0));

        let node = SuperNode::build(&sp, 0, 1.0).unwrap();
        assert_abs_diff_eq!(node.prev.dir, Vector2::new(5.0, 8.0), epsilon = 1e-12);
    }

    #[test]
    fn open_endpoints_are_invalid() {
        let sp = wedge();
        assert!(matches!(
            corner_err(SuperNode::build(&sp, 0, 1.0)),
            CornerError::InvalidInput(_)
        ));
        assert!(matches!(
            corner_err(SuperNode::build(&sp, 2, 1.0)),
            CornerError::InvalidInput(_)
        ));
        assert!(matches!(
            corner_err(SuperNode::build(&sp, 7, 1.0)),
            CornerError::InvalidInput(_)
        ));
    }

    #[test]
    fn too_few_knots() {
        let sp = Subpath::from_points(&[Point2::new(0.0, 0.0)], false);
        assert!(matches!(
            corner_err(SuperNode::build(&sp, 0, 1.0)),
            CornerError::InvalidInput(_)
        ));
    }

    #[test]
    fn neighbor_closer_than_radius() {
        let sp = Subpath::from_points(
            &[
                Point2::new(10.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(0.3, 0.3),
            ],
            false,
        );
        let err = corner_err(SuperNode::build(&sp, 1, 1.0));
        assert!(matches!(
            err,
            CornerError::NeighborTooClose {
                side: CornerSide::Next,
                ..
            }
        ));
    }

    #[test]
    fn handle_shorter_than_radius() {
        let sp = Subpath::new(vec![
            Knot::corner(Point2::new(10.0, 0.0)),
            Knot::new(
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 0.5),
            ),
            Knot::new(
                Point2::new(3.0, 10.0),
                Point2::new(0.0, 10.0),
                Point2::new(0.0, 10.0),
            ),
        ]);
        let err = corner_err(SuperNode::build(&sp, 1, 1.0));
        assert!(matches!(
            err,
            CornerError::HandleTooShort {
                side: CornerSide::Next,
                ..
            }
        ));
        // A smaller radius fits the same handle.
        assert!(SuperNode::build(&sp, 1, 0.4).is_ok());
    }

    #[test]
    fn handle_length_clamped_to_chord() {
        let sp = Subpath::new(vec![
            Knot::corner(Point2::new(4.0, 0.0)),
            Knot::new(
                Point2::new(8.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 3.0),
            ),
            Knot::corner(Point2::new(0.0, 10.0)),
        ]);
        let node = SuperNode::build(&sp, 1, 1.0).unwrap();
        assert_abs_diff_eq!(node.prev.hlen, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(node.next.hlen, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn angle_guards() {
        let mut node = SuperNode::build(&wedge(), 1, 1.0).unwrap();
        assert!(node.check_angle(1e-6).is_ok());
        for alpha in [0.0, FRAC_PI_2, PI] {
            node.alpha = alpha;
            assert!(matches!(
                node.check_angle(1e-6),
                Err(CornerError::DegenerateAngle { .. })
            ));
        }
    }
}
