pub mod center_curve;
mod curved;
mod splice;
mod straight;
mod super_node;

pub use center_curve::{
    intersect_center_curve_segments, CenterCurveSegment, CenterIntersection, OffsetSide,
    MAX_SUBDIVISION_DEPTH,
};
pub use splice::splice;
pub use super_node::{neighbor_indices, CornerNeighbor, SuperNode};

use tracing::debug;

use crate::error::{CornerError, Result};
use crate::geometry::{Knot, Subpath};
use crate::math::arc_2d::arc_bezier_handles;
use crate::math::Point2;

/// Radius used when the caller does not pick one.
pub const DEFAULT_RADIUS: f64 = 2.0;

/// Replacement geometry for a rounded corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilletMode {
    /// Circular arc made of two cubic segments.
    #[default]
    Arc,
    /// Straight bevel between the two trim points.
    Cut,
}

impl FilletMode {
    /// Maps a "cut with a straight line" flag to a mode.
    #[must_use]
    pub fn from_cut(cut: bool) -> Self {
        if cut {
            Self::Cut
        } else {
            Self::Arc
        }
    }
}

/// Parameters controlling corner rounding.
#[derive(Debug, Clone, Copy)]
pub struct FilletParams {
    /// Largest trim allowed, as a fraction of the shorter adjoining handle
    /// (straight corners) or chord (curved corners).
    pub max_trim_factor: f64,
    /// Angles within this many radians of 0, π/2 or π are left unrounded.
    pub angle_epsilon: f64,
    /// Control points closer than this to their chord make a side straight.
    pub line_tolerance: f64,
    /// Convergence width of the offset-curve intersection search.
    pub center_tolerance: f64,
    /// Subdivision depth bound of the intersection search, at most
    /// [`MAX_SUBDIVISION_DEPTH`].
    pub max_depth: u32,
}

impl Default for FilletParams {
    fn default() -> Self {
        Self {
            max_trim_factor: 0.5,
            angle_epsilon: 1e-6,
            line_tolerance: 1e-6,
            center_tolerance: 1e-4,
            max_depth: MAX_SUBDIVISION_DEPTH,
        }
    }
}

/// Trim points of a corner and the handles of the path parts that remain.
///
/// `None` handles leave the existing handles of the path in place.
#[derive(Debug, Clone, Copy)]
struct TrimmedSides {
    trim_prev: Point2,
    trim_next: Point2,
    /// Incoming handle of the knot at `trim_prev`.
    prev_inner: Option<Point2>,
    /// Outgoing handle of the knot at `trim_next`.
    next_inner: Option<Point2>,
    /// New outgoing handle of the previous neighbor.
    prev_handle_out: Option<Point2>,
    /// New incoming handle of the next neighbor.
    next_handle_in: Option<Point2>,
}

impl TrimmedSides {
    fn straight(
        trim_prev: Point2,
        trim_next: Point2,
        prev_handle_out: Option<Point2>,
        next_handle_in: Option<Point2>,
    ) -> Self {
        Self {
            trim_prev,
            trim_next,
            prev_inner: None,
            next_inner: None,
            prev_handle_out,
            next_handle_in,
        }
    }
}

/// Center and midpoint of a fillet arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilletArc {
    pub center: Point2,
    pub mid: Point2,
}

/// The geometry that replaces one corner knot.
#[derive(Debug, Clone, PartialEq)]
pub struct Fillet {
    /// Knots replacing the corner, in path order.
    pub knots: Vec<Knot>,
    /// New outgoing handle for the previous neighbor, if its segment was cut.
    pub prev_handle_out: Option<Point2>,
    /// New incoming handle for the next neighbor, if its segment was cut.
    pub next_handle_in: Option<Point2>,
    pub trim_prev: Point2,
    pub trim_next: Point2,
    /// Arc center and midpoint; `None` for a bevel.
    pub arc: Option<FilletArc>,
}

impl Fillet {
    fn cut(sides: TrimmedSides) -> Self {
        let TrimmedSides {
            trim_prev,
            trim_next,
            ..
        } = sides;
        Self {
            knots: vec![
                Knot::new(sides.prev_inner.unwrap_or(trim_prev), trim_prev, trim_prev),
                Knot::new(trim_next, trim_next, sides.next_inner.unwrap_or(trim_next)),
            ],
            prev_handle_out: sides.prev_handle_out,
            next_handle_in: sides.next_handle_in,
            trim_prev,
            trim_next,
            arc: None,
        }
    }

    fn arc(sides: TrimmedSides, center: Point2, mid: Point2) -> Result<Self> {
        let TrimmedSides {
            trim_prev,
            trim_next,
            ..
        } = sides;
        let (p2, p3) = arc_bezier_handles(&trim_prev, &mid, &center)?;
        let (p5, p6) = arc_bezier_handles(&mid, &trim_next, &center)?;
        Ok(Self {
            knots: vec![
                Knot::new(sides.prev_inner.unwrap_or(trim_prev), trim_prev, p2),
                Knot::new(p3, mid, p5),
                Knot::new(p6, trim_next, sides.next_inner.unwrap_or(trim_next)),
            ],
            prev_handle_out: sides.prev_handle_out,
            next_handle_in: sides.next_handle_in,
            trim_prev,
            trim_next,
            arc: Some(FilletArc { center, mid }),
        })
    }

    /// Number of knots this fillet adds to its subpath.
    #[must_use]
    pub fn inserted(&self) -> usize {
        self.knots.len().saturating_sub(1)
    }
}

/// Result of rounding a single corner.
#[derive(Debug, Clone)]
pub struct RoundedCorner {
    /// The subpath with the corner replaced.
    pub subpath: Subpath,
    /// Number of knots added; later knot indices shift by this much.
    pub inserted: usize,
    pub fillet: Fillet,
}

/// Rounds one corner of a subpath.
///
/// Straight corners are solved in closed form. When either adjoining segment
/// is curved, the arc center is found by intersecting the two offset curves.
#[derive(Debug)]
pub struct RoundCorner<'a> {
    subpath: &'a Subpath,
    index: usize,
    radius: f64,
    mode: FilletMode,
    params: FilletParams,
}

impl<'a> RoundCorner<'a> {
    /// Creates a new corner rounding operation for knot `index`.
    #[must_use]
    pub fn new(subpath: &'a Subpath, index: usize, radius: f64, mode: FilletMode) -> Self {
        Self {
            subpath,
            index,
            radius,
            mode,
            params: FilletParams::default(),
        }
    }

    /// Replaces the default parameters.
    #[must_use]
    pub fn with_params(mut self, params: FilletParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the rounding, returning the new subpath.
    ///
    /// The last knot of a closed subpath is the same corner as the first one.
    ///
    /// # Errors
    ///
    /// Returns a `CornerError` describing why the corner was skipped, or a
    /// `GeometryError` if an internal computation broke down. The input
    /// subpath is never modified.
    pub fn execute(&self) -> Result<RoundedCorner> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(CornerError::InvalidInput(format!(
                "radius must be positive, got {}",
                self.radius
            ))
            .into());
        }

        let index = if self.subpath.is_closed() && self.index + 1 == self.subpath.len() {
            0
        } else {
            self.index
        };

        let node = SuperNode::build(self.subpath, index, self.radius)?;
        let straight = node.is_straight(self.params.line_tolerance);
        let fillet = if straight {
            straight::solve(&node, self.radius, self.mode, &self.params)?
        } else {
            curved::solve(&node, self.radius, self.mode, &self.params)?
        };

        let (subpath, inserted) = splice(self.subpath, &node, &fillet);
        debug!(
            index,
            radius = self.radius,
            mode = ?self.mode,
            straight,
            inserted,
            "rounded corner"
        );
        Ok(RoundedCorner {
            subpath,
            inserted,
            fillet,
        })
    }
}
