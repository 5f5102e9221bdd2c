/// Offset loci of curve segments and their intersection.
///
/// The center of a fillet touching two curves lies at `radius` from both, so
/// it is an intersection of the two curves' offset loci. Offsets of cubics
/// have no closed form; the search below subdivides both loci in parameter
/// space and keeps only pairs whose bounds overlap.
use tracing::debug;

use crate::error::GeometryError;
use crate::geometry::{CubicBezier, Curve, CurveDomain};
use crate::math::vector_2d::{cross_2d, left_normal, normalize};
use crate::math::{Point2, Vector2, TOLERANCE};

/// Hard ceiling on the subdivision depth of the intersection search.
pub const MAX_SUBDIVISION_DEPTH: u32 = 30;

/// Upper bound on the segment pairs examined by one search.
const MAX_CANDIDATE_PAIRS: usize = 1 << 16;

/// How far outside a piece a chord crossing may fall and still count.
const CHORD_SLACK: f64 = 1e-6;

/// Which normal of the base curve the offset follows, relative to the
/// direction of increasing parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSide {
    Left,
    Right,
}

impl OffsetSide {
    /// `1` for the left normal, `-1` for the right one.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

/// The locus of points `radius` away from a cubic curve, over part of its
/// parameter range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterCurveSegment {
    curve: CubicBezier,
    side: OffsetSide,
    radius: f64,
    tolerance: f64,
    max_depth: u32,
    domain: CurveDomain,
}

impl CenterCurveSegment {
    /// Creates the offset locus of `curve` over `[t0, t1]`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` if the curve collapses to a point,
    /// so no normal exists.
    pub fn new(
        curve: CubicBezier,
        side: OffsetSide,
        radius: f64,
        tolerance: f64,
        t0: f64,
        t1: f64,
    ) -> Result<Self, GeometryError> {
        curve.tangent(0.0)?;
        curve.tangent(1.0)?;
        Ok(Self {
            curve,
            side,
            radius,
            tolerance,
            max_depth: MAX_SUBDIVISION_DEPTH,
            domain: CurveDomain::new(t0, t1),
        })
    }

    /// Sets the subdivision depth bound, capped at [`MAX_SUBDIVISION_DEPTH`].
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth.min(MAX_SUBDIVISION_DEPTH);
        self
    }

    #[must_use]
    pub fn curve(&self) -> &CubicBezier {
        &self.curve
    }

    #[must_use]
    pub fn side(&self) -> OffsetSide {
        self.side
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Unit normal of the base curve at `t`, on this locus' side.
    fn normal(&self, t: f64) -> Option<Vector2> {
        let tangent = self.curve.tangent(t).ok()?;
        Some(left_normal(&tangent) * self.side.sign())
    }

    /// Returns the point `radius` away from the base curve at `t`, along its
    /// normal. `t` is a parameter of the base curve.
    #[must_use]
    pub fn calculate_center_point(&self, t: f64) -> Point2 {
        let base = self.curve.evaluate(t);
        match self.normal(t) {
            Some(n) => base + n * self.radius,
            None => base,
        }
    }

    /// Locus point at the start of the parameter range.
    #[must_use]
    pub fn p_start(&self) -> Point2 {
        self.calculate_center_point(self.domain.t_min)
    }

    /// Locus point at the end of the parameter range.
    #[must_use]
    pub fn p_end(&self) -> Point2 {
        self.calculate_center_point(self.domain.t_max)
    }

    /// Splits the parameter range in half.
    #[must_use]
    pub fn split(&self) -> (Self, Self) {
        let (lo, hi) = self.domain.halves();
        (
            Self { domain: lo, ..*self },
            Self { domain: hi, ..*self },
        )
    }
}

impl Curve for CenterCurveSegment {
    fn evaluate(&self, t: f64) -> Point2 {
        self.calculate_center_point(t)
    }

    /// Offset curves run parallel to their base curve.
    fn tangent(&self, t: f64) -> Result<Vector2, GeometryError> {
        self.curve.tangent(t)
    }

    fn domain(&self) -> CurveDomain {
        self.domain
    }
}

/// Where two offset loci meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterIntersection {
    /// The common center point.
    pub point: Point2,
    /// Base-curve parameter on the first segment.
    pub t_a: f64,
    /// Base-curve parameter on the second segment.
    pub t_b: f64,
}

/// Orthonormal frame whose first axis is the search direction.
#[derive(Debug, Clone, Copy)]
struct SearchFrame {
    along: Vector2,
    across: Vector2,
}

impl SearchFrame {
    /// Uses the sum of both offset normals at the segment starts.
    fn new(a: &CenterCurveSegment, b: &CenterCurveSegment) -> Option<Self> {
        let na = a.normal(a.domain.t_min)?;
        let nb = b.normal(b.domain.t_min)?;
        let along = normalize(&(na + nb)).ok()?;
        Some(Self {
            along,
            across: left_normal(&along),
        })
    }

    fn project(&self, p: &Point2) -> (f64, f64) {
        (p.coords.dot(&self.along), p.coords.dot(&self.across))
    }
}

/// Bounds of a curve piece in a [`SearchFrame`].
#[derive(Debug, Clone, Copy)]
struct SearchBounds {
    along: (f64, f64),
    across: (f64, f64),
}

impl SearchBounds {
    /// Bounds from five samples, widened by the curvature the samples show.
    ///
    /// The projections of the end points are the search values; the interior
    /// samples and the slack cover pieces whose projection is not monotone.
    fn of<C: Curve>(piece: &C, frame: &SearchFrame) -> Self {
        let domain = piece.domain();
        let samples = [0.0, 0.25, 0.5, 0.75, 1.0].map(|u| piece.evaluate(domain.lerp(u)));

        let slack = samples
            .windows(3)
            .map(|w| ((w[0] - w[1]) + (w[2] - w[1])).norm())
            .fold(0.0_f64, f64::max)
            / 4.0;

        let mut along = (f64::INFINITY, f64::NEG_INFINITY);
        let mut across = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &samples {
            let (s, q) = frame.project(p);
            along = (along.0.min(s), along.1.max(s));
            across = (across.0.min(q), across.1.max(q));
        }
        Self {
            along: (along.0 - slack, along.1 + slack),
            across: (across.0 - slack, across.1 + slack),
        }
    }

    fn overlaps(&self, other: &Self, eps: f64) -> bool {
        let hit = |a: (f64, f64), b: (f64, f64)| a.0 <= b.1 + eps && b.0 <= a.1 + eps;
        hit(self.along, other.along) && hit(self.across, other.across)
    }

    fn width(&self) -> f64 {
        (self.along.1 - self.along.0).max(self.across.1 - self.across.0)
    }
}

/// Finds the point where the offset loci `a` and `b` cross.
///
/// Pairs of sub-segments are kept on a worklist together with their
/// subdivision depth. A pair is dropped as soon as its bounds stop
/// overlapping, and accepted once both pieces are narrower than the
/// tolerance. Pieces nearer the start of their ranges are examined first, so
/// the crossing closest to the shared corner wins.
///
/// Returns `None` when the loci do not meet within the ranges, when the
/// search direction is undefined, or when the depth bound is reached first.
#[must_use]
pub fn intersect_center_curve_segments(
    a: &CenterCurveSegment,
    b: &CenterCurveSegment,
) -> Option<CenterIntersection> {
    let frame = SearchFrame::new(a, b)?;
    let tolerance = a.tolerance.min(b.tolerance);
    let max_depth = a.max_depth.min(b.max_depth);

    let mut worklist = vec![(*a, *b, 0_u32)];
    let mut examined = 0_usize;

    while let Some((seg_a, seg_b, depth)) = worklist.pop() {
        examined += 1;
        if examined > MAX_CANDIDATE_PAIRS {
            debug!(examined, "center curve search ran out of candidates");
            return None;
        }

        let bounds_a = SearchBounds::of(&seg_a, &frame);
        let bounds_b = SearchBounds::of(&seg_b, &frame);
        if !bounds_a.overlaps(&bounds_b, tolerance) {
            continue;
        }

        let narrow_a = bounds_a.width() <= tolerance;
        let narrow_b = bounds_b.width() <= tolerance;
        if narrow_a && narrow_b {
            if let Some(hit) = resolve(&seg_a, &seg_b, tolerance) {
                return Some(hit);
            }
            continue;
        }
        if depth >= max_depth {
            continue;
        }

        let parts_a = halves_unless(narrow_a, &seg_a);
        let parts_b = halves_unless(narrow_b, &seg_b);
        for pa in parts_a.iter().rev() {
            for pb in parts_b.iter().rev() {
                worklist.push((*pa, *pb, depth + 1));
            }
        }
    }

    debug!(max_depth, "center curves do not intersect");
    None
}

fn halves_unless(narrow: bool, seg: &CenterCurveSegment) -> Vec<CenterCurveSegment> {
    if narrow {
        vec![*seg]
    } else {
        let (lo, hi) = seg.split();
        vec![lo, hi]
    }
}

/// Intersects the chords of two narrow pieces and maps the result back onto
/// both loci. Rejects the pair if the chords cross outside the pieces or the
/// two loci points disagree.
fn resolve(
    a: &CenterCurveSegment,
    b: &CenterCurveSegment,
    tolerance: f64,
) -> Option<CenterIntersection> {
    let (a0, a1) = (a.p_start(), a.p_end());
    let (b0, b1) = (b.p_start(), b.p_end());
    let da = a1 - a0;
    let db = b1 - b0;
    let w = b0 - a0;

    let denom = cross_2d(&da, &db);
    let (u, v) = if denom.abs() > TOLERANCE {
        (cross_2d(&w, &db) / denom, cross_2d(&w, &da) / denom)
    } else {
        (0.5, 0.5)
    };
    let inside = |s: f64| (-CHORD_SLACK..=1.0 + CHORD_SLACK).contains(&s);
    if !inside(u) || !inside(v) {
        return None;
    }

    let t_a = a.domain.lerp(u.clamp(0.0, 1.0));
    let t_b = b.domain.lerp(v.clamp(0.0, 1.0));
    let pa = a.calculate_center_point(t_a);
    let pb = b.calculate_center_point(t_b);
    if (pa - pb).norm() > tolerance {
        return None;
    }
    Some(CenterIntersection {
        point: nalgebra::center(&pa, &pb),
        t_a,
        t_b,
    })
}
