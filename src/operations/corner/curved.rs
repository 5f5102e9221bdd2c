use crate::error::{CornerError, Result};
use crate::geometry::Curve;
use crate::math::arc_2d::arc_midpoint;
use crate::math::vector_2d::{cross_2d, distance};
use crate::math::{Point2, TOLERANCE};

use super::center_curve::{intersect_center_curve_segments, CenterCurveSegment, OffsetSide};
use super::{CornerNeighbor, Fillet, FilletMode, FilletParams, SuperNode, TrimmedSides};

/// Rounds a corner where at least one adjoining segment is curved.
///
/// Each side's curve starts at the corner. The fillet center is where the
/// two offset loci, taken on the inner side of the corner, cross; the trim
/// points are the feet of that center on the two curves.
pub(super) fn solve(
    node: &SuperNode,
    radius: f64,
    mode: FilletMode,
    params: &FilletParams,
) -> Result<Fillet> {
    node.check_angle(params.angle_epsilon)?;

    let prev_curve = node.prev.curve;
    let next_curve = node.next.curve;
    let turn = cross_2d(&prev_curve.tangent(0.0)?, &next_curve.tangent(0.0)?);
    if turn.abs() < TOLERANCE {
        return Err(CornerError::DegenerateAngle { alpha: node.alpha }.into());
    }
    // The left normal of one tangent points toward the other when they turn left.
    let (prev_side, next_side) = if turn > 0.0 {
        (OffsetSide::Left, OffsetSide::Right)
    } else {
        (OffsetSide::Right, OffsetSide::Left)
    };

    let locus = |curve, side| {
        CenterCurveSegment::new(curve, side, radius, params.center_tolerance, 0.0, 1.0)
            .map(|seg| seg.with_max_depth(params.max_depth))
    };
    let prev_locus = locus(prev_curve, prev_side)?;
    let next_locus = locus(next_curve, next_side)?;

    let hit = intersect_center_curve_segments(&prev_locus, &next_locus)
        .ok_or(CornerError::NoOffsetIntersection)?;

    let trim_prev = prev_curve.evaluate(hit.t_a);
    let trim_next = next_curve.evaluate(hit.t_b);
    check_trim(node, &node.prev, &trim_prev, params)?;
    check_trim(node, &node.next, &trim_next, params)?;

    // The parts that stay run from each trim point out to the neighbor.
    let kept_prev = prev_curve.sub_segment(hit.t_a, 1.0);
    let kept_next = next_curve.sub_segment(hit.t_b, 1.0);
    let sides = TrimmedSides {
        trim_prev,
        trim_next,
        prev_inner: Some(kept_prev.ctrl1),
        next_inner: Some(kept_next.ctrl1),
        prev_handle_out: Some(kept_prev.ctrl2),
        next_handle_in: Some(kept_next.ctrl2),
    };

    match mode {
        FilletMode::Cut => Ok(Fillet::cut(sides)),
        FilletMode::Arc => {
            let mid = arc_midpoint(&hit.point, &trim_prev, &trim_next, radius)?;
            Fillet::arc(sides, hit.point, mid)
        }
    }
}

fn check_trim(
    node: &SuperNode,
    side: &CornerNeighbor,
    trim_pt: &Point2,
    params: &FilletParams,
) -> std::result::Result<(), CornerError> {
    let trim = distance(&node.anchor, trim_pt);
    let limit = params.max_trim_factor * side.dist;
    if trim > limit {
        return Err(CornerError::ExcessiveTrim { trim, limit });
    }
    Ok(())
}
