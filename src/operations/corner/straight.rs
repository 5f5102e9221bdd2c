use crate::error::{CornerError, GeometryError, Result};
use crate::math::arc_2d::arc_center_midpoint;
use crate::math::vector_2d::normalize;
use crate::math::Point2;

use super::{CornerNeighbor, Fillet, FilletMode, FilletParams, SuperNode, TrimmedSides};

/// Rounds a corner whose adjoining segments are both straight.
///
/// The trim distance follows from the corner angle alone, so the trim points,
/// arc center and arc midpoint are all found in closed form.
pub(super) fn solve(
    node: &SuperNode,
    radius: f64,
    mode: FilletMode,
    params: &FilletParams,
) -> Result<Fillet> {
    node.check_angle(params.angle_epsilon)?;

    let trim = node.trim(radius);
    if trim.is_nan() || trim < 0.0 {
        return Err(GeometryError::NegativeTrim { trim }.into());
    }
    let limit = params.max_trim_factor * node.prev.hlen.min(node.next.hlen);
    if trim > limit {
        return Err(CornerError::ExcessiveTrim { trim, limit }.into());
    }

    let trim_prev = node.anchor + normalize(&node.prev.handle)? * trim;
    let trim_next = node.anchor + normalize(&node.next.handle)? * trim;
    let sides = TrimmedSides::straight(
        trim_prev,
        trim_next,
        pulled_back_handle(node, &node.prev, &trim_prev, trim),
        pulled_back_handle(node, &node.next, &trim_next, trim),
    );

    match mode {
        FilletMode::Cut => Ok(Fillet::cut(sides)),
        FilletMode::Arc => {
            let (center, mid) =
                arc_center_midpoint(&node.anchor, &trim_prev, &trim_next, trim, radius)?;
            Fillet::arc(sides, center, mid)
        }
    }
}

/// A neighbor's handle on a straight side may reach past the trim point
/// toward the corner. It is moved onto the trim point so the kept segment
/// ends there instead of doubling back.
fn pulled_back_handle(
    node: &SuperNode,
    side: &CornerNeighbor,
    trim_pt: &Point2,
    trim: f64,
) -> Option<Point2> {
    let along = (trim_pt - node.anchor) / trim;
    let reach = (side.curve.ctrl2 - node.anchor).dot(&along);
    (reach < trim).then_some(*trim_pt)
}
