use crate::geometry::{Knot, Subpath};

use super::{Fillet, SuperNode};

/// Builds a new subpath with the corner knot of `node` replaced by the
/// fillet's knots, returning it with the number of knots added.
///
/// Neighbors whose segment was cut get the fillet's replacement handles.
/// When the corner is the seam of a closed subpath the replacement opens the
/// subpath and its first knot is duplicated at the end to close it again.
#[must_use]
pub fn splice(subpath: &Subpath, node: &SuperNode, fillet: &Fillet) -> (Subpath, usize) {
    let mut src = subpath.knots.clone();
    if let Some(handle) = fillet.prev_handle_out {
        src[node.prev.index].handle_out = handle;
    }
    if let Some(handle) = fillet.next_handle_in {
        src[node.next.index].handle_in = handle;
    }

    let index = node.index;
    let seam = index == 0 && subpath.is_closed();
    let knots: Vec<Knot> = if seam {
        let last = src.len() - 1;
        fillet
            .knots
            .iter()
            .chain(&src[1..last])
            .chain(fillet.knots.first())
            .copied()
            .collect()
    } else {
        src[..index]
            .iter()
            .chain(&fillet.knots)
            .chain(&src[index + 1..])
            .copied()
            .collect()
    };

    (Subpath::new(knots), fillet.inserted())
}
