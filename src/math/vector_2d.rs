use super::{Point2, Vector2, TOLERANCE};
use crate::error::GeometryError;

/// Returns the unsigned angle between `a` and `b`, in `[0, π]`.
///
/// The cosine is clamped to `[-1, 1]` before `acos` so round-off cannot
/// push it out of the function's domain. Returns `0` if either vector is zero.
#[must_use]
pub fn angle_between(a: &Vector2, b: &Vector2) -> f64 {
    let denom = a.norm() * b.norm();
    if denom < TOLERANCE {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Scalar 2D cross product `a.x * b.y - a.y * b.x`.
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Returns the left-pointing normal `(-v.y, v.x)`.
#[must_use]
pub fn left_normal(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// Returns `v` scaled to unit length.
///
/// # Errors
///
/// Returns `GeometryError::ZeroVector` if `v` is shorter than [`TOLERANCE`].
pub fn normalize(v: &Vector2) -> Result<Vector2, GeometryError> {
    let len = v.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector);
    }
    Ok(v / len)
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// Returns `true` if the two points coincide within [`TOLERANCE`].
#[must_use]
pub fn coincident(a: &Point2, b: &Point2) -> bool {
    distance(a, b) < TOLERANCE
}
