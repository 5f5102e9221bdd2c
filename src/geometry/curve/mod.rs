mod bezier;

pub use bezier::CubicBezier;

use crate::error::GeometryError;
use crate::math::{Point2, Vector2};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Maps `u` in `[0, 1]` onto this domain.
    #[must_use]
    pub fn lerp(&self, u: f64) -> f64 {
        self.t_min + (self.t_max - self.t_min) * u
    }

    /// Returns the parameter in the middle of the domain.
    #[must_use]
    pub fn mid(&self) -> f64 {
        self.lerp(0.5)
    }

    /// Returns the two halves of this domain.
    #[must_use]
    pub fn halves(&self) -> (Self, Self) {
        let mid = self.mid();
        (Self::new(self.t_min, mid), Self::new(mid, self.t_max))
    }
}

/// Trait for parametric curves in the plane.
pub trait Curve {
    /// Evaluates the curve at parameter `t`.
    fn evaluate(&self, t: f64) -> Point2;

    /// Computes the unit tangent at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    fn tangent(&self, t: f64) -> Result<Vector2, GeometryError>;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;
}
