pub mod curve;
pub mod subpath;

pub use curve::{CubicBezier, Curve, CurveDomain};
pub use subpath::{Knot, Subpath};
