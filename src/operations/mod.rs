pub mod batch;
pub mod corner;

pub use batch::{
    round_corner, BatchReport, CornerOutcome, Diagnostic, InsertionOffsets, RoundCorners,
    VertexRef,
};
pub use corner::{
    Fillet, FilletArc, FilletMode, FilletParams, RoundCorner, RoundedCorner, DEFAULT_RADIUS,
};
