use thiserror::Error;

/// Top-level error type for corner rounding.
#[derive(Debug, Error)]
pub enum FilletError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Corner(#[from] CornerError),

    #[error(transparent)]
    Batch(#[from] BatchError),
}

impl FilletError {
    /// Returns the diagnostic code for errors that only skip a single corner.
    ///
    /// Batch-level errors have no code: they abort the run instead.
    #[must_use]
    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            Self::Geometry(_) => Some(ReasonCode::Computation),
            Self::Corner(e) => Some(e.code()),
            Self::Batch(_) => None,
        }
    }
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("negative trim distance {trim}")]
    NegativeTrim { trim: f64 },
}

/// Side of a corner, seen from the corner anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerSide {
    Prev,
    Next,
}

impl std::fmt::Display for CornerSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prev => f.write_str("previous"),
            Self::Next => f.write_str("next"),
        }
    }
}

/// Reasons a single corner cannot be rounded. The corner is left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CornerError {
    #[error("{side} neighbor is {distance} away, closer than radius {radius}")]
    NeighborTooClose {
        side: CornerSide,
        distance: f64,
        radius: f64,
    },

    #[error("{side} handle is {length} long, shorter than radius {radius}")]
    HandleTooShort {
        side: CornerSide,
        length: f64,
        radius: f64,
    },

    #[error("corner angle {alpha} rad has no visible rounding")]
    DegenerateAngle { alpha: f64 },

    #[error("trim distance {trim} exceeds the limit {limit}")]
    ExcessiveTrim { trim: f64, limit: f64 },

    #[error("offset curves of the adjacent segments do not intersect")]
    NoOffsetIntersection,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CornerError {
    /// Returns the machine-readable code of this error.
    #[must_use]
    pub fn code(&self) -> ReasonCode {
        match self {
            Self::NeighborTooClose { .. } => ReasonCode::NeighborTooClose,
            Self::HandleTooShort { .. } => ReasonCode::HandleTooShort,
            Self::DegenerateAngle { .. } => ReasonCode::DegenerateAngle,
            Self::ExcessiveTrim { .. } => ReasonCode::ExcessiveTrim,
            Self::NoOffsetIntersection => ReasonCode::NoOffsetIntersection,
            Self::InvalidInput(_) => ReasonCode::InvalidInput,
        }
    }
}

/// Errors that abort a whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("no vertices selected to round")]
    NoVertices,
}

/// Machine-distinguishable reason attached to a skipped corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonCode {
    NeighborTooClose,
    HandleTooShort,
    DegenerateAngle,
    ExcessiveTrim,
    NoOffsetIntersection,
    InvalidInput,
    /// An internal invariant did not hold.
    Computation,
}

/// Convenience type alias for results using [`FilletError`].
pub type Result<T> = std::result::Result<T, FilletError>;
