/// Rounding of many corners across a set of subpaths.
///
/// Corners are processed in ascending `(subpath, knot)` order. Every rounded
/// corner shifts the later knots of its subpath, so the driver carries a
/// per-subpath insertion offset from one corner to the next.
use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::error::{BatchError, CornerError, ReasonCode, Result};
use crate::geometry::Subpath;

use super::corner::{FilletMode, FilletParams, RoundCorner};

/// Original position of a corner: subpath index and knot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexRef {
    pub subpath: usize,
    pub knot: usize,
}

impl VertexRef {
    #[must_use]
    pub fn new(subpath: usize, knot: usize) -> Self {
        Self { subpath, knot }
    }
}

/// Why a corner was left as is.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub vertex: VertexRef,
    pub code: ReasonCode,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "corner {}:{} skipped ({:?}): {}",
            self.vertex.subpath, self.vertex.knot, self.code, self.message
        )
    }
}

/// Result of one call to [`round_corner`].
#[derive(Debug, Clone)]
pub struct CornerOutcome {
    /// The subpath after the call; unchanged when the corner was skipped.
    pub subpath: Subpath,
    /// Knots added by this corner.
    pub inserted_delta: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Rounds one corner named by its original knot index.
///
/// `inserted_offset` is the number of knots earlier corners of the same
/// subpath have added. The sign of `radius` is ignored and a zero radius
/// leaves the subpath alone. Failures never escape: they come back as
/// diagnostics with the subpath unchanged.
#[must_use]
pub fn round_corner(
    subpath: &Subpath,
    vertex: VertexRef,
    radius: f64,
    cut: bool,
    inserted_offset: usize,
    params: &FilletParams,
) -> CornerOutcome {
    let unchanged = |diagnostics| CornerOutcome {
        subpath: subpath.clone(),
        inserted_delta: 0,
        diagnostics,
    };

    if !radius.is_finite() {
        let err = CornerError::InvalidInput(format!("radius must be finite, got {radius}"));
        return unchanged(vec![skipped(vertex, err.code(), err.to_string())]);
    }
    let radius = radius.abs();
    if radius <= 0.0 {
        return unchanged(Vec::new());
    }

    let index = vertex.knot + inserted_offset;
    match RoundCorner::new(subpath, index, radius, FilletMode::from_cut(cut))
        .with_params(*params)
        .execute()
    {
        Ok(rounded) => CornerOutcome {
            subpath: rounded.subpath,
            inserted_delta: rounded.inserted,
            diagnostics: Vec::new(),
        },
        Err(e) => {
            let code = e.reason().unwrap_or(ReasonCode::Computation);
            unchanged(vec![skipped(vertex, code, e.to_string())])
        }
    }
}

fn skipped(vertex: VertexRef, code: ReasonCode, message: String) -> Diagnostic {
    let diagnostic = Diagnostic {
        vertex,
        code,
        message,
    };
    if code == ReasonCode::Computation {
        warn!(%diagnostic, "internal error while rounding corner");
    } else {
        warn!(
            subpath = vertex.subpath,
            knot = vertex.knot,
            code = ?code,
            "{}",
            diagnostic.message
        );
    }
    diagnostic
}

/// Knots inserted so far, per subpath.
#[derive(Debug, Clone, Default)]
pub struct InsertionOffsets {
    offsets: HashMap<usize, usize>,
}

impl InsertionOffsets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the offset to add to original knot indices of `subpath`.
    #[must_use]
    pub fn get(&self, subpath: usize) -> usize {
        self.offsets.get(&subpath).copied().unwrap_or(0)
    }

    /// Records `delta` more knots in `subpath`.
    pub fn record(&mut self, subpath: usize, delta: usize) {
        *self.offsets.entry(subpath).or_insert(0) += delta;
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Number of corners that were rounded.
    pub rounded: usize,
    /// One entry per skipped corner.
    pub diagnostics: Vec<Diagnostic>,
}

/// Rounds a selection of corners in place.
#[derive(Debug, Clone)]
pub struct RoundCorners {
    radius: f64,
    mode: FilletMode,
    params: FilletParams,
}

impl RoundCorners {
    /// Creates a batch with the given radius and mode.
    #[must_use]
    pub fn new(radius: f64, mode: FilletMode) -> Self {
        Self {
            radius,
            mode,
            params: FilletParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: FilletParams) -> Self {
        self.params = params;
        self
    }

    /// Rounds every corner in `vertices`, replacing the affected subpaths.
    ///
    /// Vertex indices refer to the subpaths as they were before the call.
    /// The seam duplicate of a closed subpath names the same corner as its
    /// first knot, and repeated vertices are rounded once.
    ///
    /// # Errors
    ///
    /// Returns `BatchError::NoVertices` if `vertices` is empty. Corners that
    /// cannot be rounded are reported in [`BatchReport::diagnostics`].
    pub fn execute(&self, subpaths: &mut [Subpath], vertices: &[VertexRef]) -> Result<BatchReport> {
        if vertices.is_empty() {
            return Err(BatchError::NoVertices.into());
        }

        let mut order: Vec<VertexRef> = vertices
            .iter()
            .map(|v| match subpaths.get(v.subpath) {
                Some(sp) if sp.is_closed() && v.knot + 1 == sp.len() => {
                    VertexRef::new(v.subpath, 0)
                }
                _ => *v,
            })
            .collect();
        order.sort_unstable();
        order.dedup();

        let cut = self.mode == FilletMode::Cut;
        let mut offsets = InsertionOffsets::new();
        let mut report = BatchReport::default();
        let count = subpaths.len();

        for vertex in order {
            let Some(subpath) = subpaths.get_mut(vertex.subpath) else {
                let err = CornerError::InvalidInput(format!(
                    "subpath index {} out of range for {count} subpaths",
                    vertex.subpath
                ));
                report
                    .diagnostics
                    .push(skipped(vertex, err.code(), err.to_string()));
                continue;
            };

            let outcome = round_corner(
                subpath,
                vertex,
                self.radius,
                cut,
                offsets.get(vertex.subpath),
                &self.params,
            );
            if outcome.inserted_delta > 0 {
                report.rounded += 1;
                offsets.record(vertex.subpath, outcome.inserted_delta);
                *subpath = outcome.subpath;
            }
            report.diagnostics.extend(outcome.diagnostics);
        }

        debug!(
            selected = vertices.len(),
            rounded = report.rounded,
            skipped = report.diagnostics.len(),
            "rounded corners"
        );
        Ok(report)
    }
}
