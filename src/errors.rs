//! Construction and boolean-operation errors

use crate::float_types::Real;

/// All the ways building or combining solids can fail.
///
/// The first group describes bad caller data and is reported before any tree is
/// built; [`CsgError::NumericalFailure`] means the inputs looked fine but the
/// BSP pass produced non-finite geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CsgError {
    /// (TooFewPoints) A polygon or outline has fewer than 3 points
    #[error("(TooFewPoints) expected at least 3 points, got {count}")]
    TooFewPoints { count: usize },

    /// (DegeneratePlane) The points are collinear or coincident and span no plane
    #[error("(DegeneratePlane) vertices do not define a plane")]
    DegeneratePlane,

    /// (DegenerateAxis) A direction derived from two points has zero length
    #[error("(DegenerateAxis) {what} has zero length ({length})")]
    DegenerateAxis { what: &'static str, length: Real },

    /// (NonFiniteGeometry) An operand holds NaN or infinite coordinates
    #[error("(NonFiniteGeometry) {operation} rejected: {bad} of {polygons} polygons are not finite")]
    NonFiniteGeometry {
        operation: &'static str,
        bad: usize,
        polygons: usize,
    },

    /// (NumericalFailure) The boolean pass produced NaN or infinite coordinates
    #[error(
        "(NumericalFailure) {operation} failed for polygons: {left_polygons} and {right_polygons}"
    )]
    NumericalFailure {
        operation: &'static str,
        left_polygons: usize,
        right_polygons: usize,
    },

    /// (IndexOutOfRange) A triangle index points past the vertex list
    #[error("(IndexOutOfRange) face index {index} is out of range (vertices.len = {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// (InvalidIndexCount) The index list is not a whole number of triangles
    #[error("(InvalidIndexCount) index count {count} is not a multiple of 3")]
    InvalidIndexCount { count: usize },
}

impl CsgError {
    /// `true` if the error stems from the caller's data rather than from
    /// numerical breakdown inside a boolean operation.
    pub const fn is_degenerate_input(&self) -> bool {
        !matches!(self, CsgError::NumericalFailure { .. })
    }
}
