/// Rejected control points.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    /// Two samples share an x coordinate; the basis denominator would be zero.
    #[error("control points {first} and {second} share x = {x}")]
    DuplicateX { first: usize, second: usize, x: f32 },

    /// A sample coordinate is NaN or infinite.
    #[error("control point {index} is not finite")]
    NonFinite { index: usize },

    /// The samples are distinct but too close (or too far apart) for `f32`;
    /// the basis denominator underflowed to zero or overflowed.
    #[error("control point {index} produces a degenerate basis denominator")]
    IllConditioned { index: usize },
}
