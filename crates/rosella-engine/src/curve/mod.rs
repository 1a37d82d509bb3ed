//! Curve helpers.
//!
//! Small, allocation-free polynomial evaluators used to derive smooth values
//! (fades, pulses, easing) from a handful of control points.

mod error;
mod lagrange;

pub use error::CurveError;
pub use lagrange::{interpolate3, interpolate4, Cubic, LagrangeCurve, Quadratic};
