use super::CurveError;

/// Polynomial through `N` control points, evaluated with Lagrange basis terms.
///
/// `f(x) = Σ yᵢ · Lᵢ(x)` where `Lᵢ(x) = Π_{j≠i} (x − xⱼ) / (xᵢ − xⱼ)`.
///
/// The denominators only depend on the control points, so they are computed
/// once at construction; each evaluation recomputes the numerators. The curve
/// is immutable and `Copy`, so it can be shared freely across threads.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LagrangeCurve<const N: usize> {
    xs: [f32; N],
    ys: [f32; N],
    denominators: [f32; N],
}

/// Degree-2 curve through three points.
pub type Quadratic = LagrangeCurve<3>;

/// Degree-3 curve through four points.
pub type Cubic = LagrangeCurve<4>;

impl<const N: usize> LagrangeCurve<N> {
    /// Builds the curve through `points`.
    ///
    /// Fails when a coordinate is not finite or when two points share an x
    /// value. No evaluator is produced for such input, so evaluation never
    /// yields NaN or infinity from a zero denominator.
    pub fn new(points: [(f32, f32); N]) -> Result<Self, CurveError> {
        for (index, &(x, y)) in points.iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(CurveError::NonFinite { index });
            }
        }

        for first in 0..N {
            for second in (first + 1)..N {
                if points[first].0 == points[second].0 {
                    return Err(CurveError::DuplicateX {
                        first,
                        second,
                        x: points[first].0,
                    });
                }
            }
        }

        let xs = points.map(|(x, _)| x);
        let ys = points.map(|(_, y)| y);
        let denominators: [f32; N] = std::array::from_fn(|i| basis_product(&xs, i, xs[i]));

        if let Some(index) = denominators
            .iter()
            .position(|d| *d == 0.0 || !d.is_finite())
        {
            return Err(CurveError::IllConditioned { index });
        }

        Ok(Self {
            xs,
            ys,
            denominators,
        })
    }

    /// Evaluates the curve at `x`.
    pub fn eval(&self, x: f32) -> f32 {
        (0..N)
            .map(|i| self.ys[i] * basis_product(&self.xs, i, x) / self.denominators[i])
            .sum()
    }

    /// Returns the control points in construction order.
    pub fn samples(&self) -> [(f32, f32); N] {
        std::array::from_fn(|i| (self.xs[i], self.ys[i]))
    }

    /// Returns the curve as a plain closure.
    pub fn as_fn(self) -> impl Fn(f32) -> f32 + Copy + Send + Sync {
        move |x| self.eval(x)
    }
}

/// `Π_{j≠skip} (x − xⱼ)`.
fn basis_product<const N: usize>(xs: &[f32; N], skip: usize, x: f32) -> f32 {
    xs.iter()
        .enumerate()
        .filter(|&(j, _)| j != skip)
        .map(|(_, &xj)| x - xj)
        .product()
}

/// Returns an evaluator for the parabola through three points.
pub fn interpolate3(
    p1: (f32, f32),
    p2: (f32, f32),
    p3: (f32, f32),
) -> Result<impl Fn(f32) -> f32 + Copy + Send + Sync, CurveError> {
    Ok(Quadratic::new([p1, p2, p3])?.as_fn())
}

/// Returns an evaluator for the cubic through four points.
pub fn interpolate4(
    p1: (f32, f32),
    p2: (f32, f32),
    p3: (f32, f32),
    p4: (f32, f32),
) -> Result<impl Fn(f32) -> f32 + Copy + Send + Sync, CurveError> {
    Ok(Cubic::new([p1, p2, p3, p4])?.as_fn())
}
