//! Natural cubic spline through tabulated knots.
//!
//! Used by the Fitzpatrick 99 family of extinction curves and by the
//! Fitzpatrick 19 tabulated curve. The second derivatives are obtained once,
//! when the curve is built, from the tridiagonal system of the natural
//! boundary condition (zero curvature at both ends) solved with the Thomas
//! algorithm (forward elimination, back substitution).
//!
//! Evaluation locates the knot interval by a linear scan, forms the linear
//! blend of its two end values and, in [`SplineMode::Cubic`], adds the cubic
//! correction from the second derivatives.
use crate::mwdust_errors::MwDustError;

/// Interpolation mode between knots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplineMode {
    Linear,
    Cubic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplineCurve {
    knots: Vec<f64>,
    values: Vec<f64>,
    second: Vec<f64>,
}

impl SplineCurve {
    /// Build a natural spline from knot positions and values.
    ///
    /// Arguments
    /// -----------------
    /// * `knots`: Strictly increasing positions, at least two.
    /// * `values`: One value per knot.
    ///
    /// Return
    /// ----------
    /// * The curve, or [`MwDustError::InvalidSpline`] if the knots are not
    ///   strictly increasing or the lengths differ.
    pub fn new(knots: Vec<f64>, values: Vec<f64>) -> Result<Self, MwDustError> {
        if knots.len() != values.len() {
            return Err(MwDustError::InvalidSpline(format!(
                "{} knots for {} values",
                knots.len(),
                values.len()
            )));
        }
        if knots.len() < 2 {
            return Err(MwDustError::InvalidSpline(format!(
                "{} knots, at least 2 are needed",
                knots.len()
            )));
        }
        if let Some(w) = knots.windows(2).find(|w| w[1] <= w[0]) {
            return Err(MwDustError::InvalidSpline(format!(
                "knot {} does not follow {}",
                w[1], w[0]
            )));
        }
        let second = natural_second_derivatives(&knots, &values);
        Ok(SplineCurve {
            knots,
            values,
            second,
        })
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Second derivative at each knot (0 at both ends).
    pub fn second_derivatives(&self) -> &[f64] {
        &self.second
    }

    /// Evaluate the curve at `x`.
    ///
    /// Return
    /// ----------
    /// * [`MwDustError::SplineOutOfBounds`] if `x` lies outside the first and last knots.
    pub fn eval(&self, x: f64, mode: SplineMode) -> Result<f64, MwDustError> {
        let n = self.knots.len();
        let (min, max) = (self.knots[0], self.knots[n - 1]);
        if !(min..=max).contains(&x) {
            return Err(MwDustError::SplineOutOfBounds { x, min, max });
        }

        let q = (0..n - 1)
            .find(|&q| x < self.knots[q + 1])
            .unwrap_or(n - 2);

        let dx = self.knots[q + 1] - self.knots[q];
        let a = (self.knots[q + 1] - x) / dx;
        let b = 1.0 - a;
        let mut y = a * self.values[q] + b * self.values[q + 1];

        if mode == SplineMode::Cubic {
            let c = (a.powi(3) - a) * dx * dx / 6.0;
            let d = (b.powi(3) - b) * dx * dx / 6.0;
            y += c * self.second[q] + d * self.second[q + 1];
        }
        Ok(y)
    }
}

/// Second derivatives of the natural spline through `(x, y)`.
fn natural_second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut d2 = vec![0.0; n];
    if n < 3 {
        return d2;
    }
    let m = n - 2;
    let slope = |i: usize| (y[i + 1] - y[i]) / (x[i + 1] - x[i]);

    // rows j = 0..m, unknown d2[j + 1]
    let diag: Vec<f64> = (0..m).map(|j| (x[j + 2] - x[j]) / 3.0).collect();
    let off: Vec<f64> = (0..m).map(|j| (x[j + 2] - x[j + 1]) / 6.0).collect();
    let rhs: Vec<f64> = (0..m).map(|j| slope(j + 1) - slope(j)).collect();

    let mut c_prime = vec![0.0; m];
    let mut d_prime = vec![0.0; m];
    c_prime[0] = off[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];
    for j in 1..m {
        // sub-diagonal of row j equals the super-diagonal of row j - 1
        let denom = diag[j] - off[j - 1] * c_prime[j - 1];
        c_prime[j] = off[j] / denom;
        d_prime[j] = (rhs[j] - off[j - 1] * d_prime[j - 1]) / denom;
    }

    d2[m] = d_prime[m - 1];
    for j in (0..m - 1).rev() {
        d2[j + 1] = d_prime[j] - c_prime[j] * d2[j + 2];
    }
    d2
}
