//! Fitzpatrick et al. (2019) tabulated curve.
//!
//! `E(x-V)/E(B-V)` is tabulated at 102 wavenumbers as `k(x) = k₃.₀₂(x) +
//! s(x)·(R(V) - 3.10)·0.99`, then interpolated linearly or with a natural cubic
//! spline.
use once_cell::sync::Lazy;

use crate::constants::{inverse_microns, Angstrom, InvMicron, Magnitude};
use crate::mwdust_errors::MwDustError;
use crate::spline::{SplineCurve, SplineMode};

const N_KNOTS: usize = 102;

/// Knot positions in inverse microns.
static FITZ19_X: [InvMicron; N_KNOTS] = [
    0.000, 0.455, 0.606, 0.800, 1.000, 1.100, 1.200, 1.250, 1.300, 1.350, 1.400, 1.450, 1.500,
    1.550, 1.600, 1.650, 1.700, 1.750, 1.800, 1.818, 1.850, 1.900, 1.950, 2.000, 2.050, 2.100,
    2.150, 2.200, 2.250, 2.273, 2.300, 2.350, 2.400, 2.450, 2.500, 2.550, 2.600, 2.650, 2.700,
    2.750, 2.800, 2.850, 2.900, 2.950, 3.000, 3.100, 3.200, 3.300, 3.400, 3.500, 3.600, 3.700,
    3.800, 3.900, 4.000, 4.100, 4.200, 4.300, 4.400, 4.500, 4.600, 4.700, 4.800, 4.900, 5.000,
    5.100, 5.200, 5.300, 5.400, 5.500, 5.600, 5.700, 5.800, 5.900, 6.000, 6.100, 6.200, 6.300,
    6.400, 6.500, 6.600, 6.700, 6.800, 6.900, 7.000, 7.100, 7.200, 7.300, 7.400, 7.500, 7.600,
    7.700, 7.800, 7.900, 8.000, 8.100, 8.200, 8.300, 8.400, 8.500, 8.600, 8.700,
];

/// `k(x)` at R(5500) = 3.02.
static FITZ19_K302: [f64; N_KNOTS] = [
    -3.020, -2.747, -2.528, -2.222, -1.757, -1.567, -1.300, -1.216, -1.070, -0.973, -0.868,
    -0.750, -0.629, -0.509, -0.407, -0.320, -0.221, -0.133, -0.048, 0.000, 0.071, 0.188, 0.319,
    0.438, 0.575, 0.665, 0.744, 0.838, 0.951, 1.000, 1.044, 1.113, 1.181, 1.269, 1.346, 1.405,
    1.476, 1.558, 1.632, 1.723, 1.791, 1.869, 1.948, 2.009, 2.090, 2.253, 2.408, 2.565, 2.746,
    2.933, 3.124, 3.328, 3.550, 3.815, 4.139, 4.534, 5.012, 5.560, 6.118, 6.565, 6.767, 6.681,
    6.394, 6.038, 5.704, 5.432, 5.226, 5.078, 4.978, 4.913, 4.877, 4.862, 4.864, 4.879, 4.904,
    4.938, 4.982, 5.038, 5.105, 5.181, 5.266, 5.359, 5.460, 5.569, 5.684, 5.805, 5.933, 6.067,
    6.207, 6.352, 6.502, 6.657, 6.817, 6.981, 7.150, 7.323, 7.500, 7.681, 7.866, 8.054, 8.246,
    8.441,
];

/// R(V) slope `s(x)`.
static FITZ19_S: [f64; N_KNOTS] = [
    -1.000, -0.842, -0.728, -0.531, -0.360, -0.284, -0.223, -0.198, -0.173, -0.150, -0.130,
    -0.110, -0.096, -0.081, -0.063, -0.048, -0.032, -0.017, -0.005, 0.000, 0.007, 0.013, 0.012,
    0.010, 0.004, 0.003, 0.000, 0.002, 0.001, 0.000, -0.000, 0.001, 0.001, -0.002, 0.000,
    -0.002, -0.002, -0.006, -0.009, -0.011, -0.017, -0.025, -0.029, -0.037, -0.043, -0.064,
    -0.092, -0.122, -0.161, -0.201, -0.249, -0.303, -0.366, -0.437, -0.517, -0.603, -0.692,
    -0.774, -0.843, -0.888, -0.908, -0.903, -0.880, -0.849, -0.816, -0.785, -0.760, -0.741,
    -0.729, -0.722, -0.722, -0.726, -0.734, -0.745, -0.760, -0.778, -0.798, -0.820, -0.845,
    -0.870, -0.898, -0.926, -0.956, -0.988, -1.020, -1.053, -1.087, -1.122, -1.158, -1.195,
    -1.232, -1.270, -1.309, -1.349, -1.389, -1.429, -1.471, -1.513, -1.555, -1.598, -1.641,
    -1.685,
];

/// Curve at the reference R(V) = 3.10, where the slope term vanishes.
static FITZ19_REFERENCE: Lazy<Option<SplineCurve>> = Lazy::new(|| table(3.10).ok());

fn table(rv: f64) -> Result<SplineCurve, MwDustError> {
    let values = FITZ19_K302
        .iter()
        .zip(FITZ19_S.iter())
        .map(|(k, s)| k + s * (rv - 3.10) * 0.99)
        .collect();
    SplineCurve::new(FITZ19_X.to_vec(), values)
}

/// Fitzpatrick 2019 extinction in magnitudes; the domain is checked by the caller.
pub(super) fn fitz19(
    rv: f64,
    av: Magnitude,
    wave: Angstrom,
    mode: SplineMode,
) -> Result<Magnitude, MwDustError> {
    let x = inverse_microns(wave);
    let reference = if rv == 3.10 {
        (*FITZ19_REFERENCE).as_ref()
    } else {
        None
    };
    let k = match reference {
        Some(curve) => curve.eval(x, mode)?,
        None => table(rv)?.eval(x, mode)?,
    };
    Ok(av * (1.0 + k / rv))
}
