//! Cardelli, Clayton & Mathis (1989) and its O'Donnell (1994) refinement.
//!
//! The curve is `A(λ)/A(V) = a(x) + b(x)/R(V)` with `x = 1/λ` in inverse
//! microns, split in four ranges: IR power law on `[0.3, 1.1)`, optical
//! polynomials in `y = x - 1.82` on `[1.1, 3.3)`, UV on `[3.3, 8)` with a far-UV
//! curvature term above 5.9, and far-UV cubics on `[8, 10]`. Outside `[0.3, 10]`
//! both `a` and `b` are 0.
use crate::constants::{inverse_microns, Angstrom, InvMicron, Magnitude};

/// Optical coefficients of `a(y)` and `b(y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum OpticalCoefficients {
    Ccm89,
    ODonnell94,
}

const CCM89_A: [f64; 8] = [
    1.0, 0.17699, -0.50447, -0.02427, 0.72085, 0.01979, -0.77530, 0.32999,
];
const CCM89_B: [f64; 8] = [
    0.0, 1.41338, 2.28305, 1.07233, -5.38434, -0.62251, 5.30260, -2.09002,
];

const ODONNELL94_A: [f64; 9] = [
    1.0, 0.104, -0.609, 0.701, 1.137, -1.718, -0.827, 1.647, -0.505,
];
const ODONNELL94_B: [f64; 9] = [
    0.0, 1.952, 2.908, -3.989, -7.985, 11.102, 5.491, -10.805, 3.347,
];

/// Polynomial fit of the F99 / O94 ratio in powers of `λ / 1000 Å`.
const FITZ99_OVER_ODONNELL94: [f64; 11] = [
    8.55929205e-02,
    1.91547833e+00,
    -1.65101945e+00,
    7.50611119e-01,
    -2.00041118e-01,
    3.30155576e-02,
    -3.46344458e-03,
    2.30741420e-04,
    -9.43018242e-06,
    2.14917977e-07,
    -2.08276810e-09,
];

/// Horner evaluation of `Σ c_i t^i`.
fn polynomial(coefficients: &[f64], t: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

/// IR power law `a = 0.574 x^1.61`, `b = -0.527 x^1.61`.
pub(super) fn ir_power_law(x: InvMicron) -> (f64, f64) {
    let xpow = x.powf(1.61);
    (0.574 * xpow, -0.527 * xpow)
}

/// `a(x)` and `b(x)` of the CCM89 family.
pub(super) fn ccm89_ab(x: InvMicron, optical: OpticalCoefficients) -> (f64, f64) {
    if (0.3..1.1).contains(&x) {
        ir_power_law(x)
    } else if (1.1..3.3).contains(&x) {
        let y = x - 1.82;
        match optical {
            OpticalCoefficients::Ccm89 => (polynomial(&CCM89_A, y), polynomial(&CCM89_B, y)),
            OpticalCoefficients::ODonnell94 => {
                (polynomial(&ODONNELL94_A, y), polynomial(&ODONNELL94_B, y))
            }
        }
    } else if (3.3..8.0).contains(&x) {
        let (fa, fb) = if x >= 5.9 {
            let xx = x - 5.9;
            let xx2 = xx * xx;
            let xx3 = xx2 * xx;
            (-0.04473 * xx2 - 0.009779 * xx3, 0.21300 * xx2 + 0.120700 * xx3)
        } else {
            (0.0, 0.0)
        };
        let a = 1.752 - 0.316 * x - 0.104 / ((x - 4.67).powi(2) + 0.341) + fa;
        let b = -3.090 + 1.825 * x + 1.206 / ((x - 4.62).powi(2) + 0.263) + fb;
        (a, b)
    } else if (8.0..=10.0).contains(&x) {
        let xx = x - 8.0;
        (
            polynomial(&[-1.073, -0.628, 0.137, -0.070], xx),
            polynomial(&[13.670, 4.257, -0.420, 0.374], xx),
        )
    } else {
        (0.0, 0.0)
    }
}

/// `AV·(a + b/RV)` with the requested optical coefficients.
pub(super) fn ccm89_like(
    rv: f64,
    av: Magnitude,
    wave: Angstrom,
    optical: OpticalCoefficients,
) -> Magnitude {
    let (a, b) = ccm89_ab(inverse_microns(wave), optical);
    av * (a + b / rv)
}

/// Multiplicative correction turning O'Donnell94 into the approximate Fitzpatrick 99 curve.
pub(super) fn fitz99_over_odonnell94(wave: Angstrom) -> f64 {
    polynomial(&FITZ99_OVER_ODONNELL94, wave / 1000.0)
}
