//! Sommovigo et al. (2025) A(V)-driven attenuation curve.
//!
//! The shape is a four-parameter Pei (1992) curve (Li et al. 2008 form) whose
//! coefficients follow scaling relations in `log10 A(V)`; R(V) is not used.
use crate::constants::{inverse_microns, Angstrom, InvMicron, Magnitude};

/// Four-parameter Pei curve `A(x)/A(V)`.
///
/// Arguments
/// -----------------
/// * `x`: Wavenumber in inverse microns.
/// * `c1`: UV rise.
/// * `c2`: Slope.
/// * `c3`: Far-UV shape.
/// * `c4`: Strength of the 2175 Å bump.
pub fn pei4(x: InvMicron, c1: f64, c2: f64, c3: f64, c4: f64) -> f64 {
    let y08 = (0.08 * x).powf(c2);
    let y046 = (0.046 * x).powi(2);
    let y2175 = (0.2175 * x).powi(2);
    let b = 0.145_f64.powf(c2);

    c1 / (y08 + 1.0 / y08 + c3)
        + 233.0 * (1.0 - c4 / 4.60 - c1 / (b + 1.0 / b + c3)) / (y046 + 1.0 / y046 + 90.0)
        + c4 / (y2175 + 1.0 / y2175 - 1.95)
}

/// `(c1, c2, c3, c4)` at `av`.
fn coefficients(av: Magnitude) -> (f64, f64, f64, f64) {
    let log_av = av.log10();
    let log_c1 = -0.37 * log_av + 0.75;
    let c1 = 10f64.powf(log_c1);
    let c2 = 1.88;
    let c3 = 1.21 * log_c1 - 1.33;
    let c4 = 10f64.powf(-0.59 * log_av - 1.42);
    (c1, c2, c3, c4)
}

/// Sommovigo 2025 extinction in magnitudes; the domain is checked by the caller.
pub(super) fn sommovigo25(av: Magnitude, wave: Angstrom) -> Magnitude {
    let (c1, c2, c3, c4) = coefficients(av);
    av * pei4(inverse_microns(wave), c1, c2, c3, c4)
}
