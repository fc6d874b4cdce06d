//! Fitzpatrick & Massa UV curve and the Fitzpatrick 99 spline family.
//!
//! Below 2700 Å the curve is the FM90 parameterisation evaluated directly.
//! Above, a natural cubic spline in inverse microns runs through a small set
//! of knots anchored at `x = 0` (value `-R(V)`) and at two UV knots where the
//! FM90 curve is evaluated, so both pieces join at 2700 Å. The result is
//! `A(V)·(1 + E(x-V)/E(B-V) / R(V))`.
use crate::constants::{inverse_microns, Angstrom, InvMicron, Magnitude, RV_GORD03, WAVE_FM90_SPLIT};
use crate::mwdust_errors::MwDustError;
use crate::spline::{SplineCurve, SplineMode};

/// Fitzpatrick & Massa (1990) UV extinction curve `E(x-V)/E(B-V)`.
///
/// `k(x) = c1 + c2·x + c3·D(x) + c4·F(x)` where `D` is a Drude bump of squared
/// centroid `x02` and squared width `gamma2`, and `F` the far-UV rise switched
/// on above `c5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fm90 {
    /// Intercept of the linear term
    pub c1: f64,
    /// Slope of the linear term
    pub c2: f64,
    /// Bump amplitude
    pub c3: f64,
    /// Far-UV rise amplitude
    pub c4: f64,
    /// Far-UV transition point (inverse microns)
    pub c5: f64,
    pub x02: f64,
    pub gamma2: f64,
}

impl Fm90 {
    pub fn eval(&self, x: InvMicron) -> f64 {
        let x2 = x * x;
        let bump = x2 / ((x2 - self.x02).powi(2) + x2 * self.gamma2);
        let mut k = self.c1 + self.c2 * x + self.c3 * bump;
        if x >= self.c5 {
            let y = x - self.c5;
            let y2 = y * y;
            k += self.c4 * (0.5392 * y2 + 0.05644 * y2 * y);
        }
        k
    }
}

/// Members of the Fitzpatrick 99 family sharing the FM90 + spline construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Fitz99Variant {
    Fitz99,
    Fitz04,
    Gordon03,
}

impl Fitz99Variant {
    /// FM90 coefficients at `rv`.
    fn fm90(self, rv: f64) -> Fm90 {
        let c2 = -0.824 + 4.717 / rv;
        let c5 = 5.90;
        match self {
            Fitz99Variant::Fitz99 => Fm90 {
                c1: 2.03 - 3.007 * c2,
                c2,
                c3: 3.23,
                c4: 0.41,
                c5,
                x02: 21.123216,
                gamma2: 0.9801,
            },
            Fitz99Variant::Fitz04 => Fm90 {
                c1: 2.18 - 2.91 * c2,
                c2,
                c3: 2.991,
                c4: 0.319,
                c5,
                x02: 21.086464,
                gamma2: 0.850084,
            },
            Fitz99Variant::Gordon03 => Fm90 {
                c1: -4.959,
                c2: 2.264,
                c3: 0.389,
                c4: 0.461,
                c5,
                x02: 21.16,
                gamma2: 1.0,
            },
        }
    }

    /// Optical and IR knots with their values, excluding the `x = 0` anchor and the UV knots.
    fn optical_knots(self, rv: f64) -> Vec<(InvMicron, f64)> {
        let rv2 = rv * rv;
        let ir: Vec<(InvMicron, f64)> = match self {
            Fitz99Variant::Gordon03 => {
                // (k/RV + 1)·RV - RV with RV = 2.74
                return vec![
                    (1.0 / 2.198, -2.4386),
                    (1.0 / 1.65, -2.27694),
                    (1.0 / 1.25, -2.055),
                    (1.0 / 0.81, -1.18642),
                    (1.0 / 0.65, -0.54526),
                    (1.0 / 0.55, 0.0),
                    (1.0 / 0.44, 1.02476),
                    (1.0 / 0.37, 1.84128),
                ];
            }
            Fitz99Variant::Fitz04 => {
                let nir = 0.63 * rv - 0.84;
                [0.5, 0.75, 1.0]
                    .into_iter()
                    .map(|x: f64| (x, nir * x.powf(1.84) - rv))
                    .collect()
            }
            Fitz99Variant::Fitz99 => vec![
                (1.0 / 2.65, -0.914616129 * rv),
                (1.0 / 1.22, -0.7325 * rv),
            ],
        };

        let optical = [
            (1.0 / 0.60, -0.422809 + 0.00270 * rv + 2.13572e-04 * rv2),
            (1.0 / 0.547, -5.13540e-02 + 0.00216 * rv - 7.35778e-05 * rv2),
            (1.0 / 0.467, 7.00127e-01 + 0.00184 * rv - 3.32598e-05 * rv2),
            (
                1.0 / 0.411,
                1.19456 + 0.01707 * rv - 5.46959e-03 * rv2 + 7.97809e-04 * rv2 * rv
                    - 4.45636e-05 * rv2 * rv2,
            ),
        ];
        ir.into_iter().chain(optical).collect()
    }

    /// Spline of `E(x-V)/E(B-V)` over `[0, 1/0.26]` inverse microns.
    fn spline(self, rv: f64) -> Result<SplineCurve, MwDustError> {
        let fm90 = self.fm90(rv);
        let uv = [1.0 / 0.270, 1.0 / 0.260];

        let (knots, values): (Vec<f64>, Vec<f64>) = std::iter::once((0.0, -rv))
            .chain(self.optical_knots(rv))
            .chain(uv.into_iter().map(|x| (x, fm90.eval(x))))
            .unzip();
        SplineCurve::new(knots, values)
    }
}

/// F99, F04 or G03 extinction in magnitudes.
///
/// The domain and the fixed R(V) of G03 are checked by the caller.
pub(super) fn fitz99_family(
    variant: Fitz99Variant,
    rv: f64,
    av: Magnitude,
    wave: Angstrom,
) -> Result<Magnitude, MwDustError> {
    let x = inverse_microns(wave);
    let k = if wave <= WAVE_FM90_SPLIT {
        variant.fm90(rv).eval(x)
    } else {
        variant.spline(rv)?.eval(x, SplineMode::Cubic)?
    };
    Ok(av * (1.0 + k / rv))
}

/// Gordon et al. (2016) mixture `FA·F99(RVA) + (1 - FA)·G03(2.74)`.
pub(super) fn gordon16(
    rva: f64,
    fa: f64,
    av: Magnitude,
    wave: Angstrom,
) -> Result<Magnitude, MwDustError> {
    let xt_a = fitz99_family(Fitz99Variant::Fitz99, rva, av, wave)?;
    let xt_b = fitz99_family(Fitz99Variant::Gordon03, RV_GORD03, av, wave)?;
    Ok(fa * xt_a + (1.0 - fa) * xt_b)
}
