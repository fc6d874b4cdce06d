//! # Wavelength-dependent extinction laws
//!
//! This module evaluates the extinction `A(λ)` in magnitudes for a given
//! `A(V)`, `R(V) = A(V)/E(B-V)` and wavelength in Angstroms, following one of
//! the supported color laws.
//!
//! ## Public API
//!
//! ### [`ColorLaw`]
//! One variant per law, built from its integer selector with
//! [`ColorLaw::from_selector`] (or `TryFrom<i32>`):
//!
//! | selector | variant | curve |
//! |---|---|---|
//! | 0 | `Off` | no extinction |
//! | 89 | `Ccm89` | Cardelli, Clayton & Mathis (1989) |
//! | 94 | `ODonnell94` | CCM89 with the O'Donnell (1994) optical coefficients |
//! | -99 | `Fitz99Approx` | O'Donnell94 times a polynomial fit of F99/O94 |
//! | 99 | `Fitz99Exact` | Fitzpatrick (1999) FM90 + cubic spline |
//! | 203 | `Gordon03` | SMC bar, R(V) = 2.74 only |
//! | 204 | `Fitz04` | Fitzpatrick (2004) |
//! | 208 | `Goobar08` | circumstellar power law, parameters `P, A` |
//! | 214 | `Maiz14` | Maiz Apellaniz et al. (2014) |
//! | 216 | `Gordon16` | mixture of F99(RVA) and G03, parameters `RVA, FA` |
//! | -219 / 219 | `Fitz19Linear` / `Fitz19Cubic` | tabulated Fitzpatrick et al. (2019) |
//! | 223 | `Gordon23` | Gordon et al. (2023) |
//! | 225 | `Sommovigo25` | Pei-like 4-parameter curve driven by A(V) |
//!
//! ### [`ColorLaw::evaluate`] and [`galextinct`]
//!
//! ```rust
//! use mwdust::extinction::{ColorLaw, LawParams};
//!
//! let av_mag = ColorLaw::Fitz99Exact
//!     .evaluate(3.1, 1.0, 5495.0, &LawParams::none())
//!     .unwrap();
//! assert!((av_mag - 1.0).abs() < 0.05);
//! ```
//!
//! `A(V) == 0` short-circuits to exactly 0 for every law. Any other input is
//! validated per law (fixed R(V), parameter ranges, wavelength domain) and
//! reported as a [`MwDustError`].
mod ccm89;
mod fitz19;
mod fitzpatrick;
mod goobar08;
mod gordon23;
mod maiz14;
mod sommovigo25;

use std::fmt;

use crate::constants::*;
use crate::mwdust_errors::{CallSite, MwDustError, ResultExt};

pub use fitzpatrick::Fm90;
pub use sommovigo25::pei4;

use ccm89::OpticalCoefficients;
use fitzpatrick::Fitz99Variant;

/// Extinction law selected by an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorLaw {
    Off,
    Ccm89,
    ODonnell94,
    Fitz99Approx,
    Fitz99Exact,
    Gordon03,
    Fitz04,
    Goobar08,
    Maiz14,
    Gordon16,
    Fitz19Linear,
    Fitz19Cubic,
    Gordon23,
    Sommovigo25,
}

impl ColorLaw {
    pub const ALL: [ColorLaw; 14] = [
        ColorLaw::Off,
        ColorLaw::Ccm89,
        ColorLaw::ODonnell94,
        ColorLaw::Fitz99Approx,
        ColorLaw::Fitz99Exact,
        ColorLaw::Gordon03,
        ColorLaw::Fitz04,
        ColorLaw::Goobar08,
        ColorLaw::Maiz14,
        ColorLaw::Gordon16,
        ColorLaw::Fitz19Linear,
        ColorLaw::Fitz19Cubic,
        ColorLaw::Gordon23,
        ColorLaw::Sommovigo25,
    ];

    /// Law for an integer selector.
    ///
    /// Return
    /// ----------
    /// * The law, or [`MwDustError::InvalidLawSelector`] for an unknown code.
    pub fn from_selector(selector: i32) -> Result<Self, MwDustError> {
        ColorLaw::ALL
            .into_iter()
            .find(|law| law.selector() == selector)
            .ok_or(MwDustError::InvalidLawSelector(selector))
    }

    pub fn selector(self) -> i32 {
        match self {
            ColorLaw::Off => 0,
            ColorLaw::Ccm89 => 89,
            ColorLaw::ODonnell94 => 94,
            ColorLaw::Fitz99Approx => -99,
            ColorLaw::Fitz99Exact => 99,
            ColorLaw::Gordon03 => 203,
            ColorLaw::Fitz04 => 204,
            ColorLaw::Goobar08 => 208,
            ColorLaw::Maiz14 => 214,
            ColorLaw::Gordon16 => 216,
            ColorLaw::Fitz19Linear => -219,
            ColorLaw::Fitz19Cubic => 219,
            ColorLaw::Gordon23 => 223,
            ColorLaw::Sommovigo25 => 225,
        }
    }

    /// Human readable description of the law.
    pub fn description(self) -> &'static str {
        match self {
            ColorLaw::Off => "No Extinction",
            ColorLaw::Ccm89 => "CCM89",
            ColorLaw::ODonnell94 => "CCM89+ODonell94",
            ColorLaw::Fitz99Approx => "Fitzpatrick99 (approx fit to F99/ODonnel94)",
            ColorLaw::Fitz99Exact => "Fitzpatrick99 (cubic spline)",
            ColorLaw::Gordon03 => "Gordon03 (cubic spline)",
            ColorLaw::Fitz04 => "Fitzpatrick04 (cubic spline)",
            ColorLaw::Goobar08 => "Goobar08 (power law)",
            ColorLaw::Maiz14 => "MaizApellaniz14 (cubic spline)",
            ColorLaw::Gordon16 => "Gordon16 (cubic spline)",
            ColorLaw::Fitz19Linear => "Fitzpatrick19 (linear interpolation)",
            ColorLaw::Fitz19Cubic => "Fitzpatrick19 (cubic spline)",
            ColorLaw::Gordon23 => "Gordon23",
            ColorLaw::Sommovigo25 => "Sommovigo25 (Learning the Universe)",
        }
    }

    /// Valid wavelength range in Angstroms, `None` when every wavelength is accepted.
    pub fn domain(self) -> Option<(Angstrom, Angstrom)> {
        match self {
            ColorLaw::Off | ColorLaw::Ccm89 | ColorLaw::ODonnell94 => None,
            ColorLaw::Fitz99Approx => Some((f64::NEG_INFINITY, WAVEMAX_FITZ99)),
            ColorLaw::Fitz99Exact | ColorLaw::Gordon03 | ColorLaw::Fitz04 | ColorLaw::Gordon16 => {
                Some((WAVEMIN_FITZ99_EXACT, WAVEMAX_FITZ99_EXACT))
            }
            ColorLaw::Goobar08 => Some((WAVEMIN_GOOB08, WAVEMAX_GOOB08)),
            ColorLaw::Maiz14 => Some((WAVEMIN_MAIZ14, WAVEMAX_MAIZ14)),
            ColorLaw::Fitz19Linear | ColorLaw::Fitz19Cubic => {
                Some((WAVEMIN_FITZ19, WAVEMAX_FITZ19))
            }
            ColorLaw::Gordon23 => Some((WAVEMIN_GORD23, WAVEMAX_GORD23)),
            ColorLaw::Sommovigo25 => Some((WAVEMIN_SOMM25, WAVEMAX_SOMM25)),
        }
    }

    /// Extinction in magnitudes at `wave`.
    ///
    /// Arguments
    /// -----------------
    /// * `rv`: Total to selective extinction ratio A(V)/E(B-V). Ignored by
    ///   `Goobar08`, `Gordon16` and `Sommovigo25`.
    /// * `av`: Extinction in the V band (5495 Å), may be negative.
    /// * `wave`: Wavelength in Angstroms.
    /// * `params`: Extra parameters of the two-parameter laws.
    ///
    /// Return
    /// ----------
    /// * `A(wave)` in magnitudes, exactly 0 when `av == 0`.
    /// * [`MwDustError::FixedRvMismatch`], [`MwDustError::MissingLawParameter`],
    ///   [`MwDustError::LawParameterOutOfRange`] or
    ///   [`MwDustError::WavelengthOutOfRange`] when the inputs are outside
    ///   the validity of the law.
    pub fn evaluate(
        self,
        rv: f64,
        av: Magnitude,
        wave: Angstrom,
        params: &LawParams,
    ) -> Result<Magnitude, MwDustError> {
        if av == 0.0 {
            return Ok(0.0);
        }
        self.check_params(rv, params)?;
        self.check_domain(wave)?;

        match self {
            ColorLaw::Off => Ok(0.0),
            ColorLaw::Ccm89 => Ok(ccm89::ccm89_like(rv, av, wave, OpticalCoefficients::Ccm89)),
            ColorLaw::ODonnell94 => Ok(ccm89::ccm89_like(
                rv,
                av,
                wave,
                OpticalCoefficients::ODonnell94,
            )),
            ColorLaw::Fitz99Approx => Ok(ccm89::ccm89_like(
                rv,
                av,
                wave,
                OpticalCoefficients::ODonnell94,
            ) * ccm89::fitz99_over_odonnell94(wave)),
            ColorLaw::Fitz99Exact => fitzpatrick::fitz99_family(Fitz99Variant::Fitz99, rv, av, wave),
            ColorLaw::Fitz04 => fitzpatrick::fitz99_family(Fitz99Variant::Fitz04, rv, av, wave),
            ColorLaw::Gordon03 => fitzpatrick::fitz99_family(Fitz99Variant::Gordon03, rv, av, wave),
            ColorLaw::Goobar08 => {
                let (p, a) = goobar08_params(params)?;
                Ok(goobar08::goobar08(p, a, av, wave))
            }
            ColorLaw::Maiz14 => Ok(maiz14::maiz14(rv, av, wave)),
            ColorLaw::Gordon16 => {
                let (rva, fa) = gordon16_params(params)?;
                fitzpatrick::gordon16(rva, fa, av, wave)
            }
            ColorLaw::Fitz19Linear => fitz19::fitz19(rv, av, wave, crate::spline::SplineMode::Linear),
            ColorLaw::Fitz19Cubic => fitz19::fitz19(rv, av, wave, crate::spline::SplineMode::Cubic),
            ColorLaw::Gordon23 => Ok(gordon23::gordon23(rv, av, wave)),
            ColorLaw::Sommovigo25 => Ok(sommovigo25::sommovigo25(av, wave)),
        }
    }

    fn check_params(self, rv: f64, params: &LawParams) -> Result<(), MwDustError> {
        match self {
            ColorLaw::Gordon03 if rv != RV_GORD03 => Err(MwDustError::FixedRvMismatch {
                law: self,
                requested: rv,
                required: RV_GORD03,
            }),
            ColorLaw::Goobar08 => goobar08_params(params).map(|_| ()),
            ColorLaw::Gordon16 => gordon16_params(params).map(|_| ()),
            _ => Ok(()),
        }
    }

    fn check_domain(self, wave: Angstrom) -> Result<(), MwDustError> {
        match self.domain() {
            Some((min, max)) if wave < min || wave > max => {
                Err(MwDustError::WavelengthOutOfRange {
                    law: self,
                    wave,
                    min,
                    max,
                })
            }
            _ => Ok(()),
        }
    }
}

impl TryFrom<i32> for ColorLaw {
    type Error = MwDustError;

    fn try_from(selector: i32) -> Result<Self, Self::Error> {
        ColorLaw::from_selector(selector)
    }
}

impl fmt::Display for ColorLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (selector {})", self.description(), self.selector())
    }
}

/// Optional numeric parameters of a law.
///
/// Entries equal to [`MISSING_PARAM`] (-99) or beyond the end of the list are
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LawParams(Vec<f64>);

impl LawParams {
    pub fn new(values: &[f64]) -> Self {
        LawParams(values.to_vec())
    }

    /// No parameters.
    pub fn none() -> Self {
        LawParams(Vec::new())
    }

    /// Parameter `i`, or `None` if it is absent or set to the missing sentinel.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.0.get(i).copied().filter(|&v| v != MISSING_PARAM)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for LawParams {
    fn from(values: Vec<f64>) -> Self {
        LawParams(values)
    }
}

fn required_param(
    params: &LawParams,
    i: usize,
    law: ColorLaw,
    name: &'static str,
    required: &'static str,
) -> Result<f64, MwDustError> {
    params
        .get(i)
        .ok_or(MwDustError::MissingLawParameter {
            law,
            name,
            required,
        })
}

fn check_range(
    law: ColorLaw,
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, MwDustError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(MwDustError::LawParameterOutOfRange {
            law,
            name,
            value,
            min,
            max,
        })
    }
}

/// `(P, A)` of Goobar 2008, with `P` in `[-4, 0]` and `0 < A <= 1`.
fn goobar08_params(params: &LawParams) -> Result<(f64, f64), MwDustError> {
    let law = ColorLaw::Goobar08;
    let required = "two parameters: P,A";
    let p = required_param(params, 0, law, "P", required)?;
    let a = required_param(params, 1, law, "A", required)?;
    let p = check_range(law, "P", p, PMIN_GOOB08, PMAX_GOOB08)?;
    if a <= 0.0 || a > 1.0 {
        return Err(MwDustError::LawParameterOutOfRange {
            law,
            name: "A",
            value: a,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok((p, a))
}

/// `(RVA, FA)` of Gordon 2016, with `RVA` in `[2, 6]` and `FA` in `[0, 1]`.
fn gordon16_params(params: &LawParams) -> Result<(f64, f64), MwDustError> {
    let law = ColorLaw::Gordon16;
    let required = "two parameters: RVA,FA";
    let rva = required_param(params, 0, law, "RVA", required)?;
    let fa = required_param(params, 1, law, "FA", required)?;
    Ok((
        check_range(law, "RVA", rva, RVMIN_FITZ99, RVMAX_FITZ99)?,
        check_range(law, "FA", fa, 0.0, 1.0)?,
    ))
}

/// Evaluate the law with integer code `selector`, attaching `call_site` to any failure.
///
/// Arguments
/// -----------------
/// * `rv`, `av`, `wave`, `params`: See [`ColorLaw::evaluate`].
/// * `selector`: Integer code of the law.
/// * `call_site`: Chain of callers, reported in the diagnostic.
///
/// See also
/// ------------
/// * [`ColorLaw::evaluate`] – Same evaluation with an already validated law.
pub fn galextinct(
    rv: f64,
    av: Magnitude,
    wave: Angstrom,
    selector: i32,
    params: &LawParams,
    call_site: &CallSite,
) -> Result<Magnitude, MwDustError> {
    let site = call_site.push("galextinct");
    ColorLaw::from_selector(selector)
        .and_then(|law| law.evaluate(rv, av, wave, params))
        .with_call_site(&site)
}

#[cfg(test)]
mod test_extinction {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn g16(rva: f64, fa: f64) -> LawParams {
        LawParams::new(&[rva, fa])
    }

    fn default_params(law: ColorLaw) -> LawParams {
        match law {
            ColorLaw::Goobar08 => LawParams::new(&[-1.5, 0.9]),
            ColorLaw::Gordon16 => g16(3.1, 0.5),
            _ => LawParams::none(),
        }
    }

    fn default_rv(law: ColorLaw) -> f64 {
        if law == ColorLaw::Gordon03 {
            RV_GORD03
        } else {
            3.1
        }
    }

    #[test]
    fn test_selector_round_trip() {
        for law in ColorLaw::ALL {
            assert_eq!(ColorLaw::from_selector(law.selector()), Ok(law));
            assert_eq!(ColorLaw::try_from(law.selector()), Ok(law));
        }
        assert_eq!(
            ColorLaw::from_selector(42),
            Err(MwDustError::InvalidLawSelector(42))
        );
        assert_eq!(
            ColorLaw::from_selector(-94),
            Err(MwDustError::InvalidLawSelector(-94))
        );
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(ColorLaw::ODonnell94.description(), "CCM89+ODonell94");
        assert_eq!(ColorLaw::Off.description(), "No Extinction");
        assert_eq!(
            ColorLaw::Sommovigo25.to_string(),
            "Sommovigo25 (Learning the Universe) (selector 225)"
        );
    }

    #[test]
    fn test_zero_av_is_exactly_zero() {
        for law in ColorLaw::ALL {
            // even outside the domain or with missing parameters
            for wave in [500.0, 5495.0, 1.0e6] {
                let v = law.evaluate(1.7, 0.0, wave, &LawParams::none()).unwrap();
                assert_eq!(v, 0.0, "{law}");
            }
        }
    }

    #[test]
    fn test_v_band_close_to_av() {
        for law in ColorLaw::ALL.into_iter().skip(1) {
            let v = law
                .evaluate(default_rv(law), 1.0, WAVE_V, &default_params(law))
                .unwrap();
            assert!((v - 1.0).abs() < 0.05, "{law}: A(V)/AV = {v}");
        }
    }

    #[test]
    fn test_blue_is_redder() {
        for law in ColorLaw::ALL.into_iter().skip(1) {
            let p = default_params(law);
            let rv = default_rv(law);
            let ab = law.evaluate(rv, 1.0, 4405.0, &p).unwrap();
            let av = law.evaluate(rv, 1.0, WAVE_V, &p).unwrap();
            assert!(ab > av, "{law}");
        }
    }

    #[test]
    fn test_linear_in_av() {
        for law in [
            ColorLaw::Ccm89,
            ColorLaw::Fitz99Exact,
            ColorLaw::Maiz14,
            ColorLaw::Fitz19Cubic,
            ColorLaw::Gordon23,
        ] {
            let one = law.evaluate(3.1, 1.0, 6000.0, &LawParams::none()).unwrap();
            let neg = law.evaluate(3.1, -0.4, 6000.0, &LawParams::none()).unwrap();
            assert_abs_diff_eq!(neg, -0.4 * one, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gordon03_requires_fixed_rv() {
        let err = ColorLaw::Gordon03
            .evaluate(3.1, 1.0, 5000.0, &LawParams::none())
            .unwrap_err();
        assert_eq!(
            err,
            MwDustError::FixedRvMismatch {
                law: ColorLaw::Gordon03,
                requested: 3.1,
                required: 2.74
            }
        );
        assert!(ColorLaw::Gordon03
            .evaluate(2.74, 1.0, 5000.0, &LawParams::none())
            .is_ok());
    }

    #[test]
    fn test_goobar08_parameters() {
        let law = ColorLaw::Goobar08;
        let missing = law.evaluate(3.1, 1.0, 5000.0, &LawParams::new(&[-99.0, 0.9]));
        assert!(matches!(
            missing,
            Err(MwDustError::MissingLawParameter { name: "P", .. })
        ));
        let missing = law.evaluate(3.1, 1.0, 5000.0, &LawParams::new(&[-1.5]));
        assert!(matches!(
            missing,
            Err(MwDustError::MissingLawParameter { name: "A", .. })
        ));
        assert!(matches!(
            law.evaluate(3.1, 1.0, 5000.0, &LawParams::new(&[0.5, 0.9])),
            Err(MwDustError::LawParameterOutOfRange { name: "P", .. })
        ));
        assert!(matches!(
            law.evaluate(3.1, 1.0, 5000.0, &LawParams::new(&[-1.5, 0.0])),
            Err(MwDustError::LawParameterOutOfRange { name: "A", .. })
        ));
        assert!(law
            .evaluate(3.1, 1.0, 5000.0, &LawParams::new(&[-4.0, 1.0]))
            .is_ok());
    }

    #[test]
    fn test_gordon16_limits() {
        let law = ColorLaw::Gordon16;
        assert!(matches!(
            law.evaluate(3.1, 1.0, 5000.0, &LawParams::none()),
            Err(MwDustError::MissingLawParameter { .. })
        ));
        assert!(matches!(
            law.evaluate(3.1, 1.0, 5000.0, &g16(6.5, 0.5)),
            Err(MwDustError::LawParameterOutOfRange { name: "RVA", .. })
        ));
        assert!(matches!(
            law.evaluate(3.1, 1.0, 5000.0, &g16(3.1, 1.5)),
            Err(MwDustError::LawParameterOutOfRange { name: "FA", .. })
        ));

        // FA = 1 is F99 at RVA, FA = 0 is G03, the RV argument is ignored
        for wave in [1500.0, 3000.0, 9000.0] {
            let pure_f99 = law.evaluate(0.0, 1.0, wave, &g16(3.6, 1.0)).unwrap();
            let f99 = ColorLaw::Fitz99Exact
                .evaluate(3.6, 1.0, wave, &LawParams::none())
                .unwrap();
            assert_abs_diff_eq!(pure_f99, f99, epsilon = 1e-12);

            let pure_g03 = law.evaluate(0.0, 1.0, wave, &g16(3.6, 0.0)).unwrap();
            let g03 = ColorLaw::Gordon03
                .evaluate(2.74, 1.0, wave, &LawParams::none())
                .unwrap();
            assert_abs_diff_eq!(pure_g03, g03, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_domains() {
        let cases = [
            (ColorLaw::Fitz99Approx, 15001.0),
            (ColorLaw::Fitz99Exact, 999.0),
            (ColorLaw::Fitz04, 40000.0),
            (ColorLaw::Maiz14, 2999.0),
            (ColorLaw::Fitz19Cubic, 1100.0),
            (ColorLaw::Gordon23, 900.0),
            (ColorLaw::Sommovigo25, 400000.0),
            (ColorLaw::Goobar08, 26000.0),
        ];
        for (law, wave) in cases {
            let err = law
                .evaluate(default_rv(law), 1.0, wave, &default_params(law))
                .unwrap_err();
            assert_eq!(
                err,
                MwDustError::WavelengthOutOfRange {
                    law,
                    wave,
                    min: 0.0,
                    max: 0.0
                },
                "{law}"
            );
        }
        // CCM-like curves vanish outside [0.3, 10] inverse microns
        let far = ColorLaw::Ccm89
            .evaluate(3.1, 1.0, 500.0, &LawParams::none())
            .unwrap();
        assert_eq!(far, 0.0);
    }

    #[test]
    fn test_galextinct_context() {
        let site = CallSite::new("kcor");
        let err = galextinct(3.1, 1.0, 5000.0, 17, &LawParams::none(), &site).unwrap_err();
        let (first, second) = err.diagnostic();
        assert_eq!(first, "kcor->galextinct: Invalid color law selector 17");
        assert!(second.starts_with("Valid selectors"));

        let ok = galextinct(3.1, 1.0, 5000.0, 94, &LawParams::none(), &site).unwrap();
        let direct = ColorLaw::ODonnell94
            .evaluate(3.1, 1.0, 5000.0, &LawParams::none())
            .unwrap();
        assert_eq!(ok, direct);
    }
}
