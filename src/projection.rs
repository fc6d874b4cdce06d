//! # Sky projection of the polar dust maps
//!
//! Maps galactic `(l, b)` in degrees to **zero-indexed fractional pixel**
//! coordinates of one hemisphere image. Two header conventions describe the
//! same polar equal-area projection:
//!
//! * **Lambert** (`CTYPE1 = 'LAMBERT--X'`, `CTYPE2 = 'LAMBERT--Y'`), with the
//!   hemisphere sign in `LAM_NSGP` (+1 north, -1 south) and the radius of the
//!   equator in pixels in `LAM_SCAL`:
//!   `rho = sqrt(1 - nsgp·sin b)`, `x = rho·cos(l)·scale`, `y = -nsgp·rho·sin(l)·scale`,
//!   then `px = x + CRPIX1 - CRVAL1 - 1` (same for `y`).
//!
//! * **Zenithal equal-area** (`GLON-ZEA` / `GLAT-ZEA`), WCS style: native
//!   rotation about the pole given by `CRVAL2` and `LONPOLE` (default 180),
//!   `R(θ) = 2k·sin((90 - θ)/(2k))` with `k = 180/π`, planar
//!   `(R sin φ, -R cos φ)`, then the inverse of the `CD` matrix (or of
//!   `diag(CDELT1, CDELT2)` when both `CDELT` cards exist) and `CRPIX - 1`.
//!
//! Only polar ZEA projections (`|CRVAL2| > 89.9999`) are accepted.
use nalgebra::{Matrix2, Vector2};

use crate::constants::{Degree, DEGRAD, RADEG};
use crate::fits::FitsHeader;
use crate::mwdust_errors::MwDustError;

/// Reference latitude beyond which a ZEA projection is considered polar.
const POLE_LIMIT: Degree = 89.9999;

/// Projection parameters decoded from a map header.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Lambert {
        nsgp: f64,
        scale: f64,
        crval: Vector2<f64>,
        crpix: Vector2<f64>,
    },
    Zea {
        north: bool,
        lonpole: Degree,
        crval: Vector2<f64>,
        crpix: Vector2<f64>,
        cd_inverse: Matrix2<f64>,
    },
}

impl Projection {
    /// Decode the projection from the `CTYPE`, `CRVAL`, `CRPIX` and convention cards.
    ///
    /// Return
    /// ----------
    /// * [`MwDustError::UnsupportedProjection`] when the `CTYPE` pair is neither
    ///   Lambert nor ZEA, [`MwDustError::UnsupportedPole`] for a non-polar ZEA,
    ///   [`MwDustError::SingularCdMatrix`] when the pixel matrix cannot be inverted,
    ///   [`MwDustError::MissingCard`] when a required card is absent.
    pub fn from_header(header: &FitsHeader) -> Result<Self, MwDustError> {
        let ctype1 = header.get_string("CTYPE1").unwrap_or_default();
        let ctype2 = header.get_string("CTYPE2").unwrap_or_default();
        let reference = |axis1: &str, axis2: &str| -> Result<Vector2<f64>, MwDustError> {
            Ok(Vector2::new(
                header.require_real(axis1)?,
                header.require_real(axis2)?,
            ))
        };

        match (ctype1.as_str(), ctype2.as_str()) {
            ("LAMBERT--X", "LAMBERT--Y") => {
                let nsgp = header
                    .get_int("LAM_NSGP")
                    .ok_or_else(|| MwDustError::MissingCard("LAM_NSGP".into()))?;
                Ok(Projection::Lambert {
                    nsgp: nsgp as f64,
                    scale: header.require_real("LAM_SCAL")?,
                    crval: reference("CRVAL1", "CRVAL2")?,
                    crpix: reference("CRPIX1", "CRPIX2")?,
                })
            }
            ("GLON-ZEA", "GLAT-ZEA") => {
                let crval = reference("CRVAL1", "CRVAL2")?;
                let crpix = reference("CRPIX1", "CRPIX2")?;
                let north = if crval.y > POLE_LIMIT {
                    true
                } else if crval.y < -POLE_LIMIT {
                    false
                } else {
                    return Err(MwDustError::UnsupportedPole { crval2: crval.y });
                };

                let cd = match (header.get_real("CDELT1"), header.get_real("CDELT2")) {
                    (Some(d1), Some(d2)) => Matrix2::new(d1, 0.0, 0.0, d2),
                    _ => Matrix2::new(
                        header.require_real("CD1_1")?,
                        header.require_real("CD1_2")?,
                        header.require_real("CD2_1")?,
                        header.require_real("CD2_2")?,
                    ),
                };
                let cd_inverse = cd.try_inverse().ok_or(MwDustError::SingularCdMatrix)?;

                Ok(Projection::Zea {
                    north,
                    lonpole: header.get_real("LONPOLE").unwrap_or(180.0),
                    crval,
                    crpix,
                    cd_inverse,
                })
            }
            _ => Err(MwDustError::UnsupportedProjection { ctype1, ctype2 }),
        }
    }

    /// Fractional zero-indexed pixel of galactic `(l, b)`.
    pub fn lb_to_fpix(&self, l: Degree, b: Degree) -> (f64, f64) {
        match self {
            Projection::Lambert {
                nsgp,
                scale,
                crval,
                crpix,
            } => {
                let (x, y) = lambert_lb_to_xy(l, b, *nsgp, *scale);
                (x + crpix.x - crval.x - 1.0, y + crpix.y - crval.y - 1.0)
            }
            Projection::Zea {
                north,
                lonpole,
                crval,
                crpix,
                cd_inverse,
            } => {
                let (theta, phi) = if *north {
                    (b, l + 180.0 + lonpole - crval.x)
                } else {
                    (-b, lonpole + crval.x - l)
                };
                let phi = phi - 360.0 * (phi / 360.0).floor();

                let r_theta = 2.0 * DEGRAD * ((0.5 / DEGRAD) * (90.0 - theta)).sin();
                let planar = Vector2::new(
                    r_theta * (phi * RADEG).sin(),
                    -r_theta * (phi * RADEG).cos(),
                );
                let pix = cd_inverse * planar;
                (pix.x + crpix.x - 1.0, pix.y + crpix.y - 1.0)
            }
        }
    }
}

/// Lambert offsets from the projection center, in pixels.
///
/// Arguments
/// -----------------
/// * `l`, `b`: Galactic longitude and latitude in degrees.
/// * `nsgp`: +1 for the north polar image, -1 for the south.
/// * `scale`: Radius of the `b = 0` circle in pixels.
pub fn lambert_lb_to_xy(l: Degree, b: Degree, nsgp: f64, scale: f64) -> (f64, f64) {
    let rho = (1.0 - nsgp * (b * RADEG).sin()).max(0.0).sqrt();
    let x = rho * (l * RADEG).cos() * scale;
    let y = -nsgp * rho * (l * RADEG).sin() * scale;
    (x, y)
}

#[cfg(test)]
mod test_projection {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn lambert_header(nsgp: i64) -> FitsHeader {
        let mut h = FitsHeader::new_primary();
        h.add_card_int("NAXIS", 2);
        h.add_card_int("NAXIS1", 4096);
        h.add_card_int("NAXIS2", 4096);
        h.add_card_string("CTYPE1", "LAMBERT--X");
        h.add_card_string("CTYPE2", "LAMBERT--Y");
        h.add_card_real("CRVAL1", 0.0);
        h.add_card_real("CRVAL2", 0.0);
        h.add_card_real("CRPIX1", 2048.5);
        h.add_card_real("CRPIX2", 2048.5);
        h.add_card_int("LAM_NSGP", nsgp);
        h.add_card_real("LAM_SCAL", 2048.0);
        h
    }

    fn zea_header(crval2: f64) -> FitsHeader {
        let mut h = FitsHeader::new_primary();
        h.add_card_string("CTYPE1", "GLON-ZEA");
        h.add_card_string("CTYPE2", "GLAT-ZEA");
        h.add_card_real("CRVAL1", 270.0);
        h.add_card_real("CRVAL2", crval2);
        h.add_card_real("CRPIX1", 2048.5);
        h.add_card_real("CRPIX2", 2048.5);
        h.add_card_real("CDELT1", 0.0395646818624);
        h.add_card_real("CDELT2", -0.0395646818624);
        h
    }

    #[test]
    fn test_lambert_pole_is_center() {
        let p = Projection::from_header(&lambert_header(1)).unwrap();
        let (x, y) = p.lb_to_fpix(123.0, 90.0);
        assert_abs_diff_eq!(x, 2047.5, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 2047.5, epsilon = 1e-9);
    }

    #[test]
    fn test_lambert_equator_radius() {
        let p = Projection::from_header(&lambert_header(1)).unwrap();
        let (x, y) = p.lb_to_fpix(0.0, 0.0);
        assert_abs_diff_eq!(x, 2047.5 + 2048.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 2047.5, epsilon = 1e-9);

        // south image flips the y axis
        let s = Projection::from_header(&lambert_header(-1)).unwrap();
        let (_, yn) = p.lb_to_fpix(90.0, 0.0);
        let (_, ys) = s.lb_to_fpix(90.0, 0.0);
        assert_abs_diff_eq!(yn - 2047.5, -(ys - 2047.5), epsilon = 1e-9);
    }

    #[test]
    fn test_zea_matches_lambert() {
        // 2k / (sqrt(2)·2048) degrees per pixel reproduces the 2048-pixel Lambert grid
        let lam = Projection::from_header(&lambert_header(1)).unwrap();
        let zea = Projection::from_header(&zea_header(90.0)).unwrap();
        for (l, b) in [(10.0, 45.0), (200.0, 20.0), (300.0, 75.0)] {
            let (xl, yl) = lam.lb_to_fpix(l, b);
            let (xz, yz) = zea.lb_to_fpix(l, b);
            assert_abs_diff_eq!(xl, xz, epsilon = 1e-3);
            assert_abs_diff_eq!(yl, yz, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_zea_south_pole_center() {
        let p = Projection::from_header(&zea_header(-90.0)).unwrap();
        let (x, y) = p.lb_to_fpix(42.0, -90.0);
        assert_abs_diff_eq!(x, 2047.5, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 2047.5, epsilon = 1e-9);
    }

    #[test]
    fn test_zea_cd_matrix_fallback() {
        let mut h = zea_header(90.0);
        h.delete_card("CDELT2");
        h.add_card_real("CD1_1", 0.0395646818624);
        h.add_card_real("CD1_2", 0.0);
        h.add_card_real("CD2_1", 0.0);
        h.add_card_real("CD2_2", -0.0395646818624);
        let with_cd = Projection::from_header(&h).unwrap();
        let with_cdelt = Projection::from_header(&zea_header(90.0)).unwrap();
        let (a, b) = with_cd.lb_to_fpix(33.0, 60.0);
        let (c, d) = with_cdelt.lb_to_fpix(33.0, 60.0);
        assert_abs_diff_eq!(a, c, epsilon = 1e-9);
        assert_abs_diff_eq!(b, d, epsilon = 1e-9);
    }

    #[test]
    fn test_unsupported() {
        let mut h = lambert_header(1);
        h.change_card_string("CTYPE1", "RA---TAN");
        assert!(matches!(
            Projection::from_header(&h),
            Err(MwDustError::UnsupportedProjection { .. })
        ));

        assert_eq!(
            Projection::from_header(&zea_header(30.0)),
            Err(MwDustError::UnsupportedPole { crval2: 30.0 })
        );

        let mut singular = zea_header(90.0);
        singular.change_card_real("CDELT1", 0.0);
        assert_eq!(
            Projection::from_header(&singular),
            Err(MwDustError::SingularCdMatrix)
        );
    }
}
