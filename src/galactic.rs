//! # Equatorial to galactic coordinates
//!
//! The dust maps are indexed by galactic `(l, b)` while callers provide
//! `(RA, DEC)`. The conversion sits behind the [`SkyRotation`] trait so that a
//! caller with its own astrometry can supply it; [`Fk5Galactic`] is the
//! default, a fixed rotation of the unit vector from FK5 J2000 to the IAU 1958
//! galactic frame.
use nalgebra::{Matrix3, Vector3};

use crate::constants::{Degree, DEGRAD, RADEG};

/// Rotation between the equatorial frame of the caller and the galactic frame.
pub trait SkyRotation {
    /// Galactic `(l, b)` in degrees of equatorial `(ra, dec)` in degrees, `l` in `[0, 360)`.
    fn to_galactic(&self, ra: Degree, dec: Degree) -> (Degree, Degree);

    /// Equatorial `(ra, dec)` in degrees of galactic `(l, b)`, `ra` in `[0, 360)`.
    fn to_equatorial(&self, l: Degree, b: Degree) -> (Degree, Degree);
}

/// FK5 J2000 to galactic rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fk5Galactic {
    rot: Matrix3<f64>,
}

impl Default for Fk5Galactic {
    fn default() -> Self {
        Fk5Galactic {
            rot: Matrix3::new(
                -0.054875539726,
                -0.873437108010,
                -0.483834985808,
                0.494109453312,
                -0.444829589425,
                0.746982251810,
                -0.867666135858,
                -0.198076386122,
                0.455983795705,
            ),
        }
    }
}

impl Fk5Galactic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows are the galactic axes expressed in the equatorial frame.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.rot
    }
}

/// Unit vector of spherical `(lon, lat)` in degrees.
fn unit_vector(lon: Degree, lat: Degree) -> Vector3<f64> {
    let (sl, cl) = (lon * RADEG).sin_cos();
    let (sb, cb) = (lat * RADEG).sin_cos();
    Vector3::new(cl * cb, sl * cb, sb)
}

/// Spherical `(lon, lat)` in degrees of a vector, `lon` in `[0, 360)`.
fn spherical(v: Vector3<f64>) -> (Degree, Degree) {
    let r = v.xy().norm();
    let lon = if r == 0.0 { 0.0 } else { v.y.atan2(v.x) * DEGRAD };
    let lat = if v.z == 0.0 && r == 0.0 {
        0.0
    } else {
        v.z.atan2(r) * DEGRAD
    };
    (lon.rem_euclid(360.0), lat)
}

impl SkyRotation for Fk5Galactic {
    fn to_galactic(&self, ra: Degree, dec: Degree) -> (Degree, Degree) {
        spherical(self.rot * unit_vector(ra, dec))
    }

    fn to_equatorial(&self, l: Degree, b: Degree) -> (Degree, Degree) {
        spherical(self.rot.transpose() * unit_vector(l, b))
    }
}

#[cfg(test)]
mod test_galactic {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_galactic_pole() {
        let rot = Fk5Galactic::new();
        let (_, b) = rot.to_galactic(192.859508, 27.128336);
        assert_abs_diff_eq!(b, 90.0, epsilon = 1e-4);
        let (_, b) = rot.to_galactic(12.859508, -27.128336);
        assert_abs_diff_eq!(b, -90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_galactic_center() {
        let (l, b) = Fk5Galactic::new().to_galactic(266.404996, -28.936172);
        let l = if l > 180.0 { l - 360.0 } else { l };
        assert_abs_diff_eq!(l, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(b, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_round_trip() {
        let rot = Fk5Galactic::new();
        for (ra, dec) in [(10.0, 41.2), (83.6, -5.4), (299.9, 60.0), (0.5, -89.0)] {
            let (l, b) = rot.to_galactic(ra, dec);
            assert!((0.0..360.0).contains(&l));
            let (ra2, dec2) = rot.to_equatorial(l, b);
            assert_abs_diff_eq!(ra2, ra, epsilon = 1e-8);
            assert_abs_diff_eq!(dec2, dec, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_matrix_is_orthonormal() {
        let m = Fk5Galactic::new().matrix() * Fk5Galactic::new().matrix().transpose();
        assert_abs_diff_eq!(m, Matrix3::identity(), epsilon = 1e-9);
    }
}
