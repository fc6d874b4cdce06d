//! # Milky Way extinction at an equatorial position
//!
//! [`GalDust`] turns `(RA, DEC)` into galactic `(l, b)`, reads the SFD E(B-V)
//! map with bilinear interpolation and scales it by the SDSS band ratios
//! (u, g, r, i, z) = (5.155, 3.793, 2.751, 2.086, 1.479).
//!
//! ```no_run
//! use mwdust::galdust::GalDust;
//!
//! let dust = GalDust::with_root("/data/MWDUST").unwrap();
//! let ext = dust.lookup_extinction(150.1, 2.2).unwrap().values;
//! println!("E(B-V) = {:.4}, A_r = {:.4}", ext.ebv, ext.band('r').unwrap());
//! ```
use camino::Utf8PathBuf;

use crate::config::DustConfig;
use crate::constants::{Degree, Magnitude, SDSS_BANDS, SDSS_BAND_RATIOS};
use crate::dust_map::{DustMap, MapKind};
use crate::fits::ReadOutcome;
use crate::galactic::{Fk5Galactic, SkyRotation};
use crate::mwdust_errors::MwDustError;
use crate::mwebv::{self, MwebvOption};

/// E(B-V) and the extinction in the five SDSS bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandExtinction {
    /// A(u), A(g), A(r), A(i), A(z) in magnitudes
    pub bands: [Magnitude; 5],
    pub ebv: Magnitude,
}

impl BandExtinction {
    pub fn from_ebv(ebv: Magnitude) -> Self {
        BandExtinction {
            bands: SDSS_BAND_RATIOS.map(|ratio| ratio * ebv),
            ebv,
        }
    }

    /// Extinction of band `name` (`'u'`, `'g'`, `'r'`, `'i'` or `'z'`).
    pub fn band(&self, name: char) -> Option<Magnitude> {
        SDSS_BANDS
            .iter()
            .position(|&b| b == name)
            .map(|i| self.bands[i])
    }
}

/// E(B-V) map lookup from equatorial coordinates.
#[derive(Debug)]
pub struct GalDust<R: SkyRotation = Fk5Galactic> {
    map: DustMap,
    rotation: R,
}

impl GalDust<Fk5Galactic> {
    /// Lookup reading the E(B-V) maps described by `config`.
    ///
    /// The map kind of `config` is replaced by E(B-V) and interpolation is
    /// always on; the root directory, batch and verbose options are kept.
    pub fn new(config: &DustConfig) -> Result<Self, MwDustError> {
        Self::with_rotation(config, Fk5Galactic::new())
    }

    pub fn with_root(root: impl Into<Utf8PathBuf>) -> Result<Self, MwDustError> {
        Self::new(&DustConfig::with_root(root))
    }
}

impl<R: SkyRotation> GalDust<R> {
    /// Same as [`GalDust::new`] with a caller-supplied equatorial to galactic rotation.
    pub fn with_rotation(config: &DustConfig, rotation: R) -> Result<Self, MwDustError> {
        let config = DustConfig {
            map: MapKind::Ebv,
            interp: true,
            ..config.clone()
        };
        Ok(GalDust {
            map: DustMap::new(&config)?,
            rotation,
        })
    }

    pub fn map(&self) -> &DustMap {
        &self.map
    }

    /// SFD98 E(B-V) at `(ra, dec)` in degrees.
    pub fn ebv(&self, ra: Degree, dec: Degree) -> Result<ReadOutcome<Magnitude>, MwDustError> {
        let (l, b) = self.rotation.to_galactic(ra, dec);
        log::debug!("RA={ra:.5} DEC={dec:.5} -> l={l:.5} b={b:.5}");
        Ok(self.map.value(l, b)?.map(f64::from))
    }

    /// E(B-V) and SDSS band extinctions at `(ra, dec)` in degrees.
    ///
    /// Arguments
    /// -----------------
    /// * `ra`, `dec`: Equatorial J2000 coordinates in degrees.
    ///
    /// Return
    /// ----------
    /// * The extinctions with the read shortfall of the map, or the error of
    ///   the map lookup (missing file, undecodable header).
    ///
    /// See also
    /// ------------
    /// * [`GalDust::lookup_extinctions`] – Many positions at once.
    pub fn lookup_extinction(
        &self,
        ra: Degree,
        dec: Degree,
    ) -> Result<ReadOutcome<BandExtinction>, MwDustError> {
        Ok(self.ebv(ra, dec)?.map(BandExtinction::from_ebv))
    }

    /// [`GalDust::lookup_extinction`] for many positions, in input order.
    pub fn lookup_extinctions(
        &self,
        radec: &[(Degree, Degree)],
    ) -> Result<ReadOutcome<Vec<BandExtinction>>, MwDustError> {
        let points: Vec<(Degree, Degree)> = radec
            .iter()
            .map(|&(ra, dec)| self.rotation.to_galactic(ra, dec))
            .collect();
        Ok(self.map.values(&points)?.map(|values| {
            values
                .into_iter()
                .map(|ebv| BandExtinction::from_ebv(f64::from(ebv)))
                .collect()
        }))
    }

    /// E(B-V) and its error at `(ra, dec)` according to `option`.
    ///
    /// The map is only read when the option needs it; see [`mwebv::modify_mwebv`].
    pub fn modify_mwebv(
        &self,
        option: MwebvOption,
        ra: Degree,
        dec: Degree,
        file_ebv: f64,
        file_err: f64,
    ) -> Result<(f64, f64), MwDustError> {
        mwebv::modify_mwebv(option, file_ebv, file_err, || {
            Ok(self.ebv(ra, dec)?.values)
        })
    }
}

/// E(B-V) and SDSS band extinctions at `(ra, dec)` with the default configuration.
///
/// The maps are read from the directory resolved by [`DustConfig::resolve_root`].
pub fn lookup_extinction(
    ra: Degree,
    dec: Degree,
) -> Result<ReadOutcome<BandExtinction>, MwDustError> {
    GalDust::new(&DustConfig::default())?.lookup_extinction(ra, dec)
}
