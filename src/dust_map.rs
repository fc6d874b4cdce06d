//! # All-sky dust maps in polar projection
//!
//! Each quantity is stored as two images, one per galactic hemisphere, in a
//! zenithal equal-area projection centred on the pole. A lookup picks the
//! image from the sign of the latitude (`b >= 0` is north), projects `(l, b)`
//! to a fractional pixel and samples it.
//!
//! ## Sampling
//!
//! * **Nearest**: the pixel whose center is closest, clamped to the image.
//! * **Interpolated**: bilinear blend of the surrounding 2×2 block, see
//!   [`BilinearStencil`]. The mask map is never interpolated.
//!
//! ## Reading strategies
//!
//! * Per point (default): every point reads its own pixel or 2×2 block.
//! * Batch (`noloop`): all points of a hemisphere are projected first, then the
//!   smallest sub-image covering them is read once and sampled in memory.
//!
//! Both strategies return the same values. Pixels missing at the end of a
//! truncated file read as 0 and are counted in [`ReadOutcome::shortfall`].
//!
//! Headers are read once per hemisphere and kept for the lifetime of the
//! [`DustMap`]; pixel data are read on every lookup.
use std::{fmt, str::FromStr};

use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::config::DustConfig;
use crate::constants::Degree;
use crate::fits::{FitsFile, ReadOutcome};
use crate::mwdust_errors::MwDustError;
use crate::projection::Projection;
use crate::sampling::{nearest_pixel, BilinearStencil};

/// Quantity stored in a map pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MapKind {
    /// Reddening E(B-V) in magnitudes
    #[default]
    Ebv,
    /// 100 micron intensity in MJy/sr
    I100,
    /// Temperature correction factor
    X,
    /// Dust temperature in K
    T,
    /// Mask bits
    #[serde(rename = "mask")]
    Mask,
}

impl MapKind {
    pub const ALL: [MapKind; 5] = [
        MapKind::Ebv,
        MapKind::I100,
        MapKind::X,
        MapKind::T,
        MapKind::Mask,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MapKind::Ebv => "Ebv",
            MapKind::I100 => "I100",
            MapKind::X => "X",
            MapKind::T => "T",
            MapKind::Mask => "mask",
        }
    }

    /// File name of the image of hemisphere `hemi`.
    pub fn file_name(self, hemi: Hemisphere) -> String {
        let stem = match self {
            MapKind::Ebv => "SFD_dust_4096",
            MapKind::I100 => "SFD_i100_4096",
            MapKind::X => "SFD_xmap",
            MapKind::T => "SFD_temp",
            MapKind::Mask => "SFD_mask_4096",
        };
        format!("{stem}_{}.fits", hemi.tag())
    }

    /// Mask values are bit fields and are never interpolated.
    pub fn interpolates(self) -> bool {
        self != MapKind::Mask
    }
}

impl FromStr for MapKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown map '{s}', expected one of {}",
                    MapKind::ALL.iter().map(|k| k.name()).join(", ")
                )
            })
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Galactic hemisphere, selecting one image of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub fn of_latitude(b: Degree) -> Self {
        if b >= 0.0 {
            Hemisphere::North
        } else {
            Hemisphere::South
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Hemisphere::North => "ngp",
            Hemisphere::South => "sgp",
        }
    }

    fn index(self) -> usize {
        match self {
            Hemisphere::North => 0,
            Hemisphere::South => 1,
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Header, projection and size of one hemisphere image.
#[derive(Debug, Clone)]
struct HemisphereImage {
    file: FitsFile,
    projection: Projection,
    axes: [usize; 2],
}

impl HemisphereImage {
    fn open(path: &Utf8Path) -> Result<Self, MwDustError> {
        let file = FitsFile::open(path)?;
        let axes = match file.axes()[..] {
            [nx, ny] => [nx, ny],
            ref other => {
                return Err(MwDustError::InvalidCardValue {
                    label: "NAXIS".into(),
                    value: other.len().to_string(),
                })
            }
        };
        let projection = Projection::from_header(file.header())?;
        Ok(HemisphereImage {
            file,
            projection,
            axes,
        })
    }

    /// Both axes must have two pixels for a 2×2 block.
    fn can_interpolate(&self) -> bool {
        self.axes.iter().all(|&n| n >= 2)
    }
}

/// Where a point is sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Sample {
    Nearest([usize; 2]),
    Bilinear(BilinearStencil),
}

impl Sample {
    fn first(&self) -> [usize; 2] {
        match self {
            Sample::Nearest(p) => *p,
            Sample::Bilinear(s) => s.origin,
        }
    }

    fn last(&self) -> [usize; 2] {
        match self {
            Sample::Nearest(p) => *p,
            Sample::Bilinear(s) => s.end(),
        }
    }
}

/// One map quantity with its north and south images.
///
/// See also
/// ------------
/// * [`DustMap::value`] – One point.
/// * [`DustMap::values`] – Many points, per point or in batch.
#[derive(Debug)]
pub struct DustMap {
    kind: MapKind,
    paths: [Utf8PathBuf; 2],
    interp: bool,
    noloop: bool,
    verbose: bool,
    images: [OnceCell<HemisphereImage>; 2],
}

impl DustMap {
    /// Map described by `config`; no file is opened until the first lookup.
    pub fn new(config: &DustConfig) -> Result<Self, MwDustError> {
        Ok(DustMap {
            kind: config.map,
            paths: config.map_paths()?,
            interp: config.effective_interp(),
            noloop: config.noloop,
            verbose: config.verbose,
            images: [OnceCell::new(), OnceCell::new()],
        })
    }

    pub fn kind(&self) -> MapKind {
        self.kind
    }

    pub fn path(&self, hemi: Hemisphere) -> &Utf8Path {
        &self.paths[hemi.index()]
    }

    pub fn interpolates(&self) -> bool {
        self.interp
    }

    pub fn is_batch(&self) -> bool {
        self.noloop
    }

    fn image(&self, hemi: Hemisphere) -> Result<&HemisphereImage, MwDustError> {
        self.images[hemi.index()].get_or_try_init(|| HemisphereImage::open(self.path(hemi)))
    }

    /// Fractional pixel of `(l, b)` in the image of its hemisphere.
    pub fn project(&self, l: Degree, b: Degree) -> Result<(Hemisphere, f64, f64), MwDustError> {
        let hemi = Hemisphere::of_latitude(b);
        let (fx, fy) = self.image(hemi)?.projection.lb_to_fpix(l, b);
        Ok((hemi, fx, fy))
    }

    fn sample(&self, image: &HemisphereImage, fx: f64, fy: f64) -> Sample {
        if self.interp && image.can_interpolate() {
            Sample::Bilinear(BilinearStencil::new(fx, fy, image.axes))
        } else {
            Sample::Nearest(nearest_pixel(fx, fy, image.axes))
        }
    }

    fn log_point(&self, l: Degree, b: Degree, hemi: Hemisphere, fx: f64, fy: f64, value: f32) {
        if self.verbose {
            log::info!("{l:8.3} {b:7.3} {hemi} {fx:8.2} {fy:8.2} {value:12.5}");
        }
    }

    /// Map value at galactic `(l, b)` in degrees.
    ///
    /// Return
    /// ----------
    /// * The value and the number of pixels missing from a truncated file.
    /// * [`MwDustError::MapFileOpen`] if the image of the hemisphere cannot be
    ///   opened, or a header error if its projection cannot be decoded.
    pub fn value(&self, l: Degree, b: Degree) -> Result<ReadOutcome<f32>, MwDustError> {
        let hemi = Hemisphere::of_latitude(b);
        let image = self.image(hemi)?;
        let (fx, fy) = image.projection.lb_to_fpix(l, b);

        let outcome = match self.sample(image, fx, fy) {
            Sample::Nearest(pix) => image.file.read_point(&pix)?,
            Sample::Bilinear(stencil) => image
                .file
                .read_subimage(&stencil.origin, &stencil.end())?
                .map(|block| stencil.apply_in_block(&block, stencil.origin, 2) as f32),
        };
        self.log_point(l, b, hemi, fx, fy, outcome.values);
        Ok(outcome)
    }

    /// Map values at many galactic `(l, b)` points, in input order.
    ///
    /// In batch mode one sub-image per hemisphere is read, otherwise each point
    /// is read on its own. The shortfalls of all reads are summed.
    pub fn values(&self, points: &[(Degree, Degree)]) -> Result<ReadOutcome<Vec<f32>>, MwDustError> {
        if !self.noloop {
            let mut shortfall = 0;
            let values = points
                .iter()
                .map(|&(l, b)| {
                    let outcome = self.value(l, b)?;
                    shortfall += outcome.shortfall;
                    Ok(outcome.values)
                })
                .collect::<Result<Vec<f32>, MwDustError>>()?;
            return Ok(ReadOutcome::new(values, shortfall));
        }

        let mut values = vec![0.0f32; points.len()];
        let mut shortfall = 0;
        for hemi in [Hemisphere::North, Hemisphere::South] {
            let members: Vec<usize> = (0..points.len())
                .filter(|&i| Hemisphere::of_latitude(points[i].1) == hemi)
                .collect();
            if members.is_empty() {
                continue;
            }
            shortfall += self.fill_hemisphere(hemi, points, &members, &mut values)?;
        }
        Ok(ReadOutcome::new(values, shortfall))
    }

    /// Batch read of the points `members` lying in `hemi`.
    fn fill_hemisphere(
        &self,
        hemi: Hemisphere,
        points: &[(Degree, Degree)],
        members: &[usize],
        values: &mut [f32],
    ) -> Result<usize, MwDustError> {
        let image = self.image(hemi)?;
        let samples: Vec<(f64, f64, Sample)> = members
            .iter()
            .map(|&i| {
                let (l, b) = points[i];
                let (fx, fy) = image.projection.lb_to_fpix(l, b);
                (fx, fy, self.sample(image, fx, fy))
            })
            .collect();

        let start = [0, 1].map(|axis| {
            samples
                .iter()
                .map(|(_, _, s)| s.first()[axis])
                .min()
                .unwrap_or(0)
        });
        let end = [0, 1].map(|axis| {
            samples
                .iter()
                .map(|(_, _, s)| s.last()[axis])
                .max()
                .unwrap_or(0)
        });
        let xsize = end[0] - start[0] + 1;
        log::debug!(
            "{}: reading sub-image {start:?}..={end:?} for {} points",
            self.path(hemi),
            members.len()
        );
        let block = image.file.read_subimage(&start, &end)?;

        for (&i, &(fx, fy, sample)) in members.iter().zip(&samples) {
            let value = match sample {
                Sample::Nearest([x, y]) => block
                    .values
                    .get((x - start[0]) + (y - start[1]) * xsize)
                    .copied()
                    .unwrap_or(0.0),
                Sample::Bilinear(stencil) => {
                    stencil.apply_in_block(&block.values, start, xsize) as f32
                }
            };
            let (l, b) = points[i];
            self.log_point(l, b, hemi, fx, fy, value);
            values[i] = value;
        }
        Ok(block.shortfall)
    }
}

#[cfg(test)]
mod test_dust_map {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(
            MapKind::Ebv.file_name(Hemisphere::North),
            "SFD_dust_4096_ngp.fits"
        );
        assert_eq!(MapKind::X.file_name(Hemisphere::South), "SFD_xmap_sgp.fits");
        assert_eq!(MapKind::T.file_name(Hemisphere::North), "SFD_temp_ngp.fits");
        assert_eq!(
            MapKind::Mask.file_name(Hemisphere::South),
            "SFD_mask_4096_sgp.fits"
        );
        assert_eq!(
            MapKind::I100.file_name(Hemisphere::South),
            "SFD_i100_4096_sgp.fits"
        );
    }

    #[test]
    fn test_parse_map_kind() {
        for kind in MapKind::ALL {
            assert_eq!(kind.name().parse::<MapKind>(), Ok(kind));
        }
        assert!("Mask".parse::<MapKind>().is_err());
        assert!(!MapKind::Mask.interpolates());
        assert!(MapKind::T.interpolates());
    }

    #[test]
    fn test_hemisphere_sign() {
        assert_eq!(Hemisphere::of_latitude(0.0), Hemisphere::North);
        assert_eq!(Hemisphere::of_latitude(-0.0), Hemisphere::North);
        assert_eq!(Hemisphere::of_latitude(-1e-9), Hemisphere::South);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let map = DustMap::new(&DustConfig::with_root(root.clone())).unwrap();
        assert_eq!(
            map.value(10.0, 20.0),
            Err(MwDustError::MapFileOpen {
                path: root.join("SFD_dust_4096_ngp.fits"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        );
    }
}
