#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

use mwdust::constants::BLOCK_LEN;
use mwdust::dust_map::{Hemisphere, MapKind};
use mwdust::fits::{write_fits, FitsHeader, FitsImage, ImageData};
use mwdust::projection::lambert_lb_to_xy;

/// Side of the synthetic hemisphere images.
pub const NPIX: usize = 64;

/// Radius of the `b = 0` circle in pixels.
pub const SCALE: f64 = 32.0;

/// Reference pixel (one-indexed) of the projection center.
pub const CRPIX: f64 = 32.5;

/// Added to every south pixel so the hemispheres cannot be confused.
pub const SOUTH_OFFSET: f64 = 10.0;

/// Pixel value of the synthetic maps, a plane in pixel coordinates.
pub fn plane(hemi: Hemisphere, x: f64, y: f64) -> f64 {
    let offset = match hemi {
        Hemisphere::North => 0.0,
        Hemisphere::South => SOUTH_OFFSET,
    };
    offset + 0.01 * x + 0.02 * y
}

fn nsgp(hemi: Hemisphere) -> i64 {
    match hemi {
        Hemisphere::North => 1,
        Hemisphere::South => -1,
    }
}

pub fn lambert_header(hemi: Hemisphere) -> FitsHeader {
    let mut h = FitsHeader::new_primary();
    h.add_card_int("BITPIX", -32);
    h.add_card_int("NAXIS", 2);
    h.add_card_int("NAXIS1", NPIX as i64);
    h.add_card_int("NAXIS2", NPIX as i64);
    h.add_card_string("CTYPE1", "LAMBERT--X");
    h.add_card_string("CTYPE2", "LAMBERT--Y");
    h.add_card_real("CRVAL1", 0.0);
    h.add_card_real("CRVAL2", 0.0);
    h.add_card_real("CRPIX1", CRPIX);
    h.add_card_real("CRPIX2", CRPIX);
    h.add_card_int("LAM_NSGP", nsgp(hemi));
    h.add_card_real("LAM_SCAL", SCALE);
    h
}

/// North polar ZEA header describing the same grid as [`lambert_header`].
pub fn zea_north_header() -> FitsHeader {
    let cdelt = 2.0 * mwdust::constants::DEGRAD / (std::f64::consts::SQRT_2 * SCALE);
    let mut h = FitsHeader::new_primary();
    h.add_card_int("BITPIX", -32);
    h.add_card_int("NAXIS", 2);
    h.add_card_int("NAXIS1", NPIX as i64);
    h.add_card_int("NAXIS2", NPIX as i64);
    h.add_card_string("CTYPE1", "GLON-ZEA");
    h.add_card_string("CTYPE2", "GLAT-ZEA");
    h.add_card_real("CRVAL1", 270.0);
    h.add_card_real("CRVAL2", 90.0);
    h.add_card_real("CRPIX1", CRPIX);
    h.add_card_real("CRPIX2", CRPIX);
    h.add_card_real("CDELT1", cdelt);
    h.add_card_real("CDELT2", -cdelt);
    h
}

/// Fractional pixel of `(l, b)` in the synthetic Lambert images.
pub fn expected_fpix(l: f64, b: f64) -> (f64, f64) {
    let hemi = Hemisphere::of_latitude(b);
    let (x, y) = lambert_lb_to_xy(l, b, nsgp(hemi) as f64, SCALE);
    (x + CRPIX - 1.0, y + CRPIX - 1.0)
}

fn plane_image(header: FitsHeader, hemi: Hemisphere) -> FitsImage {
    let data = (0..NPIX * NPIX)
        .map(|i| plane(hemi, (i % NPIX) as f64, (i / NPIX) as f64) as f32)
        .collect();
    FitsImage::new(header, ImageData::F32(data)).unwrap()
}

pub fn write_image(path: &Utf8Path, image: &FitsImage) {
    write_fits(path, image).unwrap();
}

/// Temporary directory holding Lambert north and south images for every kind in `kinds`.
pub fn synthetic_root(kinds: &[MapKind]) -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    for &kind in kinds {
        for hemi in [Hemisphere::North, Hemisphere::South] {
            let image = plane_image(lambert_header(hemi), hemi);
            write_image(&root.join(kind.file_name(hemi)), &image);
        }
    }
    (dir, root)
}

/// Replace the north E(B-V) image by its ZEA equivalent.
pub fn use_zea_north(root: &Utf8Path) {
    let image = plane_image(zea_north_header(), Hemisphere::North);
    write_image(&root.join(MapKind::Ebv.file_name(Hemisphere::North)), &image);
}

/// Keep the header block and the first `pixels` floats of `path`.
pub fn truncate_image(path: &Utf8Path, pixels: usize) {
    let bytes = std::fs::read(path).unwrap();
    std::fs::write(path, &bytes[..BLOCK_LEN + pixels * 4]).unwrap();
}
