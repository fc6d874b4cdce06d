use approx::assert_abs_diff_eq;

use mwdust::config::DustConfig;
use mwdust::constants::SDSS_BAND_RATIOS;
use mwdust::dust_map::{DustMap, Hemisphere, MapKind};
use mwdust::galactic::{Fk5Galactic, SkyRotation};
use mwdust::galdust::GalDust;
use mwdust::mwebv::MwebvOption;

mod common;
use common::{expected_fpix, plane, synthetic_root, truncate_image, use_zea_north, SOUTH_OFFSET};

const POINTS: [(f64, f64); 10] = [
    (12.0, 34.5),
    (90.0, 20.0),
    (181.3, 60.0),
    (275.0, 81.0),
    (359.9, 45.0),
    (0.0, -20.0),
    (45.0, -33.3),
    (200.0, -75.0),
    (300.5, -12.0),
    (123.0, -89.5),
];

fn config(root: &camino::Utf8Path, map: MapKind, interp: bool, noloop: bool) -> DustConfig {
    DustConfig {
        root: Some(root.to_path_buf()),
        map,
        interp,
        noloop,
        verbose: false,
    }
}

fn nearest_value(l: f64, b: f64) -> f64 {
    let (fx, fy) = expected_fpix(l, b);
    plane(Hemisphere::of_latitude(b), fx.round(), fy.round())
}

#[test]
fn test_interpolated_lookup_matches_plane() {
    let (_dir, root) = synthetic_root(&[MapKind::Ebv]);
    let map = DustMap::new(&config(&root, MapKind::Ebv, true, false)).unwrap();
    for (l, b) in POINTS {
        let (fx, fy) = expected_fpix(l, b);
        let outcome = map.value(l, b).unwrap();
        assert!(outcome.is_complete());
        assert_abs_diff_eq!(
            outcome.values as f64,
            plane(Hemisphere::of_latitude(b), fx, fy),
            epsilon = 1e-4
        );
    }
}

#[test]
fn test_nearest_lookup() {
    let (_dir, root) = synthetic_root(&[MapKind::T]);
    let map = DustMap::new(&config(&root, MapKind::T, false, false)).unwrap();
    for (l, b) in POINTS {
        let value = map.value(l, b).unwrap().values as f64;
        assert_abs_diff_eq!(value, nearest_value(l, b), epsilon = 1e-5);
    }
}

#[test]
fn test_hemisphere_from_latitude_sign() {
    let (_dir, root) = synthetic_root(&[MapKind::Ebv]);
    let map = DustMap::new(&config(&root, MapKind::Ebv, true, false)).unwrap();
    assert!(map.value(10.0, 30.0).unwrap().values < SOUTH_OFFSET as f32);
    assert!(map.value(10.0, -30.0).unwrap().values > SOUTH_OFFSET as f32);
    // the equator belongs to the north image
    assert!(map.value(10.0, 0.0).unwrap().values < SOUTH_OFFSET as f32);
}

#[test]
fn test_batch_matches_per_point() {
    let (_dir, root) = synthetic_root(&[MapKind::I100]);
    for interp in [true, false] {
        let per_point = DustMap::new(&config(&root, MapKind::I100, interp, false))
            .unwrap()
            .values(&POINTS)
            .unwrap();
        let batch = DustMap::new(&config(&root, MapKind::I100, interp, true))
            .unwrap()
            .values(&POINTS)
            .unwrap();
        assert_eq!(per_point, batch);
        assert_eq!(batch.values.len(), POINTS.len());
        assert_eq!(batch.shortfall, 0);
    }
}

#[test]
fn test_batch_single_hemisphere_and_empty() {
    let (_dir, root) = synthetic_root(&[MapKind::X]);
    let map = DustMap::new(&config(&root, MapKind::X, true, true)).unwrap();
    let north: Vec<(f64, f64)> = POINTS.iter().copied().filter(|p| p.1 >= 0.0).collect();
    let values = map.values(&north).unwrap().values;
    for ((l, b), v) in north.iter().zip(values) {
        assert_eq!(v, map.value(*l, *b).unwrap().values);
    }
    assert!(map.values(&[]).unwrap().values.is_empty());
}

#[test]
fn test_mask_is_never_interpolated() {
    let (_dir, root) = synthetic_root(&[MapKind::Mask]);
    let map = DustMap::new(&config(&root, MapKind::Mask, true, false)).unwrap();
    assert!(!map.interpolates());
    for (l, b) in POINTS {
        let value = map.value(l, b).unwrap().values as f64;
        assert_abs_diff_eq!(value, nearest_value(l, b), epsilon = 1e-5);
    }
}

#[test]
fn test_zea_header_matches_lambert() {
    let (_dir, root) = synthetic_root(&[MapKind::Ebv]);
    let lambert = DustMap::new(&config(&root, MapKind::Ebv, true, false)).unwrap();
    let expected: Vec<f32> = POINTS
        .iter()
        .map(|&(l, b)| lambert.value(l, b).unwrap().values)
        .collect();

    use_zea_north(&root);
    let zea = DustMap::new(&config(&root, MapKind::Ebv, true, false)).unwrap();
    for ((l, b), want) in POINTS.iter().zip(expected) {
        assert_abs_diff_eq!(zea.value(*l, *b).unwrap().values, want, epsilon = 1e-4);
    }
}

#[test]
fn test_truncated_map_reports_shortfall() {
    let (_dir, root) = synthetic_root(&[MapKind::Ebv]);
    truncate_image(&root.join("SFD_dust_4096_ngp.fits"), 10 * common::NPIX);

    let nearest = DustMap::new(&config(&root, MapKind::Ebv, false, false)).unwrap();
    let pole = nearest.value(0.0, 90.0).unwrap();
    assert_eq!(pole.values, 0.0);
    assert_eq!(pole.shortfall, 1);

    let interp = DustMap::new(&config(&root, MapKind::Ebv, true, false)).unwrap();
    assert_eq!(interp.value(0.0, 90.0).unwrap().shortfall, 4);

    // rows 5 and 6 are still on disk
    let (fx, fy) = expected_fpix(90.0, 20.0);
    let kept = interp.value(90.0, 20.0).unwrap();
    assert!(kept.is_complete());
    assert_abs_diff_eq!(
        kept.values as f64,
        plane(Hemisphere::North, fx, fy),
        epsilon = 1e-4
    );

    let batch = DustMap::new(&config(&root, MapKind::Ebv, true, true))
        .unwrap()
        .values(&[(90.0, 20.0), (0.0, 90.0)])
        .unwrap();
    assert!(batch.shortfall > 0);
    assert_eq!(batch.values[0], kept.values);
}

#[test]
fn test_band_extinctions_at_equatorial_positions() {
    let (_dir, root) = synthetic_root(&[MapKind::Ebv]);
    let dust = GalDust::with_root(root.clone()).unwrap();
    let rotation = Fk5Galactic::new();

    for (ra, dec) in [(150.1, 2.2), (10.68, 41.27), (192.86, 27.13), (83.6, -5.4)] {
        let (l, b) = rotation.to_galactic(ra, dec);
        assert!(b.abs() > 10.0);
        let (fx, fy) = expected_fpix(l, b);
        let expected = plane(Hemisphere::of_latitude(b), fx, fy);

        let outcome = dust.lookup_extinction(ra, dec).unwrap();
        assert!(outcome.is_complete());
        let ext = outcome.values;
        assert_abs_diff_eq!(ext.ebv, expected, epsilon = 1e-4);
        for (band, ratio) in ext.bands.iter().zip(SDSS_BAND_RATIOS) {
            assert_abs_diff_eq!(*band, ratio * ext.ebv, epsilon = 1e-12);
        }
    }

    let many = dust
        .lookup_extinctions(&[(150.1, 2.2), (83.6, -5.4)])
        .unwrap()
        .values;
    assert_eq!(many[0], dust.lookup_extinction(150.1, 2.2).unwrap().values);
    assert_eq!(many[1], dust.lookup_extinction(83.6, -5.4).unwrap().values);
}

#[test]
fn test_mwebv_options_from_map() {
    let (_dir, root) = synthetic_root(&[MapKind::Ebv]);
    let dust = GalDust::with_root(root).unwrap();
    let sfd = dust.ebv(150.1, 2.2).unwrap().values;

    let (ebv, err) = dust
        .modify_mwebv(MwebvOption::Sfd98, 150.1, 2.2, 0.0, 0.0)
        .unwrap();
    assert_abs_diff_eq!(ebv, sfd, epsilon = 1e-12);
    assert_abs_diff_eq!(err, sfd / 6.0, epsilon = 1e-12);

    let (ebv, err) = dust
        .modify_mwebv(MwebvOption::Sch11Ps2013, 150.1, 2.2, 0.0, 0.0)
        .unwrap();
    assert_abs_diff_eq!(ebv, 0.86 * sfd, epsilon = 1e-12);
    assert_abs_diff_eq!(err, 0.05 * 0.86 * sfd, epsilon = 1e-12);
}
