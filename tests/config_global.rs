use camino::Utf8PathBuf;

use mwdust::config::{global_root, set_global_root, DustConfig};
use mwdust::dust_map::{DustMap, Hemisphere, MapKind};
use mwdust::galdust::GalDust;
use mwdust::mwdust_errors::MwDustError;

mod common;
use common::synthetic_root;

// One test only: the global root is set once per process.
#[test]
fn test_global_root_is_set_once() {
    let (_dir, root) = synthetic_root(&[MapKind::Ebv]);
    assert_eq!(global_root(), None);

    set_global_root(root.clone()).unwrap();
    assert_eq!(global_root(), Some(root.as_path()));
    assert_eq!(
        set_global_root("/elsewhere"),
        Err(MwDustError::ConfigAlreadySet(root.clone()))
    );
    assert_eq!(global_root(), Some(root.as_path()));

    // configurations without their own root read from the global one
    let config = DustConfig::default();
    assert_eq!(config.resolve_root().unwrap(), root);
    let map = DustMap::new(&config).unwrap();
    assert_eq!(
        map.path(Hemisphere::South),
        root.join("SFD_dust_4096_sgp.fits").as_path()
    );
    assert!(map.value(45.0, -45.0).unwrap().is_complete());

    // an explicit root still wins
    let explicit = DustConfig::with_root("/maps");
    assert_eq!(
        explicit.resolve_root().unwrap(),
        Utf8PathBuf::from("/maps")
    );

    // the free function uses the default configuration, hence the global root
    let from_default = mwdust::galdust::lookup_extinction(150.1, 2.2).unwrap();
    let from_root = GalDust::with_root(root.clone())
        .unwrap()
        .lookup_extinction(150.1, 2.2)
        .unwrap();
    assert_eq!(from_default, from_root);
}
