//! # Dust map configuration
//!
//! [`DustConfig`] gathers the options of a map lookup: where the map files
//! live, which quantity to read, and how to sample it. It can be built in code,
//! from the command line, or loaded from a JSON file:
//!
//! ```json
//! { "root": "/data/MWDUST", "map": "Ebv", "interp": true, "noloop": false, "verbose": false }
//! ```
//!
//! Missing fields take their default value.
//!
//! ## Root directory
//!
//! The directory holding the map files is resolved in this order:
//!
//! 1. the `root` field of the configuration,
//! 2. the process-wide root set once with [`set_global_root`],
//! 3. `$SNDATA_ROOT/MWDUST`,
//! 4. the current directory.
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::dust_map::{Hemisphere, MapKind};
use crate::mwdust_errors::MwDustError;

/// Environment variable pointing to the data tree holding `MWDUST/`.
pub const SNDATA_ROOT: &str = "SNDATA_ROOT";

/// Sub-directory of `$SNDATA_ROOT` with the map files.
pub const MWDUST_SUBDIR: &str = "MWDUST";

static GLOBAL_ROOT: OnceCell<Utf8PathBuf> = OnceCell::new();

/// Set the process-wide map directory.
///
/// Return
/// ----------
/// * [`MwDustError::ConfigAlreadySet`] (holding the current value) if the root was already set.
pub fn set_global_root(root: impl Into<Utf8PathBuf>) -> Result<(), MwDustError> {
    GLOBAL_ROOT
        .set(root.into())
        .map_err(|_| MwDustError::ConfigAlreadySet(GLOBAL_ROOT.get().cloned().unwrap_or_default()))
}

/// The process-wide map directory, if set.
pub fn global_root() -> Option<&'static Utf8Path> {
    GLOBAL_ROOT.get().map(Utf8PathBuf::as_path)
}

/// `$SNDATA_ROOT/MWDUST`, if the variable is set.
fn env_root() -> Result<Option<Utf8PathBuf>, MwDustError> {
    match std::env::var_os(SNDATA_ROOT) {
        None => Ok(None),
        Some(value) => {
            let base = Utf8PathBuf::from_path_buf(value.into())
                .map_err(|p| MwDustError::Utf8PathError(p.display().to_string()))?;
            Ok(Some(base.join(MWDUST_SUBDIR)))
        }
    }
}

/// Options of a dust map lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DustConfig {
    /// Directory of the map files, see the module documentation for the fallback.
    pub root: Option<Utf8PathBuf>,
    pub map: MapKind,
    /// Bilinear interpolation of the four nearest pixels (ignored for the mask).
    pub interp: bool,
    /// Read one sub-image per hemisphere instead of one read per point.
    pub noloop: bool,
    /// Log the pixel coordinates and value of every point.
    pub verbose: bool,
}

impl Default for DustConfig {
    fn default() -> Self {
        DustConfig {
            root: None,
            map: MapKind::Ebv,
            interp: true,
            noloop: false,
            verbose: false,
        }
    }
}

impl DustConfig {
    /// Default options reading maps from `root`.
    pub fn with_root(root: impl Into<Utf8PathBuf>) -> Self {
        DustConfig {
            root: Some(root.into()),
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: JSON file, unknown fields are rejected.
    ///
    /// Return
    /// ----------
    /// * The configuration, [`MwDustError::InvalidConfig`] if the content cannot
    ///   be parsed, or [`MwDustError::IoError`] if the file cannot be read.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, MwDustError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, MwDustError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, MwDustError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Directory holding the map files.
    pub fn resolve_root(&self) -> Result<Utf8PathBuf, MwDustError> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }
        if let Some(root) = global_root() {
            return Ok(root.to_path_buf());
        }
        Ok(env_root()?.unwrap_or_else(|| Utf8PathBuf::from(".")))
    }

    /// Paths of the north and south images of the selected map.
    pub fn map_paths(&self) -> Result<[Utf8PathBuf; 2], MwDustError> {
        let root = self.resolve_root()?;
        Ok([Hemisphere::North, Hemisphere::South].map(|h| root.join(self.map.file_name(h))))
    }

    /// Whether the lookup interpolates, which the mask never does.
    pub fn effective_interp(&self) -> bool {
        self.interp && self.map.interpolates()
    }
}
