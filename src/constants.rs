//! # Constants and type definitions for mwdust
//!
//! This module centralizes the **conversion factors**, **format constants**, the
//! **validity domains of the color laws**, and the **common type aliases** used
//! throughout the crate.
//!
//! ## Overview
//!
//! - Angle conversions (degrees ↔ radians)
//! - FITS block geometry (card width, cards per block, block size)
//! - Reference wavelengths and per-band E(B-V) → A(band) ratios
//! - Wavelength domains and parameter bounds of each color law
//! - Type aliases shared by the projection, map and law modules

// -------------------------------------------------------------------------------------------------
// Angle conversions
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Radians → degrees (`k = 180/π` in the zenithal equal-area formulas)
pub const DEGRAD: f64 = 180.0 / std::f64::consts::PI;

// -------------------------------------------------------------------------------------------------
// FITS block geometry
// -------------------------------------------------------------------------------------------------

/// Width of one header card in bytes
pub const CARD_LEN: usize = 80;

/// Width of the label field at the start of a card
pub const LABEL_LEN: usize = 8;

/// Number of cards in one FITS block
pub const CARDS_PER_BLOCK: usize = 36;

/// Size of a FITS block in bytes (header and data are padded to this)
pub const BLOCK_LEN: usize = CARD_LEN * CARDS_PER_BLOCK;

// -------------------------------------------------------------------------------------------------
// Photometric constants
// -------------------------------------------------------------------------------------------------

/// V-band reference wavelength in Angstroms (AV is defined here)
pub const WAVE_V: f64 = 5495.0;

/// A(band)/E(B-V) for the SDSS u, g, r, i, z filters
pub const SDSS_BAND_RATIOS: [f64; 5] = [5.155, 3.793, 2.751, 2.086, 1.479];

/// Filter names matching [`SDSS_BAND_RATIOS`]
pub const SDSS_BANDS: [char; 5] = ['u', 'g', 'r', 'i', 'z'];

/// Value used by callers to flag a missing optional law parameter
pub const MISSING_PARAM: f64 = -99.0;

// -------------------------------------------------------------------------------------------------
// Color law domains
// -------------------------------------------------------------------------------------------------

/// Largest wavelength (Å) for the polynomial Fitzpatrick 99 approximation
pub const WAVEMAX_FITZ99: f64 = 15000.0;

/// Wavelength domain (Å) of the Fitzpatrick 99 spline family (F99, G03, F04, G16)
pub const WAVEMIN_FITZ99_EXACT: f64 = 1000.0;
pub const WAVEMAX_FITZ99_EXACT: f64 = 33333.3;

/// Below this wavelength (Å) the F99 family switches from the spline to FM90
pub const WAVE_FM90_SPLIT: f64 = 2700.0;

/// The only RV accepted by Gordon et al. 2003 (SMC bar)
pub const RV_GORD03: f64 = 2.74;

/// RVA bounds for Gordon et al. 2016 (bounds of the F99 component)
pub const RVMIN_FITZ99: f64 = 2.0;
pub const RVMAX_FITZ99: f64 = 6.0;

/// Goobar 2008 power-law bounds
pub const WAVEMIN_GOOB08: f64 = 1000.0;
pub const WAVEMAX_GOOB08: f64 = 25000.0;
pub const PMIN_GOOB08: f64 = -4.0;
pub const PMAX_GOOB08: f64 = 0.0;

/// Maiz Apellaniz 2014 domain (Å)
pub const WAVEMIN_MAIZ14: f64 = 3000.0;
pub const WAVEMAX_MAIZ14: f64 = 33333.3;

/// Fitzpatrick 2019 domain (Å), the table stops at 8.7 inverse microns
pub const WAVEMIN_FITZ19: f64 = 1149.5;
pub const WAVEMAX_FITZ19: f64 = 33333.3;

/// Gordon 2023 domain (Å)
pub const WAVEMIN_GORD23: f64 = 912.0;
pub const WAVEMAX_GORD23: f64 = 320000.0;

/// Sommovigo 2025 domain (Å)
pub const WAVEMIN_SOMM25: f64 = 912.0;
pub const WAVEMAX_SOMM25: f64 = 320000.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Wavelength in Angstroms
pub type Angstrom = f64;
/// Wavenumber in inverse microns
pub type InvMicron = f64;
/// Extinction in magnitudes
pub type Magnitude = f64;

/// Convert a wavelength in Angstroms to a wavenumber in inverse microns.
#[inline]
pub fn inverse_microns(wave: Angstrom) -> InvMicron {
    10000.0 / wave
}
