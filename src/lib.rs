//! # mwdust
//!
//! Milky Way dust extinction for a sky position and a wavelength.
//!
//! * [`fits`] reads and writes the fixed-block images holding the SFD maps.
//! * [`projection`] and [`sampling`] turn galactic `(l, b)` into map pixels.
//! * [`dust_map`] looks up one of the five SFD quantities, [`galdust`] gives
//!   E(B-V) and the SDSS band extinctions at `(RA, DEC)`.
//! * [`extinction`] evaluates the wavelength-dependent color laws.
pub mod config;
pub mod constants;
pub mod dust_map;
pub mod extinction;
pub mod fits;
pub mod galactic;
pub mod galdust;
pub mod mwdust_errors;
pub mod mwebv;
pub mod projection;
pub mod sampling;
pub mod spline;
