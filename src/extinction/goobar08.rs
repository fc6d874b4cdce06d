//! Goobar (2008) power law for circumstellar dust.
use crate::constants::{Angstrom, Magnitude, WAVE_V};

/// `AV·(1 - A + A·(λ/λ_V)^P)`; parameters and domain are checked by the caller.
///
/// `P = -1.5, A = 0.9` mimics Milky Way circumstellar dust, `P = -2.5, A = 0.8`
/// the LMC.
pub(super) fn goobar08(p: f64, a: f64, av: Magnitude, wave: Angstrom) -> Magnitude {
    av * (1.0 - a + a * (wave / WAVE_V).powf(p))
}
