//! Gordon et al. (2023) UV to mid-IR curve.
//!
//! `A(λ)/A(V) = a(x) + b(x)·(1/R(V) - 1/3.1)` where `a` and `b` are built
//! from three overlapping pieces: FM90 in the UV, a quartic with three Drude
//! features in the optical, and in the IR a smoothly joined double power law
//! with two asymmetric silicate features (`b` is a single power law). The
//! pieces are blended with a smoothstep weight over 0.30-0.33 µm and
//! 0.9-1.1 µm.
use crate::constants::{inverse_microns, Angstrom, InvMicron, Magnitude};

use super::fitzpatrick::Fm90;

const UV_A: Fm90 = Fm90 {
    c1: 0.81297,
    c2: 0.2775,
    c3: 1.06295,
    c4: 0.11303,
    c5: 5.90,
    x02: 21.16,
    gamma2: 0.9801,
};

const UV_B: Fm90 = Fm90 {
    c1: -2.97868,
    c2: 1.89808,
    c3: 3.10334,
    c4: 0.65484,
    c5: 5.90,
    x02: 21.16,
    gamma2: 0.9801,
};

/// Optical Drude features: `(x0, fwhm, a amplitude, b amplitude)`.
const OPTICAL_DRUDE: [(InvMicron, f64, f64, f64); 3] = [
    (2.288, 0.243, 0.03893, 0.18453),
    (2.054, 0.179, 0.02965, 0.19728),
    (1.587, 0.243, 0.01747, 0.1713),
];

/// Double power law of the IR `a` curve.
const IR_SCALE: f64 = 0.38526;
const IR_ALPHA: f64 = 1.68467;
const IR_ALPHA2: f64 = 0.78791;
const IR_SWAVE: f64 = 4.30578;
const IR_SWIDTH: f64 = 4.78338;

/// Silicate features: `(amplitude, center µm, fwhm µm, asymmetry)`.
const SILICATES: [(f64, f64, f64, f64); 2] = [
    (0.06652, 9.8434, 2.21205, -0.24703),
    (0.0267, 19.58294, 17.0, -0.27),
];

/// `(3 - 2f)·f²`
fn smoothstep(f: f64) -> f64 {
    (3.0 - 2.0 * f) * f * f
}

/// Drude profile in inverse microns.
fn drude(x: InvMicron, x0: InvMicron, fwhm: f64) -> f64 {
    let fx = fwhm * fwhm / (x0 * x0);
    let xx = x / x0 - x0 / x;
    fx / (xx * xx + fx)
}

/// Asymmetric Drude profile in microns.
fn silicate(mwave: f64, (amp, center, fwhm, asym): (f64, f64, f64, f64)) -> f64 {
    let gamma = 2.0 * fwhm / (1.0 + (asym * (mwave - center)).exp());
    let gx2 = gamma * gamma / (center * center);
    let xx = mwave / center - center / mwave;
    amp * gx2 / (xx * xx + gx2)
}

fn uv_weight(x: InvMicron, mwave: f64) -> f64 {
    if x > 1.0 / 0.30 {
        1.0
    } else {
        1.0 - smoothstep((mwave - 0.3) / 0.03)
    }
}

fn optical_weight(x: InvMicron, mwave: f64) -> f64 {
    if 1.0 / 0.9 < x && x < 1.0 / 0.33 {
        1.0
    } else if x >= 1.0 / 0.33 {
        smoothstep((mwave - 0.3) / 0.03)
    } else {
        1.0 - smoothstep((mwave - 0.9) / 0.2)
    }
}

fn ir_weight(x: InvMicron, mwave: f64) -> f64 {
    if x < 1.0 / 1.1 {
        1.0
    } else {
        smoothstep((mwave - 0.9) / 0.2)
    }
}

/// `a(x)` and `b(x)` summed over the pieces covering `x`.
fn gordon23_ab(x: InvMicron, mwave: f64) -> (f64, f64) {
    let mut a = 0.0;
    let mut b = 0.0;

    if (1.0 / 0.33..=1.0 / 0.09).contains(&x) {
        let w = uv_weight(x, mwave);
        a += w * UV_A.eval(x);
        b += w * UV_B.eval(x);
    }

    if (1.0 / 1.1..1.0 / 0.3).contains(&x) {
        let w = optical_weight(x, mwave);
        let (x2, x3, x4) = (x * x, x * x * x, x * x * x * x);
        a += w * (-0.35848 + 0.7122 * x + 0.08746 * x2 - 0.05403 * x3 + 0.00674 * x4);
        b += w * (0.12354 - 2.68335 * x + 2.01901 * x2 - 0.39299 * x3 + 0.03355 * x4);
        for (x0, fwhm, amp_a, amp_b) in OPTICAL_DRUDE {
            let d = drude(x, x0, fwhm);
            a += w * amp_a * d;
            b += w * amp_b * d;
        }
    }

    if (1.0 / 35.0..1.0 / 0.9).contains(&x) {
        let w = ir_weight(x, mwave);
        let fweight = (mwave - (IR_SWAVE - 0.5 * IR_SWIDTH)) / IR_SWIDTH;
        let pweight = smoothstep(fweight.clamp(0.0, 1.0));
        let ratio = IR_SWAVE.powf(-IR_ALPHA) / IR_SWAVE.powf(-IR_ALPHA2);
        a += w * IR_SCALE * (1.0 - pweight) * mwave.powf(-IR_ALPHA);
        a += w * IR_SCALE * ratio * pweight * mwave.powf(-IR_ALPHA2);
        a += w * SILICATES.iter().map(|&s| silicate(mwave, s)).sum::<f64>();
        b += -1.01251 * w * x.powf(1.06099);
    }

    (a, b)
}

/// Gordon 2023 extinction in magnitudes; the domain is checked by the caller.
pub(super) fn gordon23(rv: f64, av: Magnitude, wave: Angstrom) -> Magnitude {
    let (a, b) = gordon23_ab(inverse_microns(wave), wave / 10000.0);
    av * (a + b * (1.0 / rv - 1.0 / 3.1))
}
