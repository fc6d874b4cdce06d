//! Maiz Apellaniz et al. (2014) CCM-like curve.
//!
//! IR power law below 1 inverse micron, then per-segment cubics in `x - x_q`
//! for both the `a` and `b` curves over ten knot intervals. The knots do not
//! depend on R(V).
use crate::constants::{inverse_microns, Angstrom, InvMicron, Magnitude};

use super::ccm89::ir_power_law;

const KNOTS: [InvMicron; 11] = [1.0, 1.15, 1.81984, 2.1, 2.27015, 2.7, 3.5, 3.9, 4.0, 4.1, 4.2];

/// Coefficients of the `a` curve, highest power first: `[x³, x², x, 1]`.
const A_COEFFS: [[f64; 4]; 10] = [
    [-3.09348541, 5.57088021e-1, 9.24140000e-1, 5.74000000e-1],
    [2.28902153e-1, -8.34980412e-1, 8.82456141e-1, 7.14714967e-1],
    [5.41605406e-1, -3.74996957e-1, 7.19649009e-2, 9.99971669e-1],
    [-6.37404842e-1, 8.02115549e-2, -1.06221772e-2, 1.00260970],
    [3.52950213e-1, -2.45151747e-1, -3.86867508e-2, 9.99984676e-1],
    [-5.91231605e-2, 2.09995201e-1, -5.37987921e-2, 9.66090893e-1],
    [-5.56727269, 6.80996157e-2, 1.68677061e-1, 1.02717773],
    [48.1384135, -6.61262761, -2.44913414, 7.49239041e-1],
    [-11.6556097, 7.82889643, -2.32750725, 4.86337764e-1],
    [-12.6892172, 4.33221353, -1.11139626, 3.20220393e-1],
];

/// Coefficients of the `b` curve, same layout as [`A_COEFFS`].
const B_COEFFS: [[f64; 4]; 10] = [
    [6.11543973, -2.49479124e-1, -8.48470000e-1, -5.27000000e-1],
    [-4.71924979e-1, 2.50246875, -5.10521556e-1, -6.39244171e-1],
    [-3.75700076, 1.55412607, 2.20674792, -2.26082358e-4],
    [3.30710701, -1.60355793, 2.19289909, 6.57384043e-1],
    [-6.80610047e-1, 8.45548471e-2, 1.93444072, 1.00037205],
    [4.81511488e-1, -7.93125839e-1, 1.62986148, 1.79345802],
    [17.8352808, 3.62501733e-1, 1.28536219, 2.83628055],
    [-124.325934, 21.7648387, 10.1362984, 4.54988367],
    [12.0120271, -15.5329415, 10.7594881, 5.65683596],
    [48.1516935, -11.9293334, 8.01326059, 6.58946738],
];

/// Index of the knot interval containing `x`, capped to the last interval.
fn segment(x: InvMicron) -> usize {
    (0..KNOTS.len() - 1)
        .find(|&q| x < KNOTS[q + 1])
        .unwrap_or(KNOTS.len() - 2)
}

fn cubic([c3, c2, c1, c0]: [f64; 4], t: f64) -> f64 {
    ((c3 * t + c2) * t + c1) * t + c0
}

/// `a(x)` and `b(x)` of the curve.
fn maiz14_ab(x: InvMicron) -> (f64, f64) {
    if x < 1.0 {
        return ir_power_law(x);
    }
    let q = segment(x);
    let t = x - KNOTS[q];
    (cubic(A_COEFFS[q], t), cubic(B_COEFFS[q], t))
}

/// `AV·(a + b/RV)`; the domain is checked by the caller.
pub(super) fn maiz14(rv: f64, av: Magnitude, wave: Angstrom) -> Magnitude {
    let (a, b) = maiz14_ab(inverse_microns(wave));
    av * (a + b / rv)
}

#[cfg(test)]
mod test_maiz14 {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_segments() {
        assert_eq!(segment(1.0), 0);
        assert_eq!(segment(1.149), 0);
        assert_eq!(segment(1.15), 1);
        assert_eq!(segment(3.3), 5);
        assert_eq!(segment(4.15), 9);
        assert_eq!(segment(7.0), 9);
    }

    #[test]
    fn test_continuous_at_knots() {
        for q in 1..KNOTS.len() - 1 {
            let x = KNOTS[q];
            let (a_left, b_left) = (
                cubic(A_COEFFS[q - 1], x - KNOTS[q - 1]),
                cubic(B_COEFFS[q - 1], x - KNOTS[q - 1]),
            );
            let (a_right, b_right) = maiz14_ab(x);
            assert_abs_diff_eq!(a_left, a_right, epsilon = 1e-5);
            assert_abs_diff_eq!(b_left, b_right, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_joins_power_law() {
        let below = maiz14(3.1, 1.0, 10000.0 / (1.0 - 1e-9));
        let above = maiz14(3.1, 1.0, 10000.0);
        assert_abs_diff_eq!(below, above, epsilon = 1e-5);
        assert_abs_diff_eq!(above, 0.574 - 0.527 / 3.1, epsilon = 1e-12);
    }

    #[test]
    fn test_reference_values() {
        assert_abs_diff_eq!(maiz14(3.1, 1.0, 5495.0), 0.99990, epsilon = 1e-4);
        assert_abs_diff_eq!(maiz14(3.1, 1.0, 4405.0), 1.32268, epsilon = 1e-4);
        assert_abs_diff_eq!(maiz14(3.1, 1.0, 3000.0), 1.84958, epsilon = 1e-4);
    }
}
