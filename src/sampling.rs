//! Nearest-pixel and bilinear sampling of fractional pixel coordinates.
//!
//! Bilinear sampling uses the 2×2 block whose lower corner is the floor of the
//! fractional coordinate, clamped to `[0, naxis - 2]` on each axis. The weights
//! of the four corners `(x, y)`, `(x+1, y)`, `(x, y+1)`, `(x+1, y+1)` are
//! `dx·dy`, `(1-dx)·dy`, `dx·(1-dy)`, `(1-dx)·(1-dy)` where `dx` is the weight
//! of the lower column: they are non-negative and sum to 1.

/// Nearest pixel of a fractional coordinate, clamped to the image.
pub fn nearest_pixel(fx: f64, fy: f64, axes: [usize; 2]) -> [usize; 2] {
    let clamp = |f: f64, n: usize| -> usize {
        let i = (f + 0.5).floor();
        if i <= 0.0 {
            0
        } else {
            (i as usize).min(n.saturating_sub(1))
        }
    };
    [clamp(fx, axes[0]), clamp(fy, axes[1])]
}

/// Lower corner and weights of a bilinear interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilinearStencil {
    pub origin: [usize; 2],
    pub weights: [f64; 4],
}

impl BilinearStencil {
    /// Stencil of the fractional coordinate `(fx, fy)` on an image of size `axes`.
    pub fn new(fx: f64, fy: f64, axes: [usize; 2]) -> Self {
        let (x, dx) = lower_corner(fx, axes[0]);
        let (y, dy) = lower_corner(fy, axes[1]);
        BilinearStencil {
            origin: [x, y],
            weights: [
                dx * dy,
                (1.0 - dx) * dy,
                dx * (1.0 - dy),
                (1.0 - dx) * (1.0 - dy),
            ],
        }
    }

    /// Upper corner of the 2×2 block (inclusive).
    pub fn end(&self) -> [usize; 2] {
        [self.origin[0] + 1, self.origin[1] + 1]
    }

    /// Weighted sum of the four corner values, in stencil order.
    pub fn apply(&self, corners: [f32; 4]) -> f64 {
        self.weights
            .iter()
            .zip(corners)
            .map(|(w, v)| w * v as f64)
            .sum()
    }

    /// Sample from a dense block whose first pixel is `block_start` and row length `xsize`.
    pub fn apply_in_block(&self, block: &[f32], block_start: [usize; 2], xsize: usize) -> f64 {
        let at = |dx: usize, dy: usize| {
            let i = self.origin[0] + dx - block_start[0]
                + (self.origin[1] + dy - block_start[1]) * xsize;
            block.get(i).copied().unwrap_or(0.0)
        };
        self.apply([at(0, 0), at(1, 0), at(0, 1), at(1, 1)])
    }
}

/// Floor of `f` clamped to `[0, n - 2]` and the weight of that column.
fn lower_corner(f: f64, n: usize) -> (usize, f64) {
    let i = f.floor();
    if i < 0.0 {
        (0, 1.0)
    } else if i >= n.saturating_sub(1) as f64 {
        (n.saturating_sub(2), 0.0)
    } else {
        (i as usize, i - f + 1.0)
    }
}

#[cfg(test)]
mod test_sampling {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_nearest_rounds_and_clamps() {
        assert_eq!(nearest_pixel(2.49, 2.5, [10, 10]), [2, 3]);
        assert_eq!(nearest_pixel(9.7, -0.7, [10, 10]), [9, 0]);
        assert_eq!(nearest_pixel(12.0, 3.0, [10, 10]), [9, 3]);
    }

    #[test]
    fn test_weights_sum_to_one() {
        for &(fx, fy) in &[(0.3, 0.9), (4.5, 2.25), (-3.0, 8.7), (9.6, 9.0), (8.999, 0.0)] {
            let s = BilinearStencil::new(fx, fy, [10, 10]);
            assert!(s.weights.iter().all(|&w| w >= 0.0));
            assert_abs_diff_eq!(s.weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
            assert!(s.origin[0] <= 8 && s.origin[1] <= 8);
        }
    }

    #[test]
    fn test_integer_coordinates_match_nearest() {
        let image: Vec<f32> = (0..100).map(|i| (i * i % 37) as f32).collect();
        for (x, y) in [(0usize, 0usize), (3, 4), (8, 8), (9, 9), (9, 0), (0, 9)] {
            let s = BilinearStencil::new(x as f64, y as f64, [10, 10]);
            let v = s.apply_in_block(&image, [0, 0], 10);
            let [nx, ny] = nearest_pixel(x as f64, y as f64, [10, 10]);
            assert_abs_diff_eq!(v, image[nx + ny * 10] as f64, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_bilinear_plane_is_exact() {
        // f(x, y) = 2x + 3y is reproduced anywhere inside the image
        let image: Vec<f32> = (0..100).map(|i| (2 * (i % 10) + 3 * (i / 10)) as f32).collect();
        let s = BilinearStencil::new(4.25, 6.75, [10, 10]);
        assert_eq!(s.origin, [4, 6]);
        let v = s.apply_in_block(&image, [0, 0], 10);
        assert_abs_diff_eq!(v, 2.0 * 4.25 + 3.0 * 6.75, epsilon = 1e-9);
    }
}
