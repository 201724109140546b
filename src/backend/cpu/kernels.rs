//! Integer kernels for the linear filters.

use crate::backend::{FixedMask, Status};
use crate::config::defaults::MAX_MASK_SIDE;
use crate::image::{Point, Size};

/// How an accumulated sum becomes an output sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Output {
    /// Clamp to 0-255.
    Saturate,
    /// Magnitude, clamped to 255.
    Absolute,
}

/// Row-major integer kernel, applied as a correlation whose window starts
/// `anchor` pixels up and left of the output pixel.
#[derive(Clone, Debug)]
pub(super) struct Kernel {
    pub width: usize,
    pub height: usize,
    pub anchor: Point,
    pub weights: Vec<i64>,
    pub divisor: i64,
    pub output: Output,
}

impl Kernel {
    fn fixed<const N: usize>(rows: [[i64; N]; N], divisor: i64, output: Output) -> Self {
        Kernel {
            width: N,
            height: N,
            anchor: Point::new(N / 2, N / 2),
            weights: rows.iter().flatten().copied().collect(),
            divisor,
            output,
        }
    }

    fn square(side: usize, weights: Vec<i64>, divisor: i64, output: Output) -> Self {
        Kernel {
            width: side,
            height: side,
            anchor: Point::new(side / 2, side / 2),
            weights,
            divisor,
            output,
        }
    }

    /// Mean over an arbitrary mask.
    pub fn box_filter(mask: Size, anchor: Point) -> Result<Self, Status> {
        check_mask(mask, anchor)?;
        Ok(Kernel {
            width: mask.width,
            height: mask.height,
            anchor,
            weights: vec![1; mask.width * mask.height],
            divisor: (mask.width * mask.height) as i64,
            output: Output::Saturate,
        })
    }

    pub fn sobel_horiz() -> Self {
        Self::fixed([[1, 2, 1], [0, 0, 0], [-1, -2, -1]], 1, Output::Absolute)
    }

    pub fn sobel_vert() -> Self {
        Self::fixed([[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]], 1, Output::Absolute)
    }

    pub fn roberts_up() -> Self {
        Self::fixed([[0, 0, 0], [0, 1, 0], [-1, 0, 0]], 1, Output::Absolute)
    }

    pub fn roberts_down() -> Self {
        Self::fixed([[0, 0, 0], [0, 1, 0], [0, 0, -1]], 1, Output::Absolute)
    }

    pub fn laplace(mask: FixedMask) -> Result<Self, Status> {
        match mask {
            FixedMask::Size3x3 => Ok(Self::fixed(
                [[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]],
                1,
                Output::Absolute,
            )),
            FixedMask::Size5x5 => Ok(Self::fixed(
                [
                    [-1, -3, -4, -3, -1],
                    [-3, 0, 6, 0, -3],
                    [-4, 6, 20, 6, -4],
                    [-3, 0, 6, 0, -3],
                    [-1, -3, -4, -3, -1],
                ],
                1,
                Output::Absolute,
            )),
            _ => Err(Status::MASK_SIZE_ERROR),
        }
    }

    /// Binomial approximation of a Gaussian, any odd size up to 15x15.
    pub fn gauss(mask: FixedMask) -> Self {
        let side = mask.side();
        let row = binomial_row(side);
        let weights = row
            .iter()
            .flat_map(|&a| row.iter().map(move |&b| a * b))
            .collect();
        let divisor = 1i64 << (2 * (side - 1));
        Self::square(side, weights, divisor, Output::Saturate)
    }

    pub fn high_pass(mask: FixedMask) -> Result<Self, Status> {
        match mask {
            FixedMask::Size3x3 | FixedMask::Size5x5 => {
                let side = mask.side();
                let mut weights = vec![-1; side * side];
                weights[side * side / 2] = (side * side - 1) as i64;
                Ok(Self::square(side, weights, 1, Output::Saturate))
            }
            _ => Err(Status::MASK_SIZE_ERROR),
        }
    }

    pub fn low_pass(mask: FixedMask) -> Result<Self, Status> {
        match mask {
            FixedMask::Size3x3 | FixedMask::Size5x5 => {
                let side = mask.side();
                Ok(Self::square(side, vec![1; side * side], (side * side) as i64, Output::Saturate))
            }
            _ => Err(Status::MASK_SIZE_ERROR),
        }
    }

    pub fn sharpen() -> Self {
        Self::fixed([[-1, -1, -1], [-1, 16, -1], [-1, -1, -1]], 8, Output::Saturate)
    }

    /// Turn an accumulated sum into an output sample.
    #[inline]
    pub fn finish(&self, sum: i64) -> u8 {
        let value = if self.divisor == 1 {
            sum
        } else {
            (sum as f64 / self.divisor as f64).round() as i64
        };
        match self.output {
            Output::Saturate => value.clamp(0, 255) as u8,
            Output::Absolute => value.abs().min(255) as u8,
        }
    }
}

/// Largest mask area the primitives accept.
pub(super) const MAX_MASK_AREA: usize = MAX_MASK_SIDE * MAX_MASK_SIDE;

/// Reject empty or oversized masks and anchors outside the mask.
pub(super) fn check_mask(mask: Size, anchor: Point) -> Result<(), Status> {
    match mask.checked_area() {
        Some(area) if area > 0 && area <= MAX_MASK_AREA => {}
        _ => return Err(Status::MASK_SIZE_ERROR),
    }
    if anchor.x >= mask.width || anchor.y >= mask.height {
        return Err(Status::ANCHOR_ERROR);
    }
    Ok(())
}

/// Row `n - 1` of Pascal's triangle.
fn binomial_row(n: usize) -> Vec<i64> {
    let mut row = vec![1i64; n];
    for k in 1..n.saturating_sub(1) {
        row[k] = row[k - 1] * (n - k) as i64 / k as i64;
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial_rows() {
        assert_eq!(binomial_row(3), vec![1, 2, 1]);
        assert_eq!(binomial_row(5), vec![1, 4, 6, 4, 1]);
        assert_eq!(binomial_row(7), vec![1, 6, 15, 20, 15, 6, 1]);
    }

    #[test]
    fn test_gauss_weights_sum_to_divisor() {
        for mask in FixedMask::ALL {
            let kernel = Kernel::gauss(mask);
            let sum: i64 = kernel.weights.iter().sum();
            assert_eq!(sum, kernel.divisor, "{}", mask);
            assert_eq!(kernel.anchor, Point::new(mask.side() / 2, mask.side() / 2));
        }
    }

    #[test]
    fn test_derivative_kernels_sum_to_zero() {
        let kernels = [
            Kernel::sobel_horiz(),
            Kernel::sobel_vert(),
            Kernel::roberts_up(),
            Kernel::roberts_down(),
            Kernel::laplace(FixedMask::Size3x3).unwrap(),
            Kernel::laplace(FixedMask::Size5x5).unwrap(),
            Kernel::high_pass(FixedMask::Size3x3).unwrap(),
            Kernel::high_pass(FixedMask::Size5x5).unwrap(),
        ];
        for kernel in kernels {
            assert_eq!(kernel.weights.iter().sum::<i64>(), 0);
        }
    }

    #[test]
    fn test_sharpen_preserves_flat_areas() {
        let kernel = Kernel::sharpen();
        let sum: i64 = kernel.weights.iter().map(|w| w * 100).sum();
        assert_eq!(kernel.finish(sum), 100);
    }

    #[test]
    fn test_unsupported_fixed_masks() {
        assert_eq!(Kernel::laplace(FixedMask::Size7x7).err(), Some(Status::MASK_SIZE_ERROR));
        assert_eq!(Kernel::low_pass(FixedMask::Size9x9).err(), Some(Status::MASK_SIZE_ERROR));
        assert_eq!(Kernel::high_pass(FixedMask::Size15x15).err(), Some(Status::MASK_SIZE_ERROR));
    }

    #[test]
    fn test_box_mask_checks() {
        assert_eq!(
            Kernel::box_filter(Size::new(0, 3), Point::new(0, 0)).err(),
            Some(Status::MASK_SIZE_ERROR)
        );
        assert_eq!(
            Kernel::box_filter(Size::new(3, 3), Point::new(3, 1)).err(),
            Some(Status::ANCHOR_ERROR)
        );
        assert_eq!(
            Kernel::box_filter(Size::new(1 << 33, 1 << 33), Point::new(0, 0)).err(),
            Some(Status::MASK_SIZE_ERROR)
        );
        assert_eq!(
            Kernel::box_filter(Size::new(100_000, 100_000), Point::new(0, 0)).err(),
            Some(Status::MASK_SIZE_ERROR)
        );
    }

    #[test]
    fn test_finish_output_modes() {
        let sobel = Kernel::sobel_horiz();
        assert_eq!(sobel.finish(-300), 255);
        assert_eq!(sobel.finish(-40), 40);

        let sharpen = Kernel::sharpen();
        assert_eq!(sharpen.finish(-80), 0);
        assert_eq!(sharpen.finish(8 * 300), 255);
    }
}
