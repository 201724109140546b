//! Region geometry and the row-parallel evaluation loops.

use rayon::prelude::*;

use super::kernels::Kernel;
use super::CpuImage;
use crate::backend::{DeviceImage, Status};
use crate::config::BorderPolicy;
use crate::image::{Point, Size, CHANNELS};

/// Where the processed region sits and which source rectangle neighbours
/// are clamped to.
#[derive(Clone, Copy, Debug)]
pub(super) struct Window {
    origin: Point,
    bounds: Size,
    roi: Size,
}

impl Window {
    /// Region at the top-left of the allocation; neighbours come from the
    /// surrounding allocation and are clamped at its edge.
    pub fn unbordered(src: &CpuImage, dst: &CpuImage, roi: Size) -> Result<Self, Status> {
        check_roi(roi, dst)?;
        if roi.width > src.size().width || roi.height > src.size().height {
            return Err(Status::SIZE_ERROR);
        }
        Ok(Window {
            origin: Point::default(),
            bounds: src.size(),
            roi,
        })
    }

    /// Region at `src_offset` inside a `src_size` source; pixels beyond the
    /// source are replicated from its edge.
    pub fn bordered(
        src: &CpuImage,
        src_size: Size,
        src_offset: Point,
        dst: &CpuImage,
        roi: Size,
        border: BorderPolicy,
    ) -> Result<Self, Status> {
        if border != BorderPolicy::Replicate {
            return Err(Status::NOT_SUPPORTED_MODE_ERROR);
        }
        check_roi(roi, dst)?;
        if src_size.is_empty()
            || src_size.width > src.size().width
            || src_size.height > src.size().height
            || !src_size.contains_region(src_offset, roi)
        {
            return Err(Status::SIZE_ERROR);
        }
        Ok(Window {
            origin: src_offset,
            bounds: src_size,
            roi,
        })
    }

    #[inline]
    fn source_x(&self, x: usize, k: usize, anchor: usize) -> usize {
        (self.origin.x as isize + x as isize + k as isize - anchor as isize)
            .clamp(0, self.bounds.width as isize - 1) as usize
    }

    #[inline]
    fn source_y(&self, y: usize, k: usize, anchor: usize) -> usize {
        (self.origin.y as isize + y as isize + k as isize - anchor as isize)
            .clamp(0, self.bounds.height as isize - 1) as usize
    }
}

fn check_roi(roi: Size, dst: &CpuImage) -> Result<(), Status> {
    if dst.pitch() < dst.size().width * CHANNELS {
        return Err(Status::STEP_ERROR);
    }
    if roi.is_empty() || roi.width > dst.size().width || roi.height > dst.size().height {
        return Err(Status::SIZE_ERROR);
    }
    Ok(())
}

/// Evaluate a linear kernel over the region, writing `dst` rows in parallel.
pub(super) fn convolve(src: &CpuImage, dst: &mut CpuImage, window: &Window, kernel: &Kernel) {
    let src_pitch = src.pitch;
    let dst_pitch = dst.pitch;

    dst.data
        .par_chunks_mut(dst_pitch)
        .take(window.roi.height)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..window.roi.width {
                let mut sum = [0i64; CHANNELS];

                for ky in 0..kernel.height {
                    let sy = window.source_y(y, ky, kernel.anchor.y);
                    let src_row = &src.data[sy * src_pitch..];

                    for kx in 0..kernel.width {
                        let w = kernel.weights[ky * kernel.width + kx];
                        if w == 0 {
                            continue;
                        }
                        let sx = window.source_x(x, kx, kernel.anchor.x) * CHANNELS;
                        for c in 0..CHANNELS {
                            sum[c] += w * src_row[sx + c] as i64;
                        }
                    }
                }

                for c in 0..CHANNELS {
                    row[x * CHANNELS + c] = kernel.finish(sum[c]);
                }
            }
        });
}

/// Adaptive Wiener filter.
///
/// Per channel, with local mean `m` and variance `v` over the mask and noise
/// variance `n` (scaled from [0, 1] to the 8-bit range):
/// `out = m + max(v - n, 0) / max(v, n) * (x - m)`.
pub(super) fn wiener(
    src: &CpuImage,
    dst: &mut CpuImage,
    window: &Window,
    mask: Size,
    anchor: Point,
    noise: [f32; 3],
) {
    let src_pitch = src.pitch;
    let dst_pitch = dst.pitch;
    let count = (mask.width * mask.height) as f64;
    let noise_var = noise.map(|n| n as f64 * 255.0 * 255.0);

    dst.data
        .par_chunks_mut(dst_pitch)
        .take(window.roi.height)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..window.roi.width {
                let mut sum = [0f64; CHANNELS];
                let mut sum_sq = [0f64; CHANNELS];

                for ky in 0..mask.height {
                    let sy = window.source_y(y, ky, anchor.y);
                    let src_row = &src.data[sy * src_pitch..];
                    for kx in 0..mask.width {
                        let sx = window.source_x(x, kx, anchor.x) * CHANNELS;
                        for c in 0..CHANNELS {
                            let v = src_row[sx + c] as f64;
                            sum[c] += v;
                            sum_sq[c] += v * v;
                        }
                    }
                }

                // Centre pixel: kernel offset equal to the anchor
                let cy = window.source_y(y, anchor.y, anchor.y);
                let cx = window.source_x(x, anchor.x, anchor.x) * CHANNELS;
                let centre = &src.data[cy * src_pitch + cx..cy * src_pitch + cx + CHANNELS];

                for c in 0..CHANNELS {
                    let mean = sum[c] / count;
                    let var = (sum_sq[c] / count - mean * mean).max(0.0);
                    let gain = if var > 0.0 {
                        (var - noise_var[c]).max(0.0) / var.max(noise_var[c])
                    } else {
                        0.0
                    };
                    let value = mean + gain * (centre[c] as f64 - mean);
                    row[x * CHANNELS + c] = value.round().clamp(0.0, 255.0) as u8;
                }
            }
        });
}
