//! In-process reference backend.
//!
//! Device images are pitched host buffers whose rows are aligned the way a
//! device allocator aligns them, so every host/device copy goes through the
//! pitch-aware row path. Primitives evaluate their kernels row-parallel with
//! rayon and report invalid geometry through [`Status`] codes instead of
//! panicking.

mod convolve;
mod kernels;

use convolve::Window;
use kernels::{check_mask, Kernel};

use super::{DeviceImage, DeviceMemory, FilterPrimitives, FixedMask, Status};
use crate::config::BorderPolicy;
use crate::error::{Error, Result};
use crate::image::{HostImage, Point, Size, CHANNELS};

/// Row alignment of device allocations, in bytes.
pub const PITCH_ALIGNMENT: usize = 64;

/// Pitched 3-channel image owned by [`CpuBackend`].
#[derive(Clone, Debug)]
pub struct CpuImage {
    size: Size,
    pitch: usize,
    data: Vec<u8>,
}

impl CpuImage {
    /// Pixel bytes of row `y`, padding excluded.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.pitch;
        &self.data[start..start + self.size.width * CHANNELS]
    }
}

impl DeviceImage for CpuImage {
    fn size(&self) -> Size {
        self.size
    }

    fn pitch(&self) -> usize {
        self.pitch
    }
}

/// Reference implementation of the filter primitives.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        CpuBackend
    }
}

impl DeviceMemory for CpuBackend {
    type Image = CpuImage;

    fn allocate(&self, size: Size) -> Result<CpuImage> {
        if size.is_empty() {
            return Err(Error::DeviceTransferFailed(format!(
                "cannot allocate a {} image",
                size
            )));
        }
        let pitch = (size.width * CHANNELS).div_ceil(PITCH_ALIGNMENT) * PITCH_ALIGNMENT;
        Ok(CpuImage {
            size,
            pitch,
            data: vec![0; pitch * size.height],
        })
    }

    fn upload(&self, host: &HostImage) -> Result<CpuImage> {
        let mut image = self.allocate(host.size())?;
        let row_bytes = host.row_bytes();
        for y in 0..host.height() {
            let start = y * image.pitch;
            image.data[start..start + row_bytes].copy_from_slice(host.row(y));
        }
        Ok(image)
    }

    fn download(&self, image: &CpuImage) -> Result<HostImage> {
        let mut host = HostImage::new(image.size.width, image.size.height);
        for y in 0..image.size.height {
            host.row_mut(y).copy_from_slice(image.row(y));
        }
        Ok(host)
    }
}

fn run_linear(
    src: &CpuImage,
    dst: &mut CpuImage,
    window: std::result::Result<Window, Status>,
    kernel: std::result::Result<Kernel, Status>,
) -> Status {
    match (window, kernel) {
        (Ok(window), Ok(kernel)) => {
            convolve::convolve(src, dst, &window, &kernel);
            Status::SUCCESS
        }
        (Err(status), _) | (_, Err(status)) => status,
    }
}

impl FilterPrimitives for CpuBackend {
    fn describe(&self) -> String {
        format!(
            "CPU reference backend {} ({} worker threads)",
            env!("CARGO_PKG_VERSION"),
            rayon::current_num_threads()
        )
    }

    fn filter_box(&self, src: &CpuImage, dst: &mut CpuImage, roi: Size, mask: Size, anchor: Point) -> Status {
        let window = Window::unbordered(src, dst, roi);
        run_linear(src, dst, window, Kernel::box_filter(mask, anchor))
    }

    fn filter_box_border(
        &self,
        src: &CpuImage,
        src_size: Size,
        src_offset: Point,
        dst: &mut CpuImage,
        roi: Size,
        mask: Size,
        anchor: Point,
        border: BorderPolicy,
    ) -> Status {
        let window = Window::bordered(src, src_size, src_offset, dst, roi, border);
        run_linear(src, dst, window, Kernel::box_filter(mask, anchor))
    }

    fn filter_sobel_horiz(&self, src: &CpuImage, dst: &mut CpuImage, roi: Size) -> Status {
        let window = Window::unbordered(src, dst, roi);
        run_linear(src, dst, window, Ok(Kernel::sobel_horiz()))
    }

    fn filter_sobel_horiz_border(
        &self,
        src: &CpuImage,
        src_size: Size,
        src_offset: Point,
        dst: &mut CpuImage,
        roi: Size,
        border: BorderPolicy,
    ) -> Status {
        let window = Window::bordered(src, src_size, src_offset, dst, roi, border);
        run_linear(src, dst, window, Ok(Kernel::sobel_horiz()))
    }

    fn filter_sobel_vert(&self, src: &CpuImage, dst: &mut CpuImage, roi: Size) -> Status {
        let window = Window::unbordered(src, dst, roi);
        run_linear(src, dst, window, Ok(Kernel::sobel_vert()))
    }

    fn filter_sobel_vert_border(
        &self,
        src: &CpuImage,
        src_size: Size,
        src_offset: Point,
        dst: &mut CpuImage,
        roi: Size,
        border: BorderPolicy,
    ) -> Status {
        let window = Window::bordered(src, src_size, src_offset, dst, roi, border);
        run_linear(src, dst, window, Ok(Kernel::sobel_vert()))
    }

    fn filter_roberts_up(&self, src: &CpuImage, dst: &mut CpuImage, roi: Size) -> Status {
        let window = Window::unbordered(src, dst, roi);
        run_linear(src, dst, window, Ok(Kernel::roberts_up()))
    }

    fn filter_roberts_up_border(
        &self,
        src: &CpuImage,
        src_size: Size,
        src_offset: Point,
        dst: &mut CpuImage,
        roi: Size,
        border: BorderPolicy,
    ) -> Status {
        let window = Window::bordered(src, src_size, src_offset, dst, roi, border);
        run_linear(src, dst, window, Ok(Kernel::roberts_up()))
    }

    fn filter_roberts_down(&self, src: &CpuImage, dst: &mut CpuImage, roi: Size) -> Status {
        let window = Window::unbordered(src, dst, roi);
        run_linear(src, dst, window, Ok(Kernel::roberts_down()))
    }

    fn filter_roberts_down_border(
        &self,
        src: &CpuImage,
        src_size: Size,
        src_offset: Point,
        dst: &mut CpuImage,
        roi: Size,
        border: BorderPolicy,
    ) -> Status {
        let window = Window::bordered(src, src_size, src_offset, dst, roi, border);
        run_linear(src, dst, window, Ok(Kernel::roberts_down()))
    }

    fn filter_laplace(&self, src: &CpuImage, dst: &mut CpuImage, roi: Size, mask: FixedMask) -> Status {
        let window = Window::unbordered(src, dst, roi);
        run_linear(src, dst, window, Kernel::laplace(mask))
    }

    fn filter_laplace_border(
        &self,
        src: &CpuImage,
        src_size: Size,
        src_offset: Point,
        dst: &mut CpuImage,
        roi: Size,
        mask: FixedMask,
        border: BorderPolicy,
    ) -> Status {
        let window = Window::bordered(src, src_size, src_offset, dst, roi, border);
        run_linear(src, dst, window, Kernel::laplace(mask))
    }

    fn filter_gauss(&self, src: &CpuImage, dst: &mut CpuImage, roi: Size, mask: FixedMask) -> Status {
        let window = Window::unbordered(src, dst, roi);
        run_linear(src, dst, window, Ok(Kernel::gauss(mask)))
    }

    fn filter_gauss_border(
        &self,
        src: &CpuImage,
        src_size: Size,
        src_offset: Point,
        dst: &mut CpuImage,
        roi: Size,
        mask: FixedMask,
        border: BorderPolicy,
    ) -> Status {
        let window = Window::bordered(src, src_size, src_offset, dst, roi, border);
        run_linear(src, dst, window, Ok(Kernel::gauss(mask)))
    }

    fn filter_high_pass(&self, src: &CpuImage, dst: &mut CpuImage, roi: Size, mask: FixedMask) -> Status {
        let window = Window::unbordered(src, dst, roi);
        run_linear(src, dst, window, Kernel::high_pass(mask))
    }

    fn filter_high_pass_border(
        &self,
        src: &CpuImage,
        src_size: Size,
        src_offset: Point,
        dst: &mut CpuImage,
        roi: Size,
        mask: FixedMask,
        border: BorderPolicy,
    ) -> Status {
        let window = Window::bordered(src, src_size, src_offset, dst, roi, border);
        run_linear(src, dst, window, Kernel::high_pass(mask))
    }

    fn filter_low_pass(&self, src: &CpuImage, dst: &mut CpuImage, roi: Size, mask: FixedMask) -> Status {
        let window = Window::unbordered(src, dst, roi);
        run_linear(src, dst, window, Kernel::low_pass(mask))
    }

    fn filter_low_pass_border(
        &self,
        src: &CpuImage,
        src_size: Size,
        src_offset: Point,
        dst: &mut CpuImage,
        roi: Size,
        mask: FixedMask,
        border: BorderPolicy,
    ) -> Status {
        let window = Window::bordered(src, src_size, src_offset, dst, roi, border);
        run_linear(src, dst, window, Kernel::low_pass(mask))
    }

    fn filter_sharpen(&self, src: &CpuImage, dst: &mut CpuImage, roi: Size) -> Status {
        let window = Window::unbordered(src, dst, roi);
        run_linear(src, dst, window, Ok(Kernel::sharpen()))
    }

    fn filter_sharpen_border(
        &self,
        src: &CpuImage,
        src_size: Size,
        src_offset: Point,
        dst: &mut CpuImage,
        roi: Size,
        border: BorderPolicy,
    ) -> Status {
        let window = Window::bordered(src, src_size, src_offset, dst, roi, border);
        run_linear(src, dst, window, Ok(Kernel::sharpen()))
    }

    fn filter_wiener_border(
        &self,
        src: &CpuImage,
        src_size: Size,
        src_offset: Point,
        dst: &mut CpuImage,
        roi: Size,
        mask: Size,
        anchor: Point,
        noise: [f32; 3],
        border: BorderPolicy,
    ) -> Status {
        let window = match Window::bordered(src, src_size, src_offset, dst, roi, border) {
            Ok(window) => window,
            Err(status) => return status,
        };
        if let Err(status) = check_mask(mask, anchor) {
            return status;
        }
        convolve::wiener(src, dst, &window, mask, anchor, noise);
        Status::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> HostImage {
        let mut host = HostImage::new(width, height);
        for y in 0..height {
            for (x, px) in host.row_mut(y).chunks_exact_mut(CHANNELS).enumerate() {
                px.copy_from_slice(&[(x * 20) as u8, (y * 20) as u8, 100]);
            }
        }
        host
    }

    #[test]
    fn test_allocation_is_pitch_aligned() {
        let backend = CpuBackend::new();
        let image = backend.allocate(Size::new(10, 4)).unwrap();
        assert_eq!(image.pitch(), 64);
        assert_eq!(image.size(), Size::new(10, 4));

        let wide = backend.allocate(Size::new(30, 1)).unwrap();
        assert_eq!(wide.pitch(), 128);
    }

    #[test]
    fn test_empty_allocation_fails() {
        let backend = CpuBackend::new();
        assert!(matches!(
            backend.allocate(Size::new(0, 4)),
            Err(Error::DeviceTransferFailed(_))
        ));
    }

    #[test]
    fn test_upload_download_preserves_pixels() {
        let backend = CpuBackend::new();
        let host = gradient(7, 5);
        let device = backend.upload(&host).unwrap();
        assert_ne!(device.pitch(), host.pitch());
        assert_eq!(backend.download(&device).unwrap(), host);
    }

    #[test]
    fn test_box_on_flat_image_is_identity() {
        let backend = CpuBackend::new();
        let host = HostImage::filled(10, 10, [128, 128, 128]);
        let src = backend.upload(&host).unwrap();
        let mut dst = backend.allocate(host.size()).unwrap();

        let status = backend.filter_box(&src, &mut dst, host.size(), Size::new(5, 5), Point::new(2, 2));
        assert_eq!(status, Status::SUCCESS);
        assert_eq!(backend.download(&dst).unwrap(), host);
    }

    #[test]
    fn test_sobel_detects_vertical_edge() {
        let backend = CpuBackend::new();
        let mut host = HostImage::new(6, 6);
        for y in 0..6 {
            for (x, px) in host.row_mut(y).chunks_exact_mut(CHANNELS).enumerate() {
                px.fill(if x < 3 { 0 } else { 200 });
            }
        }
        let src = backend.upload(&host).unwrap();
        let mut dst = backend.allocate(host.size()).unwrap();

        let status = backend.filter_sobel_vert_border(
            &src,
            host.size(),
            Point::default(),
            &mut dst,
            host.size(),
            BorderPolicy::Replicate,
        );
        assert_eq!(status, Status::SUCCESS);

        let out = backend.download(&dst).unwrap();
        assert!(out.pixel(2, 3)[0] > 0);
        assert_eq!(out.pixel(0, 3), [0, 0, 0]);
        assert_eq!(out.pixel(5, 3), [0, 0, 0]);
    }

    #[test]
    fn test_bordered_offset_reads_inside_source() {
        let backend = CpuBackend::new();
        let host = gradient(8, 8);
        let src = backend.upload(&host).unwrap();
        let mut dst = backend.allocate(Size::new(2, 2)).unwrap();

        // 1x1 box copies the region at the offset
        let status = backend.filter_box_border(
            &src,
            host.size(),
            Point::new(3, 4),
            &mut dst,
            Size::new(2, 2),
            Size::new(1, 1),
            Point::new(0, 0),
            BorderPolicy::Replicate,
        );
        assert_eq!(status, Status::SUCCESS);

        let out = backend.download(&dst).unwrap();
        assert_eq!(out.pixel(0, 0), host.pixel(3, 4));
        assert_eq!(out.pixel(1, 1), host.pixel(4, 5));
    }

    #[test]
    fn test_invalid_geometry_reports_status() {
        let backend = CpuBackend::new();
        let host = gradient(4, 4);
        let src = backend.upload(&host).unwrap();
        let mut dst = backend.allocate(Size::new(4, 4)).unwrap();

        assert_eq!(
            backend.filter_sharpen(&src, &mut dst, Size::new(5, 4)),
            Status::SIZE_ERROR
        );
        assert_eq!(
            backend.filter_sharpen_border(
                &src,
                Size::new(4, 4),
                Point::new(1, 0),
                &mut dst,
                Size::new(4, 4),
                BorderPolicy::Replicate
            ),
            Status::SIZE_ERROR
        );
        assert_eq!(
            backend.filter_gauss_border(
                &src,
                Size::new(4, 4),
                Point::default(),
                &mut dst,
                Size::new(4, 4),
                FixedMask::Size3x3,
                BorderPolicy::None
            ),
            Status::NOT_SUPPORTED_MODE_ERROR
        );
        assert_eq!(
            backend.filter_laplace(&src, &mut dst, Size::new(4, 4), FixedMask::Size9x9),
            Status::MASK_SIZE_ERROR
        );
    }

    #[test]
    fn test_wiener_without_noise_keeps_detail() {
        let backend = CpuBackend::new();
        let host = gradient(6, 6);
        let src = backend.upload(&host).unwrap();
        let mut dst = backend.allocate(host.size()).unwrap();

        let status = backend.filter_wiener_border(
            &src,
            host.size(),
            Point::default(),
            &mut dst,
            host.size(),
            Size::new(3, 3),
            Point::new(1, 1),
            [0.0, 0.0, 0.0],
            BorderPolicy::Replicate,
        );
        assert_eq!(status, Status::SUCCESS);
        assert_eq!(backend.download(&dst).unwrap(), host);
    }

    #[test]
    fn test_far_offset_is_size_error() {
        let backend = CpuBackend::new();
        let host = gradient(8, 8);
        let src = backend.upload(&host).unwrap();
        let mut dst = backend.allocate(Size::new(4, 4)).unwrap();

        let status = backend.filter_roberts_up_border(
            &src,
            host.size(),
            Point::new(usize::MAX, 0),
            &mut dst,
            Size::new(4, 4),
            BorderPolicy::Replicate,
        );
        assert_eq!(status, Status::SIZE_ERROR);
    }

    #[test]
    fn test_oversized_masks_are_mask_size_errors() {
        let backend = CpuBackend::new();
        let host = gradient(4, 4);
        let src = backend.upload(&host).unwrap();
        let mut dst = backend.allocate(host.size()).unwrap();

        let huge = Size::new(1 << 33, 1 << 33);
        assert_eq!(
            backend.filter_box(&src, &mut dst, host.size(), huge, Point::new(0, 0)),
            Status::MASK_SIZE_ERROR
        );
        let status = backend.filter_wiener_border(
            &src,
            host.size(),
            Point::default(),
            &mut dst,
            host.size(),
            Size::new(100_000, 100_000),
            Point::new(0, 0),
            [0.1, 0.1, 0.1],
            BorderPolicy::Replicate,
        );
        assert_eq!(status, Status::MASK_SIZE_ERROR);
    }

    #[test]
    fn test_wiener_rejects_bad_anchor() {
        let backend = CpuBackend::new();
        let host = gradient(4, 4);
        let src = backend.upload(&host).unwrap();
        let mut dst = backend.allocate(host.size()).unwrap();

        let status = backend.filter_wiener_border(
            &src,
            host.size(),
            Point::default(),
            &mut dst,
            host.size(),
            Size::new(3, 3),
            Point::new(3, 0),
            [0.5, 0.5, 0.5],
            BorderPolicy::Replicate,
        );
        assert_eq!(status, Status::ANCHOR_ERROR);
    }
}
