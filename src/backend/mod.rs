//! Backend abstraction for device memory and filter primitives.
//!
//! A backend owns the device-side image type. [`DeviceMemory`] moves canonical
//! images between host and device; [`FilterPrimitives`] exposes one unbordered
//! and one bordered entry point per filter kind. Every primitive blocks until
//! the device has finished and reports a [`Status`], zero meaning success.
//!
//! Primitives never allocate: the destination is provided by the caller and
//! must already be sized to the region of interest.

pub mod cpu;

use std::fmt;

use crate::config::BorderPolicy;
use crate::error::Result;
use crate::image::{HostImage, Point, Size};

pub use cpu::{CpuBackend, CpuImage};

/// Status code returned by a backend primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Status(pub i32);

impl Status {
    pub const SUCCESS: Status = Status(0);
    /// ROI or image size is zero or exceeds the buffer.
    pub const SIZE_ERROR: Status = Status(-6);
    /// Row pitch too small for the image width.
    pub const STEP_ERROR: Status = Status(-14);
    /// Mask size not supported by the primitive.
    pub const MASK_SIZE_ERROR: Status = Status(-24);
    /// Anchor outside the mask.
    pub const ANCHOR_ERROR: Status = Status(-34);
    /// Border mode not supported by the primitive.
    pub const NOT_SUPPORTED_MODE_ERROR: Status = Status(-9999);

    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    pub fn code(self) -> i32 {
        self.0
    }

    fn name(self) -> Option<&'static str> {
        match self {
            Status::SUCCESS => Some("SUCCESS"),
            Status::SIZE_ERROR => Some("SIZE_ERROR"),
            Status::STEP_ERROR => Some("STEP_ERROR"),
            Status::MASK_SIZE_ERROR => Some("MASK_SIZE_ERROR"),
            Status::ANCHOR_ERROR => Some("ANCHOR_ERROR"),
            Status::NOT_SUPPORTED_MODE_ERROR => Some("NOT_SUPPORTED_MODE_ERROR"),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.code(), name),
            None => write!(f, "{}", self.code()),
        }
    }
}

/// Fixed square mask sizes understood by the size-enumerated primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FixedMask {
    Size3x3,
    Size5x5,
    Size7x7,
    Size9x9,
    Size11x11,
    Size13x13,
    Size15x15,
}

impl FixedMask {
    pub const ALL: [FixedMask; 7] = [
        FixedMask::Size3x3,
        FixedMask::Size5x5,
        FixedMask::Size7x7,
        FixedMask::Size9x9,
        FixedMask::Size11x11,
        FixedMask::Size13x13,
        FixedMask::Size15x15,
    ];

    /// Edge length in pixels.
    pub const fn side(self) -> usize {
        match self {
            FixedMask::Size3x3 => 3,
            FixedMask::Size5x5 => 5,
            FixedMask::Size7x7 => 7,
            FixedMask::Size9x9 => 9,
            FixedMask::Size11x11 => 11,
            FixedMask::Size13x13 => 13,
            FixedMask::Size15x15 => 15,
        }
    }

    /// Closest entry of `supported` to the larger side of `mask`.
    ///
    /// Ties go to the smaller size. `None` only when `supported` is empty.
    pub fn nearest(mask: Size, supported: &[FixedMask]) -> Option<FixedMask> {
        let side = mask.width.max(mask.height);
        supported
            .iter()
            .copied()
            .min_by_key(|m| (m.side().abs_diff(side), m.side()))
    }
}

impl fmt::Display for FixedMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.side())
    }
}

/// Image resident in backend memory.
pub trait DeviceImage {
    fn size(&self) -> Size;

    /// Bytes between the starts of consecutive rows.
    fn pitch(&self) -> usize;
}

/// Allocation and host/device transfer.
pub trait DeviceMemory {
    type Image: DeviceImage;

    /// Allocate an uninitialised (zeroed) device image.
    fn allocate(&self, size: Size) -> Result<Self::Image>;

    /// Copy a host image to a new device image.
    fn upload(&self, host: &HostImage) -> Result<Self::Image>;

    /// Copy a device image back to a new host image.
    fn download(&self, image: &Self::Image) -> Result<HostImage>;
}

/// Per-filter entry points.
///
/// Unbordered variants read neighbours around the region directly from the
/// source. Bordered variants also receive the source extent and the region
/// offset inside it, and synthesize pixels beyond the extent per `border`.
#[allow(clippy::too_many_arguments)]
pub trait FilterPrimitives: DeviceMemory {
    /// One-line description of the backend (name, version, devices).
    fn describe(&self) -> String;

    fn filter_box(&self, src: &Self::Image, dst: &mut Self::Image, roi: Size, mask: Size, anchor: Point) -> Status;

    fn filter_box_border(
        &self,
        src: &Self::Image,
        src_size: Size,
        src_offset: Point,
        dst: &mut Self::Image,
        roi: Size,
        mask: Size,
        anchor: Point,
        border: BorderPolicy,
    ) -> Status;

    fn filter_sobel_horiz(&self, src: &Self::Image, dst: &mut Self::Image, roi: Size) -> Status;

    fn filter_sobel_horiz_border(
        &self,
        src: &Self::Image,
        src_size: Size,
        src_offset: Point,
        dst: &mut Self::Image,
        roi: Size,
        border: BorderPolicy,
    ) -> Status;

    fn filter_sobel_vert(&self, src: &Self::Image, dst: &mut Self::Image, roi: Size) -> Status;

    fn filter_sobel_vert_border(
        &self,
        src: &Self::Image,
        src_size: Size,
        src_offset: Point,
        dst: &mut Self::Image,
        roi: Size,
        border: BorderPolicy,
    ) -> Status;

    fn filter_roberts_up(&self, src: &Self::Image, dst: &mut Self::Image, roi: Size) -> Status;

    fn filter_roberts_up_border(
        &self,
        src: &Self::Image,
        src_size: Size,
        src_offset: Point,
        dst: &mut Self::Image,
        roi: Size,
        border: BorderPolicy,
    ) -> Status;

    fn filter_roberts_down(&self, src: &Self::Image, dst: &mut Self::Image, roi: Size) -> Status;

    fn filter_roberts_down_border(
        &self,
        src: &Self::Image,
        src_size: Size,
        src_offset: Point,
        dst: &mut Self::Image,
        roi: Size,
        border: BorderPolicy,
    ) -> Status;

    fn filter_laplace(&self, src: &Self::Image, dst: &mut Self::Image, roi: Size, mask: FixedMask) -> Status;

    fn filter_laplace_border(
        &self,
        src: &Self::Image,
        src_size: Size,
        src_offset: Point,
        dst: &mut Self::Image,
        roi: Size,
        mask: FixedMask,
        border: BorderPolicy,
    ) -> Status;

    fn filter_gauss(&self, src: &Self::Image, dst: &mut Self::Image, roi: Size, mask: FixedMask) -> Status;

    fn filter_gauss_border(
        &self,
        src: &Self::Image,
        src_size: Size,
        src_offset: Point,
        dst: &mut Self::Image,
        roi: Size,
        mask: FixedMask,
        border: BorderPolicy,
    ) -> Status;

    fn filter_high_pass(&self, src: &Self::Image, dst: &mut Self::Image, roi: Size, mask: FixedMask) -> Status;

    fn filter_high_pass_border(
        &self,
        src: &Self::Image,
        src_size: Size,
        src_offset: Point,
        dst: &mut Self::Image,
        roi: Size,
        mask: FixedMask,
        border: BorderPolicy,
    ) -> Status;

    fn filter_low_pass(&self, src: &Self::Image, dst: &mut Self::Image, roi: Size, mask: FixedMask) -> Status;

    fn filter_low_pass_border(
        &self,
        src: &Self::Image,
        src_size: Size,
        src_offset: Point,
        dst: &mut Self::Image,
        roi: Size,
        mask: FixedMask,
        border: BorderPolicy,
    ) -> Status;

    fn filter_sharpen(&self, src: &Self::Image, dst: &mut Self::Image, roi: Size) -> Status;

    fn filter_sharpen_border(
        &self,
        src: &Self::Image,
        src_size: Size,
        src_offset: Point,
        dst: &mut Self::Image,
        roi: Size,
        border: BorderPolicy,
    ) -> Status;

    /// Adaptive Wiener filter; only a bordered variant exists.
    fn filter_wiener_border(
        &self,
        src: &Self::Image,
        src_size: Size,
        src_offset: Point,
        dst: &mut Self::Image,
        roi: Size,
        mask: Size,
        anchor: Point,
        noise: [f32; 3],
        border: BorderPolicy,
    ) -> Status;
}
