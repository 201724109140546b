//! Canonical host image and the geometry types shared with the backends.
//!
//! ## Layout
//!
//! | Property | Value |
//! |----------|-------|
//! | Channels | 3 (R, G, B), interleaved |
//! | Sample type | u8, 0-255 |
//! | Row order | top to bottom |
//! | Row stride | `pitch` bytes, `pitch >= width * 3` |
//!
//! Rows may carry padding at their end. Every row access goes through
//! [`HostImage::row`] / [`HostImage::row_mut`], which use the pitch, never
//! `width * 3`.

use std::fmt;

use ndarray::{ArrayView3, ShapeBuilder};

/// Samples per canonical pixel.
pub const CHANNELS: usize = 3;

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Size { width, height }
    }

    /// True when either dimension is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel count, `None` on overflow.
    pub const fn checked_area(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// True when a `region` placed at `origin` lies inside this size.
    pub fn contains_region(&self, origin: Point, region: Size) -> bool {
        matches!(origin.x.checked_add(region.width), Some(right) if right <= self.width)
            && matches!(origin.y.checked_add(region.height), Some(bottom) if bottom <= self.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel coordinate or offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Interleaved 3-channel u8 image in host memory.
#[derive(Clone, PartialEq, Eq)]
pub struct HostImage {
    size: Size,
    pitch: usize,
    data: Vec<u8>,
}

impl HostImage {
    /// Allocate a zeroed image with tightly packed rows.
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_pitch(width, height, width * CHANNELS)
    }

    /// Allocate a zeroed image with an explicit row stride.
    ///
    /// A pitch smaller than `width * 3` is raised to the tight row size.
    pub fn with_pitch(width: usize, height: usize, pitch: usize) -> Self {
        let pitch = pitch.max(width * CHANNELS);
        HostImage {
            size: Size::new(width, height),
            pitch,
            data: vec![0; pitch * height],
        }
    }

    /// Allocate an image with every pixel set to `rgb`.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut image = Self::new(width, height);
        for y in 0..height {
            for px in image.row_mut(y).chunks_exact_mut(CHANNELS) {
                px.copy_from_slice(&rgb);
            }
        }
        image
    }

    pub fn width(&self) -> usize {
        self.size.width
    }

    pub fn height(&self) -> usize {
        self.size.height
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Bytes between the starts of consecutive rows.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Bytes of pixel data in one row, excluding padding.
    pub fn row_bytes(&self) -> usize {
        self.size.width * CHANNELS
    }

    /// Whole backing buffer, padding included.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel bytes of row `y`, padding excluded.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.pitch;
        &self.data[start..start + self.row_bytes()]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.pitch;
        let len = self.row_bytes();
        &mut self.data[start..start + len]
    }

    /// Read pixel (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let row = self.row(y);
        let i = x * CHANNELS;
        [row[i], row[i + 1], row[i + 2]]
    }

    /// Strided `(height, width, 3)` view that skips row padding.
    pub fn view(&self) -> ArrayView3<'_, u8> {
        let shape = (self.size.height, self.size.width, CHANNELS).strides((self.pitch, CHANNELS, 1));
        // Geometry is fixed at construction, so the view always fits the buffer.
        match ArrayView3::from_shape(shape, &self.data) {
            Ok(view) => view,
            Err(_) => unreachable!("host image buffer smaller than its geometry"),
        }
    }

    /// Copy the pixel rows into a tightly packed buffer.
    pub fn to_packed(&self) -> Vec<u8> {
        if self.pitch == self.row_bytes() {
            return self.data.clone();
        }
        let mut packed = Vec::with_capacity(self.row_bytes() * self.size.height);
        for y in 0..self.size.height {
            packed.extend_from_slice(self.row(y));
        }
        packed
    }
}

impl fmt::Debug for HostImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostImage")
            .field("size", &self.size)
            .field("pitch", &self.pitch)
            .finish()
    }
}
