//! Pixel format normalization.
//!
//! Expands or contracts decoded pixel data into the canonical 3-channel
//! layout of [`HostImage`].
//!
//! ## Supported Source Formats
//!
//! | Format | Channels | Conversion |
//! |--------|----------|------------|
//! | Gray8 | 1 | sample replicated into R, G and B |
//! | RGB8 | 3 | copied as is |
//! | RGBA8 | 4 | alpha dropped |
//!
//! Source rows are always tightly packed (`width * channels` bytes).
//! Destination rows follow the pitch of the canonical image.

use ndarray::ArrayView3;

use crate::error::{Error, Result};
use crate::image::{HostImage, CHANNELS};

/// Channel layout of a decoded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Gray,
    Rgb,
    Rgba,
}

impl SourceFormat {
    /// Map a decoder channel count to a supported layout.
    pub fn from_channels(channels: usize) -> Result<Self> {
        match channels {
            1 => Ok(SourceFormat::Gray),
            3 => Ok(SourceFormat::Rgb),
            4 => Ok(SourceFormat::Rgba),
            _ => Err(Error::UnsupportedPixelFormat { channels }),
        }
    }

    pub fn channels(self) -> usize {
        match self {
            SourceFormat::Gray => 1,
            SourceFormat::Rgb => 3,
            SourceFormat::Rgba => 4,
        }
    }
}

/// Normalize raw decoded bytes into a tightly packed canonical image.
pub fn normalize(raw: &[u8], width: usize, height: usize, channels: usize) -> Result<HostImage> {
    normalize_with_pitch(raw, width, height, channels, width * CHANNELS)
}

/// Normalize raw decoded bytes into a canonical image with the given row pitch.
///
/// # Arguments
/// * `raw` - Tightly packed source rows, `width * channels` bytes each
/// * `channels` - 1, 3 or 4
/// * `pitch` - Destination row stride; raised to `width * 3` if smaller
///
/// # Returns
/// A new image. `raw` is never modified.
pub fn normalize_with_pitch(
    raw: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    pitch: usize,
) -> Result<HostImage> {
    let format = SourceFormat::from_channels(channels)?;

    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(format.channels()))
        .unwrap_or(usize::MAX);
    if raw.len() < expected {
        return Err(Error::BufferSizeMismatch {
            expected,
            actual: raw.len(),
        });
    }

    let mut image = HostImage::with_pitch(width, height, pitch);
    match format {
        SourceFormat::Gray => copy_gray_to_rgb(raw, &mut image),
        SourceFormat::Rgb => copy_rgb_to_rgb(raw, &mut image),
        SourceFormat::Rgba => copy_rgba_to_rgb(raw, &mut image),
    }

    log::debug!(
        "normalized {}x{} {:?} image (pitch {})",
        width,
        height,
        format,
        image.pitch()
    );
    Ok(image)
}

/// Normalize an ndarray image of shape (height, width, channels).
///
/// Accepts non-contiguous views; samples are read by index.
pub fn normalize_array(input: ArrayView3<u8>) -> Result<HostImage> {
    let (height, width, channels) = input.dim();
    let format = SourceFormat::from_channels(channels)?;

    let mut image = HostImage::new(width, height);
    for y in 0..height {
        let row = image.row_mut(y);
        for x in 0..width {
            let dst = &mut row[x * CHANNELS..(x + 1) * CHANNELS];
            match format {
                SourceFormat::Gray => dst.fill(input[[y, x, 0]]),
                SourceFormat::Rgb | SourceFormat::Rgba => {
                    for c in 0..CHANNELS {
                        dst[c] = input[[y, x, c]];
                    }
                }
            }
        }
    }

    Ok(image)
}

fn copy_gray_to_rgb(raw: &[u8], image: &mut HostImage) {
    let width = image.width();
    for y in 0..image.height() {
        let src = &raw[y * width..(y + 1) * width];
        let dst = image.row_mut(y);
        for (px, &gray) in dst.chunks_exact_mut(CHANNELS).zip(src) {
            px.fill(gray);
        }
    }
}

fn copy_rgb_to_rgb(raw: &[u8], image: &mut HostImage) {
    let src_pitch = image.row_bytes();
    let height = image.height();

    if src_pitch == image.pitch() {
        let len = src_pitch * height;
        image.data_mut()[..len].copy_from_slice(&raw[..len]);
        return;
    }

    for y in 0..height {
        image
            .row_mut(y)
            .copy_from_slice(&raw[y * src_pitch..(y + 1) * src_pitch]);
    }
}

fn copy_rgba_to_rgb(raw: &[u8], image: &mut HostImage) {
    let src_pitch = image.width() * 4;
    for y in 0..image.height() {
        let src = &raw[y * src_pitch..(y + 1) * src_pitch];
        let dst = image.row_mut(y);
        for (px, rgba) in dst.chunks_exact_mut(CHANNELS).zip(src.chunks_exact(4)) {
            px.copy_from_slice(&rgba[..CHANNELS]);
        }
    }
}
