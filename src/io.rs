//! Image file decoding and encoding.
//!
//! Decoding yields raw tightly packed 8-bit samples with their channel
//! count, untouched; the channel check happens in normalization. Encoding
//! always writes a 3-channel PNG.

use std::path::Path;

use image::{ColorType, DynamicImage, ExtendedColorType, ImageFormat, ImageReader};

use crate::error::{Error, Result};
use crate::image::HostImage;
use crate::normalize::normalize;

/// Decoded pixels before normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawImage {
    pub bytes: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

/// Decode an image file to 8-bit samples.
///
/// Gray, gray+alpha, RGB and RGBA map to 1, 2, 3 and 4 channels. Deeper
/// sample types are reduced to 8 bits.
pub fn decode<P: AsRef<Path>>(path: P) -> Result<RawImage> {
    let path = path.as_ref();
    let failed = |reason: String| Error::DecodeFailed {
        path: path.to_path_buf(),
        reason,
    };

    let decoded = ImageReader::open(path)
        .map_err(|e| failed(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| failed(e.to_string()))?
        .decode()
        .map_err(|e| failed(e.to_string()))?;

    let raw = into_raw(decoded);
    log::debug!(
        "decoded {} ({}x{}, {} channel(s))",
        path.display(),
        raw.width,
        raw.height,
        raw.channels
    );
    Ok(raw)
}

fn into_raw(decoded: DynamicImage) -> RawImage {
    let width = decoded.width() as usize;
    let height = decoded.height() as usize;
    let (bytes, channels) = match decoded.color() {
        ColorType::L8 | ColorType::L16 => (decoded.into_luma8().into_raw(), 1),
        ColorType::La8 | ColorType::La16 => (decoded.into_luma_alpha8().into_raw(), 2),
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => (decoded.into_rgb8().into_raw(), 3),
        _ => (decoded.into_rgba8().into_raw(), 4),
    };
    RawImage {
        bytes,
        width,
        height,
        channels,
    }
}

/// Write a canonical image as an RGB PNG.
pub fn encode<P: AsRef<Path>>(path: P, image: &HostImage) -> Result<()> {
    let path = path.as_ref();
    let packed = image.to_packed();
    image::save_buffer_with_format(
        path,
        &packed,
        image.width() as u32,
        image.height() as u32,
        ExtendedColorType::Rgb8,
        ImageFormat::Png,
    )
    .map_err(|e| Error::EncodeFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    log::debug!("encoded {} ({})", path.display(), image.size());
    Ok(())
}

/// Decode and normalize in one step.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<HostImage> {
    let raw = decode(path)?;
    normalize(&raw.bytes, raw.width, raw.height, raw.channels)
}
