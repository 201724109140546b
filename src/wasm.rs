//! WebAssembly exports.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images cross
//! the boundary as flat, tightly packed byte arrays.

use ndarray::ArrayView3;
use wasm_bindgen::prelude::*;

use crate::backend::CpuBackend;
use crate::config::FilterConfigBuilder;
use crate::normalize::normalize_array;
use crate::pipeline::filter_image;

fn to_js_err(err: crate::Error) -> JsError {
    JsError::new(&err.to_string())
}

fn view(data: &[u8], width: usize, height: usize, channels: usize) -> Result<ArrayView3<'_, u8>, JsError> {
    ArrayView3::from_shape((height, width, channels), data)
        .map_err(|e| JsError::new(&format!("invalid dimensions: {}", e)))
}

/// Convert a gray, RGB or RGBA image to packed RGB.
///
/// # Arguments
/// * `data` - Flat array of bytes (length = width * height * channels)
/// * `channels` - 1, 3 or 4
///
/// # Returns
/// Flat array of RGB bytes (length = width * height * 3)
#[wasm_bindgen]
pub fn normalize_pixels_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, JsError> {
    let host = normalize_array(view(data, width, height, channels)?).map_err(to_js_err)?;
    Ok(host.to_packed())
}

/// Apply a filter to an RGBA image.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `filter` - Filter name; unknown names fall back to `box`
/// * `border` - `none` or `replicate`; unknown names fall back to `replicate`
///
/// # Returns
/// Flat array of RGB bytes (length = width * height * 3)
#[wasm_bindgen]
pub fn apply_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    filter: &str,
    border: &str,
) -> Result<Vec<u8>, JsError> {
    let config = FilterConfigBuilder::new(filter, border)
        .build()
        .map_err(to_js_err)?;
    let host = normalize_array(view(data, width, height, 4)?).map_err(to_js_err)?;
    let result = filter_image(&CpuBackend::new(), config, &host).map_err(to_js_err)?;
    Ok(result.to_packed())
}
