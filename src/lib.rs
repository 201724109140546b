//! NPP-style Image Filters
//!
//! Applies one of eleven 2-D convolution filters to an image through a
//! device backend, with the border handling chosen by the caller.
//!
//! ## Image Format
//! Decoded images may have 1, 3 or 4 channels:
//! - **Grayscale**: (height, width, 1) - replicated into R, G and B
//! - **RGB**: (height, width, 3) - copied as is
//! - **RGBA**: (height, width, 4) - alpha is dropped
//!
//! Every filter works on the canonical form: 8-bit, 3-channel interleaved
//! RGB with a row pitch that may exceed `width * 3`.
//!
//! ## Pipeline
//! decode → normalize → build config → upload → dispatch → download → encode.
//! [`pipeline::run`] performs all of it for one file; the stages are also
//! usable on their own.
//!
//! ## Example
//! ```no_run
//! use npp_filters::{pipeline, CpuBackend, FilterConfigBuilder};
//!
//! let request = pipeline::Request::new("photo.jpg", FilterConfigBuilder::new("gauss", "none"));
//! let written = pipeline::run(&CpuBackend::new(), request)?;
//! assert_eq!(written.to_str(), Some("photo_filter_gauss_none.png"));
//! # Ok::<(), npp_filters::Error>(())
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod filters;
pub mod image;
pub mod io;
pub mod normalize;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use crate::backend::{CpuBackend, DeviceImage, DeviceMemory, FilterPrimitives, FixedMask, Status};
pub use crate::config::{is_compatible, BorderPolicy, FilterConfig, FilterConfigBuilder, FilterKind};
pub use crate::error::{Error, Result};
pub use crate::filters::FilterDispatcher;
pub use crate::image::{HostImage, Point, Size};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::backend::CpuBackend;
    use crate::config::FilterConfigBuilder;
    use crate::normalize::normalize_array;
    use crate::pipeline::filter_image;

    fn to_py_err(err: crate::Error) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    /// Convert a (H, W, 1|3|4) u8 image to (H, W, 3) RGB.
    #[pyfunction]
    pub fn normalize_pixels<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let host = normalize_array(image.as_array()).map_err(to_py_err)?;
        Ok(host.view().to_owned().into_pyarray(py))
    }

    /// Apply a filter to a (H, W, 1|3|4) u8 image.
    ///
    /// Unknown filter or border names fall back to `box` and `replicate`.
    /// Returns a (H, W, 3) RGB image.
    #[pyfunction]
    #[pyo3(signature = (image, filter="box", border="replicate"))]
    pub fn apply_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        filter: &str,
        border: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let config = FilterConfigBuilder::new(filter, border)
            .build()
            .map_err(to_py_err)?;
        let host = normalize_array(image.as_array()).map_err(to_py_err)?;
        let result = filter_image(&CpuBackend::new(), config, &host).map_err(to_py_err)?;
        Ok(result.view().to_owned().into_pyarray(py))
    }

    /// Python module definition
    #[pymodule]
    pub fn npp_filters(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(normalize_pixels, m)?)?;
        m.add_function(wrap_pyfunction!(apply_filter, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::npp_filters;
