//! End-to-end run: load, validate, upload, filter, download, save.

use std::env;
use std::path::{Path, PathBuf};

use crate::backend::{DeviceMemory, FilterPrimitives};
use crate::config::defaults::SAMPLE_IMAGE;
use crate::config::{FilterConfig, FilterConfigBuilder};
use crate::error::{Error, Result};
use crate::filters::FilterDispatcher;
use crate::image::HostImage;
use crate::io::{encode, load_image};

/// One filter run over one image file.
#[derive(Clone, Debug)]
pub struct Request {
    pub input: PathBuf,
    /// Derived from the input name and configuration when absent.
    pub output: Option<PathBuf>,
    pub config: FilterConfigBuilder,
}

impl Request {
    pub fn new<P: Into<PathBuf>>(input: P, config: FilterConfigBuilder) -> Self {
        Request {
            input: input.into(),
            output: None,
            config,
        }
    }

    pub fn output<P: Into<PathBuf>>(mut self, output: P) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// Execute `request` on `backend`, returning the path written.
///
/// The filter/border pair is validated before the input is touched.
pub fn run<B: FilterPrimitives>(backend: &B, request: Request) -> Result<PathBuf> {
    let config = request.config.build()?;

    if !request.input.is_file() {
        return Err(Error::InputNotFound {
            path: request.input,
        });
    }
    log::info!("opened <{}> successfully", request.input.display());

    let output = match request.output {
        Some(path) => path,
        None => PathBuf::from(config.output_filename(&request.input.to_string_lossy())),
    };

    let host = load_image(&request.input)?;
    let result = filter_image(backend, config, &host)?;
    encode(&output, &result)?;
    log::info!("saved image <{}>", output.display());

    Ok(output)
}

/// Filter an in-memory canonical image with a validated configuration.
pub fn filter_image<B: FilterPrimitives>(
    backend: &B,
    config: FilterConfig,
    host: &HostImage,
) -> Result<HostImage> {
    let config = config.with_source_extent(host.size())?;

    let src = backend.upload(host)?;
    let mut dst = backend.allocate(config.region_of_interest())?;
    FilterDispatcher::new(backend).apply(&config, &src, &mut dst)?;
    backend.download(&dst)
}

/// Locate the bundled sample image.
///
/// Looks in the working directory, then `data/`, then next to the
/// executable. Returns the bare name when nothing is found so the caller
/// reports it as missing.
pub fn find_sample_image() -> PathBuf {
    let mut candidates = vec![
        PathBuf::from(SAMPLE_IMAGE),
        Path::new("data").join(SAMPLE_IMAGE),
    ];
    if let Some(dir) = env::current_exe().ok().as_deref().and_then(Path::parent) {
        candidates.push(dir.join(SAMPLE_IMAGE));
    }

    candidates
        .into_iter()
        .find(|p| p.is_file())
        .unwrap_or_else(|| PathBuf::from(SAMPLE_IMAGE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_incompatible_pair_checked_before_input() {
        let request = Request::new("missing.png", FilterConfigBuilder::new("wiener", "none"));
        let result = run(&CpuBackend::new(), request);
        assert!(matches!(result, Err(Error::IncompatibleBorderPolicy { .. })));
    }

    #[test]
    fn test_missing_input() {
        let request = Request::new("no/such/input.png", FilterConfigBuilder::new("box", "none"));
        match run(&CpuBackend::new(), request) {
            Err(Error::InputNotFound { path }) => assert_eq!(path, PathBuf::from("no/such/input.png")),
            other => panic!("expected InputNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_image_with_region() {
        let host = HostImage::filled(6, 5, [10, 20, 30]);
        let config = FilterConfigBuilder::new("lowpass", "replicate")
            .region_of_interest(crate::image::Size::new(4, 3))
            .build()
            .unwrap();
        let out = filter_image(&CpuBackend::new(), config, &host).unwrap();
        assert_eq!(out, HostImage::filled(4, 3, [10, 20, 30]));
    }

    #[test]
    fn test_oversized_mask_fails_cleanly() {
        let result = FilterConfigBuilder::new("box", "none")
            .mask_size(crate::image::Size::new(1 << 33, 1 << 33))
            .build();
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_far_offset_fails_cleanly() {
        let host = HostImage::filled(8, 8, [1, 2, 3]);
        let config = FilterConfigBuilder::new("box", "replicate")
            .source_offset(crate::image::Point::new(usize::MAX, 0))
            .region_of_interest(crate::image::Size::new(4, 4))
            .build()
            .unwrap();
        let result = filter_image(&CpuBackend::new(), config, &host);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_sample_image_name() {
        assert!(find_sample_image().ends_with(SAMPLE_IMAGE));
    }
}
