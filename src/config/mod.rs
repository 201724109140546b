//! Filter configuration.
//!
//! A configuration starts life as a [`FilterConfigBuilder`], whose fields may
//! be set freely. [`FilterConfigBuilder::build`] checks the filter/border
//! compatibility table and the numeric parameters and, only on success,
//! yields an immutable [`FilterConfig`]. There is no way back from a
//! `FilterConfig` to a builder; an invalid builder is simply discarded.
//!
//! The source extent is known only once the image is loaded, so it is
//! attached afterwards with [`FilterConfig::with_source_extent`], which
//! returns a new value instead of mutating the validated one.

pub mod defaults;
mod kinds;
mod naming;
mod parse;

pub use kinds::{BorderPolicy, FilterKind};
pub use naming::derive_output_filename;
pub use parse::{parse_noise, parse_point, parse_size};

use crate::error::{Error, Result};
use crate::image::{Point, Size};
use defaults::{default_anchor, DEFAULT_MASK_SIZE, DEFAULT_NOISE, DEFAULT_SOURCE_OFFSET, MAX_MASK_SIDE};

/// True when `filter` may run with `border`.
pub fn is_compatible(filter: FilterKind, border: BorderPolicy) -> bool {
    filter.descriptor().borders.contains(&border)
}

/// Unvalidated filter parameters.
#[derive(Clone, Debug)]
pub struct FilterConfigBuilder {
    filter: FilterKind,
    border: BorderPolicy,
    mask_size: Size,
    anchor: Option<Point>,
    noise: [f32; 3],
    source_offset: Point,
    roi: Option<Size>,
}

impl FilterConfigBuilder {
    /// Start from raw filter and border names.
    ///
    /// Unknown names fall back to the defaults (`box`, `replicate`).
    pub fn new(filter: &str, border: &str) -> Self {
        Self::from_kinds(FilterKind::resolve(filter), BorderPolicy::resolve(border))
    }

    pub fn from_kinds(filter: FilterKind, border: BorderPolicy) -> Self {
        FilterConfigBuilder {
            filter,
            border,
            mask_size: DEFAULT_MASK_SIZE,
            anchor: None,
            noise: DEFAULT_NOISE,
            source_offset: DEFAULT_SOURCE_OFFSET,
            roi: None,
        }
    }

    /// Kernel size. The anchor follows the mask centre unless set explicitly.
    pub fn mask_size(mut self, size: Size) -> Self {
        self.mask_size = size;
        self
    }

    pub fn anchor(mut self, anchor: Point) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Per-channel noise variance (Wiener only), each in [0, 1].
    pub fn noise(mut self, noise: [f32; 3]) -> Self {
        self.noise = noise;
        self
    }

    /// Top-left of the region inside the source (bordered variants only).
    pub fn source_offset(mut self, offset: Point) -> Self {
        self.source_offset = offset;
        self
    }

    /// Processed region; defaults to the whole source.
    pub fn region_of_interest(mut self, roi: Size) -> Self {
        self.roi = Some(roi);
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<FilterConfig> {
        if !is_compatible(self.filter, self.border) {
            return Err(Error::incompatible(self.filter, self.border));
        }

        if self.mask_size.is_empty() {
            return Err(Error::InvalidParameter(format!(
                "mask size {} must be non-zero",
                self.mask_size
            )));
        }
        if self.mask_size.width > MAX_MASK_SIDE || self.mask_size.height > MAX_MASK_SIDE {
            return Err(Error::InvalidParameter(format!(
                "mask size {} exceeds {}x{}",
                self.mask_size, MAX_MASK_SIDE, MAX_MASK_SIDE
            )));
        }

        let anchor = self.anchor.unwrap_or(default_anchor(self.mask_size));
        if anchor.x >= self.mask_size.width || anchor.y >= self.mask_size.height {
            return Err(Error::InvalidParameter(format!(
                "anchor ({}) lies outside the {} mask",
                anchor, self.mask_size
            )));
        }

        if let Some(bad) = self.noise.iter().find(|n| !(0.0..=1.0).contains(*n)) {
            return Err(Error::InvalidParameter(format!(
                "noise level {} is outside [0, 1]",
                bad
            )));
        }

        if matches!(self.roi, Some(roi) if roi.is_empty()) {
            return Err(Error::InvalidParameter("region of interest must be non-zero".into()));
        }

        Ok(FilterConfig {
            filter: self.filter,
            border: self.border,
            mask_size: self.mask_size,
            anchor,
            noise: self.noise,
            source_offset: self.source_offset,
            roi: self.roi,
            source_extent: Size::default(),
        })
    }
}

/// Validated, immutable filter configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterConfig {
    filter: FilterKind,
    border: BorderPolicy,
    mask_size: Size,
    anchor: Point,
    noise: [f32; 3],
    source_offset: Point,
    roi: Option<Size>,
    source_extent: Size,
}

/// Shorthand for `FilterConfigBuilder::new(filter, border).build()`.
pub fn build(filter: &str, border: &str) -> Result<FilterConfig> {
    FilterConfigBuilder::new(filter, border).build()
}

impl FilterConfig {
    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    pub fn border(&self) -> BorderPolicy {
        self.border
    }

    pub fn mask_size(&self) -> Size {
        self.mask_size
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn noise(&self) -> [f32; 3] {
        self.noise
    }

    pub fn source_offset(&self) -> Point {
        self.source_offset
    }

    /// Size of the loaded source; zero until [`Self::with_source_extent`].
    pub fn source_extent(&self) -> Size {
        self.source_extent
    }

    /// Processed region: the explicit ROI, else the whole source.
    pub fn region_of_interest(&self) -> Size {
        self.roi.unwrap_or(self.source_extent)
    }

    /// Attach the size of the loaded source image.
    ///
    /// The region (placed at the source offset for bordered runs) must lie
    /// inside the source.
    pub fn with_source_extent(self, extent: Size) -> Result<Self> {
        if extent.is_empty() {
            return Err(Error::PreconditionViolated(format!(
                "source extent {} is empty",
                extent
            )));
        }

        let roi = self.roi.unwrap_or(extent);
        let origin = if self.border.is_bordered() {
            self.source_offset
        } else {
            Point::default()
        };
        if !extent.contains_region(origin, roi) {
            return Err(Error::InvalidParameter(format!(
                "region {} at ({}) exceeds the {} source",
                roi, origin, extent
            )));
        }

        Ok(FilterConfig {
            source_extent: extent,
            ..self
        })
    }

    /// Source extent and region, failing if the source was never attached.
    pub fn dispatch_geometry(&self) -> Result<(Size, Size)> {
        let roi = self.region_of_interest();
        if self.source_extent.is_empty() || roi.is_empty() {
            return Err(Error::PreconditionViolated(format!(
                "{} filter dispatched before the source extent was set",
                self.filter
            )));
        }
        Ok((self.source_extent, roi))
    }

    /// Default output name for `input` under this configuration.
    pub fn output_filename(&self, input: &str) -> String {
        derive_output_filename(input, self.filter, self.border)
    }
}
