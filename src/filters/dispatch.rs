//! Mapping from a validated configuration to one backend primitive call.

use log::debug;

use super::descriptor::ParamSet;
use crate::backend::{DeviceMemory, FilterPrimitives, FixedMask, Status};
use crate::config::{BorderPolicy, FilterConfig, FilterKind};
use crate::error::{Error, Result};
use crate::image::{Point, Size};

/// Filter parameters handed to every primitive; each reads what it needs.
#[derive(Clone, Copy, Debug)]
pub struct FilterArgs {
    pub roi: Size,
    pub mask: Size,
    pub anchor: Point,
    pub fixed_mask: FixedMask,
    pub noise: [f32; 3],
}

/// Extra inputs of the bordered variants.
#[derive(Clone, Copy, Debug)]
pub struct BorderArgs {
    pub src_size: Size,
    pub src_offset: Point,
    pub border: BorderPolicy,
}

type Image<B> = <B as DeviceMemory>::Image;

pub type UnborderedFn<B> = fn(&B, &Image<B>, &mut Image<B>, &FilterArgs) -> Status;
pub type BorderedFn<B> = fn(&B, &Image<B>, &mut Image<B>, &FilterArgs, &BorderArgs) -> Status;

/// Entry points of one filter kind.
pub struct Primitives<B: FilterPrimitives> {
    /// Absent when the kind has no unbordered form.
    pub unbordered: Option<UnborderedFn<B>>,
    pub bordered: BorderedFn<B>,
}

/// Backend entry points for `kind`.
pub fn primitives<B: FilterPrimitives>(kind: FilterKind) -> Primitives<B> {
    match kind {
        FilterKind::Box => Primitives {
            unbordered: Some(|b, s, d, a| b.filter_box(s, d, a.roi, a.mask, a.anchor)),
            bordered: |b, s, d, a, e| {
                b.filter_box_border(s, e.src_size, e.src_offset, d, a.roi, a.mask, a.anchor, e.border)
            },
        },
        FilterKind::SobelHoriz => Primitives {
            unbordered: Some(|b, s, d, a| b.filter_sobel_horiz(s, d, a.roi)),
            bordered: |b, s, d, a, e| {
                b.filter_sobel_horiz_border(s, e.src_size, e.src_offset, d, a.roi, e.border)
            },
        },
        FilterKind::SobelVert => Primitives {
            unbordered: Some(|b, s, d, a| b.filter_sobel_vert(s, d, a.roi)),
            bordered: |b, s, d, a, e| {
                b.filter_sobel_vert_border(s, e.src_size, e.src_offset, d, a.roi, e.border)
            },
        },
        FilterKind::RobertsUp => Primitives {
            unbordered: Some(|b, s, d, a| b.filter_roberts_up(s, d, a.roi)),
            bordered: |b, s, d, a, e| {
                b.filter_roberts_up_border(s, e.src_size, e.src_offset, d, a.roi, e.border)
            },
        },
        FilterKind::RobertsDown => Primitives {
            unbordered: Some(|b, s, d, a| b.filter_roberts_down(s, d, a.roi)),
            bordered: |b, s, d, a, e| {
                b.filter_roberts_down_border(s, e.src_size, e.src_offset, d, a.roi, e.border)
            },
        },
        FilterKind::Laplace => Primitives {
            unbordered: Some(|b, s, d, a| b.filter_laplace(s, d, a.roi, a.fixed_mask)),
            bordered: |b, s, d, a, e| {
                b.filter_laplace_border(s, e.src_size, e.src_offset, d, a.roi, a.fixed_mask, e.border)
            },
        },
        FilterKind::Gauss => Primitives {
            unbordered: Some(|b, s, d, a| b.filter_gauss(s, d, a.roi, a.fixed_mask)),
            bordered: |b, s, d, a, e| {
                b.filter_gauss_border(s, e.src_size, e.src_offset, d, a.roi, a.fixed_mask, e.border)
            },
        },
        FilterKind::HighPass => Primitives {
            unbordered: Some(|b, s, d, a| b.filter_high_pass(s, d, a.roi, a.fixed_mask)),
            bordered: |b, s, d, a, e| {
                b.filter_high_pass_border(s, e.src_size, e.src_offset, d, a.roi, a.fixed_mask, e.border)
            },
        },
        FilterKind::LowPass => Primitives {
            unbordered: Some(|b, s, d, a| b.filter_low_pass(s, d, a.roi, a.fixed_mask)),
            bordered: |b, s, d, a, e| {
                b.filter_low_pass_border(s, e.src_size, e.src_offset, d, a.roi, a.fixed_mask, e.border)
            },
        },
        FilterKind::Sharpen => Primitives {
            unbordered: Some(|b, s, d, a| b.filter_sharpen(s, d, a.roi)),
            bordered: |b, s, d, a, e| {
                b.filter_sharpen_border(s, e.src_size, e.src_offset, d, a.roi, e.border)
            },
        },
        FilterKind::Wiener => Primitives {
            unbordered: None,
            bordered: |b, s, d, a, e| {
                b.filter_wiener_border(
                    s,
                    e.src_size,
                    e.src_offset,
                    d,
                    a.roi,
                    a.mask,
                    a.anchor,
                    a.noise,
                    e.border,
                )
            },
        },
    }
}

/// Runs validated configurations against a backend.
///
/// The dispatcher never allocates device images: `dst` must already be
/// sized to the region of interest, and `src` is only read.
pub struct FilterDispatcher<'b, B: FilterPrimitives> {
    backend: &'b B,
}

impl<'b, B: FilterPrimitives> FilterDispatcher<'b, B> {
    pub fn new(backend: &'b B) -> Self {
        FilterDispatcher { backend }
    }

    /// Apply the configured filter from `src` into `dst`.
    pub fn apply(&self, config: &FilterConfig, src: &Image<B>, dst: &mut Image<B>) -> Result<()> {
        let (src_size, roi) = config.dispatch_geometry()?;
        let kind = config.filter();
        let descriptor = kind.descriptor();

        let fixed_mask = match descriptor.params {
            ParamSet::FixedMask => {
                let mask = FixedMask::nearest(config.mask_size(), descriptor.fixed_masks)
                    .unwrap_or(FixedMask::Size3x3);
                debug!("{}: mask {} mapped to {}", kind, config.mask_size(), mask);
                mask
            }
            _ => FixedMask::Size3x3,
        };

        let args = FilterArgs {
            roi,
            mask: config.mask_size(),
            anchor: config.anchor(),
            fixed_mask,
            noise: config.noise(),
        };
        let entry = primitives::<B>(kind);

        let status = match config.border() {
            BorderPolicy::None => {
                let unbordered = entry
                    .unbordered
                    .ok_or_else(|| Error::incompatible(kind, BorderPolicy::None))?;
                debug!("{}: unbordered variant over {}", kind, roi);
                unbordered(self.backend, src, dst, &args)
            }
            border => {
                let extra = BorderArgs {
                    src_size,
                    src_offset: config.source_offset(),
                    border,
                };
                debug!(
                    "{}: {} variant over {} at ({}) in {}",
                    kind, border, roi, extra.src_offset, src_size
                );
                (entry.bordered)(self.backend, src, dst, &args, &extra)
            }
        };

        if !status.is_success() {
            return Err(Error::BackendOperationFailed { filter: kind, status });
        }
        Ok(())
    }
}
