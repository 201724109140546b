//! Static description of each filter kind: accepted border policies and the
//! parameters its primitives consume.

use crate::backend::FixedMask;
use crate::config::{BorderPolicy, FilterKind};

/// Parameters a filter's primitives take besides the region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamSet {
    /// Fixed kernel, nothing to pass.
    None,
    /// Arbitrary mask size and anchor.
    MaskAnchor,
    /// One of the enumerated square mask sizes.
    FixedMask,
    /// Mask size, anchor and per-channel noise.
    Wiener,
}

#[derive(Clone, Copy, Debug)]
pub struct FilterDescriptor {
    pub kind: FilterKind,
    pub params: ParamSet,
    /// Border policies the filter accepts; the first is preferred.
    pub borders: &'static [BorderPolicy],
    /// Square mask sizes the backend provides, for `ParamSet::FixedMask`.
    pub fixed_masks: &'static [FixedMask],
}

const ANY_BORDER: &[BorderPolicy] = &[BorderPolicy::None, BorderPolicy::Replicate];
const REPLICATE_ONLY: &[BorderPolicy] = &[BorderPolicy::Replicate];

const SMALL_MASKS: &[FixedMask] = &[FixedMask::Size3x3, FixedMask::Size5x5];

const fn plain(kind: FilterKind) -> FilterDescriptor {
    FilterDescriptor {
        kind,
        params: ParamSet::None,
        borders: ANY_BORDER,
        fixed_masks: &[],
    }
}

const fn fixed(kind: FilterKind, fixed_masks: &'static [FixedMask]) -> FilterDescriptor {
    FilterDescriptor {
        kind,
        params: ParamSet::FixedMask,
        borders: ANY_BORDER,
        fixed_masks,
    }
}

static BOX: FilterDescriptor = FilterDescriptor {
    kind: FilterKind::Box,
    params: ParamSet::MaskAnchor,
    borders: ANY_BORDER,
    fixed_masks: &[],
};
static SOBEL_HORIZ: FilterDescriptor = plain(FilterKind::SobelHoriz);
static SOBEL_VERT: FilterDescriptor = plain(FilterKind::SobelVert);
static ROBERTS_UP: FilterDescriptor = plain(FilterKind::RobertsUp);
static ROBERTS_DOWN: FilterDescriptor = plain(FilterKind::RobertsDown);
static LAPLACE: FilterDescriptor = fixed(FilterKind::Laplace, SMALL_MASKS);
static GAUSS: FilterDescriptor = fixed(FilterKind::Gauss, &FixedMask::ALL);
static HIGH_PASS: FilterDescriptor = fixed(FilterKind::HighPass, SMALL_MASKS);
static LOW_PASS: FilterDescriptor = fixed(FilterKind::LowPass, SMALL_MASKS);
static SHARPEN: FilterDescriptor = plain(FilterKind::Sharpen);
static WIENER: FilterDescriptor = FilterDescriptor {
    kind: FilterKind::Wiener,
    params: ParamSet::Wiener,
    borders: REPLICATE_ONLY,
    fixed_masks: &[],
};

impl FilterKind {
    /// Descriptor of this kind.
    pub fn descriptor(self) -> &'static FilterDescriptor {
        match self {
            FilterKind::Box => &BOX,
            FilterKind::SobelHoriz => &SOBEL_HORIZ,
            FilterKind::SobelVert => &SOBEL_VERT,
            FilterKind::RobertsUp => &ROBERTS_UP,
            FilterKind::RobertsDown => &ROBERTS_DOWN,
            FilterKind::Laplace => &LAPLACE,
            FilterKind::Gauss => &GAUSS,
            FilterKind::HighPass => &HIGH_PASS,
            FilterKind::LowPass => &LOW_PASS,
            FilterKind::Sharpen => &SHARPEN,
            FilterKind::Wiener => &WIENER,
        }
    }
}
