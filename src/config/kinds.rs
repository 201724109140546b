//! Filter kinds and border policies.
//!
//! Both enums resolve user input permissively: an unknown name falls back to
//! the default instead of failing.

use std::fmt;
use std::str::FromStr;

use super::defaults::{DEFAULT_BORDER, DEFAULT_FILTER};
use crate::error::Error;

/// One of the eleven supported filter operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Box,
    SobelHoriz,
    SobelVert,
    RobertsUp,
    RobertsDown,
    Laplace,
    Gauss,
    HighPass,
    LowPass,
    Sharpen,
    Wiener,
}

impl FilterKind {
    /// All kinds, in the order they are listed to users.
    pub const ALL: [FilterKind; 11] = [
        FilterKind::Box,
        FilterKind::SobelHoriz,
        FilterKind::SobelVert,
        FilterKind::RobertsUp,
        FilterKind::RobertsDown,
        FilterKind::Laplace,
        FilterKind::Gauss,
        FilterKind::HighPass,
        FilterKind::LowPass,
        FilterKind::Sharpen,
        FilterKind::Wiener,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FilterKind::Box => "box",
            FilterKind::SobelHoriz => "sobel_h",
            FilterKind::SobelVert => "sobel_v",
            FilterKind::RobertsUp => "roberts_up",
            FilterKind::RobertsDown => "roberts_down",
            FilterKind::Laplace => "laplace",
            FilterKind::Gauss => "gauss",
            FilterKind::HighPass => "highpass",
            FilterKind::LowPass => "lowpass",
            FilterKind::Sharpen => "sharpen",
            FilterKind::Wiener => "wiener",
        }
    }

    /// Exact name lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }

    /// Lookup with fallback to [`DEFAULT_FILTER`] for unknown names.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or(DEFAULT_FILTER)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::InvalidParameter(format!("unknown filter '{}'", s)))
    }
}

/// How pixels outside the processed region are obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BorderPolicy {
    /// No extension; the kernel reads real neighbouring pixels only.
    None,
    /// Edge pixels of the source are replicated outward.
    Replicate,
}

impl BorderPolicy {
    pub const ALL: [BorderPolicy; 2] = [BorderPolicy::None, BorderPolicy::Replicate];

    pub const fn as_str(self) -> &'static str {
        match self {
            BorderPolicy::None => "none",
            BorderPolicy::Replicate => "replicate",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.as_str() == name)
    }

    /// Lookup with fallback to [`DEFAULT_BORDER`] for unknown names.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or(DEFAULT_BORDER)
    }

    /// True when the bordered backend variant handles this policy.
    pub const fn is_bordered(self) -> bool {
        matches!(self, BorderPolicy::Replicate)
    }
}

impl fmt::Display for BorderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BorderPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::InvalidParameter(format!("unknown border mode '{}'", s)))
    }
}
