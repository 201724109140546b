//! Error types shared by every stage of the filter pipeline.
//!
//! None of these are recovered from locally: each one is surfaced to the
//! caller with enough context (filter/border pair, path, status code) to
//! produce an actionable message.

use std::path::PathBuf;

use thiserror::Error;

use crate::backend::Status;
use crate::config::{BorderPolicy, FilterKind};

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the normalization, validation, dispatch and I/O stages.
#[derive(Error, Debug)]
pub enum Error {
    /// Decoded image has a channel count other than 1, 3 or 4.
    #[error("unsupported pixel format: {channels} channel(s), expected 1, 3 or 4")]
    UnsupportedPixelFormat { channels: usize },

    /// Raw pixel buffer is shorter than its declared geometry.
    #[error("buffer size mismatch: expected at least {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Filter kind cannot run with the requested border policy.
    #[error("{filter} filter does not support the {border} border mode (supported: {supported})")]
    IncompatibleBorderPolicy {
        filter: FilterKind,
        border: BorderPolicy,
        supported: String,
    },

    /// A user supplied parameter is out of range or malformed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Components were called out of order.
    #[error("precondition violated: {0}")]
    PreconditionViolated(String),

    /// Input file does not exist or cannot be opened.
    #[error("unable to open <{}>", path.display())]
    InputNotFound { path: PathBuf },

    #[error("failed to decode {}: {reason}", path.display())]
    DecodeFailed { path: PathBuf, reason: String },

    #[error("failed to encode {}: {reason}", path.display())]
    EncodeFailed { path: PathBuf, reason: String },

    /// Host/device copy or device allocation failed.
    #[error("device transfer failed: {0}")]
    DeviceTransferFailed(String),

    /// Backend primitive returned a non-zero status.
    #[error("{filter} filter failed in the backend with status {status}")]
    BackendOperationFailed { filter: FilterKind, status: Status },
}

impl Error {
    pub(crate) fn incompatible(filter: FilterKind, border: BorderPolicy) -> Self {
        let supported = filter
            .descriptor()
            .borders
            .iter()
            .map(|b| b.as_str())
            .collect::<Vec<_>>()
            .join(" or ");
        Error::IncompatibleBorderPolicy {
            filter,
            border,
            supported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incompatible_message_names_both_values() {
        let err = Error::incompatible(FilterKind::Wiener, BorderPolicy::None);
        let msg = err.to_string();
        assert!(msg.contains("wiener"));
        assert!(msg.contains("none"));
        assert!(msg.contains("replicate"));
    }

    #[test]
    fn test_backend_failure_carries_status() {
        let err = Error::BackendOperationFailed {
            filter: FilterKind::Gauss,
            status: Status::MASK_SIZE_ERROR,
        };
        assert!(err.to_string().contains("gauss"));
        assert!(err.to_string().contains("-24"));
    }
}
