//! Error types for rotation requests.

use thiserror::Error;

use crate::annotation::AnnotationEncoding;

/// Errors raised while validating a rotation request.
///
/// Every variant is produced before any geometry or pixel work starts, so a
/// failed call never returns a partially rotated result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RotateError {
    /// The encoding selector is not one of the six supported names.
    #[error("unknown annotation encoding: {0:?}")]
    UnknownEncoding(String),

    /// The annotations supplied do not use the configured encoding.
    #[error("annotation encoding mismatch: rotator expects {expected}, got {found}")]
    EncodingMismatch {
        expected: AnnotationEncoding,
        found: AnnotationEncoding,
    },

    /// The rotation angle is neither a single value nor an inclusive range.
    #[error("invalid rotation angle: {0}")]
    InvalidAngleSpec(String),

    /// An annotation element has the wrong shape for its encoding.
    #[error("malformed {encoding} annotation at index {index}: {reason}")]
    MalformedAnnotation {
        index: usize,
        encoding: AnnotationEncoding,
        reason: String,
    },

    /// The image buffer cannot be rotated.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

impl RotateError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RotateError::UnknownEncoding(_) => "unknown_encoding",
            RotateError::EncodingMismatch { .. } => "encoding_mismatch",
            RotateError::InvalidAngleSpec(_) => "invalid_angle_spec",
            RotateError::MalformedAnnotation { .. } => "malformed_annotation",
            RotateError::InvalidImage(_) => "invalid_image",
        }
    }
}

/// Result type for rotation operations
pub type RotateResult<T> = Result<T, RotateError>;
