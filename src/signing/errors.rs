//! # Signing Errors

use thiserror::Error;

/// Result type for signing operations
pub type SigningResult<T> = Result<T, SigningError>;

/// Failures while verifying a signed value.
///
/// Every variant means the same thing to callers: the value cannot be
/// trusted. The split exists for logging only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// No delimiter, bad base64, or non-UTF-8 payload
    #[error("Malformed signed value: {0}")]
    Malformed(&'static str),

    /// Integrity tag does not match the payload
    #[error("Signature does not match")]
    BadSignature,
}

impl SigningError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SigningError::Malformed(_) => "VG_SIGNATURE_MALFORMED",
            SigningError::BadSignature => "VG_SIGNATURE_MISMATCH",
        }
    }
}
