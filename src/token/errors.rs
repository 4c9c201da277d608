//! # Token Errors

use thiserror::Error;

use super::marker::MarkerKind;
use crate::signing::SigningError;

/// Result type for token operations
pub type TokenResult<T> = Result<T, TokenError>;

/// Version token errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signature failed or token unparseable
    #[error("Version number seems tampered: {0}")]
    Signature(#[from] SigningError),

    /// Signature verified but the payload is not a marker of this kind
    #[error("Version payload invalid for {0} markers")]
    InvalidPayload(MarkerKind),

    /// Caller handed the codec a marker of the other kind
    #[error("Expected {expected} marker, got {found}")]
    KindMismatch {
        expected: MarkerKind,
        found: MarkerKind,
    },
}

impl TokenError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::Signature(e) => e.code(),
            TokenError::InvalidPayload(_) => "VG_TOKEN_PAYLOAD",
            TokenError::KindMismatch { .. } => "VG_TOKEN_KIND_MISMATCH",
        }
    }

    /// Whether this came from an untrusted submission rather than a
    /// programming error on the server side.
    pub fn is_tampered(&self) -> bool {
        !matches!(self, TokenError::KindMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_error_converts() {
        let err: TokenError = SigningError::BadSignature.into();
        assert!(err.is_tampered());
        assert_eq!(err.code(), "VG_SIGNATURE_MISMATCH");
        assert!(err.to_string().contains("tampered"));
    }

    #[test]
    fn test_kind_mismatch_is_not_tamper() {
        let err = TokenError::KindMismatch {
            expected: MarkerKind::Counter,
            found: MarkerKind::Timestamp,
        };
        assert!(!err.is_tampered());
    }
}
