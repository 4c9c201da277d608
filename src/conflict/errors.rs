//! # Conflict Errors
//!
//! Tampered and Conflict both block the write but are remedied differently:
//! a tampered token is a bad request, a conflict is an ordinary editing
//! collision the user recovers from by reloading.

use thiserror::Error;

use crate::token::{MarkerKind, TokenError};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for guarded submissions
pub type GuardResult<T> = Result<T, GuardError>;

/// User-facing message for every conflict, early or late.
pub const RECORD_MODIFIED: &str = "Record Modified";

/// Key under which form-wide errors are reported.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Infrastructure failures from the store. Opaque to the OCC core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store lock poisoned by a panicking writer
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// Backend unreachable or refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Record's marker cannot advance any further
    #[error("Marker exhausted for record {record_id}")]
    MarkerExhausted { record_id: String },

    /// Marker of the wrong kind passed to the store
    #[error("Store holds {expected} markers, got {found}")]
    KindMismatch {
        expected: MarkerKind,
        found: MarkerKind,
    },
}

impl StoreError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::LockPoisoned => 500,
            StoreError::Unavailable(_) => 503,
            StoreError::MarkerExhausted { .. } => 500,
            StoreError::KindMismatch { .. } => 500,
        }
    }
}

/// Outcome of a guarded submission that did not commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// Token failed verification. Security fault, not a validation error.
    #[error("Version number seems tampered")]
    Tampered(#[source] TokenError),

    /// Record changed since the editor read it
    #[error("Record Modified: {record_id}")]
    Conflict { record_id: String },

    /// Store failed underneath the check
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl GuardError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            GuardError::Tampered(_) => "VG_TOKEN_TAMPERED",
            GuardError::Conflict { .. } => "VG_RECORD_MODIFIED",
            GuardError::Store(_) => "VG_STORE_FAILURE",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            GuardError::Tampered(_) => 400,
            GuardError::Conflict { .. } => 409,
            GuardError::Store(e) => e.status_code(),
        }
    }

    /// Whether the request should be treated as suspicious
    pub fn is_security_fault(&self) -> bool {
        matches!(self, GuardError::Tampered(_))
    }

    /// Whether the end user can fix this by reloading and reapplying
    pub fn is_user_recoverable(&self) -> bool {
        matches!(self, GuardError::Conflict { .. })
    }

    /// Form-level error entry for conflicts. Other errors are not form
    /// errors and yield `None`.
    pub fn non_field_error(&self) -> Option<(&'static str, &'static str)> {
        match self {
            GuardError::Conflict { .. } => Some((NON_FIELD_ERRORS, RECORD_MODIFIED)),
            _ => None,
        }
    }
}
