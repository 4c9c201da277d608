//! Observable events
//!
//! Fields attached to these events never include key material or raw
//! tokens. Record ids and marker display values are fine.

use std::fmt;

use super::logger::Severity;

/// Events emitted by the version guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardEvent {
    /// Configuration loaded and key derived
    ConfigLoaded,
    /// Token handed to a renderer
    TokenRendered,
    /// Submitted token failed verification
    TokenTampered,
    /// Submitted marker equals the live marker
    VersionMatch,
    /// Submitted marker is stale
    VersionConflict,
    /// Conditional write applied
    WriteCommitted,
    /// Pre-check matched but the conditional write lost the race
    WriteRejectedLate,
    /// Store returned an infrastructure error
    StoreFailure,
}

impl GuardEvent {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardEvent::ConfigLoaded => "CONFIG_LOADED",
            GuardEvent::TokenRendered => "TOKEN_RENDERED",
            GuardEvent::TokenTampered => "TOKEN_TAMPERED",
            GuardEvent::VersionMatch => "VERSION_MATCH",
            GuardEvent::VersionConflict => "VERSION_CONFLICT",
            GuardEvent::WriteCommitted => "WRITE_COMMITTED",
            GuardEvent::WriteRejectedLate => "WRITE_REJECTED_LATE",
            GuardEvent::StoreFailure => "STORE_FAILURE",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            GuardEvent::TokenRendered | GuardEvent::VersionMatch => Severity::Trace,
            GuardEvent::ConfigLoaded | GuardEvent::WriteCommitted => Severity::Info,
            GuardEvent::VersionConflict | GuardEvent::WriteRejectedLate => Severity::Info,
            GuardEvent::TokenTampered => Severity::Warn,
            GuardEvent::StoreFailure => Severity::Error,
        }
    }
}

impl fmt::Display for GuardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
