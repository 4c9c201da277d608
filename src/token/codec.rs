//! # Version Token Codec
//!
//! Converts between a record's [`RevisionMarker`] and the signed token that
//! travels through the client.
//!
//! ## Invariants
//! - A missing marker encodes as the signed sentinel, never as an unsigned
//!   empty string
//! - For counters, an empty or `None` submission decodes to the sentinel. It
//!   only matches while the store holds no record, so a dropped hidden field
//!   on an existing record is a conflict
//! - Counter and timestamp tokens are signed under different salts

use super::display::DisplayToken;
use super::errors::{TokenError, TokenResult};
use super::marker::{now_micros, MarkerKind, RevisionMarker};
use crate::signing::Signer;

/// Values a missing hidden field tends to arrive as.
const EMPTY_VALUES: [&str; 2] = ["", "None"];

/// Encodes and decodes version tokens for one marker kind.
#[derive(Debug, Clone)]
pub struct VersionCodec {
    signer: Signer,
    kind: MarkerKind,
}

impl VersionCodec {
    /// Create a codec. The signer's salt is suffixed with the marker kind.
    pub fn new(signer: Signer, kind: MarkerKind) -> Self {
        let salt = format!("{}.{}", signer.salt(), kind.as_str());
        Self {
            signer: signer.with_salt(salt),
            kind,
        }
    }

    /// Marker kind handled by this codec
    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// Sign a marker for the client. `None` means the record is new.
    pub fn encode(&self, marker: Option<&RevisionMarker>) -> TokenResult<DisplayToken> {
        let (signed_marker, display) = match marker {
            Some(m) if m.kind() != self.kind => {
                return Err(TokenError::KindMismatch {
                    expected: self.kind,
                    found: m.kind(),
                })
            }
            Some(m) if m.is_sentinel() => (*m, String::new()),
            Some(m) => (*m, m.to_string()),
            None => (self.kind.sentinel(), String::new()),
        };

        let hidden = self.signer.sign(&signed_marker.to_payload());
        Ok(DisplayToken::new(hidden, display))
    }

    /// Verify a submitted token and recover the marker it carries.
    pub fn decode(&self, submitted: &str) -> TokenResult<RevisionMarker> {
        if EMPTY_VALUES.contains(&submitted) {
            return match self.kind {
                MarkerKind::Counter => Ok(self.kind.sentinel()),
                MarkerKind::Timestamp => Ok(RevisionMarker::Timestamp(now_micros())),
            };
        }

        let payload = self.signer.unsign(submitted)?;
        RevisionMarker::from_payload(self.kind, &payload)
            .ok_or(TokenError::InvalidPayload(self.kind))
    }
}
