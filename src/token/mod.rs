//! Version Tokens
//!
//! This module provides:
//! - `RevisionMarker` / `MarkerKind` - the per-record version scalar
//! - `VersionCodec` - marker <-> signed token conversion
//! - `DisplayToken` - hidden value plus display decoration for renderers

mod codec;
mod display;
mod errors;
mod marker;

pub use codec::VersionCodec;
pub use display::DisplayToken;
pub use errors::{TokenError, TokenResult};
pub use marker::{now_micros, MarkerKind, RevisionMarker};
