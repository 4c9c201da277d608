//! # Signing
//!
//! Tamper-evident encoding of scalar values for round-trips through an
//! untrusted client.

mod errors;
mod signer;

pub use errors::{SigningError, SigningResult};
pub use signer::{Signer, SigningKey, DELIMITER};
