//! # Value Signer
//!
//! Signs short scalar values so they can leave the process and be trusted
//! when they come back.
//!
//! Wire format: `<payload>:<tag>` where both halves are URL-safe base64
//! without padding. `:` is outside that alphabet, so the delimiter is
//! unambiguous.
//!
//! ## Invariants
//! - Tags are keyed BLAKE3 over `salt || 0x00 || value`
//! - Tag comparison is constant-time
//! - The key is derived once and never changes for the signer's lifetime

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use subtle::ConstantTimeEq;

use super::errors::{SigningError, SigningResult};

/// Context string for deriving the MAC key from the configured secret.
const KEY_DERIVATION_CONTEXT: &str = "versionguard 2024-01-01 signer key v1";

/// Separator between payload and tag.
pub const DELIMITER: char = ':';

/// Length of the raw MAC in bytes.
const TAG_LEN: usize = 32;

/// 256-bit MAC key derived from the process secret.
///
/// Deliberately has no `Debug` output of the bytes.
#[derive(Clone)]
pub struct SigningKey([u8; 32]);

impl SigningKey {
    /// Derive a key from arbitrary secret bytes.
    pub fn derive(secret: &[u8]) -> Self {
        Self(blake3::derive_key(KEY_DERIVATION_CONTEXT, secret))
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Signs and verifies values under one key and one salt.
#[derive(Debug, Clone)]
pub struct Signer {
    key: SigningKey,
    salt: String,
}

impl Signer {
    /// Create a signer from a derived key and a namespace salt.
    pub fn new(key: SigningKey, salt: impl Into<String>) -> Self {
        Self {
            key,
            salt: salt.into(),
        }
    }

    /// Convenience constructor deriving the key from raw secret bytes.
    pub fn from_secret(secret: &[u8], salt: impl Into<String>) -> Self {
        Self::new(SigningKey::derive(secret), salt)
    }

    /// The namespace this signer signs under.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Same key, different namespace.
    pub fn with_salt(&self, salt: impl Into<String>) -> Self {
        Self::new(self.key.clone(), salt)
    }

    /// Sign `value`, producing `<payload>:<tag>`.
    pub fn sign(&self, value: &str) -> String {
        let payload = URL_SAFE_NO_PAD.encode(value.as_bytes());
        let tag = URL_SAFE_NO_PAD.encode(self.tag(value.as_bytes()));
        format!("{}{}{}", payload, DELIMITER, tag)
    }

    /// Verify a signed string and return the original value.
    pub fn unsign(&self, signed: &str) -> SigningResult<String> {
        let (payload, tag) = signed
            .split_once(DELIMITER)
            .ok_or(SigningError::Malformed("missing delimiter"))?;

        let value = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SigningError::Malformed("payload is not base64"))?;
        let presented = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| SigningError::Malformed("tag is not base64"))?;

        if presented.len() != TAG_LEN {
            return Err(SigningError::Malformed("tag has wrong length"));
        }

        let expected = self.tag(&value);
        if !bool::from(expected.as_slice().ct_eq(presented.as_slice())) {
            return Err(SigningError::BadSignature);
        }

        String::from_utf8(value).map_err(|_| SigningError::Malformed("payload is not UTF-8"))
    }

    fn tag(&self, value: &[u8]) -> [u8; TAG_LEN] {
        let mut hasher = blake3::Hasher::new_keyed(&self.key.0);
        hasher.update(self.salt.as_bytes());
        hasher.update(&[0u8]);
        hasher.update(value);
        *hasher.finalize().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> Signer {
        Signer::from_secret(b"an-adequately-long-test-secret-value", "test")
    }

    #[test]
    fn test_sign_and_unsign() {
        let s = signer();
        let signed = s.sign("42");
        assert_eq!(s.unsign(&signed).unwrap(), "42");
    }

    #[test]
    fn test_sign_is_deterministic() {
        let s = signer();
        assert_eq!(s.sign("7"), s.sign("7"));
        assert_ne!(s.sign("7"), s.sign("8"));
    }

    #[test]
    fn test_empty_value_still_signed() {
        let s = signer();
        let signed = s.sign("");
        assert!(signed.starts_with(DELIMITER));
        assert_eq!(s.unsign(&signed).unwrap(), "");
    }

    #[test]
    fn test_missing_delimiter_is_malformed() {
        let s = signer();
        assert!(matches!(
            s.unsign("garbage-not-signed"),
            Err(SigningError::Malformed(_))
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let signed = signer().sign("5");
        let other = Signer::from_secret(b"a-completely-different-secret-key!!", "test");
        assert_eq!(other.unsign(&signed), Err(SigningError::BadSignature));
    }

    #[test]
    fn test_salt_separates_namespaces() {
        let s = signer();
        let signed = s.sign("5");
        let other = s.with_salt("other");
        assert_eq!(other.unsign(&signed), Err(SigningError::BadSignature));
    }

    #[test]
    fn test_swapped_payload_rejected() {
        let s = signer();
        let five = s.sign("5");
        let six = s.sign("6");
        let (_, tag5) = five.split_once(DELIMITER).unwrap();
        let (payload6, _) = six.split_once(DELIMITER).unwrap();
        let forged = format!("{}{}{}", payload6, DELIMITER, tag5);
        assert_eq!(s.unsign(&forged), Err(SigningError::BadSignature));
    }

    #[test]
    fn test_truncated_tag_is_malformed() {
        let s = signer();
        let mut signed = s.sign("5");
        signed.truncate(signed.len() - 4);
        assert!(s.unsign(&signed).is_err());
    }

    #[test]
    fn test_key_debug_is_redacted() {
        let key = SigningKey::derive(b"secret");
        assert_eq!(format!("{:?}", key), "SigningKey(<redacted>)");
    }
}
