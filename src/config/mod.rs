//! Guard configuration
//!
//! Loaded once at startup from a JSON file and immutable afterwards. The
//! signing key is derived when the codec is built; nothing rotates it
//! mid-request.
//!
//! ```json
//! { "secret_key": "...", "marker_kind": "counter", "salt": "versionguard.form" }
//! ```

mod errors;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use errors::{ConfigError, ConfigResult};

use crate::observability::{log_event, GuardEvent};
use crate::signing::Signer;
use crate::token::{MarkerKind, VersionCodec};

/// Minimum accepted secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Configuration file structure
#[derive(Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Process-wide signing secret (required)
    pub secret_key: String,

    /// Which marker the store keeps (optional, default "counter")
    #[serde(default = "default_marker_kind")]
    pub marker_kind: MarkerKind,

    /// Signing namespace (optional)
    #[serde(default = "default_salt")]
    pub salt: String,
}

fn default_marker_kind() -> MarkerKind {
    MarkerKind::Counter
}

fn default_salt() -> String {
    "versionguard.version-field".to_string()
}

impl std::fmt::Debug for GuardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardConfig")
            .field("secret_key", &"<redacted>")
            .field("marker_kind", &self.marker_kind)
            .field("salt", &self.salt)
            .finish()
    }
}

impl GuardConfig {
    /// Build a config in code, validating it like a loaded one.
    pub fn new(secret_key: impl Into<String>, marker_kind: MarkerKind) -> ConfigResult<Self> {
        let config = Self {
            secret_key: secret_key.into(),
            marker_kind,
            salt: default_salt(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&content)?;

        log_event(
            GuardEvent::ConfigLoaded,
            &[
                ("marker_kind", config.marker_kind.as_str()),
                ("salt", config.salt.as_str()),
            ],
        );
        Ok(config)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: GuardConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.secret_key.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret {
                min: MIN_SECRET_LEN,
                actual: self.secret_key.len(),
            });
        }
        if self.salt.is_empty() {
            return Err(ConfigError::EmptySalt);
        }
        Ok(())
    }

    /// Signer over the configured secret and salt
    pub fn signer(&self) -> Signer {
        Signer::from_secret(self.secret_key.as_bytes(), self.salt.clone())
    }

    /// Codec for the configured marker kind
    pub fn build_codec(&self) -> VersionCodec {
        VersionCodec::new(self.signer(), self.marker_kind)
    }
}
