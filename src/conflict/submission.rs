//! EditSubmission - one edit as received from the client

use serde::Deserialize;

use super::store::FieldValues;

/// Field values plus the version token that came back with them.
///
/// Taken by value by [`ConflictDetector::submit`](super::ConflictDetector::submit)
/// so a submission cannot be applied twice.
#[derive(Debug, Deserialize)]
pub struct EditSubmission {
    pub record_id: String,
    pub version_token: String,
    #[serde(default)]
    pub fields: FieldValues,
}

impl EditSubmission {
    pub fn new(
        record_id: impl Into<String>,
        version_token: impl Into<String>,
        fields: FieldValues,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            version_token: version_token.into(),
            fields,
        }
    }
}
