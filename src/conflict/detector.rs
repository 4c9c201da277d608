//! # Conflict Detector
//!
//! Decides whether an edit may proceed and drives the conditional write.
//!
//! Order of operations for a submission:
//! 1. Verify and decode the token. Failure is `Tampered`; the store is not
//!    touched.
//! 2. Read the live marker and compare. Mismatch is `Conflict`; nothing is
//!    written.
//! 3. Issue the conditional write regardless of step 2. The store's
//!    compare-and-swap is the final authority; a late rejection is reported
//!    exactly like a step 2 conflict.

use std::sync::Arc;

use super::errors::{GuardError, GuardResult, StoreError, StoreResult};
use super::store::{FieldValues, RecordStore, WriteOutcome};
use super::submission::EditSubmission;
use crate::observability::{log_event, GuardEvent, GuardMetrics};
use crate::token::{DisplayToken, RevisionMarker, TokenError, VersionCodec};

/// Outcome of comparing a submission against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResult {
    /// Proceed with the write (or create, for the sentinel)
    Match,
    /// Record changed since it was read
    Conflict,
    /// Token did not verify
    Tampered,
}

/// Version guard over one record store.
#[derive(Debug)]
pub struct ConflictDetector<S: RecordStore> {
    codec: VersionCodec,
    store: Arc<S>,
    metrics: Arc<GuardMetrics>,
}

impl<S: RecordStore> Clone for ConflictDetector<S> {
    fn clone(&self) -> Self {
        Self {
            codec: self.codec.clone(),
            store: Arc::clone(&self.store),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<S: RecordStore> ConflictDetector<S> {
    /// Detector with its own metrics.
    pub fn new(codec: VersionCodec, store: Arc<S>) -> Self {
        Self::with_metrics(codec, store, Arc::new(GuardMetrics::new()))
    }

    /// Detector reporting into shared metrics.
    pub fn with_metrics(codec: VersionCodec, store: Arc<S>, metrics: Arc<GuardMetrics>) -> Self {
        Self {
            codec,
            store,
            metrics,
        }
    }

    /// Codec tokens are signed with
    pub fn codec(&self) -> &VersionCodec {
        &self.codec
    }

    /// Backing record store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Outcome counters
    pub fn metrics(&self) -> &GuardMetrics {
        &self.metrics
    }

    /// Token for a marker the caller already holds. `None` means new record.
    pub fn render_token(&self, marker: Option<&RevisionMarker>) -> GuardResult<DisplayToken> {
        let token = self.codec.encode(marker).map_err(|e| match e {
            TokenError::KindMismatch { expected, found } => {
                GuardError::Store(StoreError::KindMismatch { expected, found })
            }
            other => GuardError::Tampered(other),
        })?;
        self.metrics.increment_tokens_rendered();
        log_event(
            GuardEvent::TokenRendered,
            &[("display", token.display_value())],
        );
        Ok(token)
    }

    /// Read the record's live marker and render it.
    pub fn render_for(&self, record_id: &str) -> GuardResult<DisplayToken> {
        let current = self.store_call(record_id, |s| s.current_marker(record_id))?;
        self.render_token(current.as_ref())
    }

    /// Compare a decoded marker against the live one.
    pub fn check(&self, record_id: &str, submitted: &RevisionMarker) -> StoreResult<ConflictResult> {
        let live = self.store_call(record_id, |s| s.current_marker(record_id))?;
        let result = compare(submitted, live.as_ref());

        let submitted_display = submitted.to_string();
        let live_display = live.map(|m| m.to_string()).unwrap_or_default();
        let fields = [
            ("record_id", record_id),
            ("submitted", submitted_display.as_str()),
            ("live", live_display.as_str()),
        ];
        match result {
            ConflictResult::Match => {
                self.metrics.increment_matches();
                log_event(GuardEvent::VersionMatch, &fields);
            }
            _ => {
                self.metrics.increment_conflicts();
                log_event(GuardEvent::VersionConflict, &fields);
            }
        }
        Ok(result)
    }

    /// Three-way outcome for a raw hidden-field value.
    pub fn assess(&self, hidden_field_value: &str, record_id: &str) -> StoreResult<ConflictResult> {
        match self.decode(hidden_field_value, record_id) {
            Ok(marker) => self.check(record_id, &marker),
            Err(_) => Ok(ConflictResult::Tampered),
        }
    }

    /// Verify a submitted token and confirm it is current.
    ///
    /// Returns the decoded marker, which is what the conditional write must
    /// expect.
    pub fn validate_submission(
        &self,
        hidden_field_value: &str,
        record_id: &str,
    ) -> GuardResult<RevisionMarker> {
        let marker = self
            .decode(hidden_field_value, record_id)
            .map_err(GuardError::Tampered)?;

        match self.check(record_id, &marker)? {
            ConflictResult::Match => Ok(marker),
            _ => Err(GuardError::Conflict {
                record_id: record_id.to_string(),
            }),
        }
    }

    /// Conditional write against `expected`. Returns the new marker.
    pub fn commit(
        &self,
        record_id: &str,
        expected: RevisionMarker,
        fields: FieldValues,
    ) -> GuardResult<RevisionMarker> {
        let outcome = self.store_call(record_id, |s| {
            s.conditional_write(record_id, expected, fields)
        })?;

        match outcome {
            WriteOutcome::Committed(marker) => {
                self.metrics.increment_commits();
                let display = marker.to_string();
                log_event(
                    GuardEvent::WriteCommitted,
                    &[("record_id", record_id), ("marker", display.as_str())],
                );
                Ok(marker)
            }
            WriteOutcome::Conflict { .. } => {
                self.metrics.increment_late_conflicts();
                let expected_display = expected.to_string();
                log_event(
                    GuardEvent::WriteRejectedLate,
                    &[
                        ("record_id", record_id),
                        ("expected", expected_display.as_str()),
                    ],
                );
                Err(GuardError::Conflict {
                    record_id: record_id.to_string(),
                })
            }
        }
    }

    /// Validate then commit. Consumes the submission.
    pub fn submit(&self, submission: EditSubmission) -> GuardResult<RevisionMarker> {
        let EditSubmission {
            record_id,
            version_token,
            fields,
        } = submission;

        let expected = self.validate_submission(&version_token, &record_id)?;
        self.commit(&record_id, expected, fields)
    }

    fn decode(&self, hidden_field_value: &str, record_id: &str) -> Result<RevisionMarker, TokenError> {
        self.codec.decode(hidden_field_value).map_err(|e| {
            self.metrics.increment_tampered();
            log_event(
                GuardEvent::TokenTampered,
                &[("record_id", record_id), ("code", e.code())],
            );
            e
        })
    }

    fn store_call<T>(
        &self,
        record_id: &str,
        op: impl FnOnce(&S) -> StoreResult<T>,
    ) -> StoreResult<T> {
        op(self.store.as_ref()).map_err(|e| {
            self.metrics.increment_store_failures();
            let message = e.to_string();
            log_event(
                GuardEvent::StoreFailure,
                &[("record_id", record_id), ("error", message.as_str())],
            );
            e
        })
    }
}

/// Pure comparison rule.
///
/// The sentinel matches only an absent record; any other marker matches only
/// an identical live marker.
fn compare(submitted: &RevisionMarker, live: Option<&RevisionMarker>) -> ConflictResult {
    match live {
        None if submitted.is_sentinel() => ConflictResult::Match,
        Some(live) if !submitted.is_sentinel() && live == submitted => ConflictResult::Match,
        _ => ConflictResult::Conflict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::store::InMemoryRecordStore;
    use crate::signing::Signer;
    use crate::token::MarkerKind;

    fn detector(kind: MarkerKind) -> ConflictDetector<InMemoryRecordStore> {
        let codec = VersionCodec::new(
            Signer::from_secret(b"detector-test-secret-of-decent-size", "form"),
            kind,
        );
        ConflictDetector::new(codec, Arc::new(InMemoryRecordStore::new(kind)))
    }

    #[test]
    fn test_compare_rules() {
        let zero = RevisionMarker::Counter(0);
        let five = RevisionMarker::Counter(5);
        let six = RevisionMarker::Counter(6);
        assert_eq!(compare(&zero, None), ConflictResult::Match);
        assert_eq!(compare(&five, None), ConflictResult::Conflict);
        assert_eq!(compare(&five, Some(&five)), ConflictResult::Match);
        assert_eq!(compare(&five, Some(&six)), ConflictResult::Conflict);
        assert_eq!(compare(&zero, Some(&five)), ConflictResult::Conflict);
    }

    #[test]
    fn test_render_for_missing_record_is_new_token() {
        let d = detector(MarkerKind::Counter);
        let token = d.render_for("nope").unwrap();
        assert_eq!(token.display_value(), "");
        assert!(d.codec().decode(token.hidden_field_value()).unwrap().is_sentinel());
    }

    #[test]
    fn test_assess_tampered_without_store() {
        let d = detector(MarkerKind::Counter);
        assert_eq!(
            d.assess("garbage-not-signed", "r1").unwrap(),
            ConflictResult::Tampered
        );
        assert_eq!(d.metrics().snapshot().tampered, 1);
        assert_eq!(d.metrics().snapshot().matches, 0);
    }

    #[test]
    fn test_render_token_wrong_kind_is_store_error() {
        let d = detector(MarkerKind::Timestamp);
        let result = d.render_token(Some(&RevisionMarker::Counter(1)));
        assert!(matches!(
            result,
            Err(GuardError::Store(StoreError::KindMismatch { .. }))
        ));
    }

    #[test]
    fn test_validate_returns_decoded_marker() {
        let d = detector(MarkerKind::Counter);
        let created = d.store().force_write("r1", FieldValues::new()).unwrap();
        let token = d.render_token(Some(&created)).unwrap();
        let marker = d
            .validate_submission(token.hidden_field_value(), "r1")
            .unwrap();
        assert_eq!(marker, created);
    }

    #[test]
    fn test_submit_counts_commit() {
        let d = detector(MarkerKind::Counter);
        let token = d.render_for("r1").unwrap();
        let submission = EditSubmission::new("r1", token.hidden_field_value(), FieldValues::new());
        assert_eq!(d.submit(submission).unwrap(), RevisionMarker::Counter(1));
        let snap = d.metrics().snapshot();
        assert_eq!(snap.commits, 1);
        assert_eq!(snap.matches, 1);
        assert_eq!(snap.tokens_rendered, 1);
    }
}
