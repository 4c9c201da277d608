//! # Record Store Contract
//!
//! The store owns the authoritative marker for every record. The OCC core
//! only needs two operations from it: read the live marker, and write
//! conditionally on the marker still being what the caller expects.
//!
//! ## Invariants
//! - `conditional_write` is atomic per record: compare, write and marker
//!   advance happen under one exclusive lock
//! - A committed marker is strictly greater than the one it replaced

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use crate::token::{now_micros, MarkerKind, RevisionMarker};

/// Field values carried by an edit, keyed by field name.
pub type FieldValues = BTreeMap<String, Value>;

/// Result of a conditional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Write applied; the record now carries this marker
    Committed(RevisionMarker),
    /// Marker no longer matched; nothing was written
    Conflict { current: Option<RevisionMarker> },
}

/// Persistence collaborator consumed by the conflict detector.
pub trait RecordStore: Send + Sync {
    /// Live marker for a record, `None` if the record does not exist.
    fn current_marker(&self, record_id: &str) -> StoreResult<Option<RevisionMarker>>;

    /// Compare-and-swap keyed by `(record_id, expected)`.
    ///
    /// A sentinel `expected` creates the record when it does not exist yet.
    fn conditional_write(
        &self,
        record_id: &str,
        expected: RevisionMarker,
        fields: FieldValues,
    ) -> StoreResult<WriteOutcome>;
}

/// A stored record
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub marker: RevisionMarker,
    pub fields: FieldValues,
}

/// In-memory store.
///
/// One mutex guards every record, which serializes all compare-and-swap
/// operations. Good enough for tests and single-process embedding.
#[derive(Debug)]
pub struct InMemoryRecordStore {
    kind: MarkerKind,
    records: Mutex<HashMap<String, StoredRecord>>,
}

impl InMemoryRecordStore {
    pub fn new(kind: MarkerKind) -> Self {
        Self {
            kind,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Marker kind this store assigns
    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// Snapshot of a record
    pub fn get(&self, record_id: &str) -> StoreResult<Option<StoredRecord>> {
        Ok(self.lock()?.get(record_id).cloned())
    }

    /// Number of records held
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Unconditional write, as performed by a writer that bypasses OCC.
    /// Creates the record if needed and returns its new marker.
    pub fn force_write(&self, record_id: &str, fields: FieldValues) -> StoreResult<RevisionMarker> {
        let mut records = self.lock()?;
        let previous = records
            .get(record_id)
            .map(|r| r.marker)
            .unwrap_or_else(|| self.kind.sentinel());
        let marker = advance(record_id, &previous)?;
        let entry = records
            .entry(record_id.to_string())
            .or_insert_with(|| StoredRecord {
                marker,
                fields: FieldValues::new(),
            });
        entry.marker = marker;
        entry.fields.extend(fields);
        Ok(marker)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, StoredRecord>>> {
        self.records.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn ensure_kind(&self, marker: &RevisionMarker) -> StoreResult<()> {
        if marker.kind() != self.kind {
            return Err(StoreError::KindMismatch {
                expected: self.kind,
                found: marker.kind(),
            });
        }
        Ok(())
    }
}

fn advance(record_id: &str, marker: &RevisionMarker) -> StoreResult<RevisionMarker> {
    marker
        .advance(now_micros())
        .ok_or_else(|| StoreError::MarkerExhausted {
            record_id: record_id.to_string(),
        })
}

impl RecordStore for InMemoryRecordStore {
    fn current_marker(&self, record_id: &str) -> StoreResult<Option<RevisionMarker>> {
        Ok(self.lock()?.get(record_id).map(|r| r.marker))
    }

    fn conditional_write(
        &self,
        record_id: &str,
        expected: RevisionMarker,
        fields: FieldValues,
    ) -> StoreResult<WriteOutcome> {
        self.ensure_kind(&expected)?;
        let mut records = self.lock()?;

        if let Some(record) = records.get_mut(record_id) {
            if record.marker != expected {
                return Ok(WriteOutcome::Conflict {
                    current: Some(record.marker),
                });
            }
            record.marker = advance(record_id, &record.marker)?;
            record.fields.extend(fields);
            return Ok(WriteOutcome::Committed(record.marker));
        }

        if !expected.is_sentinel() {
            return Ok(WriteOutcome::Conflict { current: None });
        }

        let marker = advance(record_id, &expected)?;
        records.insert(record_id.to_string(), StoredRecord { marker, fields });
        Ok(WriteOutcome::Committed(marker))
    }
}
