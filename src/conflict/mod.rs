//! Conflict Detection
//!
//! This module provides:
//! - `RecordStore` - the store contract (read marker, conditional write)
//! - `InMemoryRecordStore` - mutex-guarded reference store
//! - `ConflictDetector` - token validation, comparison and commit
//! - `GuardError` - Tampered / Conflict / Store taxonomy

mod detector;
mod errors;
mod store;
mod submission;

pub use detector::{ConflictDetector, ConflictResult};
pub use errors::{
    GuardError, GuardResult, StoreError, StoreResult, NON_FIELD_ERRORS, RECORD_MODIFIED,
};
pub use store::{FieldValues, InMemoryRecordStore, RecordStore, StoredRecord, WriteOutcome};
pub use submission::EditSubmission;
