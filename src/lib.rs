//! versionguard - optimistic concurrency control for record edits
//!
//! A record's revision marker is signed when the record is read, travels
//! through the client as an opaque token, and is re-checked against the
//! store when the edit comes back. Forged tokens are rejected as tampered;
//! stale ones as conflicts.
//!
//! ```ignore
//! use std::sync::Arc;
//! use versionguard::config::GuardConfig;
//! use versionguard::conflict::{ConflictDetector, EditSubmission, InMemoryRecordStore};
//!
//! let config = GuardConfig::load(path)?;
//! let store = Arc::new(InMemoryRecordStore::new(config.marker_kind));
//! let guard = ConflictDetector::new(config.build_codec(), store);
//!
//! let token = guard.render_for("invoice-7")?;
//! // ... token.hidden_field_value() goes out, comes back with the edit ...
//! let new_marker = guard.submit(EditSubmission::new("invoice-7", hidden, fields))?;
//! ```

pub mod cli;
pub mod config;
pub mod conflict;
pub mod observability;
pub mod signing;
pub mod token;
