//! Observability
//!
//! This module provides:
//! - Structured logging (JSON lines)
//! - Guard lifecycle events
//! - Counters for matches, conflicts and tamper attempts
//!
//! # Usage
//!
//! ```ignore
//! use versionguard::observability::{log_event, GuardEvent};
//!
//! log_event(GuardEvent::VersionConflict, &[("record_id", "r1")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::GuardEvent;
pub use logger::{Logger, Severity};
pub use metrics::{GuardMetrics, GuardMetricsSnapshot};

/// Log a guard event at its default severity
pub fn log_event(event: GuardEvent, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
