//! RevisionMarker - per-record version scalar
//!
//! A record carries exactly one marker. It is either a write counter or the
//! time of the last write; which one is fixed per deployment by
//! [`MarkerKind`].
//!
//! ## Invariants
//! - A successful write never decreases the marker
//! - `advance` is strictly increasing, so two commits never share a marker
//! - Timestamps are held at microsecond precision so they survive the
//!   signed payload unchanged

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Which flavour of marker a codec or store deals in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Integer incremented on every write
    Counter,
    /// Wall-clock time of the last write
    Timestamp,
}

impl MarkerKind {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Counter => "counter",
            MarkerKind::Timestamp => "timestamp",
        }
    }

    /// The "no revision yet" marker for this kind.
    pub fn sentinel(&self) -> RevisionMarker {
        match self {
            MarkerKind::Counter => RevisionMarker::Counter(0),
            MarkerKind::Timestamp => RevisionMarker::Timestamp(DateTime::<Utc>::default()),
        }
    }

    /// Parse a user-facing marker value (decimal counter or RFC 3339 time).
    pub fn parse_display(&self, value: &str) -> Option<RevisionMarker> {
        match self {
            MarkerKind::Counter => value.parse::<u64>().ok().map(RevisionMarker::Counter),
            MarkerKind::Timestamp => DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|ts| RevisionMarker::Timestamp(truncate_micros(ts.with_timezone(&Utc)))),
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoritative version scalar of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RevisionMarker {
    Counter(u64),
    Timestamp(DateTime<Utc>),
}

impl RevisionMarker {
    /// Kind of this marker
    pub fn kind(&self) -> MarkerKind {
        match self {
            RevisionMarker::Counter(_) => MarkerKind::Counter,
            RevisionMarker::Timestamp(_) => MarkerKind::Timestamp,
        }
    }

    /// True for the "record not yet created" value.
    pub fn is_sentinel(&self) -> bool {
        *self == self.kind().sentinel()
    }

    /// The marker a successful write produces.
    ///
    /// Counters go up by one. Timestamps take `now`, bumped by a microsecond
    /// when the clock has not moved past the previous value. `None` once the
    /// marker space is exhausted; the result is never equal to `self`.
    pub fn advance(&self, now: DateTime<Utc>) -> Option<RevisionMarker> {
        match self {
            RevisionMarker::Counter(n) => n.checked_add(1).map(RevisionMarker::Counter),
            RevisionMarker::Timestamp(prev) => {
                let now = truncate_micros(now);
                let floor = prev.checked_add_signed(chrono::Duration::microseconds(1))?;
                Some(RevisionMarker::Timestamp(if now >= floor { now } else { floor }))
            }
        }
    }

    /// Value that goes inside the signed token.
    pub(crate) fn to_payload(&self) -> String {
        match self {
            RevisionMarker::Counter(n) => n.to_string(),
            RevisionMarker::Timestamp(ts) => ts.timestamp_micros().to_string(),
        }
    }

    /// Inverse of `to_payload` for a known kind.
    pub(crate) fn from_payload(kind: MarkerKind, payload: &str) -> Option<RevisionMarker> {
        match kind {
            MarkerKind::Counter => payload.parse::<u64>().ok().map(RevisionMarker::Counter),
            MarkerKind::Timestamp => {
                let micros = payload.parse::<i64>().ok().filter(|m| *m >= 0)?;
                DateTime::<Utc>::from_timestamp_micros(micros).map(RevisionMarker::Timestamp)
            }
        }
    }
}

impl fmt::Display for RevisionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevisionMarker::Counter(n) => write!(f, "{}", n),
            RevisionMarker::Timestamp(ts) => {
                f.write_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
            }
        }
    }
}

/// Current time at marker precision.
pub fn now_micros() -> DateTime<Utc> {
    truncate_micros(Utc::now())
}

fn truncate_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_micros(ts.timestamp_micros()).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_counter_sentinel_is_zero() {
        assert_eq!(MarkerKind::Counter.sentinel(), RevisionMarker::Counter(0));
        assert!(RevisionMarker::Counter(0).is_sentinel());
        assert!(!RevisionMarker::Counter(1).is_sentinel());
    }

    #[test]
    fn test_timestamp_sentinel_is_epoch() {
        let sentinel = MarkerKind::Timestamp.sentinel();
        assert!(sentinel.is_sentinel());
        assert_eq!(sentinel.to_payload(), "0");
    }

    #[test]
    fn test_counter_advance() {
        let next = RevisionMarker::Counter(5).advance(Utc::now());
        assert_eq!(next, Some(RevisionMarker::Counter(6)));
    }

    #[test]
    fn test_counter_advance_at_ceiling_is_none() {
        assert_eq!(RevisionMarker::Counter(u64::MAX).advance(Utc::now()), None);
    }

    #[test]
    fn test_timestamp_advance_takes_now() {
        let prev = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 5).unwrap();
        let next = RevisionMarker::Timestamp(prev).advance(now);
        assert_eq!(next, Some(RevisionMarker::Timestamp(now)));
    }

    #[test]
    fn test_timestamp_advance_is_strict_when_clock_stalls() {
        let prev = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        // Clock went backwards
        let now = prev - Duration::seconds(3);
        let next = RevisionMarker::Timestamp(prev).advance(now);
        assert_eq!(
            next,
            Some(RevisionMarker::Timestamp(prev + Duration::microseconds(1)))
        );
    }

    #[test]
    fn test_timestamp_payload_round_trip() {
        let ts = now_micros();
        let marker = RevisionMarker::Timestamp(ts);
        let back = RevisionMarker::from_payload(MarkerKind::Timestamp, &marker.to_payload());
        assert_eq!(back, Some(marker));
    }

    #[test]
    fn test_negative_payload_rejected() {
        assert!(RevisionMarker::from_payload(MarkerKind::Counter, "-1").is_none());
        assert!(RevisionMarker::from_payload(MarkerKind::Timestamp, "-1").is_none());
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(RevisionMarker::Counter(12).to_string(), "12");
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        assert_eq!(
            RevisionMarker::Timestamp(ts).to_string(),
            "2024-03-09T12:30:00.000000Z"
        );
    }

    #[test]
    fn test_parse_display() {
        assert_eq!(
            MarkerKind::Counter.parse_display("9"),
            Some(RevisionMarker::Counter(9))
        );
        assert!(MarkerKind::Counter.parse_display("nine").is_none());
        let parsed = MarkerKind::Timestamp.parse_display("2024-03-09T12:30:00.000000Z");
        assert_eq!(parsed.map(|m| m.kind()), Some(MarkerKind::Timestamp));
    }
}
