//! Guard counters
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Relaxed atomics; exact totals, no cross-counter consistency

use std::sync::atomic::{AtomicU64, Ordering};

/// Operational counters for the version guard
#[derive(Debug, Default)]
pub struct GuardMetrics {
    tokens_rendered: AtomicU64,
    matches: AtomicU64,
    conflicts: AtomicU64,
    late_conflicts: AtomicU64,
    tampered: AtomicU64,
    commits: AtomicU64,
    store_failures: AtomicU64,
}

/// Point-in-time copy of [`GuardMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardMetricsSnapshot {
    pub tokens_rendered: u64,
    pub matches: u64,
    pub conflicts: u64,
    pub late_conflicts: u64,
    pub tampered: u64,
    pub commits: u64,
    pub store_failures: u64,
}

impl GuardMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_tokens_rendered(&self) {
        self.tokens_rendered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_matches(&self) {
        self.matches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_conflicts(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    /// Conflicts found by the conditional write after a matching pre-check.
    /// Also counted in `conflicts`.
    pub fn increment_late_conflicts(&self) {
        self.late_conflicts.fetch_add(1, Ordering::Relaxed);
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_tampered(&self) {
        self.tampered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_commits(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_store_failures(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of all counters
    pub fn snapshot(&self) -> GuardMetricsSnapshot {
        GuardMetricsSnapshot {
            tokens_rendered: self.tokens_rendered.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            late_conflicts: self.late_conflicts.load(Ordering::Relaxed),
            tampered: self.tampered.load(Ordering::Relaxed),
            commits: self.commits.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(GuardMetrics::new().snapshot(), GuardMetricsSnapshot::default());
    }

    #[test]
    fn test_late_conflict_counts_as_conflict() {
        let metrics = GuardMetrics::new();
        metrics.increment_conflicts();
        metrics.increment_late_conflicts();
        let snap = metrics.snapshot();
        assert_eq!(snap.conflicts, 2);
        assert_eq!(snap.late_conflicts, 1);
    }

    #[test]
    fn test_concurrent_increments_are_exact() {
        let metrics = Arc::new(GuardMetrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        m.increment_commits();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(metrics.snapshot().commits, 4000);
    }
}
