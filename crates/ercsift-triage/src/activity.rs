//! Activity triage: is a contract busy enough, and recently enough, to be
//! worth fetching source for?

use ercsift_core::ActivityRecord;
use serde::{Deserialize, Serialize};

/// Transactions an address must exceed (strictly) to qualify.
pub const DEFAULT_COUNT_THRESHOLD: u64 = 100;

/// 30 days.
pub const DEFAULT_RECENCY_WINDOW_SECS: i64 = 2_592_000;

/// Addresses processed concurrently by the pipeline.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// Triage thresholds and pipeline concurrency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    pub count_threshold: u64,
    pub recency_window_secs: i64,
    pub max_in_flight: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            count_threshold: DEFAULT_COUNT_THRESHOLD,
            recency_window_secs: DEFAULT_RECENCY_WINDOW_SECS,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl TriageConfig {
    pub fn count_threshold(mut self, n: u64) -> Self {
        self.count_threshold = n;
        self
    }

    pub fn recency_window_secs(mut self, secs: i64) -> Self {
        self.recency_window_secs = secs;
        self
    }

    pub fn max_in_flight(mut self, n: usize) -> Self {
        self.max_in_flight = n.max(1);
        self
    }

    /// Apply [`qualifies`] with these thresholds.
    pub fn qualifies(&self, activity: &ActivityRecord, now: i64) -> bool {
        qualifies(
            &activity.timestamps,
            activity.transaction_count,
            now,
            self.count_threshold,
            self.recency_window_secs,
        )
    }
}

/// `transaction_count > count_threshold` and at least one timestamp at or
/// after `now - recency_window_secs`.
pub fn qualifies(
    timestamps: &[i64],
    transaction_count: u64,
    now: i64,
    count_threshold: u64,
    recency_window_secs: i64,
) -> bool {
    if transaction_count <= count_threshold {
        return false;
    }
    let cutoff = now.saturating_sub(recency_window_secs);
    timestamps.iter().any(|&t| t >= cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;
    const W: i64 = DEFAULT_RECENCY_WINDOW_SECS;

    #[test]
    fn count_must_exceed_threshold() {
        assert!(!qualifies(&[NOW], 100, NOW, 100, W));
        assert!(qualifies(&[NOW], 101, NOW, 100, W));
    }

    #[test]
    fn all_old_rejected() {
        let old = vec![NOW - W - 1; 101];
        assert!(!qualifies(&old, 101, NOW, 100, W));
    }

    #[test]
    fn window_boundary_inclusive() {
        let mut ts = vec![NOW - W - 500; 100];
        ts.push(NOW - W);
        assert!(qualifies(&ts, 101, NOW, 100, W));
    }

    #[test]
    fn newest_first_page_with_one_recent_record() {
        let mut ts = vec![NOW - 5];
        ts.extend(std::iter::repeat(NOW - 3 * W).take(9_999));
        assert!(qualifies(&ts, ts.len() as u64, NOW, 100, W));
    }

    #[test]
    fn empty_history() {
        assert!(!qualifies(&[], 0, NOW, 100, W));
    }

    #[test]
    fn config_applies_record() {
        let cfg = TriageConfig::default().count_threshold(1);
        let rec = ActivityRecord::new("0xabc", vec![NOW - 10, NOW - 5]);
        assert!(cfg.qualifies(&rec, NOW));
        assert!(!TriageConfig::default().qualifies(&rec, NOW));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: TriageConfig = serde_json::from_str(r#"{"count_threshold": 5}"#).unwrap();
        assert_eq!(cfg.count_threshold, 5);
        assert_eq!(cfg.recency_window_secs, W);
        assert_eq!(cfg.max_in_flight, DEFAULT_MAX_IN_FLIGHT);
    }
}
