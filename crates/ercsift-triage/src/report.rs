//! `TriageReport`: what happened to every address in a run.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline stage an address failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Activity,
    Source,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activity => write!(f, "activity"),
            Self::Source => write!(f, "source"),
        }
    }
}

/// Terminal state of one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AddressOutcome {
    /// Qualified and its source was written to `path`.
    Saved { path: PathBuf },
    /// Qualified but nothing was stored, e.g. `"no-source"`.
    Skipped { reason: String },
    /// Failed the activity thresholds.
    Rejected { transaction_count: u64 },
    /// An explorer or storage error; the run continued.
    Failed {
        stage: Stage,
        kind: String,
        error: String,
    },
    /// Shutdown was requested before the address was started.
    Cancelled,
}

impl AddressOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Saved { .. } => "saved",
            Self::Skipped { .. } => "skipped",
            Self::Rejected { .. } => "rejected",
            Self::Failed { .. } => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressReport {
    pub address: String,
    #[serde(flatten)]
    pub outcome: AddressOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub saved: usize,
    pub skipped: usize,
    pub rejected: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} addresses: {} saved, {} skipped, {} rejected, {} failed, {} cancelled",
            self.total, self.saved, self.skipped, self.rejected, self.failed, self.cancelled
        )
    }
}

/// Per-address outcomes of one pipeline run, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Reference time the recency window was measured from (unix seconds)
    pub now: i64,
    pub entries: Vec<AddressReport>,
}

impl TriageReport {
    pub fn summary(&self) -> Summary {
        let mut s = Summary {
            total: self.entries.len(),
            ..Default::default()
        };
        for e in &self.entries {
            match e.outcome {
                AddressOutcome::Saved { .. } => s.saved += 1,
                AddressOutcome::Skipped { .. } => s.skipped += 1,
                AddressOutcome::Rejected { .. } => s.rejected += 1,
                AddressOutcome::Failed { .. } => s.failed += 1,
                AddressOutcome::Cancelled => s.cancelled += 1,
            }
        }
        s
    }

    /// Stored paths, in input order.
    pub fn saved(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            AddressOutcome::Saved { path } => Some((e.address.as_str(), path.as_path())),
            _ => None,
        })
    }

    /// Addresses whose outcome has the given label.
    pub fn with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.outcome.label() == label)
            .map(|e| e.address.as_str())
    }

    pub fn outcome_of(&self, address: &str) -> Option<&AddressOutcome> {
        self.entries
            .iter()
            .find(|e| e.address == address)
            .map(|e| &e.outcome)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> TriageReport {
        let now = Utc::now();
        TriageReport {
            started_at: now,
            finished_at: now,
            now: now.timestamp(),
            entries: vec![
                AddressReport {
                    address: "0xa".into(),
                    outcome: AddressOutcome::Saved {
                        path: PathBuf::from("out/0xa.sol"),
                    },
                },
                AddressReport {
                    address: "0xb".into(),
                    outcome: AddressOutcome::Rejected { transaction_count: 3 },
                },
                AddressReport {
                    address: "0xc".into(),
                    outcome: AddressOutcome::Failed {
                        stage: Stage::Activity,
                        kind: "network".into(),
                        error: "timeout".into(),
                    },
                },
            ],
        }
    }

    #[test]
    fn summary_counts() {
        let s = report().summary();
        assert_eq!((s.total, s.saved, s.rejected, s.failed), (3, 1, 1, 1));
        assert_eq!(
            s.to_string(),
            "3 addresses: 1 saved, 0 skipped, 1 rejected, 1 failed, 0 cancelled"
        );
    }

    #[test]
    fn json_is_flat_and_tagged() {
        let json = report().to_json_pretty().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["entries"][0]["status"], "saved");
        assert_eq!(v["entries"][0]["address"], "0xa");
        assert_eq!(v["entries"][2]["stage"], "activity");
        let back: TriageReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries, report().entries);
    }

    #[test]
    fn label_filters() {
        let r = report();
        assert_eq!(r.with_label("failed").collect::<Vec<_>>(), vec!["0xc"]);
        assert_eq!(r.saved().count(), 1);
    }
}
