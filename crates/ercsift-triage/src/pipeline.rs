//! `TriagePipeline`: activity check, then source fetch, for many addresses.
//!
//! Each address moves through its own state machine:
//!
//! ```text
//! Discovered ──activity──► ActivityChecked ──qualifies──► SourceFetched ──► Done
//!                                  └──rejected──────────────────────────────►┘
//! ```
//!
//! A failure at any step is logged with the address, recorded in the
//! [`TriageReport`], and the run moves on. Addresses run with bounded
//! concurrency; the report keeps input order.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use ercsift_core::SourceArtifact;
use ercsift_explorer::{ExplorerApi, ExplorerError};
use futures::stream::{self, StreamExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::activity::TriageConfig;
use crate::error::TriageError;
use crate::report::{AddressOutcome, AddressReport, Stage, TriageReport};
use crate::store::SourceStore;

/// Reason recorded when a qualifying contract has no verified source.
pub const NO_SOURCE: &str = "no-source";

/// Per-address progress, mainly for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressState {
    Discovered,
    ActivityChecked { qualifies: bool },
    SourceFetched,
    Done,
}

impl fmt::Display for AddressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovered => write!(f, "discovered"),
            Self::ActivityChecked { qualifies: true } => write!(f, "activity-checked(qualifies)"),
            Self::ActivityChecked { qualifies: false } => write!(f, "activity-checked(rejected)"),
            Self::SourceFetched => write!(f, "source-fetched"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Result of [`fetch_and_store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Saved(SourceArtifact),
    Skipped(&'static str),
}

/// Look up the verified source of `address` and persist it in `store`.
///
/// No usable source yields `Skipped("no-source")`; any other explorer or
/// storage failure is returned as an error.
pub async fn fetch_and_store(
    address: &str,
    explorer: &dyn ExplorerApi,
    store: &SourceStore,
) -> Result<FetchOutcome, TriageError> {
    let record = match explorer.get_source_code(address).await {
        Ok(rec) if rec.has_source() => rec,
        Ok(_) | Err(ExplorerError::NoSourceAvailable { .. }) => {
            debug!(address, "no verified source");
            return Ok(FetchOutcome::Skipped(NO_SOURCE));
        }
        Err(e) => return Err(e.into()),
    };

    let store = store.clone();
    let owned_address = address.to_string();
    let source_text = record.source_code;
    let (stored_path, source_text) = tokio::task::spawn_blocking(move || {
        store
            .save(&owned_address, &source_text)
            .map(|path| (path, source_text))
    })
    .await
    .map_err(|e| TriageError::Task(e.to_string()))??;

    Ok(FetchOutcome::Saved(SourceArtifact {
        address: address.to_string(),
        source_text,
        stored_path,
    }))
}

/// Concurrent triage over a list of addresses.
pub struct TriagePipeline {
    explorer: Arc<dyn ExplorerApi>,
    store: SourceStore,
    config: TriageConfig,
    now: Option<i64>,
}

impl TriagePipeline {
    pub fn new(explorer: Arc<dyn ExplorerApi>, store: SourceStore, config: TriageConfig) -> Self {
        Self {
            explorer,
            store,
            config,
            now: None,
        }
    }

    /// Pin the reference time the recency window is measured from.
    /// Defaults to the wall clock at the start of [`TriagePipeline::run`].
    pub fn with_now(mut self, now: i64) -> Self {
        self.now = Some(now);
        self
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Process every address and report what happened to each.
    ///
    /// Once `shutdown` turns `true`, addresses not yet started are recorded
    /// as [`AddressOutcome::Cancelled`]; those already in flight finish.
    pub async fn run(
        &self,
        addresses: Vec<String>,
        shutdown: watch::Receiver<bool>,
    ) -> TriageReport {
        let started_at = Utc::now();
        let now = self.now.unwrap_or_else(|| started_at.timestamp());
        let total = addresses.len();
        let max_in_flight = self.config.max_in_flight.max(1);
        info!(
            "TriagePipeline: {} addresses (max_in_flight={}, min_tx>{}, window={}s)",
            total, max_in_flight, self.config.count_threshold, self.config.recency_window_secs
        );

        let entries: Vec<AddressReport> = stream::iter(addresses)
            .map(|address| {
                let shutdown = shutdown.clone();
                async move {
                    let cancelled = *shutdown.borrow();
                    let outcome = if cancelled {
                        debug!(address = %address, "cancelled before start");
                        AddressOutcome::Cancelled
                    } else {
                        self.process(&address, now).await
                    };
                    AddressReport { address, outcome }
                }
            })
            .buffered(max_in_flight)
            .collect()
            .await;

        let report = TriageReport {
            started_at,
            finished_at: Utc::now(),
            now,
            entries,
        };
        info!("TriagePipeline: complete, {}", report.summary());
        report
    }

    async fn process(&self, address: &str, now: i64) -> AddressOutcome {
        debug!(address, state = %AddressState::Discovered, "triage");

        let activity = match self.explorer.get_activity(address).await {
            Ok(a) => a,
            Err(e) => {
                warn!(address, stage = %Stage::Activity, error = %e, "triage failed");
                return AddressOutcome::Failed {
                    stage: Stage::Activity,
                    kind: e.kind().to_string(),
                    error: e.to_string(),
                };
            }
        };

        let qualifies = self.config.qualifies(&activity, now);
        debug!(
            address,
            state = %AddressState::ActivityChecked { qualifies },
            transaction_count = activity.transaction_count,
            "triage"
        );
        if !qualifies {
            return AddressOutcome::Rejected {
                transaction_count: activity.transaction_count,
            };
        }

        let outcome = match fetch_and_store(address, self.explorer.as_ref(), &self.store).await {
            Ok(FetchOutcome::Saved(artifact)) => {
                info!(address, path = %artifact.stored_path.display(), "source saved");
                AddressOutcome::Saved {
                    path: artifact.stored_path,
                }
            }
            Ok(FetchOutcome::Skipped(reason)) => AddressOutcome::Skipped {
                reason: reason.to_string(),
            },
            Err(e) => {
                warn!(address, stage = %Stage::Source, error = %e, "triage failed");
                AddressOutcome::Failed {
                    stage: Stage::Source,
                    kind: error_kind(&e).to_string(),
                    error: e.to_string(),
                }
            }
        };
        debug!(address, state = %AddressState::SourceFetched, outcome = outcome.label(), "triage");
        debug!(address, state = %AddressState::Done, "triage");
        outcome
    }
}

fn error_kind(e: &TriageError) -> &'static str {
    match e {
        TriageError::Explorer(inner) => inner.kind(),
        TriageError::Store(_) | TriageError::Task(_) => "storage",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_display() {
        assert_eq!(AddressState::Discovered.to_string(), "discovered");
        assert_eq!(
            AddressState::ActivityChecked { qualifies: false }.to_string(),
            "activity-checked(rejected)"
        );
    }
}
