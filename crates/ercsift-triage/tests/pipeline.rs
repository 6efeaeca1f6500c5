//! `TriagePipeline` end to end against an in-memory explorer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ercsift_explorer::{ExplorerApi, ExplorerError, SourceRecord, TxRecord};
use ercsift_triage::{
    fetch_and_store, AddressOutcome, FetchOutcome, SourceStore, Stage, TriageConfig,
    TriagePipeline, NO_SOURCE,
};
use tokio::sync::watch;

const NOW: i64 = 1_700_000_000;
const DAY: i64 = 86_400;

#[derive(Default)]
struct Contract {
    timestamps: Vec<i64>,
    source: Option<String>,
    history_error: bool,
    source_error: bool,
}

#[derive(Default)]
struct FakeExplorer {
    contracts: HashMap<String, Contract>,
    source_calls: AtomicUsize,
    /// Flip the shutdown flag when this address's history is requested.
    trip: Option<(String, Mutex<Option<watch::Sender<bool>>>)>,
}

impl FakeExplorer {
    fn with(mut self, address: &str, contract: Contract) -> Self {
        self.contracts.insert(address.to_string(), contract);
        self
    }
}

#[async_trait]
impl ExplorerApi for FakeExplorer {
    async fn get_source_code(&self, address: &str) -> Result<SourceRecord, ExplorerError> {
        self.source_calls.fetch_add(1, Ordering::SeqCst);
        let c = self.contracts.get(address);
        if c.is_some_and(|c| c.source_error) {
            return Err(ExplorerError::UpstreamRejected {
                message: "NOTOK".into(),
                result: "Invalid API Key".into(),
            });
        }
        match c.and_then(|c| c.source.clone()) {
            Some(source_code) => Ok(SourceRecord {
                source_code,
                contract_name: "Token".into(),
                ..Default::default()
            }),
            None => Err(ExplorerError::NoSourceAvailable {
                address: address.to_string(),
            }),
        }
    }

    async fn get_transaction_list(&self, address: &str) -> Result<Vec<TxRecord>, ExplorerError> {
        if let Some((trip_addr, sender)) = &self.trip {
            if trip_addr == address {
                if let Some(tx) = sender.lock().unwrap().take() {
                    tx.send(true).unwrap();
                }
            }
        }
        let Some(c) = self.contracts.get(address) else {
            return Ok(Vec::new());
        };
        if c.history_error {
            return Err(ExplorerError::Network("connection reset".into()));
        }
        Ok(c.timestamps
            .iter()
            .map(|t| TxRecord {
                time_stamp: t.to_string(),
                ..Default::default()
            })
            .collect())
    }
}

fn busy_recent() -> Vec<i64> {
    let mut ts = vec![NOW - 400 * DAY; 120];
    ts.push(NOW - DAY);
    ts
}

fn busy_old() -> Vec<i64> {
    vec![NOW - 400 * DAY; 150]
}

fn addrs(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn mixed_batch_reports_every_address_in_order() {
    let explorer = FakeExplorer::default()
        .with(
            "0xaaa",
            Contract {
                timestamps: busy_recent(),
                source: Some("contract A {}".into()),
                ..Default::default()
            },
        )
        .with(
            "0xbbb",
            Contract {
                timestamps: busy_old(),
                source: Some("contract B {}".into()),
                ..Default::default()
            },
        )
        .with(
            "0xccc",
            Contract {
                timestamps: busy_recent(),
                source: None,
                ..Default::default()
            },
        )
        .with(
            "0xddd",
            Contract {
                history_error: true,
                ..Default::default()
            },
        )
        .with(
            "0xeee",
            Contract {
                timestamps: busy_recent(),
                source_error: true,
                ..Default::default()
            },
        );
    let explorer = Arc::new(explorer);

    let dir = tempfile::tempdir().unwrap();
    let pipeline = TriagePipeline::new(
        explorer.clone(),
        SourceStore::new(dir.path().join("sources")),
        TriageConfig::default(),
    )
    .with_now(NOW);

    let (_tx, rx) = watch::channel(false);
    let report = pipeline
        .run(addrs(&["0xaaa", "0xbbb", "0xccc", "0xddd", "0xeee", "0xfff"]), rx)
        .await;

    let order: Vec<&str> = report.entries.iter().map(|e| e.address.as_str()).collect();
    assert_eq!(order, vec!["0xaaa", "0xbbb", "0xccc", "0xddd", "0xeee", "0xfff"]);

    match report.outcome_of("0xaaa").unwrap() {
        AddressOutcome::Saved { path } => {
            assert_eq!(path.file_name().unwrap(), "0xaaa.sol");
            assert_eq!(std::fs::read_to_string(path).unwrap(), "contract A {}");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        report.outcome_of("0xbbb"),
        Some(&AddressOutcome::Rejected { transaction_count: 150 })
    );
    assert_eq!(
        report.outcome_of("0xccc"),
        Some(&AddressOutcome::Skipped { reason: NO_SOURCE.into() })
    );
    assert!(matches!(
        report.outcome_of("0xddd"),
        Some(AddressOutcome::Failed { stage: Stage::Activity, kind, .. }) if kind == "network"
    ));
    assert!(matches!(
        report.outcome_of("0xeee"),
        Some(AddressOutcome::Failed { stage: Stage::Source, kind, .. }) if kind == "upstream-rejected"
    ));
    assert_eq!(
        report.outcome_of("0xfff"),
        Some(&AddressOutcome::Rejected { transaction_count: 0 })
    );

    // Only qualifying addresses reach the source lookup.
    assert_eq!(explorer.source_calls.load(Ordering::SeqCst), 3);

    let s = report.summary();
    assert_eq!((s.saved, s.skipped, s.rejected, s.failed), (1, 1, 2, 2));
}

#[tokio::test]
async fn repeated_address_is_stored_twice_without_overwrite() {
    let explorer = Arc::new(FakeExplorer::default().with(
        "0xaaa",
        Contract {
            timestamps: busy_recent(),
            source: Some("contract A {}".into()),
            ..Default::default()
        },
    ));
    let dir = tempfile::tempdir().unwrap();
    let pipeline = TriagePipeline::new(
        explorer,
        SourceStore::new(dir.path()),
        TriageConfig::default().max_in_flight(2),
    )
    .with_now(NOW);

    let (_tx, rx) = watch::channel(false);
    let report = pipeline.run(addrs(&["0xaaa", "0xaaa"]), rx).await;

    let mut names: Vec<String> = report
        .saved()
        .map(|(_, p)| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["0xaaa.sol", "0xaaa_1.sol"]);
}

#[tokio::test]
async fn shutdown_before_start_cancels_everything() {
    let explorer = Arc::new(FakeExplorer::default());
    let dir = tempfile::tempdir().unwrap();
    let pipeline = TriagePipeline::new(explorer, SourceStore::new(dir.path()), TriageConfig::default());

    let (_tx, rx) = watch::channel(true);
    let report = pipeline.run(addrs(&["0x1", "0x2", "0x3"]), rx).await;
    assert_eq!(report.summary().cancelled, 3);
}

#[tokio::test]
async fn shutdown_mid_run_lets_in_flight_finish() {
    let (tx, rx) = watch::channel(false);
    let mut explorer = FakeExplorer::default();
    explorer.trip = Some(("0x2".into(), Mutex::new(Some(tx))));
    let explorer = Arc::new(explorer);

    let dir = tempfile::tempdir().unwrap();
    let pipeline = TriagePipeline::new(
        explorer,
        SourceStore::new(dir.path()),
        TriageConfig::default().max_in_flight(1),
    )
    .with_now(NOW);

    let report = pipeline.run(addrs(&["0x1", "0x2", "0x3", "0x4"]), rx).await;
    let labels: Vec<&str> = report.entries.iter().map(|e| e.outcome.label()).collect();
    assert_eq!(labels, vec!["rejected", "rejected", "cancelled", "cancelled"]);
}

#[tokio::test]
async fn fetch_and_store_skips_missing_source() {
    let explorer = FakeExplorer::default();
    let dir = tempfile::tempdir().unwrap();
    let store = SourceStore::new(dir.path());
    let out = fetch_and_store("0x404", &explorer, &store).await.unwrap();
    assert_eq!(out, FetchOutcome::Skipped(NO_SOURCE));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn fetch_and_store_returns_artifact() {
    let explorer = FakeExplorer::default().with(
        "0xaaa",
        Contract {
            source: Some("contract A {}".into()),
            ..Default::default()
        },
    );
    let dir = tempfile::tempdir().unwrap();
    let store = SourceStore::new(dir.path());
    match fetch_and_store("0xaaa", &explorer, &store).await.unwrap() {
        FetchOutcome::Saved(artifact) => {
            assert_eq!(artifact.address, "0xaaa");
            assert_eq!(artifact.source_text, "contract A {}");
            assert_eq!(artifact.stored_filename(), Some("0xaaa.sol"));
        }
        other => panic!("unexpected {other:?}"),
    }
}
