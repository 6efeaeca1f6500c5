//! `ercsift triage`: activity filter plus verified-source download for
//! classified contracts.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ercsift_explorer::{EtherscanClient, ExplorerConfig};
use ercsift_triage::{SourceStore, TriageConfig, TriagePipeline, TriageReport};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::tabular;

pub struct TriageArgs<'a> {
    pub input: &'a Path,
    pub out_dir: &'a Path,
    pub only: &'a [String],
    pub config: TriageConfig,
    pub explorer: ExplorerConfig,
    pub report: Option<&'a Path>,
}

/// Addresses from a classification result file, optionally restricted to
/// rows matching one of `only`. Duplicates are kept.
pub fn select_addresses(rows: Vec<(String, Vec<String>)>, only: &[String]) -> Vec<String> {
    let wanted: HashSet<&str> = only.iter().map(String::as_str).collect();
    rows.into_iter()
        .filter(|(_, matched)| wanted.is_empty() || matched.iter().any(|m| wanted.contains(m.as_str())))
        .map(|(address, _)| address)
        .collect()
}

pub async fn run(args: TriageArgs<'_>) -> Result<()> {
    let rows = tabular::read_classified(args.input)?;
    let addresses = select_addresses(rows, args.only);
    info!(
        input = %args.input.display(),
        selected = addresses.len(),
        "triage input loaded"
    );

    if args.explorer.api_key.is_none() {
        warn!("no explorer API key set; requests use the anonymous rate limit");
    }
    let explorer = Arc::new(EtherscanClient::new(args.explorer).context("build explorer client")?);
    let pipeline = TriagePipeline::new(explorer, SourceStore::new(args.out_dir), args.config);

    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; finishing in-flight addresses");
            let _ = tx.send(true);
        }
    });

    let report = pipeline.run(addresses, rx).await;
    print_summary(&report);

    if let Some(path) = args.report {
        write_report(&report, path)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn print_summary(report: &TriageReport) {
    println!("{}", report.summary());
    for (address, path) in report.saved() {
        println!("  saved     {address} → {}", path.display());
    }
    for label in ["skipped", "failed", "cancelled"] {
        for address in report.with_label(label) {
            println!("  {label:<9} {address}");
        }
    }
}

pub fn write_report(report: &TriageReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory '{}'", parent.display()))?;
    }
    let json = report.to_json_pretty()?;
    std::fs::write(path, json).with_context(|| format!("write report '{}'", path.display()))
}
