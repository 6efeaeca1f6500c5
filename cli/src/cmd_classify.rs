//! `ercsift classify`: label every contract in a CSV with matching standards.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ercsift_classify::{BatchEngine, BatchRequest};
use ercsift_core::{catalog, config, SignatureRegistry};
use tracing::info;

use crate::tabular;

pub struct ClassifyArgs<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub registry: Option<&'a Path>,
    pub exclude: &'a [String],
    pub limit: Option<usize>,
    pub threads: usize,
    pub preview_len: usize,
}

/// Registry from a config file, or the bundled catalog.
pub fn load_registry(path: Option<&Path>) -> Result<SignatureRegistry> {
    match path {
        Some(p) => config::load_file(p)
            .with_context(|| format!("load registry '{}'", p.display())),
        None => catalog::registry().context("build bundled catalog"),
    }
}

pub fn run(args: ClassifyArgs<'_>) -> Result<()> {
    let registry = Arc::new(load_registry(args.registry)?);
    for name in args.exclude {
        if !registry.contains(name) {
            tracing::warn!(standard = %name, "excluded standard is not in the registry");
        }
    }

    let contracts = tabular::read_contracts(args.input, args.limit)?;
    info!(
        input = %args.input.display(),
        contracts = contracts.len(),
        standards = registry.len(),
        "classifying"
    );

    let engine = BatchEngine::new(registry);
    let req = BatchRequest::new(contracts)
        .exclude(args.exclude.iter().cloned())
        .threads(args.threads)
        .preview_len(args.preview_len);
    let results = engine.classify(req)?;

    tabular::write_results(args.output, &results)?;

    let matched = results
        .iter()
        .filter(|r| !r.matched_standards.is_empty())
        .count();
    println!(
        "Classified {} contracts ({} matched at least one standard) → {}",
        results.len(),
        matched,
        args.output.display()
    );
    Ok(())
}
