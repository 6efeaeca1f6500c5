//! `BatchEngine`: parallel classification of many contracts.

use std::sync::Arc;

use ercsift_core::{ClassificationResult, SignatureRegistry};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::error::BatchError;
use crate::request::{BatchRequest, ContractCode};
use crate::strategy::{MatchStrategy, SubstringMatch};

/// Batch classification engine.
///
/// Contracts are classified independently against a shared read-only
/// registry, so the work fans out across Rayon threads without locking.
/// Output order always equals input order.
pub struct BatchEngine<S = SubstringMatch> {
    registry: Arc<SignatureRegistry>,
    classifier: Classifier<S>,
}

impl BatchEngine<SubstringMatch> {
    pub fn new(registry: Arc<SignatureRegistry>) -> Self {
        Self {
            registry,
            classifier: Classifier::new(),
        }
    }
}

impl<S: MatchStrategy> BatchEngine<S> {
    pub fn with_strategy(registry: Arc<SignatureRegistry>, strategy: S) -> Self {
        Self {
            registry,
            classifier: Classifier::with_strategy(strategy),
        }
    }

    pub fn registry(&self) -> &SignatureRegistry {
        &self.registry
    }

    /// Execute a batch classification request.
    pub fn classify(&self, req: BatchRequest) -> Result<Vec<ClassificationResult>, BatchError> {
        let total = req.contracts.len();
        info!(
            "BatchEngine: classifying {} contracts against {} standards (strategy={}, chunk_size={})",
            total,
            self.registry.len(),
            self.classifier.strategy().name(),
            req.chunk_size
        );

        let results = if req.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(req.threads)
                .build()?;
            pool.install(|| self.run(&req))
        } else {
            self.run(&req)
        };

        let matched = results.iter().filter(|r| !r.matched_standards.is_empty()).count();
        info!(
            "BatchEngine: complete, {} classified, {} with at least one match",
            results.len(),
            matched
        );
        Ok(results)
    }

    fn run(&self, req: &BatchRequest) -> Vec<ClassificationResult> {
        let total = req.contracts.len();
        let mut out = Vec::with_capacity(total);
        for chunk in req.contracts.chunks(req.chunk_size.max(1)) {
            let part: Vec<ClassificationResult> = chunk
                .par_iter()
                .map(|c| self.classify_one(c, req))
                .collect();
            out.extend(part);
            debug!(done = out.len(), total, "batch chunk classified");
            if let Some(cb) = &req.on_progress {
                cb(out.len(), total);
            }
        }
        out
    }

    fn classify_one(&self, contract: &ContractCode, req: &BatchRequest) -> ClassificationResult {
        let matched = self
            .classifier
            .classify(&contract.bytecode, &self.registry, &req.exclude);
        ClassificationResult::new(
            contract.address.clone(),
            contract.bytecode.clone(),
            matched,
            req.preview_len,
        )
    }
}

/// Classify every contract with the default strategy on the global pool.
pub fn classify_all(
    contracts: Vec<ContractCode>,
    registry: Arc<SignatureRegistry>,
    exclude: impl IntoIterator<Item = String>,
) -> Vec<ClassificationResult> {
    let engine = BatchEngine::new(registry);
    let req = BatchRequest::new(contracts).exclude(exclude);
    engine.run(&req)
}
