//! Batch classification request configuration.

use std::collections::HashSet;

use ercsift_core::DEFAULT_PREVIEW_LEN;
use serde::{Deserialize, Serialize};

/// One contract to classify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCode {
    pub address: String,
    pub bytecode: String,
}

impl ContractCode {
    pub fn new(address: impl Into<String>, bytecode: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            bytecode: bytecode.into(),
        }
    }
}

/// Configuration for a batch classification job.
pub struct BatchRequest {
    /// Contracts to classify; results come back in this order
    pub contracts: Vec<ContractCode>,
    /// Standard names skipped before matching
    pub exclude: HashSet<String>,
    /// Number of Rayon workers (0 = global pool)
    pub threads: usize,
    /// Contracts per chunk; progress is reported between chunks
    pub chunk_size: usize,
    /// Characters kept in `bytecode_preview`
    pub preview_len: usize,
    /// Optional progress callback `(done, total)`
    pub on_progress: Option<Box<dyn Fn(usize, usize) + Send + Sync>>,
}

impl BatchRequest {
    pub fn new(contracts: Vec<ContractCode>) -> Self {
        Self {
            contracts,
            exclude: HashSet::new(),
            threads: 0,
            chunk_size: 10_000,
            preview_len: DEFAULT_PREVIEW_LEN,
            on_progress: None,
        }
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    pub fn chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = n.max(1);
        self
    }

    pub fn preview_len(mut self, n: usize) -> Self {
        self.preview_len = n;
        self
    }

    pub fn on_progress<F: Fn(usize, usize) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }
}
